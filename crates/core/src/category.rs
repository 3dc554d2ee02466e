//! Category constants, field rules, delete policy and the ancestor walk.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::locale::LocalizedText;
use crate::types::DbId;

/// Maximum characters of a title entry.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum characters of a path slug.
pub const MAX_PATH_LEN: usize = 255;

/// Maximum characters of a description entry.
pub const MAX_DESCRIPTION_LEN: usize = 4000;

/// Default bound on the number of parent hops from any category to its root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("path pattern is a valid regex")
});

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// The primary-locale title must be present and non-blank; no entry may
/// exceed [`MAX_TITLE_LEN`].
pub fn validate_title(title: &LocalizedText, primary_locale: &str) -> Result<(), String> {
    if title.is_blank(primary_locale) {
        return Err(format!("Title is required for locale {primary_locale}"));
    }
    if let Some((locale, _)) = title
        .iter()
        .find(|(_, text)| text.trim().chars().count() > MAX_TITLE_LEN)
    {
        return Err(format!(
            "Title ({locale}) must be at most {MAX_TITLE_LEN} characters"
        ));
    }
    Ok(())
}

/// Path slugs are non-empty, at most [`MAX_PATH_LEN`] characters and limited
/// to ASCII letters, digits, `-` and `_`.
pub fn validate_path(path: &str) -> Result<(), String> {
    let path = path.trim();
    if path.is_empty() {
        return Err("Path is required".to_string());
    }
    if path.len() > MAX_PATH_LEN {
        return Err(format!("Path must be at most {MAX_PATH_LEN} characters"));
    }
    if !PATH_PATTERN.is_match(path) {
        return Err(
            "Path may only contain letters, digits, dashes and underscores".to_string(),
        );
    }
    Ok(())
}

pub fn validate_description(description: &LocalizedText) -> Result<(), String> {
    match description
        .iter()
        .find(|(_, text)| text.chars().count() > MAX_DESCRIPTION_LEN)
    {
        Some((locale, _)) => Err(format!(
            "Description ({locale}) must be at most {MAX_DESCRIPTION_LEN} characters"
        )),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Delete policy
// ---------------------------------------------------------------------------

/// What happens to the children of a deleted category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Refuse to delete a category that still has children.
    #[default]
    Reject,
    /// Delete the category and move its children to the root level.
    Orphan,
    /// Delete the category together with all of its descendants.
    Cascade,
}

impl DeletePolicy {
    /// Parse from the configuration value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "orphan" => Ok(Self::Orphan),
            "cascade" => Ok(Self::Cascade),
            other => Err(CoreError::Validation(format!(
                "Unknown delete policy '{other}'. Must be one of: reject, orphan, cascade"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Orphan => "orphan",
            Self::Cascade => "cascade",
        }
    }
}

// ---------------------------------------------------------------------------
// Ancestor walk
// ---------------------------------------------------------------------------

/// Result of feeding one parent link into an [`AncestorWalk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    /// Look up the parent of this id next.
    Continue(DbId),
    /// Reached a root without meeting the target.
    Done,
    /// The target id is an ancestor of the starting point.
    Cycle,
    /// The chain is longer than the configured depth.
    TooDeep,
}

/// Depth-bounded walk from a proposed parent up to the root, watching for the
/// category being re-parented.
///
/// The walk is storage-agnostic: the caller resolves each parent link and
/// feeds it back through [`AncestorWalk::step`].
#[derive(Debug)]
pub struct AncestorWalk {
    target: Option<DbId>,
    max_depth: usize,
    hops: usize,
}

impl AncestorWalk {
    /// Start a walk at `start` (the proposed parent). `target` is the category
    /// being edited, or `None` when creating.
    pub fn begin(start: DbId, target: Option<DbId>, max_depth: usize) -> (Self, WalkStep) {
        let walk = Self {
            target,
            max_depth,
            hops: 0,
        };
        let first = if Some(start) == target {
            WalkStep::Cycle
        } else {
            WalkStep::Continue(start)
        };
        (walk, first)
    }

    /// Feed the parent of the id returned by the previous step.
    pub fn step(&mut self, parent: Option<DbId>) -> WalkStep {
        self.hops += 1;
        match parent {
            None => WalkStep::Done,
            Some(id) if Some(id) == self.target => WalkStep::Cycle,
            Some(_) if self.hops >= self.max_depth => WalkStep::TooDeep,
            Some(id) => WalkStep::Continue(id),
        }
    }

    /// Number of hops taken so far. After [`WalkStep::Done`] this is the
    /// depth a child of the starting category sits at (roots are depth 0).
    pub fn hops(&self) -> usize {
        self.hops
    }
}
