//! Category model.

use pressgrid_core::locale::LocalizedText;
use pressgrid_core::types::{DbId, FileId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub tenant_id: DbId,
    pub parent_id: Option<DbId>,
    pub path: String,
    #[sqlx(json)]
    pub title: LocalizedText,
    #[sqlx(json)]
    pub description: LocalizedText,
    pub image_id: Option<FileId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input for inserting a category; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub tenant_id: DbId,
    pub parent_id: Option<DbId>,
    pub path: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub image_id: Option<FileId>,
}

/// What a delete removed, so callers can refresh the right grid region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedCategory {
    pub deleted_id: DbId,
    pub former_parent_id: Option<DbId>,
    /// Descendants removed along with the category (cascade policy).
    pub removed_descendants: Vec<DbId>,
    /// Former children moved to the root level (orphan policy).
    pub reparented: Vec<DbId>,
    /// Images of every removed row, the deleted category included.
    pub released_images: Vec<FileId>,
}
