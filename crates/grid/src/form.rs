//! Editable category payloads and the form snapshots built from them.

use pressgrid_core::locale::LocalizedText;
use pressgrid_core::types::{DbId, FileId};
use pressgrid_core::validation::FieldErrors;
use pressgrid_db::models::category::Category;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fields a client submits when adding or editing a category.
///
/// `image_id` is either the category's current permanent image (unchanged),
/// a temporary id returned by an upload (to be promoted), or absent (clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CategoryPayload {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Path is required and must be at most 255 characters"))]
    pub path: String,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub parent_id: Option<DbId>,
    #[serde(default)]
    pub image_id: Option<FileId>,
}

impl CategoryPayload {
    /// Payload mirroring the stored state of `category`.
    pub fn from_category(category: &Category) -> Self {
        Self {
            title: category.title.clone(),
            path: category.path.clone(),
            description: category.description.clone(),
            parent_id: category.parent_id,
            image_id: category.image_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Add,
    Edit,
}

/// Editable representation of one row: an empty skeleton in add mode, the
/// stored values in edit mode, or the submitted values annotated with field
/// errors after a rejected submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowForm {
    pub mode: FormMode,
    pub category_id: Option<DbId>,
    pub values: CategoryPayload,
    pub errors: FieldErrors,
}

impl RowForm {
    pub fn skeleton() -> Self {
        Self {
            mode: FormMode::Add,
            category_id: None,
            values: CategoryPayload::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn snapshot(category: &Category) -> Self {
        Self {
            mode: FormMode::Edit,
            category_id: Some(category.id),
            values: CategoryPayload::from_category(category),
            errors: FieldErrors::new(),
        }
    }

    /// Re-populated form for a submit that failed validation.
    pub fn rejected(category_id: Option<DbId>, values: CategoryPayload, errors: FieldErrors) -> Self {
        let mode = if category_id.is_some() {
            FormMode::Edit
        } else {
            FormMode::Add
        };
        Self {
            mode,
            category_id,
            values,
            errors,
        }
    }
}
