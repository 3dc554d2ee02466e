use pressgrid_core::error::CoreError;
use pressgrid_core::types::DbId;

/// Failures reported by a [`crate::repositories::CategoryStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The record exists but belongs to another tenant.
    #[error("{entity} {id} is outside tenant {tenant_id}")]
    ScopeViolation {
        entity: &'static str,
        id: DbId,
        tenant_id: DbId,
    },

    #[error("Category {parent_id} is a descendant of category {id}")]
    Cycle { id: DbId, parent_id: DbId },

    #[error("Category {id} still has {count} child categories")]
    HasChildren { id: DbId, count: usize },

    #[error("Path '{path}' is already used in this tenant")]
    DuplicatePath { path: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            err @ StoreError::ScopeViolation { .. } => CoreError::ScopeViolation(err.to_string()),
            err @ StoreError::Cycle { .. } => CoreError::Validation(err.to_string()),
            err @ (StoreError::HasChildren { .. } | StoreError::DuplicatePath { .. }) => {
                CoreError::Conflict(err.to_string())
            }
            StoreError::Database(db) => CoreError::Storage(db.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn maps_to_core_errors() {
        assert_matches!(
            CoreError::from(StoreError::NotFound { entity: "Category", id: 3 }),
            CoreError::NotFound { entity: "Category", id: 3 }
        );
        assert_matches!(
            CoreError::from(StoreError::ScopeViolation {
                entity: "Category",
                id: 3,
                tenant_id: 1
            }),
            CoreError::ScopeViolation(msg) if msg.contains("tenant 1")
        );
        assert_matches!(
            CoreError::from(StoreError::HasChildren { id: 3, count: 2 }),
            CoreError::Conflict(_)
        );
        assert_matches!(
            CoreError::from(StoreError::Database(sqlx::Error::PoolTimedOut)),
            CoreError::Storage(_)
        );
    }
}
