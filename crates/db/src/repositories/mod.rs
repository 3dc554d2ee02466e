//! Repository layer.
//!
//! [`CategoryStore`] is the persistence contract the grid layer depends on.
//! Every method takes the caller's tenant explicitly and fails with
//! [`StoreError::ScopeViolation`] when a record of another tenant is
//! addressed.

use async_trait::async_trait;
use pressgrid_core::category::DeletePolicy;
use pressgrid_core::types::DbId;

use crate::error::StoreResult;
use crate::models::category::{Category, DeletedCategory, NewCategory};

pub mod memory_category_store;
pub mod pg_category_store;

pub use memory_category_store::MemoryCategoryStore;
pub use pg_category_store::PgCategoryStore;

#[cfg(doc)]
use crate::error::StoreError;

/// Persistence for tenant-scoped categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Fetch one category of `tenant_id`.
    async fn get_by_id(&self, tenant_id: DbId, id: DbId) -> StoreResult<Category>;

    /// Children of `parent_id` (roots when `None`), in insertion order.
    async fn get_children(
        &self,
        tenant_id: DbId,
        parent_id: Option<DbId>,
    ) -> StoreResult<Vec<Category>>;

    /// Look up a category by its path slug within the tenant.
    async fn find_by_path(&self, tenant_id: DbId, path: &str) -> StoreResult<Option<Category>>;

    /// Insert a category, assigning its id.
    async fn insert(&self, input: &NewCategory) -> StoreResult<Category>;

    /// Persist the mutable fields of an existing category.
    ///
    /// Fails with [`StoreError::NotFound`] if the id no longer exists and
    /// with [`StoreError::Cycle`] if the new parent is one of its descendants.
    async fn update(&self, category: &Category) -> StoreResult<Category>;

    /// Delete a category, handling its children according to `policy`.
    async fn delete(
        &self,
        tenant_id: DbId,
        id: DbId,
        policy: DeletePolicy,
    ) -> StoreResult<DeletedCategory>;

    /// Confirm the backing storage is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}
