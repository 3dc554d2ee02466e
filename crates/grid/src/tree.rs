//! Parent/child views over a [`CategoryStore`].
//!
//! Nothing is cached: each call re-queries the store, one level at a time.

use pressgrid_core::error::CoreError;
use pressgrid_core::types::DbId;
use pressgrid_db::error::StoreError;
use pressgrid_db::models::category::Category;
use pressgrid_db::repositories::CategoryStore;

pub struct TreeAccessor<'a> {
    store: &'a dyn CategoryStore,
    max_depth: usize,
}

impl<'a> TreeAccessor<'a> {
    pub fn new(store: &'a dyn CategoryStore, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    pub async fn list_roots(&self, tenant_id: DbId) -> Result<Vec<Category>, CoreError> {
        Ok(self.store.get_children(tenant_id, None).await?)
    }

    /// Children of `parent_id`. A parent owned by another tenant is reported
    /// as not found.
    pub async fn list_children(
        &self,
        tenant_id: DbId,
        parent_id: DbId,
    ) -> Result<Vec<Category>, CoreError> {
        match self.store.get_by_id(tenant_id, parent_id).await {
            Ok(_) => {}
            Err(StoreError::ScopeViolation { entity, id, .. }) => {
                return Err(CoreError::NotFound { entity, id });
            }
            Err(e) => return Err(e.into()),
        }
        Ok(self.store.get_children(tenant_id, Some(parent_id)).await?)
    }

    /// Ancestors of `id`, root first, excluding the category itself.
    pub async fn ancestors(&self, tenant_id: DbId, id: DbId) -> Result<Vec<Category>, CoreError> {
        let mut chain = Vec::new();
        let mut next = self.store.get_by_id(tenant_id, id).await?.parent_id;
        while let Some(parent_id) = next {
            if chain.len() >= self.max_depth {
                return Err(CoreError::Internal(format!(
                    "Category {id} is nested deeper than {} levels",
                    self.max_depth
                )));
            }
            let parent = self.store.get_by_id(tenant_id, parent_id).await?;
            next = parent.parent_id;
            chain.push(parent);
        }
        chain.reverse();
        Ok(chain)
    }

    /// Height of the subtree under `id`, counted in levels below it (0 for a
    /// leaf). Returns `None` as soon as the height exceeds `limit`.
    pub async fn subtree_height(
        &self,
        tenant_id: DbId,
        id: DbId,
        limit: usize,
    ) -> Result<Option<usize>, CoreError> {
        let mut level = vec![id];
        let mut height = 0;
        loop {
            let mut next = Vec::new();
            for parent_id in &level {
                let children = self.store.get_children(tenant_id, Some(*parent_id)).await?;
                next.extend(children.into_iter().map(|c| c.id));
            }
            if next.is_empty() {
                return Ok(Some(height));
            }
            height += 1;
            if height > limit {
                return Ok(None);
            }
            level = next;
        }
    }
}
