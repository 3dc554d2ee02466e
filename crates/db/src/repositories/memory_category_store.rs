//! In-memory [`CategoryStore`] backed by a flat arena.
//!
//! Categories live in one table keyed by id; a `(tenant, parent) -> ids`
//! index answers child queries without materializing a tree. All mutations
//! happen under a single write lock, so a delete and an update of the same id
//! are strictly ordered.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use pressgrid_core::category::{AncestorWalk, DeletePolicy, WalkStep};
use pressgrid_core::types::{DbId, FileId};
use tokio::sync::RwLock;

use super::CategoryStore;
use crate::error::{StoreError, StoreResult};
use crate::models::category::{Category, DeletedCategory, NewCategory};

const ENTITY: &str = "Category";

type ChildKey = (DbId, Option<DbId>);

#[derive(Debug, Default)]
struct Arena {
    last_id: DbId,
    rows: HashMap<DbId, Category>,
    children: HashMap<ChildKey, BTreeSet<DbId>>,
}

impl Arena {
    fn scoped(&self, tenant_id: DbId, id: DbId) -> StoreResult<&Category> {
        let row = self
            .rows
            .get(&id)
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
        if row.tenant_id != tenant_id {
            return Err(StoreError::ScopeViolation {
                entity: ENTITY,
                id,
                tenant_id,
            });
        }
        Ok(row)
    }

    fn children_of(&self, tenant_id: DbId, parent_id: Option<DbId>) -> Vec<DbId> {
        self.children
            .get(&(tenant_id, parent_id))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    fn link(&mut self, tenant_id: DbId, parent_id: Option<DbId>, id: DbId) {
        self.children
            .entry((tenant_id, parent_id))
            .or_default()
            .insert(id);
    }

    fn unlink(&mut self, tenant_id: DbId, parent_id: Option<DbId>, id: DbId) {
        let key = (tenant_id, parent_id);
        if let Some(ids) = self.children.get_mut(&key) {
            ids.remove(&id);
            if ids.is_empty() {
                self.children.remove(&key);
            }
        }
    }

    /// Verify `parent_id` may hold `target` (or a new category when `None`).
    fn check_parent(
        &self,
        tenant_id: DbId,
        parent_id: DbId,
        target: Option<DbId>,
    ) -> StoreResult<()> {
        self.scoped(tenant_id, parent_id)?;

        // The arena is a forest, so no chain is longer than the row count.
        let (mut walk, mut step) = AncestorWalk::begin(parent_id, target, self.rows.len() + 1);
        loop {
            match step {
                WalkStep::Continue(id) => {
                    let parent = self.rows.get(&id).and_then(|row| row.parent_id);
                    step = walk.step(parent);
                }
                WalkStep::Done | WalkStep::TooDeep => return Ok(()),
                WalkStep::Cycle => {
                    return Err(StoreError::Cycle {
                        id: target.unwrap_or(parent_id),
                        parent_id,
                    })
                }
            }
        }
    }

    fn check_path(&self, tenant_id: DbId, path: &str, except: Option<DbId>) -> StoreResult<()> {
        let taken = self
            .rows
            .values()
            .any(|row| row.tenant_id == tenant_id && row.path == path && Some(row.id) != except);
        if taken {
            return Err(StoreError::DuplicatePath {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    /// All descendants of `id`.
    fn descendants(&self, tenant_id: DbId, id: DbId) -> Vec<DbId> {
        let mut out = Vec::new();
        let mut frontier = vec![id];
        while let Some(next) = frontier.pop() {
            for child in self.children_of(tenant_id, Some(next)) {
                out.push(child);
                frontier.push(child);
            }
        }
        out
    }
}

/// Arena-and-index category store for tests and database-less runs.
#[derive(Debug, Default)]
pub struct MemoryCategoryStore {
    arena: RwLock<Arena>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored categories across all tenants.
    pub async fn len(&self) -> usize {
        self.arena.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn get_by_id(&self, tenant_id: DbId, id: DbId) -> StoreResult<Category> {
        let arena = self.arena.read().await;
        arena.scoped(tenant_id, id).cloned()
    }

    async fn get_children(
        &self,
        tenant_id: DbId,
        parent_id: Option<DbId>,
    ) -> StoreResult<Vec<Category>> {
        let arena = self.arena.read().await;
        Ok(arena
            .children_of(tenant_id, parent_id)
            .into_iter()
            .filter_map(|id| arena.rows.get(&id).cloned())
            .collect())
    }

    async fn find_by_path(&self, tenant_id: DbId, path: &str) -> StoreResult<Option<Category>> {
        let arena = self.arena.read().await;
        Ok(arena
            .rows
            .values()
            .find(|row| row.tenant_id == tenant_id && row.path == path)
            .cloned())
    }

    async fn insert(&self, input: &NewCategory) -> StoreResult<Category> {
        let mut arena = self.arena.write().await;
        if let Some(parent_id) = input.parent_id {
            arena.check_parent(input.tenant_id, parent_id, None)?;
        }
        arena.check_path(input.tenant_id, &input.path, None)?;

        arena.last_id += 1;
        let now = Utc::now();
        let row = Category {
            id: arena.last_id,
            tenant_id: input.tenant_id,
            parent_id: input.parent_id,
            path: input.path.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            image_id: input.image_id,
            created_at: now,
            updated_at: now,
        };
        arena.link(row.tenant_id, row.parent_id, row.id);
        arena.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, category: &Category) -> StoreResult<Category> {
        let mut arena = self.arena.write().await;
        let tenant_id = category.tenant_id;
        let existing = arena.scoped(tenant_id, category.id)?.clone();

        if category.parent_id != existing.parent_id {
            if let Some(parent_id) = category.parent_id {
                arena.check_parent(tenant_id, parent_id, Some(category.id))?;
            }
        }
        arena.check_path(tenant_id, &category.path, Some(category.id))?;

        let row = Category {
            id: existing.id,
            tenant_id: existing.tenant_id,
            created_at: existing.created_at,
            updated_at: Utc::now(),
            parent_id: category.parent_id,
            path: category.path.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
            image_id: category.image_id,
        };
        if row.parent_id != existing.parent_id {
            arena.unlink(tenant_id, existing.parent_id, row.id);
            arena.link(tenant_id, row.parent_id, row.id);
        }
        arena.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete(
        &self,
        tenant_id: DbId,
        id: DbId,
        policy: DeletePolicy,
    ) -> StoreResult<DeletedCategory> {
        let mut arena = self.arena.write().await;
        let target = arena.scoped(tenant_id, id)?;
        let former_parent_id = target.parent_id;
        let mut released_images: Vec<FileId> = target.image_id.into_iter().collect();
        let children = arena.children_of(tenant_id, Some(id));

        let mut removed_descendants = Vec::new();
        let mut reparented = Vec::new();
        match policy {
            DeletePolicy::Reject if !children.is_empty() => {
                return Err(StoreError::HasChildren {
                    id,
                    count: children.len(),
                });
            }
            DeletePolicy::Reject => {}
            DeletePolicy::Orphan => {
                let now = Utc::now();
                for child in children {
                    arena.unlink(tenant_id, Some(id), child);
                    arena.link(tenant_id, None, child);
                    if let Some(row) = arena.rows.get_mut(&child) {
                        row.parent_id = None;
                        row.updated_at = now;
                    }
                    reparented.push(child);
                }
            }
            DeletePolicy::Cascade => {
                removed_descendants = arena.descendants(tenant_id, id);
                for descendant in &removed_descendants {
                    if let Some(row) = arena.rows.remove(descendant) {
                        arena.unlink(tenant_id, row.parent_id, row.id);
                        released_images.extend(row.image_id);
                    }
                }
                removed_descendants.sort_unstable();
            }
        }

        arena.rows.remove(&id);
        arena.unlink(tenant_id, former_parent_id, id);

        Ok(DeletedCategory {
            deleted_id: id,
            former_parent_id,
            removed_descendants,
            reparented,
            released_images,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
