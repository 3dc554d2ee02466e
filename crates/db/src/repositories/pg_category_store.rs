//! Postgres [`CategoryStore`] for the `categories` table.
//!
//! Tree mutations run inside a transaction that first takes
//! `pg_advisory_xact_lock(tenant_id)`, so concurrent re-parents and deletes in
//! one tenant are serialized and the cycle re-check sees committed state.

use async_trait::async_trait;
use pressgrid_core::category::DeletePolicy;
use pressgrid_core::types::{DbId, FileId};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use super::CategoryStore;
use crate::error::{StoreError, StoreResult};
use crate::models::category::{Category, DeletedCategory, NewCategory};

/// Column list for categories queries.
const COLUMNS: &str =
    "id, tenant_id, parent_id, path, title, description, image_id, created_at, updated_at";

const ENTITY: &str = "Category";

/// Unique constraint guarding path slugs.
const PATH_CONSTRAINT: &str = "uq_categories_tenant_path";

/// Upper bound on recursive CTE depth when walking ancestors/descendants.
const MAX_WALK_DEPTH: i32 = 10_000;

/// sqlx-backed category store.
#[derive(Debug, Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin_tenant_tx(&self, tenant_id: DbId) -> StoreResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(tenant_id)
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

/// Load `id` inside `tx` and check it belongs to `tenant_id`.
async fn fetch_scoped(
    tx: &mut Transaction<'static, Postgres>,
    tenant_id: DbId,
    id: DbId,
    lock: bool,
) -> StoreResult<Category> {
    let suffix = if lock { " FOR UPDATE" } else { "" };
    let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1{suffix}");
    let row = sqlx::query_as::<_, Category>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
    scope(row, tenant_id)
}

fn scope(row: Category, tenant_id: DbId) -> StoreResult<Category> {
    if row.tenant_id != tenant_id {
        return Err(StoreError::ScopeViolation {
            entity: ENTITY,
            id: row.id,
            tenant_id,
        });
    }
    Ok(row)
}

/// Turn a unique violation on the path constraint into a typed error.
fn map_write_error(err: sqlx::Error, path: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(PATH_CONSTRAINT)
        {
            return StoreError::DuplicatePath {
                path: path.to_string(),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn get_by_id(&self, tenant_id: DbId, id: DbId) -> StoreResult<Category> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
        scope(row, tenant_id)
    }

    async fn get_children(
        &self,
        tenant_id: DbId,
        parent_id: Option<DbId>,
    ) -> StoreResult<Vec<Category>> {
        let rows = match parent_id {
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM categories
                     WHERE tenant_id = $1 AND parent_id IS NULL
                     ORDER BY id ASC"
                );
                sqlx::query_as::<_, Category>(&query)
                    .bind(tenant_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(parent_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM categories
                     WHERE tenant_id = $1 AND parent_id = $2
                     ORDER BY id ASC"
                );
                sqlx::query_as::<_, Category>(&query)
                    .bind(tenant_id)
                    .bind(parent_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    async fn find_by_path(&self, tenant_id: DbId, path: &str) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE tenant_id = $1 AND path = $2");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(tenant_id)
            .bind(path)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, input: &NewCategory) -> StoreResult<Category> {
        let mut tx = self.begin_tenant_tx(input.tenant_id).await?;
        if let Some(parent_id) = input.parent_id {
            fetch_scoped(&mut tx, input.tenant_id, parent_id, false).await?;
        }

        let query = format!(
            "INSERT INTO categories (tenant_id, parent_id, path, title, description, image_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(input.tenant_id)
            .bind(input.parent_id)
            .bind(&input.path)
            .bind(Json(&input.title))
            .bind(Json(&input.description))
            .bind(input.image_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &input.path))?;

        tx.commit().await?;
        Ok(row)
    }

    async fn update(&self, category: &Category) -> StoreResult<Category> {
        let tenant_id = category.tenant_id;
        let mut tx = self.begin_tenant_tx(tenant_id).await?;
        let existing = fetch_scoped(&mut tx, tenant_id, category.id, true).await?;

        if category.parent_id != existing.parent_id {
            if let Some(parent_id) = category.parent_id {
                fetch_scoped(&mut tx, tenant_id, parent_id, false).await?;

                let (is_descendant,): (bool,) = sqlx::query_as(
                    "WITH RECURSIVE ancestors AS (
                         SELECT id, parent_id, 1 AS depth FROM categories WHERE id = $1
                         UNION ALL
                         SELECT c.id, c.parent_id, a.depth + 1
                         FROM categories c
                         JOIN ancestors a ON c.id = a.parent_id
                         WHERE a.depth < $3
                     )
                     SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)",
                )
                .bind(parent_id)
                .bind(category.id)
                .bind(MAX_WALK_DEPTH)
                .fetch_one(&mut *tx)
                .await?;

                if is_descendant {
                    return Err(StoreError::Cycle {
                        id: category.id,
                        parent_id,
                    });
                }
            }
        }

        let query = format!(
            "UPDATE categories SET
                parent_id = $3,
                path = $4,
                title = $5,
                description = $6,
                image_id = $7,
                updated_at = now()
             WHERE id = $1 AND tenant_id = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(category.id)
            .bind(tenant_id)
            .bind(category.parent_id)
            .bind(&category.path)
            .bind(Json(&category.title))
            .bind(Json(&category.description))
            .bind(category.image_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &category.path))?
            .ok_or(StoreError::NotFound {
                entity: ENTITY,
                id: category.id,
            })?;

        tx.commit().await?;
        Ok(row)
    }

    async fn delete(
        &self,
        tenant_id: DbId,
        id: DbId,
        policy: DeletePolicy,
    ) -> StoreResult<DeletedCategory> {
        let mut tx = self.begin_tenant_tx(tenant_id).await?;
        let existing = fetch_scoped(&mut tx, tenant_id, id, true).await?;

        let mut removed_descendants: Vec<DbId> = Vec::new();
        let mut reparented: Vec<DbId> = Vec::new();
        match policy {
            DeletePolicy::Reject => {
                let (count,): (i64,) = sqlx::query_as(
                    "SELECT COUNT(*) FROM categories WHERE tenant_id = $1 AND parent_id = $2",
                )
                .bind(tenant_id)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
                if count > 0 {
                    return Err(StoreError::HasChildren {
                        id,
                        count: count as usize,
                    });
                }
            }
            DeletePolicy::Orphan => {
                reparented = sqlx::query_scalar(
                    "UPDATE categories SET parent_id = NULL, updated_at = now()
                     WHERE tenant_id = $1 AND parent_id = $2
                     RETURNING id",
                )
                .bind(tenant_id)
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
                reparented.sort_unstable();
            }
            DeletePolicy::Cascade => {
                removed_descendants = sqlx::query_scalar(
                    "WITH RECURSIVE subtree AS (
                         SELECT id, 1 AS depth FROM categories
                         WHERE tenant_id = $1 AND parent_id = $2
                         UNION ALL
                         SELECT c.id, s.depth + 1
                         FROM categories c
                         JOIN subtree s ON c.parent_id = s.id
                         WHERE s.depth < $3
                     )
                     SELECT id FROM subtree ORDER BY id",
                )
                .bind(tenant_id)
                .bind(id)
                .bind(MAX_WALK_DEPTH)
                .fetch_all(&mut *tx)
                .await?;
            }
        }

        let mut doomed = removed_descendants.clone();
        doomed.push(id);
        let released_images: Vec<FileId> = sqlx::query_scalar::<_, Option<FileId>>(
            "DELETE FROM categories WHERE tenant_id = $1 AND id = ANY($2) RETURNING image_id",
        )
        .bind(tenant_id)
        .bind(&doomed)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .flatten()
        .collect();

        tx.commit().await?;
        tracing::debug!(
            tenant_id,
            category_id = id,
            policy = policy.name(),
            removed = doomed.len(),
            "Category rows deleted"
        );

        Ok(DeletedCategory {
            deleted_id: id,
            former_parent_id: existing.parent_id,
            removed_descendants,
            reparented,
            released_images,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
