//! Row-level grid operations.
//!
//! Every call is self-contained: tenant and acting user come from the
//! [`AccessContext`], target ids are passed explicitly, nothing is kept
//! between calls.

use std::sync::Arc;
use std::time::Duration;

use pressgrid_core::access::AccessContext;
use pressgrid_core::error::CoreError;
use pressgrid_core::types::{DbId, FileId};
use pressgrid_db::repositories::CategoryStore;
use pressgrid_files::{FileStore, FileStoreError};
use serde::Serialize;

use crate::form::{CategoryPayload, RowForm};
use crate::pipeline::{MutationOutcome, MutationPipeline};
use crate::row::RowRenderer;
use crate::settings::GridSettings;
use crate::tree::TreeAccessor;

/// Identifies the grid region to refresh after a mutation: the affected row
/// and the parent whose children changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataChanged {
    pub affected_id: DbId,
    pub parent_id: Option<DbId>,
    /// Rows moved to the root level by an orphaning delete. When non-empty
    /// the root region changed as well.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reparented: Vec<DbId>,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Changed(DataChanged),
    /// Validation failed; the form carries the submitted values and errors.
    Invalid(RowForm),
}

/// Temporary reference handed back after an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub temporary_file_id: FileId,
    pub original_name: String,
    pub size_bytes: u64,
}

pub struct GridController {
    store: Arc<dyn CategoryStore>,
    files: Arc<dyn FileStore>,
    settings: GridSettings,
}

impl GridController {
    pub fn new(
        store: Arc<dyn CategoryStore>,
        files: Arc<dyn FileStore>,
        settings: GridSettings,
    ) -> Self {
        Self {
            store,
            files,
            settings,
        }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    fn tree(&self) -> TreeAccessor<'_> {
        TreeAccessor::new(self.store.as_ref(), self.settings.max_depth)
    }

    fn pipeline(&self) -> MutationPipeline<'_> {
        MutationPipeline::new(self.store.as_ref(), self.files.as_ref(), &self.settings)
    }

    // -- reads --

    pub async fn list_roots<R: RowRenderer>(
        &self,
        ctx: &AccessContext,
        renderer: &R,
    ) -> Result<Vec<R::Row>, CoreError> {
        let rows = self.tree().list_roots(ctx.tenant_id()).await?;
        Ok(rows.iter().map(|c| renderer.render_row(c)).collect())
    }

    pub async fn list_children<R: RowRenderer>(
        &self,
        ctx: &AccessContext,
        parent_id: DbId,
        renderer: &R,
    ) -> Result<Vec<R::Row>, CoreError> {
        let rows = self.tree().list_children(ctx.tenant_id(), parent_id).await?;
        Ok(rows.iter().map(|c| renderer.render_row(c)).collect())
    }

    pub async fn fetch_row<R: RowRenderer>(
        &self,
        ctx: &AccessContext,
        id: DbId,
        renderer: &R,
    ) -> Result<R::Row, CoreError> {
        let category = self.store.get_by_id(ctx.tenant_id(), id).await?;
        Ok(renderer.render_row(&category))
    }

    /// Breadcrumb rows from the root down to the parent of `id`.
    pub async fn ancestors<R: RowRenderer>(
        &self,
        ctx: &AccessContext,
        id: DbId,
        renderer: &R,
    ) -> Result<Vec<R::Row>, CoreError> {
        let rows = self.tree().ancestors(ctx.tenant_id(), id).await?;
        Ok(rows.iter().map(|c| renderer.render_row(c)).collect())
    }

    /// Empty form in add mode, stored values in edit mode.
    pub async fn fetch_row_form(
        &self,
        ctx: &AccessContext,
        id: Option<DbId>,
    ) -> Result<RowForm, CoreError> {
        match id {
            None => Ok(RowForm::skeleton()),
            Some(id) => {
                let category = self.store.get_by_id(ctx.tenant_id(), id).await?;
                Ok(RowForm::snapshot(&category))
            }
        }
    }

    // -- writes --

    pub async fn submit(
        &self,
        ctx: &AccessContext,
        payload: CategoryPayload,
        id: Option<DbId>,
    ) -> Result<SubmitOutcome, CoreError> {
        match self.pipeline().execute(ctx, &payload, id).await? {
            MutationOutcome::Rejected(errors) => {
                Ok(SubmitOutcome::Invalid(RowForm::rejected(id, payload, errors)))
            }
            MutationOutcome::Applied(category) => {
                tracing::info!(
                    tenant_id = ctx.tenant_id(),
                    user_id = ctx.acting_user_id(),
                    category_id = category.id,
                    parent_id = ?category.parent_id,
                    created = id.is_none(),
                    "Category saved"
                );
                Ok(SubmitOutcome::Changed(DataChanged {
                    affected_id: category.id,
                    parent_id: category.parent_id,
                    reparented: Vec::new(),
                }))
            }
        }
    }

    /// Delete a category under the configured policy. Images of every removed
    /// row are discarded afterwards.
    ///
    /// The signal names the former parent; under the orphan policy it also
    /// lists the rows that now sit at the root level.
    pub async fn remove(&self, ctx: &AccessContext, id: DbId) -> Result<DataChanged, CoreError> {
        let tenant_id = ctx.tenant_id();
        let policy = self.settings.delete_policy;

        let deleted = self.store.delete(tenant_id, id, policy).await?;
        for file_id in &deleted.released_images {
            if let Err(e) = self.files.discard(*file_id).await {
                tracing::warn!(%file_id, error = %e, "Failed to discard image of deleted category");
            }
        }

        tracing::info!(
            tenant_id,
            user_id = ctx.acting_user_id(),
            category_id = id,
            policy = policy.name(),
            removed_descendants = deleted.removed_descendants.len(),
            reparented = deleted.reparented.len(),
            "Category deleted"
        );
        Ok(DataChanged {
            affected_id: deleted.deleted_id,
            parent_id: deleted.former_parent_id,
            reparented: deleted.reparented,
        })
    }

    /// Stage an image for a later submit, owned by the acting user.
    pub async fn upload_asset(
        &self,
        ctx: &AccessContext,
        bytes: &[u8],
        filename: &str,
    ) -> Result<UploadReceipt, CoreError> {
        let staged = self
            .files
            .stage_upload(bytes, filename, ctx.acting_user_id())
            .await
            .map_err(|e| match e {
                FileStoreError::Rejected(msg) => CoreError::UploadFailed(msg),
                other => {
                    tracing::error!(error = %other, "Failed to stage upload");
                    CoreError::UploadFailed("The file could not be stored".to_string())
                }
            })?;

        tracing::info!(
            tenant_id = ctx.tenant_id(),
            user_id = ctx.acting_user_id(),
            temp_id = %staged.temp_id,
            size = staged.size_bytes,
            "Image uploaded"
        );
        Ok(UploadReceipt {
            temporary_file_id: staged.temp_id,
            original_name: staged.original_name,
            size_bytes: staged.size_bytes,
        })
    }

    /// Drop temporary uploads older than `max_age`.
    pub async fn purge_expired_uploads(&self, max_age: Duration) -> Result<usize, CoreError> {
        Ok(self.files.purge_expired(max_age).await?)
    }

    pub async fn health_check(&self) -> Result<(), CoreError> {
        Ok(self.store.health_check().await?)
    }
}
