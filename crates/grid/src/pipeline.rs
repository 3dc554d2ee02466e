//! Validation and persistence of category payloads.
//!
//! A mutation is all-or-nothing: a temporary image is promoted before the row
//! is written, and the promoted file is discarded again if the write fails.

use pressgrid_core::access::AccessContext;
use pressgrid_core::category::{
    validate_description, validate_path, validate_title, AncestorWalk, WalkStep,
};
use pressgrid_core::error::CoreError;
use pressgrid_core::types::{DbId, FileId};
use pressgrid_core::validation::FieldErrors;
use pressgrid_db::error::StoreError;
use pressgrid_db::models::category::{Category, NewCategory};
use pressgrid_db::repositories::CategoryStore;
use pressgrid_files::FileStore;
use validator::Validate;

use crate::form::CategoryPayload;
use crate::settings::GridSettings;
use crate::tree::TreeAccessor;

/// Result of running a payload through the pipeline.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The row was written.
    Applied(Category),
    /// The payload was rejected; nothing was written.
    Rejected(FieldErrors),
}

pub struct MutationPipeline<'a> {
    store: &'a dyn CategoryStore,
    files: &'a dyn FileStore,
    settings: &'a GridSettings,
}

impl<'a> MutationPipeline<'a> {
    pub fn new(
        store: &'a dyn CategoryStore,
        files: &'a dyn FileStore,
        settings: &'a GridSettings,
    ) -> Self {
        Self {
            store,
            files,
            settings,
        }
    }

    /// Field-level check of `payload` against the current store state.
    ///
    /// `existing_id` is the category being edited; it must exist in the
    /// caller's tenant.
    pub async fn validate(
        &self,
        ctx: &AccessContext,
        payload: &CategoryPayload,
        existing_id: Option<DbId>,
    ) -> Result<FieldErrors, CoreError> {
        let existing = self.load_existing(ctx, existing_id).await?;
        self.check(ctx, payload, existing.as_ref()).await
    }

    /// Validate, then persist. Validation failures are returned as
    /// [`CoreError::Validation`].
    pub async fn apply(
        &self,
        ctx: &AccessContext,
        payload: &CategoryPayload,
        existing_id: Option<DbId>,
    ) -> Result<Category, CoreError> {
        match self.execute(ctx, payload, existing_id).await? {
            MutationOutcome::Applied(category) => Ok(category),
            MutationOutcome::Rejected(errors) => Err(CoreError::Validation(errors.summary())),
        }
    }

    /// Validate and, if the payload is acceptable, persist it.
    pub async fn execute(
        &self,
        ctx: &AccessContext,
        payload: &CategoryPayload,
        existing_id: Option<DbId>,
    ) -> Result<MutationOutcome, CoreError> {
        let existing = self.load_existing(ctx, existing_id).await?;
        let errors = self.check(ctx, payload, existing.as_ref()).await?;
        if !errors.is_empty() {
            tracing::debug!(
                tenant_id = ctx.tenant_id(),
                category_id = ?existing_id,
                errors = %errors.summary(),
                "Category payload rejected"
            );
            return Ok(MutationOutcome::Rejected(errors));
        }
        self.persist(ctx, payload, existing).await.map(MutationOutcome::Applied)
    }

    async fn load_existing(
        &self,
        ctx: &AccessContext,
        existing_id: Option<DbId>,
    ) -> Result<Option<Category>, CoreError> {
        match existing_id {
            Some(id) => Ok(Some(self.store.get_by_id(ctx.tenant_id(), id).await?)),
            None => Ok(None),
        }
    }

    async fn check(
        &self,
        ctx: &AccessContext,
        payload: &CategoryPayload,
        existing: Option<&Category>,
    ) -> Result<FieldErrors, CoreError> {
        let mut errors = FieldErrors::new();
        if let Err(e) = payload.validate() {
            errors.merge_validator(&e);
        }

        errors.check(
            "title",
            validate_title(&payload.title, &self.settings.primary_locale),
        );
        errors.check("description", validate_description(&payload.description));

        if !errors.has("path") {
            errors.check("path", validate_path(&payload.path));
        }
        if !errors.has("path") {
            let taken = self
                .store
                .find_by_path(ctx.tenant_id(), payload.path.trim())
                .await?
                .is_some_and(|other| Some(other.id) != existing.map(|c| c.id));
            if taken {
                errors.add("path", "Path is already used by another category");
            }
        }

        if let Some(parent_id) = payload.parent_id {
            if let Some(message) = self
                .check_parent(ctx.tenant_id(), parent_id, existing.map(|c| c.id))
                .await?
            {
                errors.add("parent_id", message);
            }
        }

        if let Some(image_id) = payload.image_id {
            let unchanged = existing.is_some_and(|c| c.image_id == Some(image_id));
            if !unchanged && !self.files.is_staged(image_id, ctx.acting_user_id()).await {
                errors.add("image_id", "Image upload not found or expired; upload it again");
            }
        }

        Ok(errors)
    }

    /// Walk up from the proposed parent, returning a message if it is
    /// missing, is the target itself, or descends from it. When an existing
    /// category moves, its whole subtree must still fit under the depth
    /// limit.
    async fn check_parent(
        &self,
        tenant_id: DbId,
        parent_id: DbId,
        target: Option<DbId>,
    ) -> Result<Option<String>, CoreError> {
        let (mut walk, mut step) = AncestorWalk::begin(parent_id, target, self.settings.max_depth);
        loop {
            match step {
                WalkStep::Continue(id) => {
                    let parent = match self.store.get_by_id(tenant_id, id).await {
                        Ok(row) => row.parent_id,
                        Err(StoreError::NotFound { .. } | StoreError::ScopeViolation { .. })
                            if id == parent_id =>
                        {
                            return Ok(Some("Parent category does not exist".to_string()));
                        }
                        Err(e) => return Err(e.into()),
                    };
                    step = walk.step(parent);
                }
                WalkStep::Done => {
                    let Some(target) = target else {
                        return Ok(None);
                    };
                    // `hops` is the depth the target would sit at.
                    let room = self.settings.max_depth.saturating_sub(walk.hops());
                    let tree = TreeAccessor::new(self.store, self.settings.max_depth);
                    return match tree.subtree_height(tenant_id, target, room).await? {
                        Some(_) => Ok(None),
                        None => Ok(Some(self.too_deep_message())),
                    };
                }
                WalkStep::Cycle => {
                    return Ok(Some(
                        "A category cannot be nested under itself or one of its subcategories"
                            .to_string(),
                    ));
                }
                WalkStep::TooDeep => return Ok(Some(self.too_deep_message())),
            }
        }
    }

    fn too_deep_message(&self) -> String {
        format!(
            "Categories cannot be nested more than {} levels deep",
            self.settings.max_depth
        )
    }

    async fn persist(
        &self,
        ctx: &AccessContext,
        payload: &CategoryPayload,
        existing: Option<Category>,
    ) -> Result<Category, CoreError> {
        let previous_image = existing.as_ref().and_then(|c| c.image_id);
        let (image_id, promoted) = match payload.image_id {
            Some(id) if Some(id) != previous_image => {
                let file_id = self
                    .files
                    .promote(id, ctx.acting_user_id())
                    .await
                    .map_err(|e| CoreError::Storage(format!("Image promotion failed: {e}")))?;
                (Some(file_id), Some(file_id))
            }
            other => (other, None),
        };

        let title = payload.title.normalized();
        let description = payload.description.normalized();
        let path = payload.path.trim().to_string();

        let written = match existing {
            None => {
                self.store
                    .insert(&NewCategory {
                        tenant_id: ctx.tenant_id(),
                        parent_id: payload.parent_id,
                        path,
                        title,
                        description,
                        image_id,
                    })
                    .await
            }
            Some(current) => {
                self.store
                    .update(&Category {
                        parent_id: payload.parent_id,
                        path,
                        title,
                        description,
                        image_id,
                        ..current
                    })
                    .await
            }
        };

        let category = match written {
            Ok(category) => category,
            Err(e) => {
                if let Some(file_id) = promoted {
                    self.discard_quietly(file_id).await;
                }
                return Err(e.into());
            }
        };

        if let Some(old) = previous_image.filter(|old| category.image_id != Some(*old)) {
            self.discard_quietly(old).await;
        }
        Ok(category)
    }

    async fn discard_quietly(&self, file_id: FileId) {
        if let Err(e) = self.files.discard(file_id).await {
            tracing::warn!(%file_id, error = %e, "Failed to discard image file");
        }
    }
}
