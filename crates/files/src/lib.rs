//! Temporary and permanent file storage for category images.
//!
//! Uploads are first *staged* under a temporary id owned by the uploading
//! user. Saving a category *promotes* the staged file to a permanent id. Staged
//! files that are never promoted expire and are purged.

use std::time::Duration;

use async_trait::async_trait;
use pressgrid_core::types::{DbId, FileId, Timestamp};
use serde::Serialize;

pub mod error;
pub mod local;

pub use error::{FileStoreError, FileStoreResult};
pub use local::LocalFileStore;

/// Metadata of a staged (temporary) upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedFile {
    pub temp_id: FileId,
    pub owner_user_id: DbId,
    pub original_name: String,
    pub extension: String,
    pub size_bytes: u64,
    pub staged_at: Timestamp,
}

/// Storage for uploaded files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Validate and stage an upload, returning its temporary reference.
    async fn stage_upload(
        &self,
        bytes: &[u8],
        filename: &str,
        owner_user_id: DbId,
    ) -> FileStoreResult<StagedFile>;

    /// `true` if `temp_id` is staged and owned by `owner_user_id`.
    async fn is_staged(&self, temp_id: FileId, owner_user_id: DbId) -> bool;

    /// Turn a staged upload into a permanent file with a new id.
    async fn promote(&self, temp_id: FileId, owner_user_id: DbId) -> FileStoreResult<FileId>;

    /// Remove a permanent file. Missing files are not an error.
    async fn discard(&self, file_id: FileId) -> FileStoreResult<()>;

    /// Drop staged uploads older than `max_age`; returns how many were removed.
    async fn purge_expired(&self, max_age: Duration) -> FileStoreResult<usize>;
}
