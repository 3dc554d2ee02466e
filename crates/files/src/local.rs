//! Local-disk [`FileStore`].
//!
//! Layout under the root directory:
//!
//! ```text
//! temp/{temp_id}.{ext}        staged uploads
//! public/{file_id}.{ext}      promoted files
//! ```
//!
//! The staged-upload registry is kept in memory; a restart forgets pending
//! uploads and the next purge removes their files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pressgrid_core::types::{DbId, FileId};
use pressgrid_core::upload::{validate_image_upload, ALLOWED_IMAGE_EXTENSIONS};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{FileStore, FileStoreError, FileStoreResult, StagedFile};

const TEMP_DIR: &str = "temp";
const PUBLIC_DIR: &str = "public";

pub struct LocalFileStore {
    root: PathBuf,
    max_upload_bytes: usize,
    staged: Mutex<HashMap<FileId, StagedFile>>,
}

impl LocalFileStore {
    /// Create the store, making sure both subdirectories exist.
    pub async fn open(root: impl Into<PathBuf>, max_upload_bytes: usize) -> FileStoreResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(root.join(TEMP_DIR)).await?;
        tokio::fs::create_dir_all(root.join(PUBLIC_DIR)).await?;
        tracing::info!(root = %root.display(), max_upload_bytes, "File store opened");
        Ok(Self {
            root,
            max_upload_bytes,
            staged: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn temp_path(&self, id: FileId, ext: &str) -> PathBuf {
        self.root.join(TEMP_DIR).join(format!("{id}.{ext}"))
    }

    fn public_path(&self, id: FileId, ext: &str) -> PathBuf {
        self.root.join(PUBLIC_DIR).join(format!("{id}.{ext}"))
    }

    /// Location of a promoted file, if it exists.
    pub async fn permanent_path(&self, file_id: FileId) -> Option<PathBuf> {
        for ext in ALLOWED_IMAGE_EXTENSIONS {
            let path = self.public_path(file_id, ext);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }

    /// Number of uploads currently staged.
    pub async fn staged_count(&self) -> usize {
        self.staged.lock().await.len()
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn stage_upload(
        &self,
        bytes: &[u8],
        filename: &str,
        owner_user_id: DbId,
    ) -> FileStoreResult<StagedFile> {
        let extension = validate_image_upload(filename, bytes, self.max_upload_bytes)
            .map_err(FileStoreError::Rejected)?;

        let temp_id = Uuid::new_v4();
        tokio::fs::write(self.temp_path(temp_id, &extension), bytes).await?;

        let staged = StagedFile {
            temp_id,
            owner_user_id,
            original_name: filename.to_string(),
            extension,
            size_bytes: bytes.len() as u64,
            staged_at: Utc::now(),
        };
        self.staged.lock().await.insert(temp_id, staged.clone());

        tracing::debug!(%temp_id, owner_user_id, size = staged.size_bytes, "Upload staged");
        Ok(staged)
    }

    async fn is_staged(&self, temp_id: FileId, owner_user_id: DbId) -> bool {
        self.staged
            .lock()
            .await
            .get(&temp_id)
            .is_some_and(|s| s.owner_user_id == owner_user_id)
    }

    async fn promote(&self, temp_id: FileId, owner_user_id: DbId) -> FileStoreResult<FileId> {
        let mut staged = self.staged.lock().await;
        let entry = staged
            .get(&temp_id)
            .ok_or(FileStoreError::NotStaged(temp_id))?;
        if entry.owner_user_id != owner_user_id {
            return Err(FileStoreError::NotOwner(temp_id));
        }

        let file_id = Uuid::new_v4();
        let from = self.temp_path(temp_id, &entry.extension);
        let to = self.public_path(file_id, &entry.extension);
        // On failure the entry stays staged so the save can be retried.
        tokio::fs::rename(&from, &to).await?;
        staged.remove(&temp_id);

        tracing::info!(%temp_id, %file_id, "Staged upload promoted");
        Ok(file_id)
    }

    async fn discard(&self, file_id: FileId) -> FileStoreResult<()> {
        if let Some(path) = self.permanent_path(file_id).await {
            tokio::fs::remove_file(&path).await?;
            tracing::debug!(%file_id, "Permanent file removed");
        }
        Ok(())
    }

    async fn purge_expired(&self, max_age: Duration) -> FileStoreResult<usize> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(max_age).unwrap_or_else(|_| chrono::Duration::zero());

        let expired: Vec<StagedFile> = {
            let mut staged = self.staged.lock().await;
            let ids: Vec<FileId> = staged
                .values()
                .filter(|s| s.staged_at <= cutoff)
                .map(|s| s.temp_id)
                .collect();
            ids.iter().filter_map(|id| staged.remove(id)).collect()
        };

        for file in &expired {
            let path = self.temp_path(file.temp_id, &file.extension);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(temp_id = %file.temp_id, error = %e, "Failed to remove expired upload");
                }
            }
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Expired uploads purged");
        }
        Ok(expired.len())
    }
}
