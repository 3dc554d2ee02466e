use pressgrid_core::error::CoreError;
use pressgrid_core::types::FileId;

/// Failures reported by a [`crate::FileStore`].
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// The upload itself was unacceptable (size, type, content).
    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Temporary file {0} is not staged")]
    NotStaged(FileId),

    #[error("Temporary file {0} was uploaded by another user")]
    NotOwner(FileId),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FileStoreResult<T> = Result<T, FileStoreError>;

impl From<FileStoreError> for CoreError {
    fn from(err: FileStoreError) -> Self {
        match err {
            FileStoreError::Rejected(msg) => CoreError::UploadFailed(msg),
            err @ FileStoreError::NotOwner(_) => CoreError::ScopeViolation(err.to_string()),
            err @ (FileStoreError::NotStaged(_) | FileStoreError::Io(_)) => {
                CoreError::Storage(err.to_string())
            }
        }
    }
}
