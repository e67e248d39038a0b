use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;
use super::hash::ContentHash;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// A reserved, not yet written, storage location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Relative stored name, `{shard}/{name}{.ext}`.
    pub filename: String,
    /// Absolute path on disk.
    pub path: PathBuf,
}

/// A file whose bytes are fully persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
    pub hash: ContentHash,
}

/// Storage for uploaded media bytes, addressed by storage-assigned names.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Reserve a fresh unique name carrying `extension` (without the dot).
    ///
    /// The parent directory exists when this returns; the file does not.
    async fn allocate(&self, extension: &str) -> Result<Allocation, StorageError>;

    /// Measure and hash a file that a writer produced at an allocation.
    async fn finalize(&self, allocation: Allocation) -> Result<StoredFile, StorageError>;

    /// Open a stored file for streaming.
    async fn get_stream(&self, filename: &str) -> Result<BoxReader, StorageError>;

    /// Delete a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, filename: &str) -> Result<bool, StorageError>;

    /// Map a stored name to its absolute path, rejecting names outside the store.
    fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError>;
}
