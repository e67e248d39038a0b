use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::{Allocation, BoxReader, MediaStore, StoredFile};

const MAX_EXTENSION_LEN: usize = 10;

/// Filesystem-backed media store.
///
/// Files are stored in a sharded directory layout keyed by the generated name:
/// `{base_path}/{first 2 chars}/{32 hex chars}{.ext}`
pub struct FilesystemMediaStore {
    base_path: PathBuf,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn generate_name(extension: &str) -> Result<String, StorageError> {
        let ext = normalize_extension(extension)?;
        let stem = uuid::Uuid::new_v4().simple().to_string();
        let shard = &stem[..2];
        Ok(match ext {
            Some(ext) => format!("{shard}/{stem}.{ext}"),
            None => format!("{shard}/{stem}"),
        })
    }
}

/// Lower-case an extension and strip a leading dot. Empty means "no extension".
fn normalize_extension(extension: &str) -> Result<Option<String>, StorageError> {
    let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() {
        return Ok(None);
    }
    if ext.len() > MAX_EXTENSION_LEN || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StorageError::InvalidName(format!(
            "unsupported extension '{extension}'"
        )));
    }
    Ok(Some(ext))
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn allocate(&self, extension: &str) -> Result<Allocation, StorageError> {
        let filename = Self::generate_name(extension)?;
        let path = self.resolve(&filename)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(Allocation { filename, path })
    }

    async fn finalize(&self, allocation: Allocation) -> Result<StoredFile, StorageError> {
        let meta = match fs::metadata(&allocation.path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(allocation.filename));
            }
            Err(e) => return Err(e.into()),
        };
        let hash = ContentHash::of_file(&allocation.path).await?;
        Ok(StoredFile {
            filename: allocation.filename,
            path: allocation.path,
            size: meta.len(),
            hash,
        })
    }

    async fn get_stream(&self, filename: &str) -> Result<BoxReader, StorageError> {
        let path = self.resolve(filename)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, filename: &str) -> Result<bool, StorageError> {
        let path = self.resolve(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError> {
        let mut parts = filename.split('/');
        let (Some(shard), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(StorageError::InvalidName(filename.to_string()));
        };
        let valid = |part: &str| {
            !part.is_empty()
                && !part.starts_with('.')
                && !part.contains('\\')
                && !part.contains('\0')
        };
        if !valid(shard) || !valid(name) {
            return Err(StorageError::InvalidName(filename.to_string()));
        }
        Ok(self.base_path.join(shard).join(name))
    }
}
