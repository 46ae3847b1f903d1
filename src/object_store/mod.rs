mod local;
mod s3_store;

pub use local::LocalStore;
pub use s3_store::S3Store;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Abstraction over blob storage backends.
/// Keys are `<bucketfolder>/<token>.jpg`; the blobs mean nothing without the catalog rows.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<(), ObjectStoreError>;
    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError>;
    /// Number of objects in the bucket.
    async fn count(&self) -> Result<u64, ObjectStoreError>;

    /// Upload a local file under `key` and return the key it was stored as.
    async fn upload_file(&self, local_path: &Path, key: &str) -> Result<String, ObjectStoreError> {
        let data = tokio::fs::read(local_path).await?;
        let content_type = mime_guess::from_path(local_path).first_or_octet_stream();
        self.put(key, Bytes::from(data), content_type.essence_str())
            .await?;
        Ok(key.to_string())
    }

    /// Download `key` to a fresh temporary file and return its path.
    async fn download_file(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        let data = self.get(key).await?;
        let path = std::env::temp_dir().join(format!("photoapp-{}.download", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &data).await?;
        Ok(path)
    }
}
