use std::{fmt, io, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ServiceError;

/// An uploaded image as received from the client.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Where item images live. References are the URL paths stored on items.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the bytes under a fresh name and return the reference path.
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ServiceError>;
    /// Remove a previously saved image; returns whether a file was deleted.
    async fn remove(&self, reference: &str) -> Result<bool, ServiceError>;
}

/// Images stored as files in one directory and served under `public_prefix`.
#[derive(Clone, Debug)]
pub struct FsImageStore {
    dir: PathBuf,
    public_prefix: String,
}

impl FsImageStore {
    /// Initialize the store, creating the upload directory if missing.
    pub async fn new<P: Into<PathBuf>>(dir: P, public_prefix: &str) -> Result<Arc<Self>, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(Arc::new(Self {
            dir,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }))
    }

    /// Map a reference back to a file inside the upload directory.
    /// External URLs and anything that could escape the directory yield `None`.
    fn local_path(&self, reference: &str) -> Option<PathBuf> {
        let name = reference.strip_prefix(&self.public_prefix)?.strip_prefix('/')?;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.dir.join(name))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        fs::write(self.dir.join(&name), bytes)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        info!(file = %name, size = bytes.len(), "image_saved");
        Ok(format!("{}/{}", self.public_prefix, name))
    }

    async fn remove(&self, reference: &str) -> Result<bool, ServiceError> {
        let Some(path) = self.local_path(reference) else {
            debug!(%reference, "image reference not managed locally; skip remove");
            return Ok(false);
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(%reference, "image_removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(%reference, "image already gone");
                Ok(false)
            }
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{temp_upload_dir, PUBLIC_PREFIX};

    #[tokio::test]
    async fn save_then_remove_roundtrip() -> Result<(), anyhow::Error> {
        let dir = temp_upload_dir();
        let store = FsImageStore::new(&dir, PUBLIC_PREFIX).await?;

        let reference = store.save("png", b"pixels").await?;
        assert!(reference.starts_with("/static/uploads/"));
        assert!(reference.ends_with(".png"));

        let file = store.local_path(&reference).expect("local path");
        assert_eq!(fs::read(&file).await?, b"pixels");

        assert!(store.remove(&reference).await?);
        assert!(!store.remove(&reference).await?);
        assert!(fs::metadata(&file).await.is_err());

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn foreign_references_are_ignored() -> Result<(), anyhow::Error> {
        let dir = temp_upload_dir();
        let store = FsImageStore::new(&dir, "/static/uploads/").await?;

        assert!(!store.remove("https://http2.mlstatic.com/D_NQ_NP_2X.webp").await?);
        assert!(!store.remove("/static/uploads/../Cargo.toml").await?);
        assert!(!store.remove("/static/uploads/").await?);
        assert!(store.local_path("/static/uploads/a.png").is_some());

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
