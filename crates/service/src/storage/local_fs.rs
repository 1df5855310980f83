use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::errors::ServiceError;
use super::blob::BlobStorage;
use super::generate_file_name;

/// Disk-backed blob store. Files land in `root` and are addressed publicly
/// as `<public_prefix>/<file name>`.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalBlobStore {
    pub fn new<P: Into<PathBuf>>(root: P, public_prefix: &str) -> Self {
        Self { root: root.into(), public_prefix: public_prefix.trim_end_matches('/').to_string() }
    }

    /// Map a public path back into `root`. Only the final path component is
    /// used, so `../` segments cannot escape the upload directory.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let name = Path::new(path).file_name()?.to_str()?;
        if name.is_empty() || name == "." || name == ".." {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStore {
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String, ServiceError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot create {}: {e}", self.root.display())))?;
        let file_name = generate_file_name(suggested_name);
        let target = self.root.join(&file_name);
        fs::write(&target, bytes)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot write {}: {e}", target.display())))?;
        debug!(path = %target.display(), size = bytes.len(), "stored upload");
        Ok(format!("{}/{}", self.public_prefix, file_name))
    }

    async fn delete(&self, path: &str) -> Result<(), ServiceError> {
        let target = self
            .resolve(path)
            .ok_or_else(|| ServiceError::Validation(format!("invalid file path {path}")))?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ServiceError::NotFound(format!("file {}", target.display())))
            }
            Err(e) => Err(ServiceError::Storage(format!("cannot delete {}: {e}", target.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn save_then_delete_round_trip() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("catalog_blobs_{}", Uuid::new_v4()));
        let store = LocalBlobStore::new(&root, "/uploads/");

        let public = store.save(b"\x89PNG", "cat.PNG").await?;
        assert!(public.starts_with("/uploads/product-"));
        assert!(public.ends_with(".png"));

        let on_disk = store.resolve(&public).unwrap();
        assert_eq!(tokio::fs::read(&on_disk).await?, b"\x89PNG");

        store.delete(&public).await?;
        assert!(tokio::fs::metadata(&on_disk).await.is_err());
        assert!(matches!(store.delete(&public).await, Err(ServiceError::NotFound(_))));

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[test]
    fn resolve_strips_directories() {
        let store = LocalBlobStore::new("/srv/uploads", "/uploads");
        assert_eq!(store.resolve("/uploads/../../etc/passwd"), Some(PathBuf::from("/srv/uploads/passwd")));
        assert_eq!(store.resolve("/uploads/"), Some(PathBuf::from("/srv/uploads/uploads")));
        assert_eq!(store.resolve(".."), None);
    }
}
