use async_trait::async_trait;

use crate::errors::ServiceError;

/// Capability for persisting uploaded files outside the database.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `bytes` and return the public path to reference them by.
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String, ServiceError>;
    /// Remove a previously returned path. Missing files yield `NotFound`.
    async fn delete(&self, path: &str) -> Result<(), ServiceError>;
}

/// In-memory blob store for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use crate::storage::generate_file_name;

    #[derive(Default)]
    pub struct InMemoryBlobStore {
        files: Mutex<HashMap<String, Vec<u8>>>,
        fail_saves: AtomicBool,
        fail_deletes: AtomicBool,
    }

    impl InMemoryBlobStore {
        pub fn contains(&self, path: &str) -> bool {
            self.files.lock().map(|f| f.contains_key(path)).unwrap_or(false)
        }

        pub fn len(&self) -> usize {
            self.files.lock().map(|f| f.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        pub fn set_fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_deletes(&self, fail: bool) {
            self.fail_deletes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl BlobStorage for InMemoryBlobStore {
        async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String, ServiceError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(ServiceError::Storage("disk full".into()));
            }
            let path = format!("/uploads/{}", generate_file_name(suggested_name));
            let mut files = self.files.lock().map_err(|_| ServiceError::Storage("lock poisoned".into()))?;
            files.insert(path.clone(), bytes.to_vec());
            Ok(path)
        }

        async fn delete(&self, path: &str) -> Result<(), ServiceError> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(ServiceError::Storage("permission denied".into()));
            }
            let mut files = self.files.lock().map_err(|_| ServiceError::Storage("lock poisoned".into()))?;
            match files.remove(path) {
                Some(_) => Ok(()),
                None => Err(ServiceError::NotFound(format!("file {path}"))),
            }
        }
    }
}
