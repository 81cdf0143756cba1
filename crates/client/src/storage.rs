//! Durable key/value storage for the session credential.
//!
//! Only two keys are ever written: the bearer token and an optional cached
//! copy of the identity. The session store and the auth interceptor are the
//! only callers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use dian_auth::{BearerToken, Identity};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user_data";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Origin-scoped key/value surface that survives reloads.
pub trait CredentialStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage, used by tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl CredentialStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::{CredentialStorage, StorageError};

    /// JSON file holding a flat string map, for native hosts.
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        lock: Mutex<()>,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: path.into(),
                lock: Mutex::new(()),
            }
        }

        /// `<data dir>/dian-console/session.json`.
        pub fn in_data_dir() -> Result<Self, StorageError> {
            let dir = dirs::data_dir().ok_or_else(|| {
                StorageError::Unavailable("no platform data directory".to_string())
            })?;
            Ok(Self::new(dir.join("dian-console").join("session.json")))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_map(&self) -> Result<HashMap<String, String>, StorageError> {
            match std::fs::read_to_string(&self.path) {
                Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
                Ok(raw) => Ok(serde_json::from_str(&raw)?),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
                Err(e) => Err(e.into()),
            }
        }

        fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let tmp = self.path.with_extension("json.tmp");
            std::fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }

        fn with_lock<T>(
            &self,
            f: impl FnOnce() -> Result<T, StorageError>,
        ) -> Result<T, StorageError> {
            let _guard = self
                .lock
                .lock()
                .map_err(|_| StorageError::Unavailable("file storage lock poisoned".to_string()))?;
            f()
        }
    }

    impl CredentialStorage for FileStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.with_lock(|| Ok(self.read_map()?.get(key).cloned()))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.with_lock(|| {
                let mut map = self.read_map()?;
                map.insert(key.to_string(), value.to_string());
                self.write_map(&map)
            })
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.with_lock(|| {
                let mut map = self.read_map()?;
                if map.remove(key).is_some() {
                    self.write_map(&map)?;
                }
                Ok(())
            })
        }
    }
}

/// Storage keys, overridable per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub token: String,
    pub user: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            token: TOKEN_KEY.to_string(),
            user: USER_KEY.to_string(),
        }
    }
}

/// Typed access to the credential keys over any [`CredentialStorage`].
///
/// Cheap to clone; clones share the same backing storage.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn CredentialStorage>,
    keys: StorageKeys,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self::with_keys(storage, StorageKeys::default())
    }

    pub fn with_keys(storage: Arc<dyn CredentialStorage>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// The persisted token, if any. Blank values count as absent.
    pub fn token(&self) -> Result<Option<BearerToken>, StorageError> {
        Ok(self
            .storage
            .get(&self.keys.token)?
            .map(BearerToken::new)
            .filter(|t| !t.is_blank()))
    }

    pub fn store_token(&self, token: &BearerToken) -> Result<(), StorageError> {
        self.storage.set(&self.keys.token, token.as_str())
    }

    pub fn cache_identity(&self, identity: &Identity) -> Result<(), StorageError> {
        let blob = serde_json::to_string(identity)?;
        self.storage.set(&self.keys.user, &blob)
    }

    /// The cached identity blob. Display only; never proof of authentication.
    pub fn cached_identity(&self) -> Result<Option<Identity>, StorageError> {
        match self.storage.get(&self.keys.user)? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    /// Erase the token and the cached identity.
    ///
    /// Both removals are attempted; the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove(&self.keys.token);
        let user = self.storage.remove(&self.keys.user);
        token.and(user)
    }
}

impl core::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dian_auth::Role;
    use dian_core::UserId;

    fn identity() -> Identity {
        Identity::new(UserId::new("9").unwrap(), "ana", "Ana", "ana@example.com", Role::User)
    }

    #[test]
    fn token_round_trip_and_clear() {
        let store = CredentialStore::in_memory();
        assert!(store.token().unwrap().is_none());

        store.store_token(&BearerToken::new("abc.def")).unwrap();
        store.cache_identity(&identity()).unwrap();
        assert_eq!(store.token().unwrap().unwrap().as_str(), "abc.def");
        assert_eq!(store.cached_identity().unwrap().unwrap(), identity());

        store.clear().unwrap();
        assert!(store.token().unwrap().is_none());
        assert!(store.cached_identity().unwrap().is_none());
    }

    #[test]
    fn blank_token_counts_as_absent() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "  ").unwrap();
        let store = CredentialStore::new(storage);
        assert!(store.token().unwrap().is_none());
    }

    #[test]
    fn custom_keys_are_respected() {
        let storage = Arc::new(MemoryStorage::new());
        let keys = StorageKeys { token: "tok".into(), user: "usr".into() };
        let store = CredentialStore::with_keys(storage.clone(), keys);

        store.store_token(&BearerToken::new("x")).unwrap();
        assert_eq!(storage.get("tok").unwrap().as_deref(), Some("x"));
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!("dian-storage-{}", std::process::id()));
        let path = dir.join("session.json");
        let _ = std::fs::remove_file(&path);

        let first = FileStorage::new(&path);
        first.set(TOKEN_KEY, "persisted").unwrap();
        first.set(USER_KEY, "{}").unwrap();

        let second = FileStorage::new(&path);
        assert_eq!(second.get(TOKEN_KEY).unwrap().as_deref(), Some("persisted"));

        second.remove(TOKEN_KEY).unwrap();
        assert!(first.get(TOKEN_KEY).unwrap().is_none());
        assert_eq!(first.get(USER_KEY).unwrap().as_deref(), Some("{}"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
