//! Browser implementations of the storage and navigation seams.
//!
//! Both types are zero-sized and look up `window` on every call, which keeps
//! them `Send + Sync` without holding JS handles.

use dian_client::{CredentialStorage, StorageError};
use dian_session::Navigator;

/// `window.localStorage`, origin-scoped and durable across reloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage;

impl WebStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|_| StorageError::Unavailable("localStorage access denied".to_string()))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

impl CredentialStorage for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable(format!("could not read {key}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Unavailable(format!("could not write {key}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable(format!("could not remove {key}")))
    }
}

/// Full-page navigation through `window.location` and `window.history`.
///
/// Used where the whole app must be reset (authentication rejection) and by
/// the access-denied affordances; in-app guard redirects go through the
/// router instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn push(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if window.location().assign(path).is_err() {
                tracing::warn!(path, "navigation failed");
            }
        }
    }

    fn replace(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if window.location().replace(path).is_err() {
                tracing::warn!(path, "navigation failed");
            }
        }
    }

    fn back(&self) {
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let _ = history.back();
        }
    }

    fn current(&self) -> Option<String> {
        web_sys::window()?.location().pathname().ok()
    }
}
