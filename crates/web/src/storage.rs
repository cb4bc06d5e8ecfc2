//! `localStorage` implementation of the storage port

use cbg_core::{CoreError, CoreResult, StoragePort};

/// Session storage backed by `window.localStorage`
///
/// Values are stored as raw strings, not JSON, so tokens written by other
/// parts of the web app are read back unchanged. `localStorage` is looked up
/// on every call; when it is missing or denied (sandboxed iframes, blocked
/// storage) each operation fails with a storage error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    /// Like [`LocalStorage::new`], but fails up front when `localStorage`
    /// cannot be reached
    pub fn try_new() -> CoreResult<Self> {
        Self::raw().map(|_| Self)
    }

    fn raw() -> CoreResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or_else(|| CoreError::storage("localStorage is not available"))
    }
}

impl StoragePort for LocalStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Self::raw()?
            .get_item(key)
            .map_err(|err| CoreError::storage(format!("localStorage read of {key} failed: {err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        Self::raw()?
            .set_item(key, value)
            .map_err(|err| CoreError::storage(format!("localStorage write of {key} failed: {err:?}")))
    }

    fn delete(&self, key: &str) -> CoreResult<()> {
        Self::raw()?
            .remove_item(key)
            .map_err(|err| CoreError::storage(format!("localStorage delete of {key} failed: {err:?}")))
    }
}
