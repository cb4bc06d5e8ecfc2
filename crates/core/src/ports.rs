//! Ports between the client core and its host environment
//!
//! The client never touches browser globals or the filesystem directly.
//! Storage and navigation are injected through these traits so the same
//! interceptor logic runs in a browser, a CLI, or a test.

use crate::CoreResult;

/// Persistent key-value storage for session data
pub trait StoragePort: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove a value. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> CoreResult<()>;
}

/// Navigation side effects triggered by the client
pub trait NavigatorPort: Send + Sync {
    /// Replace the current location with `path`
    fn redirect(&self, path: &str);
}
