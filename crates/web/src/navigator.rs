//! `window.location` implementation of the navigator port

use cbg_core::NavigatorPort;
use tracing::error;

/// Navigates by replacing the current browser location
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    pub fn new() -> Self {
        Self
    }
}

impl NavigatorPort for BrowserNavigator {
    fn redirect(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            error!("No window available, cannot redirect to {path}");
            return;
        };

        // replace() keeps the expired page out of history
        if let Err(err) = window.location().replace(path) {
            error!("Failed to redirect to {path}: {err:?}");
        }
    }
}
