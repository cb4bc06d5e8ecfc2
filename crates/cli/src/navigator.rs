//! Navigator for a terminal session

use cbg_core::NavigatorPort;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// There is no page to leave in a terminal: a redirect to the login view
/// becomes a prompt to sign in again.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    redirected: AtomicBool,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a login redirect happened during this run
    pub fn redirected(&self) -> bool {
        self.redirected.load(Ordering::SeqCst)
    }
}

impl NavigatorPort for TerminalNavigator {
    fn redirect(&self, path: &str) {
        // Concurrent 401s prompt once.
        if self.redirected.swap(true, Ordering::SeqCst) {
            return;
        }
        warn!("Session ended, login required ({path})");
        eprintln!("Your session has expired. Run `cbg login --token <TOKEN>` to sign in again.");
    }
}
