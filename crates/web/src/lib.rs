//! Browser adapters for the CBG Connect client
//!
//! Session data lives in `window.localStorage` under the plain keys the rest
//! of the web app uses, and the login redirect replaces `window.location`.

mod navigator;
mod storage;

pub use navigator::BrowserNavigator;
pub use storage::LocalStorage;

use cbg_core::ApiConfig;
use cbg_core::config::DEFAULT_API_URL;
use cbg_http::{ApiClient, ClientError};
use std::sync::Arc;

/// Configuration baked in at build time, the browser has no environment
pub fn build_config() -> ApiConfig {
    ApiConfig {
        api_url: option_env!("CBG_API_URL")
            .unwrap_or(DEFAULT_API_URL)
            .to_string(),
        ..ApiConfig::default()
    }
}

/// Client wired to `localStorage` and `window.location`
pub fn browser_client() -> Result<ApiClient, ClientError> {
    ApiClient::new(
        &build_config(),
        Arc::new(LocalStorage::new()),
        Arc::new(BrowserNavigator::new()),
    )
}
