//! CBG Connect client core types and ports

pub mod adapters;
pub mod config;
pub mod credential;
pub mod error;
pub mod ports;
pub mod types;

pub use config::ApiConfig;
pub use credential::{Credential, CredentialState, CredentialStore};
pub use error::{CoreError, CoreResult};
pub use ports::{NavigatorPort, StoragePort};
