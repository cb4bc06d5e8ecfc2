//! CBG Connect HTTP client
//!
//! An authenticated `reqwest` client: a bearer token read from session
//! storage is attached to every request, and an HTTP 401 clears the session
//! and sends the user to the login view.

pub mod client;

pub use client::error::ClientError;
pub use client::{ApiClient, ApiClientBuilder, RequestContext};
pub use reqwest::{Method, StatusCode};
