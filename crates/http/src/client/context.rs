//! Outgoing request description passed through the request pipeline

use super::ClientError;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

/// An outgoing request before it is handed to `reqwest`
///
/// Request stages receive and return this value, so everything a stage may
/// change (headers, body, timeout) lives here.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    base_url: String,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    timeout: Duration,
    body: Option<Vec<u8>>,
}

impl RequestContext {
    /// Create a JSON request against `base_url`
    pub fn new(method: Method, base_url: &str, path: &str, timeout: Duration) -> Self {
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Self {
            method,
            base_url: base_url.to_string(),
            path,
            query: Vec::new(),
            headers,
            timeout,
            body: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full request URL, without the query string
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Override the timeout for this request only
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Convert into a `reqwest` request on `client`
    pub(crate) fn into_builder(self, client: &Client) -> RequestBuilder {
        let url = self.url();
        let mut builder = client.request(self.method, url).headers(self.headers);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }

        if let Some(body) = self.body {
            builder = builder.body(body);
        }

        builder.timeout(self.timeout)
    }
}
