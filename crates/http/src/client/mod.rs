//! CBG Connect HTTP client

pub mod context;
pub mod endpoints;
pub mod error;
pub mod interceptors;
pub mod pipeline;

pub use context::RequestContext;
use error::ClientError;
pub use pipeline::{Pipeline, RequestStage, ResponseStage};

use cbg_core::config::{DEFAULT_API_URL, DEFAULT_LOGIN_PATH, DEFAULT_TIMEOUT_MS};
use cbg_core::{ApiConfig, CredentialState, CredentialStore, NavigatorPort, StoragePort};
use interceptors::{BearerAuth, UnauthorizedRedirect};
use reqwest::{Client, ClientBuilder, Method, Response, header};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Client for the CBG Connect API
///
/// Every request passes through the bearer-token stage and every outcome
/// through the 401 stage. Cloning is cheap and clones share storage.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    credentials: CredentialStore,
    pipeline: Arc<Pipeline>,
}

impl ApiClient {
    /// Create a client from loaded configuration
    pub fn new(
        config: &ApiConfig,
        storage: Arc<dyn StoragePort>,
        navigator: Arc<dyn NavigatorPort>,
    ) -> Result<Self, ClientError> {
        Self::builder()
            .config(config)
            .storage(storage)
            .navigator(navigator)
            .build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The stages this client runs
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Session credentials as seen by this client
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn credential_state(&self) -> Result<CredentialState, ClientError> {
        Ok(self.credentials.state()?)
    }

    /// Explicit logout: drop the stored session without navigating
    pub fn logout(&self) -> Result<(), ClientError> {
        debug!("Clearing stored credentials on logout");
        Ok(self.credentials.clear()?)
    }

    /// Start a request against `path`, relative to the base URL
    pub fn request(&self, method: Method, path: &str) -> RequestContext {
        RequestContext::new(method, &self.base_url, path, self.timeout)
    }

    /// Run the pipeline, send the request and classify the outcome
    ///
    /// Non-2xx responses become errors before the response stages see them.
    /// A request stage error is returned as-is and nothing is sent.
    pub async fn send(&self, request: RequestContext) -> Result<Response, ClientError> {
        let request = self.pipeline.prepare(request)?;

        debug!(
            method = %request.method(),
            url = %request.url(),
            authenticated = request.headers().contains_key(header::AUTHORIZATION),
            "Dispatching request"
        );

        let outcome = self.dispatch(request).await;
        self.pipeline.complete(outcome)
    }

    /// Send a request and decode the JSON response body
    ///
    /// A failure while reading the body is passed through the response
    /// stages before it is returned.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestContext,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let body = match response.bytes().await {
            Ok(body) => body,
            // Body read failures go through the response stages as well
            Err(err) => self
                .pipeline
                .complete(Err(ClientError::transport(err)))?
                .bytes()
                .await
                .map_err(ClientError::transport)?,
        };
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::POST, path).json(body)?)
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PUT, path).json(body)?)
            .await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PATCH, path).json(body)?)
            .await
    }

    /// Delete a resource, discarding any response body
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn dispatch(&self, request: RequestContext) -> Result<Response, ClientError> {
        let response = request
            .into_builder(&self.client)
            .send()
            .await
            .map_err(ClientError::transport)?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    login_path: Option<String>,
    user_agent: Option<String>,
    storage: Option<Arc<dyn StoragePort>>,
    navigator: Option<Arc<dyn NavigatorPort>>,
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl ApiClientBuilder {
    /// Take base URL, timeout and login path from configuration
    pub fn config(self, config: &ApiConfig) -> Self {
        self.base_url(config.api_url.clone())
            .timeout(config.timeout())
            .login_path(config.login_path.clone())
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the route used after an authentication failure
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the session storage
    pub fn storage(mut self, storage: Arc<dyn StoragePort>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the navigator used for the login redirect
    pub fn navigator(mut self, navigator: Arc<dyn NavigatorPort>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Append a request stage after the built-in ones
    pub fn request_stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.request_stages.push(stage);
        self
    }

    /// Append a response stage after the built-in ones
    pub fn response_stage(mut self, stage: Arc<dyn ResponseStage>) -> Self {
        self.response_stages.push(stage);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let storage = self
            .storage
            .ok_or_else(|| ClientError::Configuration("storage is required".into()))?;
        let navigator = self
            .navigator
            .ok_or_else(|| ClientError::Configuration("navigator is required".into()))?;

        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|err| ClientError::Configuration(format!("invalid base_url: {err}")))?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS));
        let login_path = self
            .login_path
            .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());

        let client = ClientBuilder::new()
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| "cbg-client/0.1.0".to_string()),
            )
            .build()?;

        let credentials = CredentialStore::new(storage);

        let mut pipeline = Pipeline::new()
            .with_request_stage(Arc::new(BearerAuth::new(credentials.clone())))
            .with_response_stage(Arc::new(UnauthorizedRedirect::new(
                credentials.clone(),
                navigator,
                login_path,
            )));
        for stage in self.request_stages {
            pipeline = pipeline.with_request_stage(stage);
        }
        for stage in self.response_stages {
            pipeline = pipeline.with_response_stage(stage);
        }

        Ok(ApiClient {
            client,
            base_url,
            timeout,
            credentials,
            pipeline: Arc::new(pipeline),
        })
    }
}
