//! Built-in pipeline stages: bearer-token injection and 401 handling

use super::pipeline::{Outcome, RequestStage, ResponseStage};
use super::{ClientError, RequestContext};
use cbg_core::{CredentialStore, NavigatorPort};
use reqwest::header::{self, HeaderValue};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Attaches `Authorization: Bearer <token>` when a token is stored
///
/// The token is read from storage on every request and never cached.
pub struct BearerAuth {
    credentials: CredentialStore,
}

impl BearerAuth {
    pub const NAME: &'static str = "bearer_auth";

    pub fn new(credentials: CredentialStore) -> Self {
        Self { credentials }
    }
}

impl RequestStage for BearerAuth {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, mut request: RequestContext) -> Result<RequestContext, ClientError> {
        let Some(token) = self.credentials.token()? else {
            return Ok(request);
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ClientError::InvalidToken)?;
        value.set_sensitive(true);
        request.headers_mut().insert(header::AUTHORIZATION, value);

        Ok(request)
    }
}

/// Clears the session and redirects to login when a request fails with 401
///
/// The original failure is always returned to the caller.
pub struct UnauthorizedRedirect {
    credentials: CredentialStore,
    navigator: Arc<dyn NavigatorPort>,
    login_path: String,
}

impl UnauthorizedRedirect {
    pub const NAME: &'static str = "unauthorized_redirect";

    pub fn new(
        credentials: CredentialStore,
        navigator: Arc<dyn NavigatorPort>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            navigator,
            login_path: login_path.into(),
        }
    }
}

impl ResponseStage for UnauthorizedRedirect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, outcome: Outcome) -> Outcome {
        let Err(error) = &outcome else {
            return outcome;
        };

        if !error.is_unauthorized() {
            debug!("Request failed without auth side effects: {error}");
            return outcome;
        }

        warn!("Authentication failed, clearing stored credentials");
        if let Err(err) = self.credentials.clear() {
            warn!("Failed to clear stored credentials: {err}");
        }

        info!("Redirecting to {}", self.login_path);
        self.navigator.redirect(&self.login_path);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbg_core::StoragePort;
    use cbg_core::adapters::MemoryStorage;
    use cbg_core::credential::{TOKEN_KEY, USER_ID_KEY, USER_ROLE_KEY};
    use mockall::mock;
    use reqwest::Method;
    use std::time::Duration;

    mock! {
        Navigator {}

        impl NavigatorPort for Navigator {
            fn redirect(&self, path: &str);
        }
    }

    fn signed_in() -> (Arc<MemoryStorage>, CredentialStore) {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "abc123").unwrap();
        storage.set(USER_ID_KEY, "u-1").unwrap();
        storage.set(USER_ROLE_KEY, "teacher").unwrap();
        (storage.clone(), CredentialStore::new(storage))
    }

    fn request() -> RequestContext {
        RequestContext::new(
            Method::GET,
            "http://localhost:4000/api",
            "/students",
            Duration::from_secs(30),
        )
    }

    fn ok_response() -> reqwest::Response {
        reqwest::Response::from(http::Response::builder().status(200).body("[]").unwrap())
    }

    #[test]
    fn test_bearer_attached_when_token_present() {
        let (_, credentials) = signed_in();
        let stage = BearerAuth::new(credentials);

        let request = stage.apply(request()).unwrap();

        let value = request.headers().get(header::AUTHORIZATION).unwrap();
        assert_eq!(value, "Bearer abc123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_no_header_without_token() {
        let stage = BearerAuth::new(CredentialStore::new(Arc::new(MemoryStorage::new())));

        let request = stage.apply(request()).unwrap();

        assert!(request.headers().get(header::AUTHORIZATION).is_none());
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn test_empty_token_sends_no_header() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "").unwrap();
        let stage = BearerAuth::new(CredentialStore::new(storage));

        let request = stage.apply(request()).unwrap();

        assert!(request.headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "abc\n123").unwrap();
        let stage = BearerAuth::new(CredentialStore::new(storage));

        assert!(matches!(
            stage.apply(request()),
            Err(ClientError::InvalidToken)
        ));
    }

    #[test]
    fn test_unauthorized_clears_and_redirects() {
        let (storage, credentials) = signed_in();
        let mut navigator = MockNavigator::new();
        navigator
            .expect_redirect()
            .withf(|path| path == "/login")
            .times(1)
            .return_const(());
        let stage = UnauthorizedRedirect::new(credentials, Arc::new(navigator), "/login");

        let outcome = stage.apply(Err(ClientError::AuthenticationFailed("expired".into())));

        assert!(matches!(outcome, Err(ClientError::AuthenticationFailed(_))));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_repeated_unauthorized_is_idempotent() {
        let (storage, credentials) = signed_in();
        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().times(2).return_const(());
        let stage = UnauthorizedRedirect::new(credentials, Arc::new(navigator), "/login");

        for _ in 0..2 {
            let outcome = stage.apply(Err(ClientError::AuthenticationFailed(String::new())));
            assert!(outcome.is_err());
            assert!(storage.is_empty());
        }
    }

    #[test]
    fn test_other_failures_leave_session() {
        let (storage, credentials) = signed_in();
        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().never();
        let stage = UnauthorizedRedirect::new(credentials, Arc::new(navigator), "/login");

        let outcome = stage.apply(Err(ClientError::ServerError {
            status: 500,
            message: "boom".into(),
        }));
        assert!(matches!(outcome, Err(ClientError::ServerError { status: 500, .. })));

        let outcome = stage.apply(Err(ClientError::Forbidden("nope".into())));
        assert!(matches!(outcome, Err(ClientError::Forbidden(_))));

        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn test_success_passes_through() {
        let (storage, credentials) = signed_in();
        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().never();
        let stage = UnauthorizedRedirect::new(credentials, Arc::new(navigator), "/login");

        let response = stage.apply(Ok(ok_response())).unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(storage.len(), 3);
    }
}
