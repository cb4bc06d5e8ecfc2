//! Session credentials and their storage layout

use crate::{CoreResult, StoragePort};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the authenticated user's id
pub const USER_ID_KEY: &str = "userId";

/// Storage key for the authenticated user's role
pub const USER_ROLE_KEY: &str = "userRole";

/// Every key that makes up a stored session
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, USER_ID_KEY, USER_ROLE_KEY];

/// Bearer token plus the identifiers stored next to it
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub token: String,
    pub user_id: Option<String>,
    pub user_role: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: None,
            user_role: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>, user_role: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.user_role = Some(user_role.into());
        self
    }
}

// Keep tokens out of logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("user_role", &self.user_role)
            .finish()
    }
}

/// The two observable session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialState {
    Authenticated,
    Anonymous,
}

/// Typed access to the session keys of a [`StoragePort`]
///
/// Nothing is cached: every call goes to the underlying storage, so a clear
/// performed through one handle is visible to all others immediately.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn StoragePort>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    /// Current bearer token, if any. An empty stored token counts as none.
    pub fn token(&self) -> CoreResult<Option<String>> {
        Ok(self
            .storage
            .get(TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    /// Full stored credential, `None` when no token is stored
    pub fn load(&self) -> CoreResult<Option<Credential>> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };

        Ok(Some(Credential {
            token,
            user_id: self.storage.get(USER_ID_KEY)?,
            user_role: self.storage.get(USER_ROLE_KEY)?,
        }))
    }

    /// Persist a credential, dropping identifiers it does not carry
    pub fn save(&self, credential: &Credential) -> CoreResult<()> {
        self.storage.set(TOKEN_KEY, &credential.token)?;
        match &credential.user_id {
            Some(user_id) => self.storage.set(USER_ID_KEY, user_id)?,
            None => self.storage.delete(USER_ID_KEY)?,
        }
        match &credential.user_role {
            Some(role) => self.storage.set(USER_ROLE_KEY, role)?,
            None => self.storage.delete(USER_ROLE_KEY)?,
        }
        Ok(())
    }

    /// Remove every session key.
    ///
    /// All keys are attempted even if one delete fails; the first failure is
    /// returned.
    pub fn clear(&self) -> CoreResult<()> {
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(err) = self.storage.delete(key) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn state(&self) -> CoreResult<CredentialState> {
        Ok(if self.token()?.is_some() {
            CredentialState::Authenticated
        } else {
            CredentialState::Anonymous
        })
    }
}
