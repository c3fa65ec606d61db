//! Session Gate
//!
//! Exchanges credentials for a session token in a single request, persists
//! the token and redirects to the dashboard. There is no retry, rate
//! limiting or lockout.

mod store;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};

use crate::api::AuthApi;
use mcc_common::models::LoginRequest;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

/// Login form input; dropped as soon as the request resolves
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.username.is_empty() {
            Some("username")
        } else if self.password.is_empty() {
            Some("password")
        } else {
            None
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the user goes after a successful login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Dashboard,
}

/// User-facing login failure
///
/// The display text is the static message shown to the user. Underlying
/// causes are logged, never carried here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    /// A required form field was left empty; no request was sent
    #[error("Please enter a {0}")]
    MissingField(&'static str),

    /// The service answered without issuing a token
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Transport failure or the token could not be stored
    #[error("Failed to login")]
    Failed,
}

impl LoginError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

pub struct SessionGate<A, S> {
    api: A,
    store: S,
}

impl<A: AuthApi, S: TokenStore> SessionGate<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exchange `credentials` for a session token.
    ///
    /// On success the token is persisted (overwriting any previous one) and
    /// the dashboard redirect is returned. On any failure the store is left
    /// untouched.
    pub async fn submit(&self, credentials: Credentials) -> Result<Redirect, LoginError> {
        if let Some(field) = credentials.missing_field() {
            return Err(LoginError::MissingField(field));
        }

        let request = LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        };

        let response = match self.api.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Login error");
                return Err(LoginError::Failed);
            }
        };

        let Some(token) = response.token() else {
            warn!(username = %credentials.username, "Login response carried no token");
            return Err(LoginError::InvalidCredentials);
        };

        if let Err(e) = self.store.save(token) {
            error!(error = %e, "Failed to persist session token");
            return Err(LoginError::Failed);
        }

        info!(username = %credentials.username, "Login successful");
        Ok(Redirect::Dashboard)
    }

    /// Remove the stored token. Clearing an empty store is not an error.
    pub fn logout(&self) -> mcc_common::Result<()> {
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Currently stored token; storage errors are logged and read as absent
    pub fn current_token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read session token");
                None
            }
        }
    }
}
