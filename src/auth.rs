//! Signed-in identity and its bearer token.
//!
//! [`AuthSession`] keeps the current user and token in memory and mirrors
//! them into a [`KeyValueStore`] under [`USER_KEY`] and [`TOKEN_KEY`]. The
//! two entries are kept consistent: if either is missing or the user record
//! cannot be read back, both are cleared.

use std::sync::Arc;

use crate::client::{Transport, error_message};
use crate::error::{Error, Result};
use crate::observability::{AUTH_FAILURES, AUTH_LOGINS};
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};
use crate::types::{AuthResponse, Credentials, SignupRequest, User};

const LOGIN_PATH: &str = "/auth/login";
const SIGNUP_PATH: &str = "/auth/signup";

/// Authentication state for one client.
pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    current: Option<(User, String)>,
}

impl AuthSession {
    /// Restores the session from `store`.
    ///
    /// A stored user that fails to deserialize, or a user without a token
    /// (or the reverse), clears both entries and starts signed out.
    pub fn restore(store: Arc<dyn KeyValueStore>, transport: Arc<dyn Transport>) -> Result<Self> {
        let user = store.get(USER_KEY)?;
        let token = store.get(TOKEN_KEY)?;
        let current = match (user, token) {
            (Some(raw), Some(token)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some((user, token)),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding unreadable stored user");
                    None
                }
            },
            (None, None) => None,
            (user, _) => {
                tracing::warn!(
                    has_user = user.is_some(),
                    "discarding inconsistent stored credentials"
                );
                None
            }
        };
        if current.is_none() {
            store.remove(USER_KEY)?;
            store.remove(TOKEN_KEY)?;
        }
        Ok(Self {
            store,
            transport,
            current,
        })
    }

    /// Signs in with a username and password.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&User> {
        let body = serde_json::to_value(Credentials { username, password })?;
        self.authenticate(LOGIN_PATH, body, "Login failed").await
    }

    /// Creates an account and signs in.
    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> Result<&User> {
        let body = serde_json::to_value(SignupRequest {
            username,
            email,
            password,
        })?;
        self.authenticate(SIGNUP_PATH, body, "Signup failed").await
    }

    /// Signs out and forgets the stored credentials.
    pub fn logout(&mut self) -> Result<()> {
        self.current = None;
        self.store.remove(USER_KEY)?;
        self.store.remove(TOKEN_KEY)?;
        Ok(())
    }

    /// Returns true while a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref().map(|(user, _)| user)
    }

    /// The bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, token)| token.as_str())
    }

    async fn authenticate(
        &mut self,
        path: &str,
        body: serde_json::Value,
        fallback: &str,
    ) -> Result<&User> {
        AUTH_LOGINS.click();
        let (user, token) = match self.exchange(path, &body, fallback).await {
            Ok(pair) => pair,
            Err(err) => {
                AUTH_FAILURES.click();
                tracing::warn!(%path, error = %err, "authentication failed");
                return Err(err);
            }
        };
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;
        self.store.set(TOKEN_KEY, &token)?;
        tracing::debug!(username = %user.username, "signed in");
        let (user, _) = self.current.insert((user, token));
        Ok(user)
    }

    async fn exchange(
        &self,
        path: &str,
        body: &serde_json::Value,
        fallback: &str,
    ) -> Result<(User, String)> {
        let response = self.transport.post_json(path, body).await?;
        if !response.is_success() {
            return Err(Error::authentication(error_message(&response.body, fallback)));
        }
        let data: AuthResponse = serde_json::from_str(&response.body).map_err(|_| {
            Error::authentication("Invalid response from server. Please try again.")
        })?;
        if !data.success {
            return Err(Error::authentication(
                data.message
                    .unwrap_or_else(|| format!("{fallback}. Please try again.")),
            ));
        }
        match (data.user, data.token) {
            (Some(user), Some(token)) if !token.is_empty() => Ok((user, token)),
            _ => Err(Error::authentication(
                "Server returned an invalid response. Please try again.",
            )),
        }
    }
}
