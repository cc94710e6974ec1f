//! Authentication service: application-layer orchestration
//!
//! Owns every write to the session store: login, password change, logout.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::domain::{ChangePasswordRequest, LoginRequest, LoginResponse, Role};
use crate::infrastructure::ApiClient;
use crate::shared::{ClientError, ClientResult};

/// Result of a successful login call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token and role stored
    SignedIn(Role),
    /// First login: the password has to be changed before a session exists
    MustChangePassword { username: String },
}

pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Authenticate and store the session.
    ///
    /// When the backend demands a password change only the username is kept
    /// (as the pending username); no token is stored.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginOutcome> {
        let request = LoginRequest::new(username, password);
        request.validate()?;

        let response = self.client.login(&request).await?;

        if response.must_change_password() {
            info!("User {} must change the initial password", username);
            self.client.store().save_pending_username(username)?;
            return Ok(LoginOutcome::MustChangePassword {
                username: username.to_string(),
            });
        }

        let role = self.store_session(&response)?;
        info!("User {} signed in as {}", username, role);
        Ok(LoginOutcome::SignedIn(role))
    }

    /// Replace the initial password; the response opens a regular session
    pub async fn change_initial_password(&self, request: &ChangePasswordRequest) -> ClientResult<Role> {
        request.validate()?;

        let response = self.client.change_initial_password(request).await?;
        let role = self.store_session(&response)?;
        self.client.store().clear_pending_username()?;

        info!("Initial password changed, signed in as {}", role);
        Ok(role)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.client.guard().clear_session()?;
        info!("Signed out");
        Ok(())
    }

    /// Role of the stored session
    pub fn current_role(&self) -> ClientResult<Role> {
        Ok(self.client.store().role()?)
    }

    pub fn pending_username(&self) -> ClientResult<Option<String>> {
        Ok(self.client.store().pending_username()?)
    }

    /// Whether a non-expired credential is stored
    pub fn has_session(&self) -> ClientResult<bool> {
        Ok(self.client.guard().check_stored_credential()?)
    }

    fn store_session(&self, response: &LoginResponse) -> ClientResult<Role> {
        let token = response
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Decode("login response carries no token".to_string()))?;

        self.client.store().save_session(token, response.role)?;
        Ok(response.role)
    }
}
