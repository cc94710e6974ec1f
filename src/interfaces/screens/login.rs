use crate::application::{AuthService, LoginOutcome};
use crate::domain::Role;
use crate::shared::ClientError;

use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

/// Where a successful login leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginView {
    /// Session stored; show the main screen with this menu
    Main { role: Role, menu: Vec<ScreenId> },
    /// First login; continue on the password change screen
    ChangePassword { username: String, notice: &'static str },
}

pub struct LoginScreen {
    auth: AuthService,
}

impl Screen for LoginScreen {
    const ID: ScreenId = ScreenId::Login;

    fn open(ctx: &AppContext) -> Self {
        Self {
            auth: AuthService::new(ctx.client().clone()),
        }
    }
}

impl LoginScreen {
    pub async fn submit(&self, username: &str, password: &str) -> ScreenResult<LoginView> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ScreenError::message(messages::INVALID_CREDENTIALS));
        }

        let outcome = self
            .auth
            .login(username.trim(), password)
            .await
            .map_err(|e| match e {
                ClientError::Status { .. } => ScreenError::message(messages::INVALID_CREDENTIALS),
                other => ScreenError::from(other),
            })?;

        Ok(match outcome {
            LoginOutcome::SignedIn(role) => LoginView::Main {
                role,
                menu: ScreenId::menu_for(role),
            },
            LoginOutcome::MustChangePassword { username } => LoginView::ChangePassword {
                username,
                notice: messages::FIRST_LOGIN,
            },
        })
    }

    pub fn logout(&self) -> ScreenResult<()> {
        Ok(self.auth.logout()?)
    }
}
