use crate::application::AuthService;
use crate::domain::ChangePasswordRequest;

use super::{messages, AppContext, LoginView, Screen, ScreenError, ScreenId, ScreenResult};

pub struct ChangePasswordScreen {
    auth: AuthService,
}

impl Screen for ChangePasswordScreen {
    const ID: ScreenId = ScreenId::ChangePassword;

    fn open(ctx: &AppContext) -> Self {
        Self {
            auth: AuthService::new(ctx.client().clone()),
        }
    }
}

impl ChangePasswordScreen {
    /// Username remembered by the login that demanded the change
    pub fn pending_username(&self) -> ScreenResult<Option<String>> {
        Ok(self.auth.pending_username()?)
    }

    pub fn greeting(&self) -> ScreenResult<String> {
        let username = self
            .pending_username()?
            .ok_or_else(|| ScreenError::message(messages::NO_PENDING_USER))?;
        Ok(format!(
            "Первый вход для пользователя '{username}'. Введите текущий пароль и новый."
        ))
    }

    /// Replace the initial password and open the main screen
    pub async fn submit(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ScreenResult<(LoginView, &'static str)> {
        if new_password.chars().count() < 6 {
            return Err(ScreenError::message(messages::PASSWORD_TOO_SHORT));
        }
        if new_password != confirm_password {
            return Err(ScreenError::message(messages::PASSWORDS_DIFFER));
        }

        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
        };

        let role = self
            .auth
            .change_initial_password(&request)
            .await
            .map_err(|e| ScreenError::from_client(e, messages::password_change_failed))?;

        Ok((
            LoginView::Main {
                role,
                menu: ScreenId::menu_for(role),
            },
            messages::PASSWORD_CHANGED,
        ))
    }
}
