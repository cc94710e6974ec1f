use crate::application::UserService;
use crate::domain::{CreateUserRequest, Role};
use crate::shared::ClientError;

use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

pub struct CreateUserScreen {
    users: UserService,
}

impl Screen for CreateUserScreen {
    const ID: ScreenId = ScreenId::CreateUser;

    fn open(ctx: &AppContext) -> Self {
        Self {
            users: UserService::new(ctx.client().clone()),
        }
    }
}

impl CreateUserScreen {
    /// Roles offered in the picker
    pub fn roles(&self) -> &'static [Role] {
        &Role::ASSIGNABLE
    }

    /// Register an account that must change its password on first login
    pub async fn submit(&self, username: &str, password: &str, role: Role) -> ScreenResult<&'static str> {
        let username = username.trim();
        let len = username.chars().count();
        if !(3..=50).contains(&len) {
            return Err(ScreenError::message(messages::USERNAME_LENGTH));
        }
        if password.chars().count() < 6 {
            return Err(ScreenError::message(messages::PASSWORD_TOO_SHORT));
        }
        if !Role::ASSIGNABLE.contains(&role) {
            return Err(ScreenError::message(messages::describe(
                &ClientError::Validation(format!("unknown role {role}")),
            )));
        }

        let request = CreateUserRequest::new(username, password, role);
        self.users.register(&request).await.map_err(|e| {
            ScreenError::from_client(e, |e| match e {
                ClientError::Status { body, .. } if !body.is_empty() => {
                    format!("Ошибка: {body}")
                }
                other => messages::describe(other),
            })
        })?;

        Ok(messages::USER_CREATED)
    }
}
