use tokio::sync::RwLock;

use crate::application::UserService;
use crate::domain::UserSummary;

use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

/// User list with delete-and-reload
pub struct UsersScreen {
    users: UserService,
    list: RwLock<Vec<UserSummary>>,
}

impl Screen for UsersScreen {
    const ID: ScreenId = ScreenId::Users;

    fn open(ctx: &AppContext) -> Self {
        Self {
            users: UserService::new(ctx.client().clone()),
            list: RwLock::new(Vec::new()),
        }
    }
}

impl UsersScreen {
    pub async fn reload(&self) -> ScreenResult<Vec<UserSummary>> {
        let users = self
            .users
            .list()
            .await
            .map_err(|e| ScreenError::from_client(e, messages::users_failed))?;

        *self.list.write().await = users.clone();
        Ok(users)
    }

    pub async fn users(&self) -> Vec<UserSummary> {
        self.list.read().await.clone()
    }

    pub fn confirmation(user: &UserSummary) -> String {
        format!(
            "Вы уверены, что хотите удалить пользователя {}?",
            user.display_name()
        )
    }

    /// Delete a listed user and reload the list
    pub async fn delete(&self, user: &UserSummary) -> ScreenResult<String> {
        self.users
            .delete(user.id)
            .await
            .map_err(|e| ScreenError::from_client(e, messages::user_delete_failed))?;

        let message = messages::user_deleted(&user.display_name());
        self.reload().await?;
        Ok(message)
    }

    /// Delete by id, using the cached entry for the message when known
    pub async fn delete_by_id(&self, id: i32) -> ScreenResult<String> {
        let known = self.list.read().await.iter().find(|u| u.id == id).cloned();
        let user = known.unwrap_or(UserSummary {
            id,
            username: None,
            role_name: None,
        });
        self.delete(&user).await
    }
}
