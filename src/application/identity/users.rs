//! User administration

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::domain::{CreateUserRequest, UserSummary};
use crate::infrastructure::ApiClient;
use crate::shared::ClientResult;

pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &CreateUserRequest) -> ClientResult<()> {
        request.validate()?;
        self.client.register_user(request).await?;
        info!("User {} created with role {}", request.username, request.role_name);
        Ok(())
    }

    /// All accounts except the placeholder entry with id 0
    pub async fn list(&self) -> ClientResult<Vec<UserSummary>> {
        let users = self.client.list_users().await?;
        Ok(users.into_iter().filter(|u| u.id != 0).collect())
    }

    pub async fn delete(&self, id: i32) -> ClientResult<()> {
        self.client.delete_user(id).await?;
        info!("User {} deleted", id);
        Ok(())
    }
}
