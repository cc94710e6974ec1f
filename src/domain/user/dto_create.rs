use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::domain::Role;

/// Body of `POST /api/auth/register`
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3–50 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "validate_role_name"))]
    pub role_name: String,
    pub must_change_password: bool,
}

impl CreateUserRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role_name: role.as_str().to_string(),
            must_change_password: true,
        }
    }
}

fn validate_role_name(role_name: &str) -> Result<(), ValidationError> {
    if Role::ASSIGNABLE.contains(&Role::parse(role_name)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("role");
        err.message = Some("unknown role".into());
        Err(err)
    }
}
