//! Session store trait definitions

use serde::{Deserialize, Serialize};

use crate::domain::Role;
use crate::shared::StorageError;

pub type StorageResult<T> = Result<T, StorageError>;

/// Everything the client persists between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Bearer token from the last login or password change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Role string as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Username waiting for its initial password change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_username: Option<String>,
}

impl SessionState {
    pub fn role(&self) -> Role {
        Role::from_stored(self.role.as_deref())
    }
}

/// Key-value persistence for the session.
///
/// Implementors provide a consistent snapshot read and an atomic
/// read-modify-write; every other operation is built on those two, so no
/// reader ever sees a token without its role or the reverse.
pub trait SessionStore: Send + Sync {
    fn read(&self) -> StorageResult<SessionState>;

    fn update(&self, apply: &mut dyn FnMut(&mut SessionState)) -> StorageResult<()>;

    fn token(&self) -> StorageResult<Option<String>> {
        Ok(self.read()?.token)
    }

    fn role(&self) -> StorageResult<Role> {
        Ok(self.read()?.role())
    }

    fn pending_username(&self) -> StorageResult<Option<String>> {
        Ok(self.read()?.pending_username)
    }

    /// Store the credential and role of a new session
    fn save_session(&self, token: &str, role: Role) -> StorageResult<()> {
        self.update(&mut |state| {
            state.token = Some(token.to_string());
            state.role = Some(role.as_str().to_string());
        })
    }

    /// Erase token and role together. Idempotent.
    fn clear_session(&self) -> StorageResult<()> {
        self.update(&mut |state| {
            state.token = None;
            state.role = None;
        })
    }

    fn save_pending_username(&self, username: &str) -> StorageResult<()> {
        self.update(&mut |state| state.pending_username = Some(username.to_string()))
    }

    fn clear_pending_username(&self) -> StorageResult<()> {
        self.update(&mut |state| state.pending_username = None)
    }
}
