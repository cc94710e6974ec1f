//! In-memory session store

use std::sync::RwLock;

use super::{SessionState, SessionStore, StorageResult};
use crate::shared::StorageError;

/// In-memory session store for tests and one-shot runs
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    state: RwLock<SessionState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn read(&self) -> StorageResult<SessionState> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.clone())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut SessionState)) -> StorageResult<()> {
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        apply(&mut *state);
        Ok(())
    }
}
