//! JSON-file session store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{SessionState, SessionStore, StorageResult};
use crate::shared::StorageError;

/// Session persisted as a small JSON document.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash leaves either the old or the new state on disk.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state, plus whether the file on disk could not be parsed.
    ///
    /// An unreadable document counts as no session; the next write replaces it.
    fn read_unlocked(&self) -> StorageResult<(SessionState, bool)> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok((SessionState::default(), false)),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(state) => Ok((state, false)),
                Err(e) => {
                    warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                    Ok((SessionState::default(), true))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok((SessionState::default(), false)),
            Err(e) => Err(e.into()),
        }
    }

    fn write_unlocked(&self, state: &SessionState) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Session written to {}", self.path.display());
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> StorageResult<SessionState> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        self.read_unlocked().map(|(state, _)| state)
    }

    fn update(&self, apply: &mut dyn FnMut(&mut SessionState)) -> StorageResult<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (mut state, corrupt) = self.read_unlocked()?;
        let before = state.clone();
        apply(&mut state);
        if corrupt || state != before {
            self.write_unlocked(&state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("inventory-session-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[test]
    fn missing_file_reads_as_empty_session() {
        let store = FileSessionStore::new(temp_path());
        assert_eq!(store.read().unwrap(), SessionState::default());
    }

    #[test]
    fn session_survives_reopen() {
        let path = temp_path();
        FileSessionStore::new(&path)
            .save_session("a.b.c", Role::Admin)
            .unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.token().unwrap().as_deref(), Some("a.b.c"));
        assert_eq!(reopened.role().unwrap(), Role::Admin);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn clear_removes_token_and_role_together() {
        let path = temp_path();
        let store = FileSessionStore::new(&path);
        store.save_session("a.b.c", Role::User).unwrap();
        store.clear_session().unwrap();
        store.clear_session().unwrap();

        let on_disk: SessionState = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert!(on_disk.token.is_none());
        assert!(on_disk.role.is_none());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_file_reads_as_no_session_and_is_replaced() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{truncated").unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.read().unwrap(), SessionState::default());
        assert_eq!(store.role().unwrap(), Role::Unauthenticated);

        store.clear_session().unwrap();
        let on_disk: SessionState = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, SessionState::default());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn client_starts_over_corrupt_file() {
        use crate::config::ApiConfig;
        use crate::infrastructure::ApiClient;
        use std::sync::Arc;

        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{truncated").unwrap();

        let client = ApiClient::new(&ApiConfig::default(), Arc::new(FileSessionStore::new(&path)))
            .unwrap();
        assert!(client.store().token().unwrap().is_none());
        client.store().save_session("a.b.c", Role::User).unwrap();
        assert_eq!(FileSessionStore::new(&path).role().unwrap(), Role::User);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
