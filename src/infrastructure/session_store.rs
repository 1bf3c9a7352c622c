use crate::domain::Session;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid session file format - {0}")]
    Format(#[from] serde_json::Error),
}

/// Durable storage for the signed-in session: a single JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `session` as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if the directory or file cannot be
    /// written.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Reads the stored session. `Ok(None)` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Format`] when the file exists but is not a
    /// valid session (including a malformed phone number), and
    /// [`SessionError::Io`] for any read failure other than a missing file.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "session removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhoneNumber;
    use serde_json::json;
    use tempfile::tempdir;

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            user_payload: json!({"user_id": 3}),
        }
    }

    #[test]
    fn test_missing_file_means_signed_out() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_save_creates_parent_and_loads_back() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        store.save(&session()).unwrap();

        assert_eq!(store.load().unwrap(), Some(session()));
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&session()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        let store = SessionStore::new(&path);
        assert!(matches!(store.load(), Err(SessionError::Format(_))));

        fs::write(&path, r#"{"token":"t","phone":"12","user":{}}"#).unwrap();
        assert!(matches!(store.load(), Err(SessionError::Format(_))));
    }
}
