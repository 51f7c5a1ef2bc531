//! The signed-in user's session.
//!
//! A [`Session`] is passed explicitly to every authenticated call on
//! [`crate::api::ApiClient`]. [`SessionStore`] keeps it on disk between
//! command invocations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Last `csrftoken` cookie value the server set, replayed as the
    /// `X-CSRFToken` header by later processes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    /// Set once a token refresh has been tried for the current request, so
    /// an expired refresh token cannot cause a retry loop.
    #[serde(skip)]
    pub refresh_attempted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn sign_in(&mut self, user: User, access: Option<String>, refresh: Option<String>) {
        self.user = Some(user);
        self.access_token = access;
        self.refresh_token = refresh;
        self.refresh_attempted = false;
    }

    /// Replace the stored user after a profile change.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop the tokens but keep the user, e.g. after a rejected refresh.
    pub fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

/// JSON-file persistence for a [`Session`].
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

    /// Load the stored session, or an empty one if none was saved.
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }
        let content =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ada() -> User {
        User {
            pk: "1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            username_slug: Some("ada".to_string()),
            profile_picture: None,
        }
    }

    #[test]
    fn test_new_session_is_logged_out() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert!(session.username().is_none());
    }

    #[test]
    fn test_sign_in_resets_refresh_flag() {
        let mut session = Session::new();
        session.refresh_attempted = true;
        session.sign_in(ada(), Some("a".into()), Some("r".into()));
        assert!(session.is_logged_in());
        assert!(!session.refresh_attempted);
        assert_eq!(session.username(), Some("ada"));
    }

    #[test]
    fn test_clear_tokens_keeps_user() {
        let mut session = Session::new();
        session.sign_in(ada(), Some("a".into()), Some("r".into()));
        session.clear_tokens();
        assert!(session.is_logged_in());
        assert!(session.access_token.is_none());
        assert!(session.refresh_token.is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new();
        session.sign_in(ada(), Some("a".into()), None);
        session.clear();
        assert_eq!(session, Session::new());
    }

    #[test]
    fn test_store_missing_file_loads_empty_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), Session::new());
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/session.json"));
        let mut session = Session::new();
        session.sign_in(ada(), Some("access".into()), Some("refresh".into()));
        session.refresh_attempted = true;
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.user, session.user);
        assert_eq!(loaded.access_token.as_deref(), Some("access"));
        // The refresh flag is per process and never written out.
        assert!(!loaded.refresh_attempted);
    }

    #[test]
    fn test_store_keeps_csrf_token() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut session = Session::new();
        session.sign_in(ada(), Some("access".into()), None);
        session.csrf_token = Some("tok123".into());
        store.save(&session).unwrap();

        assert_eq!(store.load().unwrap().csrf_token.as_deref(), Some("tok123"));
    }

    #[test]
    fn test_session_file_without_csrf_token_loads() {
        let session: Session = serde_json::from_str(r#"{"access_token": "a"}"#).unwrap();
        assert!(session.csrf_token.is_none());
        assert!(!serde_json::to_string(&session).unwrap().contains("csrf_token"));
    }

    #[test]
    fn test_store_clear_removes_file() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&Session::new()).unwrap();
        assert!(store.path().exists());
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse session file"));
    }
}
