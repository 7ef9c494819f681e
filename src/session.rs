//! Session context injected into the api client.
//!
//! Holds the bearer token and the logged-in user. Optionally persisted to a
//! JSON file so a later process starts authenticated.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  pub token: String,
  #[serde(default = "default_token_type")]
  pub token_type: String,
  pub user_id: Option<i64>,
  pub username: Option<String>,
  pub email: Option<String>,
  #[serde(default)]
  pub roles: Vec<String>,
}

fn default_token_type() -> String {
  "Bearer".to_string()
}

impl Session {
  /// A session that only knows its token (e.g. from TURISMO_TOKEN).
  pub fn from_token(token: impl Into<String>) -> Self {
    Self {
      token: token.into(),
      token_type: default_token_type(),
      user_id: None,
      username: None,
      email: None,
      roles: Vec::new(),
    }
  }

  pub fn authorization(&self) -> String {
    format!("{} {}", self.token_type, self.token)
  }
}

#[derive(Clone, Default)]
pub struct SessionContext {
  current: Arc<RwLock<Option<Session>>>,
  path: Option<PathBuf>,
}

impl SessionContext {
  /// Session persisted at `path`.
  pub fn new(path: PathBuf) -> Self {
    Self {
      current: Arc::default(),
      path: Some(path),
    }
  }

  /// Session that lives only as long as the process.
  pub fn in_memory() -> Self {
    Self::default()
  }

  /// Restore a previously persisted session, if any.
  pub fn load(&self) -> Result<Option<Session>> {
    let Some(path) = &self.path else {
      return Ok(self.current());
    };
    if !path.exists() {
      return Ok(None);
    }

    let contents = std::fs::read(path)?;
    let session: Session = serde_json::from_slice(&contents).map_err(Error::SessionFormat)?;
    debug!(path = %path.display(), "restored session");
    *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
    Ok(Some(session))
  }

  /// Replace the active session and persist it.
  pub fn set(&self, session: Session) -> Result<()> {
    if let Some(path) = &self.path {
      if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
      }
      let data = serde_json::to_vec_pretty(&session).map_err(Error::SessionFormat)?;
      std::fs::write(path, data)?;
    }
    *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    Ok(())
  }

  /// Replace the active session for this process without persisting it.
  pub fn replace_transient(&self, session: Session) {
    *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
  }

  /// Forget the session in memory and on disk.
  pub fn clear(&self) -> Result<()> {
    *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    if let Some(path) = &self.path {
      if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
          warn!(path = %path.display(), error = %e, "failed to delete session file");
          return Err(e.into());
        }
      }
    }
    Ok(())
  }

  pub fn current(&self) -> Option<Session> {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Value for the Authorization header, if logged in.
  pub fn bearer(&self) -> Option<String> {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .as_ref()
      .map(Session::authorization)
  }

  pub fn is_authenticated(&self) -> bool {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .is_some()
  }

  pub fn has_role(&self, role: &str) -> bool {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .as_ref()
      .is_some_and(|s| s.roles.iter().any(|r| r.eq_ignore_ascii_case(role)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn session() -> Session {
    Session {
      token: "abc".to_string(),
      token_type: "Bearer".to_string(),
      user_id: Some(7),
      username: Some("ana".to_string()),
      email: Some("ana@example.com".to_string()),
      roles: vec!["ROLE_USER".to_string(), "ROLE_EMPRENDEDOR".to_string()],
    }
  }

  #[test]
  fn in_memory_session_round_trip() {
    let ctx = SessionContext::in_memory();
    assert!(ctx.bearer().is_none());

    ctx.set(session()).unwrap();
    assert_eq!(ctx.bearer().as_deref(), Some("Bearer abc"));
    assert!(ctx.has_role("role_emprendedor"));
    assert!(!ctx.has_role("ROLE_ADMIN"));

    ctx.clear().unwrap();
    assert!(!ctx.is_authenticated());
  }

  #[test]
  fn persisted_session_survives_a_new_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    SessionContext::new(path.clone()).set(session()).unwrap();

    let restored = SessionContext::new(path.clone());
    assert_eq!(restored.load().unwrap(), Some(session()));
    assert_eq!(restored.bearer().as_deref(), Some("Bearer abc"));

    restored.clear().unwrap();
    assert!(!path.exists());
    assert_eq!(SessionContext::new(path).load().unwrap(), None);
  }

  #[test]
  fn transient_session_leaves_the_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let ctx = SessionContext::new(path.clone());
    ctx.replace_transient(Session::from_token("efimero"));
    assert_eq!(ctx.bearer().as_deref(), Some("Bearer efimero"));
    assert!(!path.exists());
  }

  #[test]
  fn corrupt_session_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"not json").unwrap();

    let err = SessionContext::new(path).load().unwrap_err();
    assert!(matches!(err, Error::SessionFormat(_)));
  }
}
