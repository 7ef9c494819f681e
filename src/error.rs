//! Error type shared by the api, cache and repository layers.
//!
//! Repositories never let these escape: every failure is rendered into a
//! terminal `Resource::Error` carrying the `Display` text below.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  /// Request exceeded the configured timeout
  #[error("Tiempo de espera agotado al contactar el servidor")]
  Timeout,

  /// Connectivity or transport failure
  #[error("Error de conexión: {0}")]
  Network(#[source] reqwest::Error),

  /// Non-2xx response. The message comes from the server payload untouched.
  #[error("{message}")]
  Server { status: u16, message: String },

  /// 2xx response whose body does not match the expected representation
  #[error("Respuesta inválida del servidor: {0}")]
  Decode(#[source] serde_json::Error),

  /// 2xx response without a body where a representation was expected
  #[error("Respuesta vacía del servidor")]
  EmptyBody,

  /// Local cache failure
  #[error("Error de almacenamiento local: {0}")]
  Storage(#[from] rusqlite::Error),

  #[error("Almacenamiento local no disponible (lock poisoned)")]
  StoragePoisoned,

  /// The blocking cache task panicked or was cancelled
  #[error("Error de almacenamiento local: {0}")]
  StorageTask(#[from] tokio::task::JoinError),

  #[error("URL inválida: {0}")]
  InvalidUrl(#[from] url::ParseError),

  /// Rejected locally before any request was made
  #[error("{0}")]
  InvalidInput(String),

  #[error("No hay una sesión activa")]
  NotAuthenticated,

  #[error("Error de E/S: {0}")]
  Io(#[from] std::io::Error),

  #[error("Archivo de sesión corrupto: {0}")]
  SessionFormat(#[source] serde_json::Error),
}

impl Error {
  /// Failures of the remote round trip itself (as opposed to server verdicts).
  pub fn is_transport(&self) -> bool {
    matches!(
      self,
      Error::Timeout | Error::Network(_) | Error::Decode(_) | Error::EmptyBody
    )
  }

  pub fn is_storage(&self) -> bool {
    matches!(
      self,
      Error::Storage(_) | Error::StoragePoisoned | Error::StorageTask(_)
    )
  }

  /// HTTP status for server-reported errors.
  pub fn status(&self) -> Option<u16> {
    match self {
      Error::Server { status, .. } => Some(*status),
      _ => None,
    }
  }
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Error::Timeout
    } else {
      Error::Network(e)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn server_error_displays_message_verbatim() {
    let err = Error::Server {
      status: 409,
      message: "La municipalidad ya existe".to_string(),
    };
    assert_eq!(err.to_string(), "La municipalidad ya existe");
    assert_eq!(err.status(), Some(409));
    assert!(!err.is_transport());
  }

  #[test]
  fn classification() {
    assert!(Error::Timeout.is_transport());
    assert!(Error::EmptyBody.is_transport());
    assert!(Error::StoragePoisoned.is_storage());
    assert!(!Error::NotAuthenticated.is_storage());
  }
}
