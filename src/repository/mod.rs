//! Repositories: one per entity family, each operation an observable
//! sequence of [`Resource`] values.
//!
//! Every operation emits `Loading` first and then exactly one terminal
//! `Success` or `Error`. Failures never escape as `Err`; they are rendered
//! into `Resource::Error` with a human readable message.
//!
//! ```ignore
//! let mut states = repo.get_by_id(1);
//! while let Some(state) = states.next().await {
//!     match state {
//!         Resource::Loading => render_spinner(),
//!         Resource::Success(m) => render(m),
//!         Resource::Error(e) => render_error(e),
//!     }
//! }
//! ```

use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;
use tracing::debug;

use crate::cache::{CacheResult, CacheSource};
use crate::error::Result;

mod auth;
mod cache;
mod cart;
mod cart_reservation;
mod category;
mod chat;
mod entrepreneur;
mod location;
mod municipality;
mod payment;
mod plan;
mod reservation;
mod service;
mod user;

pub use auth::AuthRepository;
pub use cache::{EntrepreneurQuery, MunicipalityQuery};
pub use cart::CartRepository;
pub use cart_reservation::CartReservationRepository;
pub use category::CategoryRepository;
pub use chat::ChatRepository;
pub use entrepreneur::{EntrepreneurRepository, DEFAULT_RADIUS_KM};
pub use location::LocationRepository;
pub use municipality::MunicipalityRepository;
pub use payment::{PaymentQuery, PaymentRepository};
pub use plan::{PlanQuery, PlanRepository};
pub use reservation::{ReservationQuery, ReservationRepository};
pub use service::{ServiceQuery, ServiceRepository};
pub use user::{UserQuery, UserRepository};

/// The state of one repository operation
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
  /// Operation is in flight
  Loading,
  /// Operation completed successfully
  Success(T),
  /// Operation failed with a human readable message
  Error(String),
}

impl<T> Resource<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, Resource::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Resource::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, Resource::Error(_))
  }

  /// Success or Error
  pub fn is_terminal(&self) -> bool {
    !self.is_loading()
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      Resource::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      Resource::Error(e) => Some(e),
      _ => None,
    }
  }

  pub fn into_data(self) -> Option<T> {
    match self {
      Resource::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resource<U> {
    match self {
      Resource::Loading => Resource::Loading,
      Resource::Success(data) => Resource::Success(f(data)),
      Resource::Error(e) => Resource::Error(e),
    }
  }
}

impl<T> From<Result<T>> for Resource<T> {
  fn from(result: Result<T>) -> Self {
    match result {
      Ok(data) => Resource::Success(data),
      Err(e) => Resource::Error(e.to_string()),
    }
  }
}

/// Lazy sequence of states for one operation invocation
pub type ResourceStream<T> = BoxStream<'static, Resource<T>>;

/// Emit `Loading`, then the outcome of `fut`.
///
/// Nothing runs until the stream is polled.
pub fn observe<T, Fut>(fut: Fut) -> ResourceStream<T>
where
  T: Send + 'static,
  Fut: Future<Output = Result<T>> + Send + 'static,
{
  let terminal: BoxFuture<'static, Resource<T>> = Box::pin(async move { Resource::from(fut.await) });
  stream::once(future::ready(Resource::Loading))
    .chain(stream::once(terminal))
    .boxed()
}

/// Like [`observe`] for cached reads: logs where the data came from.
pub(crate) fn observe_cached<T, Fut>(what: &'static str, fut: Fut) -> ResourceStream<T>
where
  T: Send + 'static,
  Fut: Future<Output = Result<CacheResult<T>>> + Send + 'static,
{
  observe(async move {
    let result = fut.await?;
    match result.source {
      CacheSource::Network => debug!(what, "fresh from network"),
      CacheSource::Cache => debug!(what, cached_at = ?result.cached_at, "fresh from cache"),
      CacheSource::Offline => debug!(what, cached_at = ?result.cached_at, "stale cache (offline)"),
    }
    Ok(result.data)
  })
}

/// Percent-encode a value used as a single path segment.
pub(crate) fn segment(value: &str) -> String {
  url::form_urlencoded::byte_serialize(value.as_bytes())
    .collect::<String>()
    .replace('+', "%20")
}

#[cfg(test)]
pub(crate) mod testing {
  use std::time::Duration;

  use crate::api::ApiClient;
  use crate::session::SessionContext;

  /// Client pointed at a port nothing listens on
  pub fn unreachable_api() -> ApiClient {
    ApiClient::with_timeout(
      "http://127.0.0.1:9/api",
      Duration::from_secs(2),
      SessionContext::in_memory(),
    )
    .unwrap()
  }

  pub fn api_for(server: &httpmock::MockServer) -> ApiClient {
    ApiClient::with_timeout(
      &server.url("/api"),
      Duration::from_secs(5),
      SessionContext::in_memory(),
    )
    .unwrap()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  #[tokio::test]
  async fn observe_emits_loading_then_one_terminal_value() {
    let states: Vec<Resource<i32>> = observe::<i32, _>(async { Ok(4) }).collect().await;
    assert_eq!(states, vec![Resource::Loading, Resource::Success(4)]);

    let states: Vec<Resource<i32>> = observe::<i32, _>(async { Err(Error::EmptyBody) }).collect().await;
    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    assert_eq!(states[1].error(), Some("Respuesta vacía del servidor"));
  }

  #[test]
  fn map_keeps_shape() {
    assert_eq!(Resource::Success(2).map(|n| n * 2), Resource::Success(4));
    assert_eq!(
      Resource::<i32>::Error("x".to_string()).map(|n| n * 2),
      Resource::Error("x".to_string())
    );
    assert!(Resource::<i32>::Loading.map(|n| n + 1).is_loading());
  }

  #[test]
  fn path_segments_are_encoded() {
    assert_eq!(segment("San Juan"), "San%20Juan");
    assert_eq!(segment("Puno/Sur"), "Puno%2FSur");
  }
}
