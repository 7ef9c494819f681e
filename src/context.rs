//! Explicit wiring of the client: session, api client, cache and the
//! repositories and view models built on top of them.

use color_eyre::{eyre::WrapErr, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::cache::{CacheLayer, FetchPolicy, SqliteStorage};
use crate::config::Config;
use crate::repository::{
  AuthRepository, CartRepository, CartReservationRepository, CategoryRepository, ChatRepository,
  EntrepreneurRepository, LocationRepository, MunicipalityRepository, PaymentRepository,
  PlanRepository, ReservationRepository, ServiceRepository, UserRepository,
};
use crate::session::{Session, SessionContext};
use crate::viewmodel::{
  AuthViewModel, CartReservationViewModel, CartViewModel, CategoryViewModel, ChatViewModel,
  EntrepreneurViewModel, LocationViewModel, MunicipalityViewModel, PaymentViewModel,
  PlanViewModel, ReservationViewModel, ServiceViewModel, UserViewModel,
};

#[derive(Clone)]
pub struct AppContext {
  api: ApiClient,
  cache: CacheLayer,
}

impl AppContext {
  /// Open the session file and cache database named by `config`.
  ///
  /// A TURISMO_TOKEN in the environment takes over the session for this
  /// process only; the session file is left as it was.
  pub fn new(config: &Config) -> Result<Self> {
    let session = open_session(config.session.resolved_path()?, Config::get_token())?;

    let storage = if config.cache.in_memory {
      SqliteStorage::open_in_memory()?
    } else {
      let path = config.cache.resolved_path()?;
      info!(path = %path.display(), "opening cache");
      SqliteStorage::open(&path).wrap_err_with(|| format!("Failed to open cache {}", path.display()))?
    };

    let api = ApiClient::new(&config.api, session)?;
    Ok(Self::with_parts(
      api,
      Arc::new(storage),
      config.cache.fetch_policy(),
    ))
  }

  pub fn with_parts(api: ApiClient, storage: Arc<SqliteStorage>, policy: FetchPolicy) -> Self {
    Self {
      api,
      cache: CacheLayer::from_shared(storage).with_policy(policy),
    }
  }

  pub fn session(&self) -> &SessionContext {
    self.api.session()
  }

  pub fn api(&self) -> &ApiClient {
    &self.api
  }

  pub fn auth(&self) -> AuthRepository {
    AuthRepository::new(self.api.clone())
  }

  pub fn municipalities(&self) -> MunicipalityRepository {
    MunicipalityRepository::new(self.api.clone(), self.cache.clone())
  }

  pub fn entrepreneurs(&self) -> EntrepreneurRepository {
    EntrepreneurRepository::new(self.api.clone(), self.cache.clone())
  }

  pub fn categories(&self) -> CategoryRepository {
    CategoryRepository::new(self.api.clone())
  }

  pub fn services(&self) -> ServiceRepository {
    ServiceRepository::new(self.api.clone())
  }

  pub fn plans(&self) -> PlanRepository {
    PlanRepository::new(self.api.clone())
  }

  pub fn reservations(&self) -> ReservationRepository {
    ReservationRepository::new(self.api.clone())
  }

  pub fn payments(&self) -> PaymentRepository {
    PaymentRepository::new(self.api.clone())
  }

  pub fn cart(&self) -> CartRepository {
    CartRepository::new(self.api.clone())
  }

  pub fn cart_reservations(&self) -> CartReservationRepository {
    CartReservationRepository::new(self.api.clone())
  }

  pub fn chat(&self) -> ChatRepository {
    ChatRepository::new(self.api.clone())
  }

  pub fn locations(&self) -> LocationRepository {
    LocationRepository::new(self.api.clone(), self.cache.clone())
  }

  pub fn users(&self) -> UserRepository {
    UserRepository::new(self.api.clone())
  }

  pub fn auth_view_model(&self) -> AuthViewModel {
    AuthViewModel::new(self.auth())
  }

  pub fn municipality_view_model(&self) -> MunicipalityViewModel {
    MunicipalityViewModel::new(self.municipalities())
  }

  pub fn entrepreneur_view_model(&self) -> EntrepreneurViewModel {
    EntrepreneurViewModel::new(self.entrepreneurs())
  }

  pub fn category_view_model(&self) -> CategoryViewModel {
    CategoryViewModel::new(self.categories())
  }

  pub fn service_view_model(&self) -> ServiceViewModel {
    ServiceViewModel::new(self.services())
  }

  pub fn plan_view_model(&self) -> PlanViewModel {
    PlanViewModel::new(self.plans())
  }

  pub fn reservation_view_model(&self) -> ReservationViewModel {
    ReservationViewModel::new(self.reservations())
  }

  pub fn payment_view_model(&self) -> PaymentViewModel {
    PaymentViewModel::new(self.payments())
  }

  pub fn cart_view_model(&self) -> CartViewModel {
    CartViewModel::new(self.cart())
  }

  pub fn cart_reservation_view_model(&self) -> CartReservationViewModel {
    CartReservationViewModel::new(self.cart_reservations())
  }

  pub fn chat_view_model(&self) -> ChatViewModel {
    ChatViewModel::new(self.chat())
  }

  pub fn location_view_model(&self) -> LocationViewModel {
    LocationViewModel::new(self.locations())
  }

  pub fn user_view_model(&self) -> UserViewModel {
    UserViewModel::new(self.users())
  }
}

fn open_session(path: PathBuf, env_token: Option<String>) -> Result<SessionContext> {
  let session = SessionContext::new(path);
  let persisted = session.load().wrap_err("Failed to restore session")?;
  if let Some(token) = env_token {
    debug!("using token from environment");
    let seeded = match persisted {
      Some(s) if s.token == token => s,
      _ => Session::from_token(token),
    };
    session.replace_transient(seeded);
  }
  Ok(session)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::repository::testing::api_for;
  use crate::repository::Resource;
  use httpmock::prelude::*;
  use serde_json::json;

  #[tokio::test]
  async fn repositories_share_one_cache() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(GET).path("/api/municipalidades/1");
        then.status(200).json_body(json!({
          "id": 1, "nombre": "Puno", "departamento": "Puno", "provincia": "Puno", "distrito": "Puno"
        }));
      })
      .await;

    let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let ctx = AppContext::with_parts(api_for(&server), storage, FetchPolicy::NetworkFirst);

    let vm = ctx.municipality_view_model();
    vm.load_by_id(1);
    assert!(vm.detail.settled().await.is_some_and(|s| s.is_success()));

    // A second repository instance sees the row through the shared storage
    let offline = AppContext::with_parts(
      crate::repository::testing::unreachable_api(),
      Arc::clone(ctx.cache.storage()),
      FetchPolicy::NetworkFirst,
    );
    let vm = offline.municipality_view_model();
    vm.load_by_id(1);
    match vm.detail.settled().await {
      Some(Resource::Success(m)) => assert_eq!(m.name, "Puno"),
      other => panic!("expected cached municipality, got {:?}", other),
    }
  }

  #[test]
  fn new_opens_file_backed_parts() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!(
      "api:\n  base_url: http://127.0.0.1:9/api\ncache:\n  path: {}\nsession:\n  path: {}\n",
      dir.path().join("cache.db").display(),
      dir.path().join("session.json").display(),
    );
    let config = Config::parse(&yaml).unwrap();
    let ctx = AppContext::new(&config).unwrap();
    assert!(dir.path().join("cache.db").exists());
    assert_eq!(ctx.api().base_url().as_str(), "http://127.0.0.1:9/api/");
  }

  #[test]
  fn env_token_is_not_written_to_the_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let persisted = Session {
      user_id: Some(7),
      username: Some("ana".to_string()),
      roles: vec!["ROLE_EMPRENDEDOR".to_string()],
      ..Session::from_token("guardado")
    };
    SessionContext::new(path.clone()).set(persisted.clone()).unwrap();
    let before = std::fs::read(&path).unwrap();

    let session = open_session(path.clone(), Some("del-entorno".to_string())).unwrap();
    assert_eq!(session.bearer().as_deref(), Some("Bearer del-entorno"));
    assert_eq!(std::fs::read(&path).unwrap(), before);

    // Without the variable the next run is back on the persisted login
    let session = open_session(path.clone(), None).unwrap();
    assert_eq!(session.current(), Some(persisted.clone()));

    // The same token keeps the persisted user details
    let session = open_session(path, Some("guardado".to_string())).unwrap();
    assert_eq!(session.current(), Some(persisted));
  }
}
