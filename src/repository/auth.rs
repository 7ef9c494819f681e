use tracing::info;

use super::{observe, ResourceStream};
use crate::api::ApiClient;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::session::Session;

#[derive(Clone)]
pub struct AuthRepository {
  api: ApiClient,
}

impl AuthRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  /// Log in and make the returned token the active session.
  pub fn login(&self, username: &str, password: &str) -> ResourceStream<AuthResponse> {
    let api = self.api.clone();
    let request = LoginRequest {
      username: username.to_string(),
      password: password.to_string(),
    };
    observe(async move {
      let auth: AuthResponse = api.post("auth/login", &request).await?;
      api.session().set(Session::from(&auth))?;
      info!(user = %auth.username, "logged in");
      Ok(auth)
    })
  }

  /// Register a new account. Registration also logs the user in.
  pub fn register(&self, request: RegisterRequest) -> ResourceStream<AuthResponse> {
    let api = self.api.clone();
    observe(async move {
      let auth: AuthResponse = api.post("auth/register", &request).await?;
      api.session().set(Session::from(&auth))?;
      info!(user = %auth.username, "registered");
      Ok(auth)
    })
  }

  pub fn logout(&self) -> ResourceStream<()> {
    let api = self.api.clone();
    observe(async move {
      api.session().clear()?;
      info!("logged out");
      Ok(())
    })
  }

  pub fn current(&self) -> Option<Session> {
    self.api.session().current()
  }

  pub fn is_logged_in(&self) -> bool {
    self.api.session().is_authenticated()
  }
}
