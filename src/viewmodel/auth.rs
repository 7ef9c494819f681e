use crate::models::{AuthResponse, RegisterRequest};
use crate::repository::AuthRepository;
use crate::session::Session;
use crate::state::StateSlot;

#[derive(Clone)]
pub struct AuthViewModel {
  repo: AuthRepository,
  pub login: StateSlot<AuthResponse>,
  pub register: StateSlot<AuthResponse>,
  pub logout: StateSlot<()>,
}

impl AuthViewModel {
  pub fn new(repo: AuthRepository) -> Self {
    Self {
      repo,
      login: StateSlot::new(),
      register: StateSlot::new(),
      logout: StateSlot::new(),
    }
  }

  pub fn login(&self, username: &str, password: &str) {
    self.login.launch(self.repo.login(username, password));
  }

  pub fn register(&self, request: RegisterRequest) {
    self.register.launch(self.repo.register(request));
  }

  /// Forget the session; login and register results are reset once it
  /// succeeds.
  pub fn logout(&self) {
    let login = self.login.clone();
    let register = self.register.clone();
    self.logout.launch_then(self.repo.logout(), move |_| {
      login.clear();
      register.clear();
    });
  }

  pub fn current(&self) -> Option<Session> {
    self.repo.current()
  }

  pub fn is_logged_in(&self) -> bool {
    self.repo.is_logged_in()
  }

  pub fn clear_operations(&self) {
    self.login.clear();
    self.register.clear();
    self.logout.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::repository::testing::api_for;
  use crate::repository::Resource;
  use httpmock::prelude::*;
  use serde_json::json;

  #[tokio::test]
  async fn login_then_logout_resets_state() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path("/api/auth/login");
        then.status(200).json_body(json!({
          "token": "abc",
          "id": 3,
          "username": "ana",
          "email": "ana@puno.pe",
          "roles": ["ROLE_USER"]
        }));
      })
      .await;

    let vm = AuthViewModel::new(AuthRepository::new(api_for(&server)));
    vm.login("ana", "secreto");
    let state = vm.login.settled().await;
    assert!(state.is_some_and(|s| s.is_success()));
    assert!(vm.is_logged_in());

    vm.logout();
    assert_eq!(vm.logout.settled().await, Some(Resource::Success(())));
    assert!(!vm.is_logged_in());
    assert_eq!(vm.login.get(), None);
  }
}
