use tracing::info;

use super::{observe, segment, ResourceStream};
use crate::api::ApiClient;
use crate::models::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
  All,
  /// Users not yet linked to an entrepreneur
  WithoutEntrepreneur,
  WithRole(String),
}

impl UserQuery {
  fn path(&self) -> String {
    match self {
      Self::All => "usuarios".to_string(),
      Self::WithoutEntrepreneur => "usuarios/sin-emprendedor".to_string(),
      Self::WithRole(role) => format!("usuarios/con-rol/{}", segment(role)),
    }
  }
}

/// Administrative user management. Assignment endpoints answer with a plain
/// confirmation text.
#[derive(Clone)]
pub struct UserRepository {
  api: ApiClient,
}

impl UserRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn list(&self, query: UserQuery) -> ResourceStream<Vec<User>> {
    let api = self.api.clone();
    observe(async move { api.get(&query.path()).await })
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<User> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("usuarios/{}", id)).await })
  }

  pub fn assign_role(&self, user_id: i64, role: &str) -> ResourceStream<String> {
    self.put_text(format!("usuarios/{}/asignar-rol/{}", user_id, segment(role)))
  }

  pub fn remove_role(&self, user_id: i64, role: &str) -> ResourceStream<String> {
    self.put_text(format!("usuarios/{}/quitar-rol/{}", user_id, segment(role)))
  }

  pub fn reset_roles(&self, user_id: i64) -> ResourceStream<String> {
    self.put_text(format!("usuarios/{}/resetear-roles", user_id))
  }

  pub fn assign_entrepreneur(&self, user_id: i64, entrepreneur_id: i64) -> ResourceStream<String> {
    self.put_text(format!(
      "usuarios/{}/asignar-emprendedor/{}",
      user_id, entrepreneur_id
    ))
  }

  pub fn change_entrepreneur(&self, user_id: i64, entrepreneur_id: i64) -> ResourceStream<String> {
    self.put_text(format!(
      "usuarios/{}/cambiar-emprendedor/{}",
      user_id, entrepreneur_id
    ))
  }

  pub fn unassign_entrepreneur(&self, user_id: i64) -> ResourceStream<String> {
    let api = self.api.clone();
    observe(async move {
      let text = api
        .delete_text(&format!("usuarios/{}/desasignar-emprendedor", user_id))
        .await?;
      info!(user_id, "entrepreneur unassigned");
      Ok(text)
    })
  }

  fn put_text(&self, path: String) -> ResourceStream<String> {
    let api = self.api.clone();
    observe(async move {
      let text = api.put_text(&path).await?;
      info!(%path, "user updated");
      Ok(text)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::repository::testing::api_for;
  use crate::repository::Resource;
  use futures::StreamExt;
  use httpmock::prelude::*;

  #[test]
  fn role_query_path() {
    assert_eq!(
      UserQuery::WithRole("ROLE_ADMIN".to_string()).path(),
      "usuarios/con-rol/ROLE_ADMIN"
    );
  }

  #[tokio::test]
  async fn assign_role_returns_confirmation_text() {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when.method(PUT).path("/api/usuarios/4/asignar-rol/ROLE_EMPRENDEDOR");
        then.status(200).body("Rol asignado correctamente");
      })
      .await;

    let repo = UserRepository::new(api_for(&server));
    let states: Vec<_> = repo.assign_role(4, "ROLE_EMPRENDEDOR").collect().await;

    assert_eq!(
      states[1],
      Resource::Success("Rol asignado correctamente".to_string())
    );
    mock.assert_async().await;
  }
}
