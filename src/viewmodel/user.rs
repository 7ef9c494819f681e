use super::LastQuery;
use crate::models::User;
use crate::repository::{ResourceStream, UserQuery, UserRepository};
use crate::state::StateSlot;

#[derive(Clone)]
pub struct UserViewModel {
  repo: UserRepository,
  query: LastQuery<UserQuery>,
  pub list: StateSlot<Vec<User>>,
  pub detail: StateSlot<User>,
  /// Confirmation text of the last role or entrepreneur assignment
  pub assignment: StateSlot<String>,
}

impl UserViewModel {
  pub fn new(repo: UserRepository) -> Self {
    Self {
      repo,
      query: LastQuery::new(UserQuery::All),
      list: StateSlot::new(),
      detail: StateSlot::new(),
      assignment: StateSlot::new(),
    }
  }

  pub fn load(&self, query: UserQuery) {
    self.query.set(query.clone());
    self.list.launch(self.repo.list(query));
  }

  pub fn reload(&self) {
    self.list.launch(self.repo.list(self.query.get()));
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn assign_role(&self, user_id: i64, role: &str) {
    self.assign(self.repo.assign_role(user_id, role));
  }

  pub fn remove_role(&self, user_id: i64, role: &str) {
    self.assign(self.repo.remove_role(user_id, role));
  }

  pub fn reset_roles(&self, user_id: i64) {
    self.assign(self.repo.reset_roles(user_id));
  }

  pub fn assign_entrepreneur(&self, user_id: i64, entrepreneur_id: i64) {
    self.assign(self.repo.assign_entrepreneur(user_id, entrepreneur_id));
  }

  pub fn change_entrepreneur(&self, user_id: i64, entrepreneur_id: i64) {
    self.assign(self.repo.change_entrepreneur(user_id, entrepreneur_id));
  }

  pub fn unassign_entrepreneur(&self, user_id: i64) {
    self.assign(self.repo.unassign_entrepreneur(user_id));
  }

  fn assign(&self, stream: ResourceStream<String>) {
    let vm = self.clone();
    self.assignment.launch_then(stream, move |_| {
      if vm.list.get().is_some() {
        vm.reload();
      }
    });
  }

  pub fn clear_operations(&self) {
    self.assignment.clear();
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
  async fn assignment_reloads_loaded_list() {
    let server = MockServer::start_async().await;
    let list = server
      .mock_async(|when, then| {
        when.method(GET).path("/api/usuarios/sin-emprendedor");
        then.status(200).json_body(json!([]));
      })
      .await;
    server
      .mock_async(|when, then| {
        when.method(PUT).path("/api/usuarios/8/asignar-emprendedor/3");
        then.status(200).body("Usuario asignado");
      })
      .await;

    let vm = UserViewModel::new(UserRepository::new(api_for(&server)));
    vm.load(UserQuery::WithoutEntrepreneur);
    vm.list.settled().await;

    vm.assign_entrepreneur(8, 3);
    assert_eq!(
      vm.assignment.settled().await,
      Some(Resource::Success("Usuario asignado".to_string()))
    );
    vm.list.settled().await;
    list.assert_hits_async(2).await;
  }
}
