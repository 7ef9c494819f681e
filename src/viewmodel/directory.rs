use super::LastQuery;
use crate::models::{Entrepreneur, EntrepreneurRequest, Municipality, MunicipalityRequest};
use crate::repository::{
  EntrepreneurQuery, EntrepreneurRepository, MunicipalityQuery, MunicipalityRepository,
};
use crate::state::StateSlot;

#[derive(Clone)]
pub struct MunicipalityViewModel {
  repo: MunicipalityRepository,
  query: LastQuery<MunicipalityQuery>,
  pub list: StateSlot<Vec<Municipality>>,
  pub detail: StateSlot<Municipality>,
  pub mine: StateSlot<Municipality>,
  pub create: StateSlot<Municipality>,
  pub update: StateSlot<Municipality>,
  pub delete: StateSlot<()>,
}

impl MunicipalityViewModel {
  pub fn new(repo: MunicipalityRepository) -> Self {
    Self {
      repo,
      query: LastQuery::new(MunicipalityQuery::All),
      list: StateSlot::new(),
      detail: StateSlot::new(),
      mine: StateSlot::new(),
      create: StateSlot::new(),
      update: StateSlot::new(),
      delete: StateSlot::new(),
    }
  }

  pub fn load(&self, query: MunicipalityQuery) {
    self.query.set(query.clone());
    self.list.launch(self.repo.list(query));
  }

  /// Re-issue the last list query.
  pub fn reload(&self) {
    self.list.launch(self.repo.list(self.query.get()));
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn load_mine(&self) {
    self.mine.launch(self.repo.mine());
  }

  pub fn create(&self, request: MunicipalityRequest) {
    self.create.launch(self.repo.create(request));
  }

  pub fn update(&self, id: i64, request: MunicipalityRequest) {
    self.update.launch(self.repo.update(id, request));
  }

  pub fn delete(&self, id: i64) {
    let vm = self.clone();
    self.delete.launch_then(self.repo.delete(id), move |_| vm.reload());
  }

  pub fn clear_operations(&self) {
    self.create.clear();
    self.update.clear();
    self.delete.clear();
  }
}

#[derive(Clone)]
pub struct EntrepreneurViewModel {
  repo: EntrepreneurRepository,
  query: LastQuery<EntrepreneurQuery>,
  pub list: StateSlot<Vec<Entrepreneur>>,
  pub detail: StateSlot<Entrepreneur>,
  pub mine: StateSlot<Entrepreneur>,
  pub create: StateSlot<Entrepreneur>,
  pub update: StateSlot<Entrepreneur>,
  pub delete: StateSlot<()>,
}

impl EntrepreneurViewModel {
  pub fn new(repo: EntrepreneurRepository) -> Self {
    Self {
      repo,
      query: LastQuery::new(EntrepreneurQuery::All),
      list: StateSlot::new(),
      detail: StateSlot::new(),
      mine: StateSlot::new(),
      create: StateSlot::new(),
      update: StateSlot::new(),
      delete: StateSlot::new(),
    }
  }

  pub fn load(&self, query: EntrepreneurQuery) {
    self.query.set(query.clone());
    self.list.launch(self.repo.list(query));
  }

  pub fn reload(&self) {
    self.list.launch(self.repo.list(self.query.get()));
  }

  pub fn load_nearby(&self, latitude: f64, longitude: f64, radius_km: f64) {
    self.load(EntrepreneurQuery::Nearby {
      latitude,
      longitude,
      radius_km,
    });
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn load_mine(&self) {
    self.mine.launch(self.repo.mine());
  }

  pub fn create(&self, request: EntrepreneurRequest) {
    self.create.launch(self.repo.create(request));
  }

  pub fn update(&self, id: i64, request: EntrepreneurRequest) {
    self.update.launch(self.repo.update(id, request));
  }

  pub fn delete(&self, id: i64) {
    let vm = self.clone();
    self.delete.launch_then(self.repo.delete(id), move |_| vm.reload());
  }

  pub fn clear_operations(&self) {
    self.create.clear();
    self.update.clear();
    self.delete.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{CacheLayer, SqliteStorage};
  use crate::repository::testing::api_for;
  use crate::repository::Resource;
  use httpmock::prelude::*;
  use serde_json::json;

  fn municipality(id: i64, name: &str) -> serde_json::Value {
    json!({
      "id": id,
      "nombre": name,
      "departamento": "Puno",
      "provincia": "Puno",
      "distrito": name,
      "emprendedores": []
    })
  }

  fn view_model(server: &MockServer) -> MunicipalityViewModel {
    let cache = CacheLayer::new(SqliteStorage::open_in_memory().unwrap());
    MunicipalityViewModel::new(MunicipalityRepository::new(api_for(server), cache))
  }

  #[tokio::test]
  async fn delete_reloads_last_query() {
    let server = MockServer::start_async().await;
    let mut first_list = server
      .mock_async(|when, then| {
        when.method(GET).path("/api/municipalidades/departamento/Puno");
        then
          .status(200)
          .json_body(json!([municipality(1, "Capachica"), municipality(2, "Chucuito")]));
      })
      .await;
    server
      .mock_async(|when, then| {
        when.method(DELETE).path("/api/municipalidades/2");
        then.status(204);
      })
      .await;

    let vm = view_model(&server);
    vm.load(MunicipalityQuery::Department("Puno".to_string()));
    let loaded = vm.list.settled().await.and_then(Resource::into_data).unwrap();
    assert_eq!(loaded.len(), 2);

    first_list.delete_async().await;
    let reload = server
      .mock_async(|when, then| {
        when.method(GET).path("/api/municipalidades/departamento/Puno");
        then.status(200).json_body(json!([municipality(1, "Capachica")]));
      })
      .await;

    vm.delete(2);
    assert_eq!(vm.delete.settled().await, Some(Resource::Success(())));
    // The reload was launched before the delete result became visible
    let reloaded = vm.list.settled().await.and_then(Resource::into_data).unwrap();
    assert_eq!(reloaded.len(), 1);
    reload.assert_async().await;
  }

  #[tokio::test]
  async fn failed_delete_does_not_reload() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(DELETE).path("/api/municipalidades/9");
        then.status(404).json_body(json!({ "message": "Municipalidad no encontrada" }));
      })
      .await;

    let vm = view_model(&server);
    vm.delete(9);
    assert_eq!(
      vm.delete.settled().await,
      Some(Resource::Error("Municipalidad no encontrada".to_string()))
    );
    assert_eq!(vm.list.get(), None);

    vm.clear_operations();
    assert_eq!(vm.delete.get(), None);
  }
}
