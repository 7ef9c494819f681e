use super::LastQuery;
use crate::models::{
  Category, CategoryRequest, PlanStatus, ServiceStatus, TourPlan, TourPlanRequest, TouristService,
  TouristServiceRequest,
};
use crate::repository::{
  CategoryRepository, PlanQuery, PlanRepository, ServiceQuery, ServiceRepository,
};
use crate::state::StateSlot;

#[derive(Clone)]
pub struct CategoryViewModel {
  repo: CategoryRepository,
  pub list: StateSlot<Vec<Category>>,
  pub detail: StateSlot<Category>,
  pub create: StateSlot<Category>,
  pub update: StateSlot<Category>,
  pub delete: StateSlot<()>,
}

impl CategoryViewModel {
  pub fn new(repo: CategoryRepository) -> Self {
    Self {
      repo,
      list: StateSlot::new(),
      detail: StateSlot::new(),
      create: StateSlot::new(),
      update: StateSlot::new(),
      delete: StateSlot::new(),
    }
  }

  pub fn load(&self) {
    self.list.launch(self.repo.get_all());
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn create(&self, request: CategoryRequest) {
    self.create.launch(self.repo.create(request));
  }

  pub fn update(&self, id: i64, request: CategoryRequest) {
    self.update.launch(self.repo.update(id, request));
  }

  pub fn delete(&self, id: i64) {
    let vm = self.clone();
    self.delete.launch_then(self.repo.delete(id), move |_| vm.load());
  }

  pub fn clear_operations(&self) {
    self.create.clear();
    self.update.clear();
    self.delete.clear();
  }
}

#[derive(Clone)]
pub struct ServiceViewModel {
  repo: ServiceRepository,
  query: LastQuery<ServiceQuery>,
  pub list: StateSlot<Vec<TouristService>>,
  pub detail: StateSlot<TouristService>,
  pub create: StateSlot<TouristService>,
  pub update: StateSlot<TouristService>,
  pub delete: StateSlot<()>,
  pub status: StateSlot<TouristService>,
}

impl ServiceViewModel {
  pub fn new(repo: ServiceRepository) -> Self {
    Self {
      repo,
      query: LastQuery::new(ServiceQuery::All),
      list: StateSlot::new(),
      detail: StateSlot::new(),
      create: StateSlot::new(),
      update: StateSlot::new(),
      delete: StateSlot::new(),
      status: StateSlot::new(),
    }
  }

  pub fn load(&self, query: ServiceQuery) {
    self.query.set(query.clone());
    self.list.launch(self.repo.list(query));
  }

  pub fn reload(&self) {
    self.list.launch(self.repo.list(self.query.get()));
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn create(&self, request: TouristServiceRequest) {
    self.create.launch(self.repo.create(request));
  }

  pub fn update(&self, id: i64, request: TouristServiceRequest) {
    self.update.launch(self.repo.update(id, request));
  }

  pub fn delete(&self, id: i64) {
    let vm = self.clone();
    self.delete.launch_then(self.repo.delete(id), move |_| vm.reload());
  }

  pub fn change_status(&self, id: i64, status: ServiceStatus) {
    let vm = self.clone();
    self
      .status
      .launch_then(self.repo.change_status(id, status), move |_| vm.reload());
  }

  pub fn clear_operations(&self) {
    self.create.clear();
    self.update.clear();
    self.delete.clear();
    self.status.clear();
  }
}

#[derive(Clone)]
pub struct PlanViewModel {
  repo: PlanRepository,
  query: LastQuery<PlanQuery>,
  pub list: StateSlot<Vec<TourPlan>>,
  pub detail: StateSlot<TourPlan>,
  pub create: StateSlot<TourPlan>,
  pub update: StateSlot<TourPlan>,
  pub delete: StateSlot<()>,
  pub status: StateSlot<TourPlan>,
}

impl PlanViewModel {
  pub fn new(repo: PlanRepository) -> Self {
    Self {
      repo,
      query: LastQuery::new(PlanQuery::All),
      list: StateSlot::new(),
      detail: StateSlot::new(),
      create: StateSlot::new(),
      update: StateSlot::new(),
      delete: StateSlot::new(),
      status: StateSlot::new(),
    }
  }

  pub fn load(&self, query: PlanQuery) {
    self.query.set(query.clone());
    self.list.launch(self.repo.list(query));
  }

  pub fn reload(&self) {
    self.list.launch(self.repo.list(self.query.get()));
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn create(&self, request: TourPlanRequest) {
    self.create.launch(self.repo.create(request));
  }

  pub fn update(&self, id: i64, request: TourPlanRequest) {
    self.update.launch(self.repo.update(id, request));
  }

  pub fn delete(&self, id: i64) {
    let vm = self.clone();
    self.delete.launch_then(self.repo.delete(id), move |_| vm.reload());
  }

  pub fn change_status(&self, id: i64, status: PlanStatus) {
    let vm = self.clone();
    self
      .status
      .launch_then(self.repo.change_status(id, status), move |_| vm.reload());
  }

  pub fn clear_operations(&self) {
    self.create.clear();
    self.update.clear();
    self.delete.clear();
    self.status.clear();
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
  async fn invalid_query_is_remembered_but_fails() {
    let server = MockServer::start_async().await;
    let vm = PlanViewModel::new(PlanRepository::new(api_for(&server)));

    vm.load(PlanQuery::Search("  ".to_string()));
    assert_eq!(
      vm.list.settled().await,
      Some(Resource::Error(
        "El término de búsqueda no puede estar vacío".to_string()
      ))
    );
    assert_eq!(vm.query.get(), PlanQuery::Search("  ".to_string()));
  }

  #[tokio::test]
  async fn status_change_reloads_list() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when
          .method(PATCH)
          .path("/api/servicios/3/estado")
          .query_param("estado", "AGOTADO");
        then.status(200).json_body(json!({
          "id": 3,
          "nombre": "Kayak en el lago",
          "precio": 40.0,
          "tipo": "AVENTURA",
          "estado": "AGOTADO",
          "emprendedor": {
            "id": 1,
            "nombreEmpresa": "Titicaca Aventura",
            "rubro": "Turismo",
            "municipalidad": { "id": 1, "nombre": "Puno", "distrito": "Puno" }
          }
        }));
      })
      .await;
    let list = server
      .mock_async(|when, then| {
        when.method(GET).path("/api/servicios/estado/ACTIVO");
        then.status(200).json_body(json!([]));
      })
      .await;

    let vm = ServiceViewModel::new(ServiceRepository::new(api_for(&server)));
    vm.query.set(ServiceQuery::Status(ServiceStatus::Active));
    vm.change_status(3, ServiceStatus::SoldOut);

    let status = vm.status.settled().await;
    assert!(status.is_some_and(|s| s.is_success()));
    assert_eq!(vm.list.settled().await, Some(Resource::Success(vec![])));
    list.assert_async().await;
  }
}
