use super::LastQuery;
use crate::models::{Payment, PaymentRequest, Reservation, ReservationRequest};
use crate::repository::{PaymentQuery, PaymentRepository, ReservationQuery, ReservationRepository};
use crate::state::StateSlot;

#[derive(Clone)]
pub struct ReservationViewModel {
  repo: ReservationRepository,
  query: LastQuery<ReservationQuery>,
  pub list: StateSlot<Vec<Reservation>>,
  pub detail: StateSlot<Reservation>,
  pub create: StateSlot<Reservation>,
  /// Confirm, cancel and complete share one slot
  pub status: StateSlot<Reservation>,
}

impl ReservationViewModel {
  pub fn new(repo: ReservationRepository) -> Self {
    Self {
      repo,
      query: LastQuery::new(ReservationQuery::Mine),
      list: StateSlot::new(),
      detail: StateSlot::new(),
      create: StateSlot::new(),
      status: StateSlot::new(),
    }
  }

  pub fn load(&self, query: ReservationQuery) {
    self.query.set(query.clone());
    self.list.launch(self.repo.list(query));
  }

  pub fn reload(&self) {
    self.list.launch(self.repo.list(self.query.get()));
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn load_by_code(&self, code: &str) {
    self.detail.launch(self.repo.get_by_code(code));
  }

  pub fn create(&self, request: ReservationRequest) {
    self.create.launch(self.repo.create(request));
  }

  pub fn confirm(&self, id: i64) {
    let vm = self.clone();
    self.status.launch_then(self.repo.confirm(id), move |_| vm.reload());
  }

  pub fn cancel(&self, id: i64, reason: &str) {
    let vm = self.clone();
    self
      .status
      .launch_then(self.repo.cancel(id, reason), move |_| vm.reload());
  }

  pub fn complete(&self, id: i64) {
    let vm = self.clone();
    self.status.launch_then(self.repo.complete(id), move |_| vm.reload());
  }

  pub fn clear_operations(&self) {
    self.create.clear();
    self.status.clear();
  }
}

#[derive(Clone)]
pub struct PaymentViewModel {
  repo: PaymentRepository,
  query: LastQuery<PaymentQuery>,
  pub list: StateSlot<Vec<Payment>>,
  pub detail: StateSlot<Payment>,
  pub register: StateSlot<Payment>,
  /// Confirm and reject share one slot
  pub status: StateSlot<Payment>,
}

impl PaymentViewModel {
  pub fn new(repo: PaymentRepository) -> Self {
    Self {
      repo,
      query: LastQuery::new(PaymentQuery::Mine),
      list: StateSlot::new(),
      detail: StateSlot::new(),
      register: StateSlot::new(),
      status: StateSlot::new(),
    }
  }

  pub fn load(&self, query: PaymentQuery) {
    self.query.set(query.clone());
    self.list.launch(self.repo.list(query));
  }

  pub fn reload(&self) {
    self.list.launch(self.repo.list(self.query.get()));
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn load_by_code(&self, code: &str) {
    self.detail.launch(self.repo.get_by_code(code));
  }

  pub fn register(&self, request: PaymentRequest) {
    self.register.launch(self.repo.register(request));
  }

  pub fn confirm(&self, id: i64) {
    let vm = self.clone();
    self.status.launch_then(self.repo.confirm(id), move |_| vm.reload());
  }

  pub fn reject(&self, id: i64, reason: &str) {
    let vm = self.clone();
    self
      .status
      .launch_then(self.repo.reject(id, reason), move |_| vm.reload());
  }

  pub fn clear_operations(&self) {
    self.register.clear();
    self.status.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::repository::testing::api_for;
  use crate::repository::Resource;
  use httpmock::prelude::*;

  #[tokio::test]
  async fn failed_cancel_keeps_list_untouched() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(PATCH).path("/api/reservas/4/cancelar");
        then.status(400).body("No se puede cancelar");
      })
      .await;
    let list = server
      .mock_async(|when, then| {
        when.method(GET).path("/api/reservas/mis-reservas");
        then.status(200).body("[]");
      })
      .await;

    let vm = ReservationViewModel::new(ReservationRepository::new(api_for(&server)));
    vm.cancel(4, "Viaje pospuesto");

    assert_eq!(
      vm.status.settled().await,
      Some(Resource::Error("No se puede cancelar".to_string()))
    );
    assert_eq!(vm.list.get(), None);
    assert_eq!(list.hits_async().await, 0);
  }
}
