use crate::models::{
  Cart, CartCount, CartItemRequest, CartReservation, CartReservationStatus, CartTotal,
  CheckoutRequest, ReservationStats,
};
use crate::repository::{CartRepository, CartReservationRepository};
use crate::state::StateSlot;

/// Cart mutations publish the updated cart straight into `cart` and
/// refresh the item counter.
#[derive(Clone)]
pub struct CartViewModel {
  repo: CartRepository,
  pub cart: StateSlot<Cart>,
  pub total: StateSlot<CartTotal>,
  pub count: StateSlot<CartCount>,
}

impl CartViewModel {
  pub fn new(repo: CartRepository) -> Self {
    Self {
      repo,
      cart: StateSlot::new(),
      total: StateSlot::new(),
      count: StateSlot::new(),
    }
  }

  pub fn load(&self) {
    self.cart.launch(self.repo.get());
  }

  pub fn load_total(&self) {
    self.total.launch(self.repo.total());
  }

  pub fn load_count(&self) {
    self.count.launch(self.repo.count());
  }

  pub fn add(&self, request: CartItemRequest) {
    let vm = self.clone();
    self.cart.launch_then(self.repo.add(request), move |_| vm.load_count());
  }

  pub fn set_quantity(&self, item_id: i64, quantity: u32) {
    let vm = self.clone();
    self
      .cart
      .launch_then(self.repo.set_quantity(item_id, quantity), move |_| vm.load_count());
  }

  pub fn remove(&self, item_id: i64) {
    let vm = self.clone();
    self
      .cart
      .launch_then(self.repo.remove(item_id), move |_| vm.load_count());
  }

  pub fn clear(&self) {
    let vm = self.clone();
    self.cart.launch_then(self.repo.clear(), move |_| vm.load_count());
  }
}

#[derive(Clone)]
pub struct CartReservationViewModel {
  repo: CartReservationRepository,
  pub mine: StateSlot<Vec<CartReservation>>,
  pub by_status: StateSlot<Vec<CartReservation>>,
  pub for_entrepreneur: StateSlot<Vec<CartReservation>>,
  pub detail: StateSlot<CartReservation>,
  pub stats: StateSlot<ReservationStats>,
  pub checkout: StateSlot<CartReservation>,
  /// Confirm, complete and cancel share one slot
  pub status: StateSlot<CartReservation>,
}

impl CartReservationViewModel {
  pub fn new(repo: CartReservationRepository) -> Self {
    Self {
      repo,
      mine: StateSlot::new(),
      by_status: StateSlot::new(),
      for_entrepreneur: StateSlot::new(),
      detail: StateSlot::new(),
      stats: StateSlot::new(),
      checkout: StateSlot::new(),
      status: StateSlot::new(),
    }
  }

  pub fn load_mine(&self) {
    self.mine.launch(self.repo.mine());
  }

  pub fn load_by_status(&self, status: CartReservationStatus) {
    self.by_status.launch(self.repo.by_status(status));
  }

  pub fn load_for_entrepreneur(&self) {
    self.for_entrepreneur.launch(self.repo.for_entrepreneur());
  }

  pub fn load_by_id(&self, id: i64) {
    self.detail.launch(self.repo.get_by_id(id));
  }

  pub fn load_by_code(&self, code: &str) {
    self.detail.launch(self.repo.get_by_code(code));
  }

  pub fn load_stats(&self) {
    self.stats.launch(self.repo.stats());
  }

  pub fn checkout(&self, request: CheckoutRequest) {
    let vm = self.clone();
    self
      .checkout
      .launch_then(self.repo.checkout(request), move |_| vm.load_mine());
  }

  pub fn confirm(&self, id: i64) {
    let vm = self.clone();
    self
      .status
      .launch_then(self.repo.confirm(id), move |_| vm.reload_lists());
  }

  pub fn complete(&self, id: i64) {
    let vm = self.clone();
    self
      .status
      .launch_then(self.repo.complete(id), move |_| vm.reload_lists());
  }

  pub fn cancel(&self, id: i64, reason: &str) {
    let vm = self.clone();
    self
      .status
      .launch_then(self.repo.cancel(id, reason), move |_| vm.reload_lists());
  }

  /// Refresh whichever reservation lists have been loaded before.
  fn reload_lists(&self) {
    if self.mine.get().is_some() {
      self.load_mine();
    }
    if self.for_entrepreneur.get().is_some() {
      self.load_for_entrepreneur();
    }
  }

  pub fn clear_operations(&self) {
    self.checkout.clear();
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
  async fn clearing_cart_refreshes_count() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(DELETE).path("/api/carrito/limpiar");
        then.status(200).json_body(json!({
          "id": 1, "usuarioId": 2, "totalCarrito": 0.0, "totalItems": 0, "items": []
        }));
      })
      .await;
    server
      .mock_async(|when, then| {
        when.method(GET).path("/api/carrito/contar");
        then.status(200).json_body(json!({ "cantidadItems": 0 }));
      })
      .await;

    let vm = CartViewModel::new(CartRepository::new(api_for(&server)));
    vm.clear();

    assert!(vm.cart.settled().await.is_some_and(|s| s.is_success()));
    assert_eq!(
      vm.count.settled().await,
      Some(Resource::Success(CartCount { items: 0 }))
    );
  }
}
