use tracing::info;

use super::{observe, ResourceStream};
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{Cart, CartCount, CartItemRequest, CartTotal};

/// The logged-in user's shopping cart. Every mutation answers with the
/// updated cart.
#[derive(Clone)]
pub struct CartRepository {
  api: ApiClient,
}

impl CartRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn get(&self) -> ResourceStream<Cart> {
    let api = self.api.clone();
    observe(async move { api.get("carrito").await })
  }

  pub fn add(&self, request: CartItemRequest) -> ResourceStream<Cart> {
    let api = self.api.clone();
    observe(async move {
      if request.quantity == 0 {
        return Err(Error::InvalidInput(
          "La cantidad debe ser al menos 1".to_string(),
        ));
      }
      let cart: Cart = api.post("carrito/agregar", &request).await?;
      info!(service_id = request.service_id, items = cart.total_items, "cart item added");
      Ok(cart)
    })
  }

  pub fn set_quantity(&self, item_id: i64, quantity: u32) -> ResourceStream<Cart> {
    let api = self.api.clone();
    observe(async move {
      if quantity == 0 {
        return Err(Error::InvalidInput(
          "La cantidad debe ser al menos 1".to_string(),
        ));
      }
      let path = format!("carrito/item/{}", item_id);
      let cart: Cart = api
        .put_with(&path, &[("cantidad", quantity)])
        .await?;
      Ok(cart)
    })
  }

  pub fn remove(&self, item_id: i64) -> ResourceStream<Cart> {
    let api = self.api.clone();
    observe(async move {
      let cart: Cart = api.delete_json(&format!("carrito/item/{}", item_id)).await?;
      info!(item_id, "cart item removed");
      Ok(cart)
    })
  }

  pub fn clear(&self) -> ResourceStream<Cart> {
    let api = self.api.clone();
    observe(async move {
      let cart: Cart = api.delete_json("carrito/limpiar").await?;
      info!("cart cleared");
      Ok(cart)
    })
  }

  pub fn total(&self) -> ResourceStream<CartTotal> {
    let api = self.api.clone();
    observe(async move { api.get("carrito/total").await })
  }

  pub fn count(&self) -> ResourceStream<CartCount> {
    let api = self.api.clone();
    observe(async move { api.get("carrito/contar").await })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::repository::testing::{api_for, unreachable_api};
  use crate::repository::Resource;
  use futures::StreamExt;
  use httpmock::prelude::*;
  use serde_json::json;

  fn empty_cart() -> serde_json::Value {
    json!({
      "id": 1,
      "usuarioId": 7,
      "totalCarrito": 0.0,
      "totalItems": 0,
      "items": []
    })
  }

  #[tokio::test]
  async fn set_quantity_sends_query_param() {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when
          .method(PUT)
          .path("/api/carrito/item/3")
          .query_param("cantidad", "2");
        then.status(200).json_body(empty_cart());
      })
      .await;

    let repo = CartRepository::new(api_for(&server));
    let states: Vec<_> = repo.set_quantity(3, 2).collect().await;

    assert!(states[1].is_success());
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn clear_returns_updated_cart() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(DELETE).path("/api/carrito/limpiar");
        then.status(200).json_body(empty_cart());
      })
      .await;

    let repo = CartRepository::new(api_for(&server));
    let states: Vec<_> = repo.clear().collect().await;

    let cart = states[1].data().unwrap();
    assert_eq!(cart.total_items, 0);
    assert!(cart.items.is_empty());
  }

  #[tokio::test]
  async fn zero_quantity_is_rejected_locally() {
    let repo = CartRepository::new(unreachable_api());
    let states: Vec<_> = repo.set_quantity(3, 0).collect().await;
    assert_eq!(
      states[1],
      Resource::Error("La cantidad debe ser al menos 1".to_string())
    );
  }
}
