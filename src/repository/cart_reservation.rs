use tracing::info;

use super::{observe, segment, ResourceStream};
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{
  CancellationRequest, CartReservation, CartReservationStatus, CheckoutRequest, ReservationStats,
};

/// Reservations created by checking out the cart.
#[derive(Clone)]
pub struct CartReservationRepository {
  api: ApiClient,
}

impl CartReservationRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn checkout(&self, request: CheckoutRequest) -> ResourceStream<CartReservation> {
    let api = self.api.clone();
    observe(async move {
      if request.people == 0 {
        return Err(Error::InvalidInput(
          "La reserva debe incluir al menos una persona".to_string(),
        ));
      }
      if request.end_date < request.start_date {
        return Err(Error::InvalidInput(format!(
          "La fecha de fin ({}) es anterior a la de inicio ({})",
          request.end_date, request.start_date
        )));
      }
      let reservation: CartReservation = api.post("reservas-carrito/crear", &request).await?;
      info!(id = reservation.id, code = %reservation.code, "cart checked out");
      Ok(reservation)
    })
  }

  pub fn mine(&self) -> ResourceStream<Vec<CartReservation>> {
    let api = self.api.clone();
    observe(async move { api.get("reservas-carrito/mis-reservas").await })
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<CartReservation> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("reservas-carrito/{}", id)).await })
  }

  pub fn get_by_code(&self, code: &str) -> ResourceStream<CartReservation> {
    let api = self.api.clone();
    let path = format!("reservas-carrito/codigo/{}", segment(code));
    observe(async move { api.get(&path).await })
  }

  pub fn by_status(&self, status: CartReservationStatus) -> ResourceStream<Vec<CartReservation>> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("reservas-carrito/estado/{}", status)).await })
  }

  pub fn stats(&self) -> ResourceStream<ReservationStats> {
    let api = self.api.clone();
    observe(async move { api.get("reservas-carrito/estadisticas").await })
  }

  /// Reservations containing services of the logged-in entrepreneur
  pub fn for_entrepreneur(&self) -> ResourceStream<Vec<CartReservation>> {
    let api = self.api.clone();
    observe(async move { api.get("reservas-carrito/emprendedor/reservas").await })
  }

  pub fn confirm(&self, id: i64) -> ResourceStream<CartReservation> {
    let api = self.api.clone();
    observe(async move {
      let reservation: CartReservation =
        api.patch(&format!("reservas-carrito/{}/confirmar", id)).await?;
      info!(id, "cart reservation confirmed");
      Ok(reservation)
    })
  }

  pub fn complete(&self, id: i64) -> ResourceStream<CartReservation> {
    let api = self.api.clone();
    observe(async move {
      let reservation: CartReservation =
        api.patch(&format!("reservas-carrito/{}/completar", id)).await?;
      info!(id, "cart reservation completed");
      Ok(reservation)
    })
  }

  pub fn cancel(&self, id: i64, reason: &str) -> ResourceStream<CartReservation> {
    let api = self.api.clone();
    let body = CancellationRequest {
      reason: reason.to_string(),
    };
    observe(async move {
      let reservation: CartReservation = api
        .patch_json(&format!("reservas-carrito/{}/cancelar", id), &body)
        .await?;
      info!(id, "cart reservation cancelled");
      Ok(reservation)
    })
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

  #[tokio::test]
  async fn cancel_sends_reason_in_body() {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when
          .method(PATCH)
          .path("/api/reservas-carrito/12/cancelar")
          .json_body(json!({ "motivo": "Clima" }));
        then.status(409).json_body(json!({ "mensaje": "La reserva ya fue cancelada" }));
      })
      .await;

    let repo = CartReservationRepository::new(api_for(&server));
    let states: Vec<_> = repo.cancel(12, "Clima").collect().await;

    assert_eq!(
      states[1],
      Resource::Error("La reserva ya fue cancelada".to_string())
    );
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn stats_decode() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(GET).path("/api/reservas-carrito/estadisticas");
        then.status(200).json_body(json!({
          "totalReservas": 4,
          "reservasPendientes": 1,
          "reservasConfirmadas": 1,
          "reservasCompletadas": 2,
          "reservasCanceladas": 0,
          "montoTotalGastado": 350.5
        }));
      })
      .await;

    let repo = CartReservationRepository::new(api_for(&server));
    let states: Vec<_> = repo.stats().collect().await;

    let stats = states[1].data().unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.total_spent, 350.5);
  }

  #[tokio::test]
  async fn checkout_rejects_inverted_dates() {
    let repo = CartReservationRepository::new(unreachable_api());
    let request = CheckoutRequest {
      start_date: "2025-03-10".to_string(),
      end_date: "2025-03-08".to_string(),
      people: 2,
      payment_method: None,
      notes: None,
    };
    let states: Vec<_> = repo.checkout(request).collect().await;
    assert!(states[1].is_error());
  }
}
