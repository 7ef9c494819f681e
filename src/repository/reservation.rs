use tracing::info;

use super::{observe, segment, ResourceStream};
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{Reservation, ReservationRequest};

/// Remote list queries for plan reservations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationQuery {
  All,
  Mine,
  Plan(i64),
  Municipality(i64),
}

impl ReservationQuery {
  fn path(&self) -> String {
    match self {
      Self::All => "reservas".to_string(),
      Self::Mine => "reservas/mis-reservas".to_string(),
      Self::Plan(id) => format!("reservas/plan/{}", id),
      Self::Municipality(id) => format!("reservas/municipalidad/{}", id),
    }
  }
}

#[derive(Clone)]
pub struct ReservationRepository {
  api: ApiClient,
}

impl ReservationRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn list(&self, query: ReservationQuery) -> ResourceStream<Vec<Reservation>> {
    let api = self.api.clone();
    observe(async move { api.get(&query.path()).await })
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<Reservation> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("reservas/{}", id)).await })
  }

  pub fn get_by_code(&self, code: &str) -> ResourceStream<Reservation> {
    let api = self.api.clone();
    let path = format!("reservas/codigo/{}", segment(code));
    observe(async move { api.get(&path).await })
  }

  pub fn create(&self, request: ReservationRequest) -> ResourceStream<Reservation> {
    let api = self.api.clone();
    observe(async move {
      if request.people == 0 {
        return Err(Error::InvalidInput(
          "La reserva debe incluir al menos una persona".to_string(),
        ));
      }
      let created: Reservation = api.post("reservas", &request).await?;
      info!(id = created.id, code = %created.code, "reservation created");
      Ok(created)
    })
  }

  pub fn confirm(&self, id: i64) -> ResourceStream<Reservation> {
    let api = self.api.clone();
    observe(async move {
      let reservation: Reservation = api.patch(&format!("reservas/{}/confirmar", id)).await?;
      info!(id, "reservation confirmed");
      Ok(reservation)
    })
  }

  pub fn cancel(&self, id: i64, reason: &str) -> ResourceStream<Reservation> {
    let api = self.api.clone();
    let reason = reason.to_string();
    observe(async move {
      let reservation: Reservation = api
        .patch_with(&format!("reservas/{}/cancelar", id), &[("motivo", reason)])
        .await?;
      info!(id, "reservation cancelled");
      Ok(reservation)
    })
  }

  pub fn complete(&self, id: i64) -> ResourceStream<Reservation> {
    let api = self.api.clone();
    observe(async move {
      let reservation: Reservation = api.patch(&format!("reservas/{}/completar", id)).await?;
      info!(id, "reservation completed");
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

  #[test]
  fn query_paths() {
    assert_eq!(ReservationQuery::Mine.path(), "reservas/mis-reservas");
    assert_eq!(ReservationQuery::Plan(3).path(), "reservas/plan/3");
  }

  #[tokio::test]
  async fn zero_people_is_rejected_locally() {
    let repo = ReservationRepository::new(unreachable_api());
    let request = ReservationRequest {
      plan_id: 1,
      start_date: "2025-01-10".to_string(),
      people: 0,
      notes: None,
      special_requests: None,
      emergency_contact: None,
      emergency_phone: None,
      payment_method: None,
      custom_services: None,
    };
    let states: Vec<_> = repo.create(request).collect().await;
    assert_eq!(
      states[1],
      Resource::Error("La reserva debe incluir al menos una persona".to_string())
    );
  }

  #[tokio::test]
  async fn cancel_sends_reason_as_query() {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when
          .method(PATCH)
          .path("/api/reservas/9/cancelar")
          .query_param("motivo", "Cambio de fechas");
        then.status(400).body("La reserva ya fue completada");
      })
      .await;

    let repo = ReservationRepository::new(api_for(&server));
    let states: Vec<_> = repo.cancel(9, "Cambio de fechas").collect().await;

    assert_eq!(
      states[1],
      Resource::Error("La reserva ya fue completada".to_string())
    );
    mock.assert_async().await;
  }
}
