use tracing::info;

use super::{observe, segment, ResourceStream};
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{Payment, PaymentRequest};

/// Remote list queries for payments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentQuery {
  All,
  Mine,
  Reservation(i64),
  Municipality(i64),
}

impl PaymentQuery {
  fn path(&self) -> String {
    match self {
      Self::All => "pagos".to_string(),
      Self::Mine => "pagos/mis-pagos".to_string(),
      Self::Reservation(id) => format!("pagos/reserva/{}", id),
      Self::Municipality(id) => format!("pagos/municipalidad/{}", id),
    }
  }
}

#[derive(Clone)]
pub struct PaymentRepository {
  api: ApiClient,
}

impl PaymentRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn list(&self, query: PaymentQuery) -> ResourceStream<Vec<Payment>> {
    let api = self.api.clone();
    observe(async move { api.get(&query.path()).await })
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<Payment> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("pagos/{}", id)).await })
  }

  pub fn get_by_code(&self, code: &str) -> ResourceStream<Payment> {
    let api = self.api.clone();
    let path = format!("pagos/codigo/{}", segment(code));
    observe(async move { api.get(&path).await })
  }

  pub fn register(&self, request: PaymentRequest) -> ResourceStream<Payment> {
    let api = self.api.clone();
    observe(async move {
      if request.amount.is_nan() || request.amount <= 0.0 {
        return Err(Error::InvalidInput(
          "El monto del pago debe ser mayor que cero".to_string(),
        ));
      }
      let payment: Payment = api.post("pagos", &request).await?;
      info!(id = payment.id, code = %payment.code, "payment registered");
      Ok(payment)
    })
  }

  pub fn confirm(&self, id: i64) -> ResourceStream<Payment> {
    let api = self.api.clone();
    observe(async move {
      let payment: Payment = api.patch(&format!("pagos/{}/confirmar", id)).await?;
      info!(id, "payment confirmed");
      Ok(payment)
    })
  }

  pub fn reject(&self, id: i64, reason: &str) -> ResourceStream<Payment> {
    let api = self.api.clone();
    let reason = reason.to_string();
    observe(async move {
      let payment: Payment = api
        .patch_with(&format!("pagos/{}/rechazar", id), &[("motivo", reason)])
        .await?;
      info!(id, "payment rejected");
      Ok(payment)
    })
  }
}
