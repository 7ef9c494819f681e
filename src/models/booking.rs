//! Plan reservations and their payments.

use serde::{Deserialize, Serialize};

use super::catalog::{wire_name, PlanService, TourPlanBasic};
use super::user::UserBasic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
  #[serde(rename = "PENDIENTE")]
  Pending,
  #[serde(rename = "CONFIRMADA")]
  Confirmed,
  #[serde(rename = "PAGADA")]
  Paid,
  #[serde(rename = "EN_PROCESO")]
  InProgress,
  #[serde(rename = "COMPLETADA")]
  Completed,
  #[serde(rename = "CANCELADA")]
  Cancelled,
  #[serde(rename = "NO_SHOW")]
  NoShow,
}

impl std::fmt::Display for ReservationStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&wire_name(self))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
  #[serde(rename = "EFECTIVO")]
  Cash,
  #[serde(rename = "TARJETA_CREDITO")]
  CreditCard,
  #[serde(rename = "TARJETA_DEBITO")]
  DebitCard,
  #[serde(rename = "TRANSFERENCIA")]
  Transfer,
  #[serde(rename = "PAGO_MOVIL")]
  Mobile,
  #[serde(rename = "PAYPAL")]
  Paypal,
  #[serde(rename = "OTRO", other)]
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
  #[serde(rename = "SEÑA")]
  Deposit,
  #[serde(rename = "PAGO_COMPLETO")]
  Full,
  #[serde(rename = "PAGO_PARCIAL")]
  Partial,
  #[serde(rename = "SALDO_PENDIENTE")]
  Balance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
  #[serde(rename = "PENDIENTE")]
  Pending,
  #[serde(rename = "PROCESANDO")]
  Processing,
  #[serde(rename = "CONFIRMADO")]
  Confirmed,
  #[serde(rename = "FALLIDO")]
  Failed,
  #[serde(rename = "REEMBOLSADO")]
  Refunded,
  #[serde(rename = "CANCELADO")]
  Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservedServiceStatus {
  #[serde(rename = "INCLUIDO")]
  Included,
  #[serde(rename = "EXCLUIDO")]
  Excluded,
  #[serde(rename = "PERSONALIZADO")]
  Customized,
  #[serde(rename = "PENDIENTE_CONFIRMACION")]
  PendingConfirmation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedService {
  pub id: i64,
  #[serde(rename = "incluido")]
  pub included: bool,
  #[serde(rename = "precioPersonalizado", default)]
  pub custom_price: Option<f64>,
  #[serde(rename = "observaciones", default)]
  pub notes: Option<String>,
  #[serde(rename = "estado")]
  pub status: ReservedServiceStatus,
  #[serde(rename = "servicioPlan")]
  pub plan_service: PlanService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedServiceRequest {
  #[serde(rename = "servicioPlanId")]
  pub plan_service_id: i64,
  #[serde(rename = "incluido")]
  pub included: bool,
  #[serde(rename = "precioPersonalizado", skip_serializing_if = "Option::is_none")]
  pub custom_price: Option<f64>,
  #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(rename = "estado")]
  pub status: ReservedServiceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
  pub id: i64,
  #[serde(rename = "codigoReserva")]
  pub code: String,
  #[serde(rename = "fechaInicio")]
  pub start_date: String,
  #[serde(rename = "fechaFin", default)]
  pub end_date: String,
  #[serde(rename = "numeroPersonas")]
  pub people: u32,
  #[serde(rename = "montoTotal")]
  pub total_amount: f64,
  #[serde(rename = "montoDescuento", default)]
  pub discount_amount: Option<f64>,
  #[serde(rename = "montoFinal")]
  pub final_amount: f64,
  #[serde(rename = "estado")]
  pub status: ReservationStatus,
  #[serde(rename = "metodoPago", default)]
  pub payment_method: Option<PaymentMethod>,
  #[serde(rename = "observaciones", default)]
  pub notes: Option<String>,
  #[serde(rename = "solicitudesEspeciales", default)]
  pub special_requests: Option<String>,
  #[serde(rename = "contactoEmergencia", default)]
  pub emergency_contact: Option<String>,
  #[serde(rename = "telefonoEmergencia", default)]
  pub emergency_phone: Option<String>,
  #[serde(rename = "fechaReserva", default)]
  pub reserved_at: String,
  #[serde(rename = "fechaConfirmacion", default)]
  pub confirmed_at: Option<String>,
  #[serde(rename = "fechaCancelacion", default)]
  pub cancelled_at: Option<String>,
  #[serde(rename = "motivoCancelacion", default)]
  pub cancellation_reason: Option<String>,
  pub plan: TourPlanBasic,
  #[serde(rename = "usuario")]
  pub user: UserBasic,
  #[serde(rename = "serviciosPersonalizados", default)]
  pub custom_services: Option<Vec<ReservedService>>,
  #[serde(rename = "pagos", default)]
  pub payments: Option<Vec<Payment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationBasic {
  pub id: i64,
  #[serde(rename = "codigoReserva")]
  pub code: String,
  #[serde(rename = "fechaInicio")]
  pub start_date: String,
  #[serde(rename = "numeroPersonas")]
  pub people: u32,
  #[serde(rename = "montoFinal")]
  pub final_amount: f64,
  #[serde(rename = "estado")]
  pub status: ReservationStatus,
  pub plan: TourPlanBasic,
  #[serde(rename = "usuario")]
  pub user: UserBasic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequest {
  #[serde(rename = "planId")]
  pub plan_id: i64,
  #[serde(rename = "fechaInicio")]
  pub start_date: String,
  #[serde(rename = "numeroPersonas")]
  pub people: u32,
  #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(rename = "solicitudesEspeciales", skip_serializing_if = "Option::is_none")]
  pub special_requests: Option<String>,
  #[serde(rename = "contactoEmergencia", skip_serializing_if = "Option::is_none")]
  pub emergency_contact: Option<String>,
  #[serde(rename = "telefonoEmergencia", skip_serializing_if = "Option::is_none")]
  pub emergency_phone: Option<String>,
  #[serde(rename = "metodoPago", skip_serializing_if = "Option::is_none")]
  pub payment_method: Option<PaymentMethod>,
  #[serde(rename = "serviciosPersonalizados", skip_serializing_if = "Option::is_none")]
  pub custom_services: Option<Vec<ReservedServiceRequest>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
  pub id: i64,
  #[serde(rename = "codigoPago")]
  pub code: String,
  #[serde(rename = "reserva")]
  pub reservation: ReservationBasic,
  #[serde(rename = "monto")]
  pub amount: f64,
  #[serde(rename = "tipo")]
  pub kind: PaymentKind,
  #[serde(rename = "estado")]
  pub status: PaymentStatus,
  #[serde(rename = "metodoPago")]
  pub method: PaymentMethod,
  #[serde(rename = "numeroTransaccion", default)]
  pub transaction_number: Option<String>,
  #[serde(rename = "numeroAutorizacion", default)]
  pub authorization_number: Option<String>,
  #[serde(rename = "observaciones", default)]
  pub notes: Option<String>,
  #[serde(rename = "fechaPago", default)]
  pub paid_at: String,
  #[serde(rename = "fechaConfirmacion", default)]
  pub confirmed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
  #[serde(rename = "reservaId")]
  pub reservation_id: i64,
  #[serde(rename = "monto")]
  pub amount: f64,
  #[serde(rename = "tipo")]
  pub kind: PaymentKind,
  #[serde(rename = "metodoPago")]
  pub method: PaymentMethod,
  #[serde(rename = "numeroTransaccion", skip_serializing_if = "Option::is_none")]
  pub transaction_number: Option<String>,
  #[serde(rename = "numeroAutorizacion", skip_serializing_if = "Option::is_none")]
  pub authorization_number: Option<String>,
  #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}
