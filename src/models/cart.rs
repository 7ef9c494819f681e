//! Shopping cart and reservations created from it.

use serde::{Deserialize, Serialize};

use super::booking::{PaymentMethod, PaymentStatus};
use super::catalog::{wire_name, ServiceKind};
use super::directory::EntrepreneurBasic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "precio")]
  pub price: f64,
  #[serde(rename = "tipo")]
  pub kind: ServiceKind,
  #[serde(rename = "emprendedor")]
  pub entrepreneur: EntrepreneurBasic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  pub id: i64,
  #[serde(rename = "usuarioId")]
  pub user_id: i64,
  #[serde(rename = "fechaCreacion", default)]
  pub created_at: String,
  #[serde(rename = "fechaActualizacion", default)]
  pub updated_at: String,
  #[serde(rename = "totalCarrito")]
  pub total: f64,
  #[serde(rename = "totalItems")]
  pub total_items: u32,
  #[serde(default)]
  pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: i64,
  #[serde(rename = "cantidad")]
  pub quantity: u32,
  #[serde(rename = "precioUnitario")]
  pub unit_price: f64,
  pub subtotal: f64,
  #[serde(rename = "fechaServicio")]
  pub service_date: String,
  #[serde(rename = "notasEspeciales", default)]
  pub notes: Option<String>,
  #[serde(rename = "fechaAgregado", default)]
  pub added_at: String,
  #[serde(rename = "servicio")]
  pub service: ServiceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemRequest {
  #[serde(rename = "servicioId")]
  pub service_id: i64,
  #[serde(rename = "cantidad")]
  pub quantity: u32,
  #[serde(rename = "fechaServicio")]
  pub service_date: String,
  #[serde(rename = "notasEspeciales", skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartTotal {
  #[serde(rename = "totalItems")]
  pub total_items: u32,
  #[serde(rename = "totalCarrito")]
  pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartCount {
  #[serde(rename = "cantidadItems")]
  pub items: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartReservationStatus {
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
}

impl std::fmt::Display for CartReservationStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&wire_name(self))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartReservation {
  pub id: i64,
  #[serde(rename = "codigoReserva")]
  pub code: String,
  #[serde(rename = "montoTotal")]
  pub total_amount: f64,
  #[serde(rename = "montoDescuento", default)]
  pub discount_amount: f64,
  #[serde(rename = "montoFinal")]
  pub final_amount: f64,
  #[serde(rename = "estado")]
  pub status: CartReservationStatus,
  #[serde(rename = "metodoPago", default)]
  pub payment_method: Option<PaymentMethod>,
  #[serde(rename = "fechaCreacion", default)]
  pub created_at: String,
  #[serde(rename = "fechaInicio")]
  pub start_date: String,
  #[serde(rename = "fechaFin")]
  pub end_date: String,
  #[serde(rename = "numeroPersonas")]
  pub people: u32,
  #[serde(rename = "observaciones", default)]
  pub notes: Option<String>,
  #[serde(default)]
  pub items: Vec<CartReservationItem>,
  #[serde(rename = "pagos", default)]
  pub payments: Vec<CartPayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartReservationItem {
  pub id: i64,
  #[serde(rename = "cantidad")]
  pub quantity: u32,
  #[serde(rename = "precioUnitario")]
  pub unit_price: f64,
  pub subtotal: f64,
  #[serde(rename = "fechaServicio")]
  pub service_date: String,
  #[serde(rename = "notasEspeciales", default)]
  pub notes: Option<String>,
  #[serde(rename = "servicio")]
  pub service: ServiceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPayment {
  pub id: i64,
  #[serde(rename = "monto")]
  pub amount: f64,
  #[serde(rename = "metodoPago")]
  pub method: PaymentMethod,
  #[serde(rename = "estado")]
  pub status: PaymentStatus,
  #[serde(rename = "fechaPago", default)]
  pub paid_at: String,
  #[serde(rename = "numeroTransaccion", default)]
  pub transaction_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
  #[serde(rename = "fechaInicio")]
  pub start_date: String,
  #[serde(rename = "fechaFin")]
  pub end_date: String,
  #[serde(rename = "numeroPersonas")]
  pub people: u32,
  #[serde(rename = "metodoPago")]
  pub payment_method: Option<PaymentMethod>,
  #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationRequest {
  #[serde(rename = "motivo")]
  pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationStats {
  #[serde(rename = "totalReservas")]
  pub total: u32,
  #[serde(rename = "reservasPendientes")]
  pub pending: u32,
  #[serde(rename = "reservasConfirmadas")]
  pub confirmed: u32,
  #[serde(rename = "reservasCompletadas")]
  pub completed: u32,
  #[serde(rename = "reservasCanceladas")]
  pub cancelled: u32,
  #[serde(rename = "montoTotalGastado")]
  pub total_spent: f64,
}
