//! Tourist services and itinerary plans.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::directory::{EntrepreneurWithMunicipality, MunicipalityBasic};
use super::user::UserBasic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceKind {
  #[serde(rename = "ALOJAMIENTO")]
  Lodging,
  #[serde(rename = "TRANSPORTE")]
  Transport,
  #[serde(rename = "ALIMENTACION")]
  Food,
  #[serde(rename = "GUIA_TURISTICO")]
  TourGuide,
  #[serde(rename = "ACTIVIDAD_RECREATIVA")]
  Recreation,
  Tour,
  #[serde(rename = "AVENTURA")]
  Adventure,
  Cultural,
  #[serde(rename = "GASTRONOMICO")]
  Gastronomy,
  Wellness,
  #[serde(rename = "OTRO", other)]
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
  #[serde(rename = "ACTIVO")]
  Active,
  #[serde(rename = "INACTIVO")]
  Inactive,
  #[serde(rename = "AGOTADO")]
  SoldOut,
  #[serde(rename = "MANTENIMIENTO")]
  Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
  #[serde(rename = "BORRADOR")]
  Draft,
  #[serde(rename = "ACTIVO")]
  Active,
  #[serde(rename = "INACTIVO")]
  Inactive,
  #[serde(rename = "AGOTADO")]
  SoldOut,
  #[serde(rename = "SUSPENDIDO")]
  Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  #[serde(rename = "FACIL")]
  Easy,
  #[serde(rename = "MODERADO")]
  Moderate,
  #[serde(rename = "DIFICIL")]
  Hard,
  #[serde(rename = "EXTREMO")]
  Extreme,
}

/// Wire name of an enum value, for path segments and query parameters.
pub(crate) fn wire_name<T: Serialize>(value: &T) -> String {
  match serde_json::to_value(value) {
    Ok(serde_json::Value::String(s)) => s,
    _ => String::new(),
  }
}

macro_rules! display_as_wire_name {
  ($($t:ty),*) => {
    $(impl fmt::Display for $t {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
      }
    })*
  };
}

display_as_wire_name!(ServiceKind, ServiceStatus, PlanStatus, Difficulty);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouristService {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(rename = "precio")]
  pub price: f64,
  #[serde(rename = "duracionHoras", default)]
  pub duration_hours: u32,
  #[serde(rename = "capacidadMaxima", default)]
  pub max_capacity: u32,
  #[serde(rename = "tipo")]
  pub kind: ServiceKind,
  #[serde(rename = "estado")]
  pub status: ServiceStatus,
  #[serde(rename = "ubicacion", default)]
  pub location: Option<String>,
  #[serde(rename = "requisitos", default)]
  pub requirements: Option<String>,
  #[serde(rename = "incluye", default)]
  pub includes: Option<String>,
  #[serde(rename = "noIncluye", default)]
  pub excludes: Option<String>,
  #[serde(rename = "imagenUrl", default)]
  pub image_url: Option<String>,
  #[serde(rename = "emprendedor")]
  pub entrepreneur: EntrepreneurWithMunicipality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouristServiceRequest {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "precio")]
  pub price: f64,
  #[serde(rename = "duracionHoras")]
  pub duration_hours: u32,
  #[serde(rename = "capacidadMaxima")]
  pub max_capacity: u32,
  #[serde(rename = "tipo")]
  pub kind: ServiceKind,
  #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(rename = "requisitos", skip_serializing_if = "Option::is_none")]
  pub requirements: Option<String>,
  #[serde(rename = "incluye", skip_serializing_if = "Option::is_none")]
  pub includes: Option<String>,
  #[serde(rename = "noIncluye", skip_serializing_if = "Option::is_none")]
  pub excludes: Option<String>,
  #[serde(rename = "imagenUrl", skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

/// A service scheduled on a given day of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanService {
  pub id: i64,
  #[serde(rename = "diaDelPlan")]
  pub day: u32,
  #[serde(rename = "ordenEnElDia")]
  pub order_in_day: u32,
  #[serde(rename = "horaInicio", default)]
  pub start_time: Option<String>,
  #[serde(rename = "horaFin", default)]
  pub end_time: Option<String>,
  #[serde(rename = "precioEspecial", default)]
  pub special_price: Option<f64>,
  #[serde(rename = "notas", default)]
  pub notes: Option<String>,
  #[serde(rename = "esOpcional", default)]
  pub optional: bool,
  #[serde(rename = "esPersonalizable", default)]
  pub customizable: bool,
  #[serde(rename = "servicio")]
  pub service: TouristService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanServiceRequest {
  #[serde(rename = "servicioId")]
  pub service_id: i64,
  #[serde(rename = "diaDelPlan")]
  pub day: u32,
  #[serde(rename = "ordenEnElDia")]
  pub order_in_day: u32,
  #[serde(rename = "horaInicio", skip_serializing_if = "Option::is_none")]
  pub start_time: Option<String>,
  #[serde(rename = "horaFin", skip_serializing_if = "Option::is_none")]
  pub end_time: Option<String>,
  #[serde(rename = "precioEspecial", skip_serializing_if = "Option::is_none")]
  pub special_price: Option<f64>,
  #[serde(rename = "notas", skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(rename = "esOpcional")]
  pub optional: bool,
  #[serde(rename = "esPersonalizable")]
  pub customizable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPlan {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(rename = "precioTotal")]
  pub total_price: f64,
  #[serde(rename = "duracionDias")]
  pub duration_days: u32,
  #[serde(rename = "capacidadMaxima", default)]
  pub max_capacity: u32,
  #[serde(rename = "estado")]
  pub status: PlanStatus,
  #[serde(rename = "nivelDificultad")]
  pub difficulty: Difficulty,
  #[serde(rename = "imagenPrincipalUrl", default)]
  pub image_url: Option<String>,
  #[serde(rename = "itinerario", default)]
  pub itinerary: Option<String>,
  #[serde(rename = "incluye", default)]
  pub includes: Option<String>,
  #[serde(rename = "noIncluye", default)]
  pub excludes: Option<String>,
  #[serde(rename = "recomendaciones", default)]
  pub recommendations: Option<String>,
  #[serde(rename = "requisitos", default)]
  pub requirements: Option<String>,
  #[serde(rename = "fechaCreacion", default)]
  pub created_at: String,
  #[serde(rename = "fechaActualizacion", default)]
  pub updated_at: Option<String>,
  #[serde(rename = "municipalidad")]
  pub municipality: MunicipalityBasic,
  #[serde(rename = "usuarioCreador")]
  pub creator: UserBasic,
  #[serde(rename = "servicios", default)]
  pub services: Vec<PlanService>,
  #[serde(rename = "totalReservas", default)]
  pub total_reservations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPlanBasic {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(rename = "precioTotal")]
  pub total_price: f64,
  #[serde(rename = "duracionDias")]
  pub duration_days: u32,
  #[serde(rename = "capacidadMaxima", default)]
  pub max_capacity: u32,
  #[serde(rename = "estado")]
  pub status: PlanStatus,
  #[serde(rename = "nivelDificultad")]
  pub difficulty: Difficulty,
  #[serde(rename = "imagenPrincipalUrl", default)]
  pub image_url: Option<String>,
  #[serde(rename = "municipalidad")]
  pub municipality: MunicipalityBasic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPlanRequest {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "duracionDias")]
  pub duration_days: u32,
  #[serde(rename = "capacidadMaxima")]
  pub max_capacity: u32,
  #[serde(rename = "nivelDificultad")]
  pub difficulty: Difficulty,
  #[serde(rename = "imagenPrincipalUrl", skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(rename = "itinerario", skip_serializing_if = "Option::is_none")]
  pub itinerary: Option<String>,
  #[serde(rename = "incluye", skip_serializing_if = "Option::is_none")]
  pub includes: Option<String>,
  #[serde(rename = "noIncluye", skip_serializing_if = "Option::is_none")]
  pub excludes: Option<String>,
  #[serde(rename = "recomendaciones", skip_serializing_if = "Option::is_none")]
  pub recommendations: Option<String>,
  #[serde(rename = "requisitos", skip_serializing_if = "Option::is_none")]
  pub requirements: Option<String>,
  #[serde(rename = "servicios")]
  pub services: Vec<PlanServiceRequest>,
}
