use serde::{Deserialize, Serialize};

use super::catalog::ServiceKind;
use super::directory::{EntrepreneurBasic, MunicipalityBasic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
  #[serde(rename = "latitud")]
  pub latitude: f64,
  #[serde(rename = "longitud")]
  pub longitude: f64,
  #[serde(rename = "direccionCompleta", skip_serializing_if = "Option::is_none")]
  pub full_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
  #[serde(rename = "latitud")]
  pub latitude: f64,
  #[serde(rename = "longitud")]
  pub longitude: f64,
  #[serde(rename = "direccionCompleta", default)]
  pub full_address: Option<String>,
  #[serde(rename = "tieneUbicacionValida", default)]
  pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrepreneurLocation {
  pub id: i64,
  #[serde(rename = "nombreEmpresa")]
  pub business_name: String,
  #[serde(rename = "rubro", default)]
  pub sector: String,
  #[serde(rename = "latitud")]
  pub latitude: f64,
  #[serde(rename = "longitud")]
  pub longitude: f64,
  #[serde(rename = "direccionCompleta", default)]
  pub full_address: Option<String>,
  #[serde(rename = "municipalidad")]
  pub municipality: MunicipalityBasic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLocation {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "tipo")]
  pub kind: ServiceKind,
  #[serde(rename = "precio")]
  pub price: f64,
  #[serde(rename = "latitud")]
  pub latitude: f64,
  #[serde(rename = "longitud")]
  pub longitude: f64,
  #[serde(rename = "direccionCompleta", default)]
  pub full_address: Option<String>,
  #[serde(rename = "emprendedor")]
  pub entrepreneur: EntrepreneurBasic,
}

/// What a proximity search should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearbyKind {
  Entrepreneurs,
  Services,
}

impl NearbyKind {
  pub fn as_param(&self) -> &'static str {
    match self {
      NearbyKind::Entrepreneurs => "emprendedor",
      NearbyKind::Services => "servicio",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NearbyResults {
  #[serde(rename = "emprendedores", default)]
  pub entrepreneurs: Vec<EntrepreneurLocation>,
  #[serde(rename = "servicios", default)]
  pub services: Vec<ServiceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
  #[serde(rename = "distanciaKm")]
  pub km: f64,
  #[serde(rename = "distanciaTexto")]
  pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateValidation {
  #[serde(rename = "esValida")]
  pub valid: bool,
  #[serde(rename = "mensaje", default)]
  pub message: Option<String>,
}
