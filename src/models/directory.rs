//! Municipalities, entrepreneurs and categories.
//!
//! Field names are English; the wire names the backend expects are kept via
//! serde renames.

use serde::{Deserialize, Serialize};

/// Minimal municipality reference embedded in other resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityBasic {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "distrito", default)]
  pub district: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "departamento", default)]
  pub department: String,
  #[serde(rename = "provincia", default)]
  pub province: String,
  #[serde(rename = "distrito", default)]
  pub district: String,
  #[serde(rename = "direccion", default)]
  pub address: Option<String>,
  #[serde(rename = "telefono", default)]
  pub phone: Option<String>,
  #[serde(rename = "sitioWeb", default)]
  pub website: Option<String>,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(rename = "usuarioId", default)]
  pub user_id: i64,
  #[serde(rename = "emprendedores", default)]
  pub entrepreneurs: Vec<EntrepreneurBasic>,
}

impl Municipality {
  pub fn basic(&self) -> MunicipalityBasic {
    MunicipalityBasic {
      id: self.id,
      name: self.name.clone(),
      district: self.district.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityRequest {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "departamento")]
  pub department: String,
  #[serde(rename = "provincia")]
  pub province: String,
  #[serde(rename = "distrito")]
  pub district: String,
  #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(rename = "sitioWeb", skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrepreneurBasic {
  pub id: i64,
  #[serde(rename = "nombreEmpresa")]
  pub business_name: String,
  #[serde(rename = "rubro", default)]
  pub sector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrepreneurWithMunicipality {
  pub id: i64,
  #[serde(rename = "nombreEmpresa")]
  pub business_name: String,
  #[serde(rename = "rubro", default)]
  pub sector: String,
  #[serde(rename = "municipalidad")]
  pub municipality: MunicipalityBasic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrepreneur {
  pub id: i64,
  #[serde(rename = "nombreEmpresa")]
  pub business_name: String,
  #[serde(rename = "rubro", default)]
  pub sector: String,
  #[serde(rename = "direccion", default)]
  pub address: Option<String>,
  #[serde(rename = "latitud", default)]
  pub latitude: Option<f64>,
  #[serde(rename = "longitud", default)]
  pub longitude: Option<f64>,
  #[serde(rename = "direccionCompleta", default)]
  pub full_address: Option<String>,
  #[serde(rename = "telefono", default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(rename = "sitioWeb", default)]
  pub website: Option<String>,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(rename = "productos", default)]
  pub products: Option<String>,
  #[serde(rename = "servicios", default)]
  pub services: Option<String>,
  #[serde(rename = "usuarioId", default)]
  pub user_id: i64,
  /// None when the parent municipality is unknown to the cache
  #[serde(rename = "municipalidad", default)]
  pub municipality: Option<MunicipalityBasic>,
  #[serde(rename = "categoria", default)]
  pub category: Option<CategoryBasic>,
}

impl Entrepreneur {
  pub fn coordinates(&self) -> Option<(f64, f64)> {
    self.latitude.zip(self.longitude)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrepreneurRequest {
  #[serde(rename = "nombreEmpresa")]
  pub business_name: String,
  #[serde(rename = "rubro")]
  pub sector: String,
  #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(rename = "sitioWeb", skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "productos", skip_serializing_if = "Option::is_none")]
  pub products: Option<String>,
  #[serde(rename = "servicios", skip_serializing_if = "Option::is_none")]
  pub services: Option<String>,
  #[serde(rename = "municipalidadId")]
  pub municipality_id: i64,
  #[serde(rename = "categoriaId", skip_serializing_if = "Option::is_none")]
  pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBasic {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
  pub id: i64,
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(rename = "cantidadEmprendedores", default)]
  pub entrepreneur_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRequest {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}
