use tracing::info;

use super::{observe, ResourceStream};
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{ServiceKind, ServiceStatus, TouristService, TouristServiceRequest};

/// Remote list queries for tourist services
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceQuery {
  All,
  Entrepreneur(i64),
  Municipality(i64),
  Kind(ServiceKind),
  Status(ServiceStatus),
  Price { min: f64, max: f64 },
  Search(String),
  Category(i64),
  /// Services of the logged-in entrepreneur
  Mine,
}

impl ServiceQuery {
  fn request(&self) -> (String, Vec<(&'static str, String)>) {
    match self {
      Self::All => ("servicios".to_string(), vec![]),
      Self::Entrepreneur(id) => (format!("servicios/emprendedor/{}", id), vec![]),
      Self::Municipality(id) => (format!("servicios/municipalidad/{}", id), vec![]),
      Self::Kind(kind) => (format!("servicios/tipo/{}", kind), vec![]),
      Self::Status(status) => (format!("servicios/estado/{}", status), vec![]),
      Self::Price { min, max } => (
        "servicios/precio".to_string(),
        vec![("precioMin", min.to_string()), ("precioMax", max.to_string())],
      ),
      Self::Search(term) => (
        "servicios/search".to_string(),
        vec![("termino", term.clone())],
      ),
      Self::Category(id) => (format!("servicios/categoria/{}", id), vec![]),
      Self::Mine => ("servicios/mis-servicios".to_string(), vec![]),
    }
  }

  fn validate(&self) -> Result<(), Error> {
    match self {
      Self::Price { min, max } if min > max || *min < 0.0 => Err(Error::InvalidInput(format!(
        "Rango de precios inválido: {} - {}",
        min, max
      ))),
      Self::Search(term) if term.trim().is_empty() => Err(Error::InvalidInput(
        "El término de búsqueda no puede estar vacío".to_string(),
      )),
      _ => Ok(()),
    }
  }
}

#[derive(Clone)]
pub struct ServiceRepository {
  api: ApiClient,
}

impl ServiceRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn list(&self, query: ServiceQuery) -> ResourceStream<Vec<TouristService>> {
    let api = self.api.clone();
    observe(async move {
      query.validate()?;
      let (path, params) = query.request();
      if params.is_empty() {
        api.get(&path).await
      } else {
        api.get_with(&path, &params).await
      }
    })
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<TouristService> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("servicios/{}", id)).await })
  }

  pub fn create(&self, request: TouristServiceRequest) -> ResourceStream<TouristService> {
    let api = self.api.clone();
    observe(async move {
      let created: TouristService = api.post("servicios", &request).await?;
      info!(id = created.id, name = %created.name, "service created");
      Ok(created)
    })
  }

  pub fn update(&self, id: i64, request: TouristServiceRequest) -> ResourceStream<TouristService> {
    let api = self.api.clone();
    observe(async move { api.put(&format!("servicios/{}", id), &request).await })
  }

  pub fn delete(&self, id: i64) -> ResourceStream<()> {
    let api = self.api.clone();
    observe(async move {
      api.delete(&format!("servicios/{}", id)).await?;
      info!(id, "service deleted");
      Ok(())
    })
  }

  pub fn change_status(&self, id: i64, status: ServiceStatus) -> ResourceStream<TouristService> {
    let api = self.api.clone();
    observe(async move {
      let updated: TouristService = api
        .patch_with(
          &format!("servicios/{}/estado", id),
          &[("estado", status.to_string())],
        )
        .await?;
      info!(id, %status, "service status changed");
      Ok(updated)
    })
  }
}
