use tracing::info;

use super::{observe, ResourceStream};
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{Difficulty, PlanStatus, TourPlan, TourPlanRequest};

/// Remote list queries for tour plans
#[derive(Debug, Clone, PartialEq)]
pub enum PlanQuery {
  All,
  Municipality(i64),
  Status(PlanStatus),
  Difficulty(Difficulty),
  Duration { min_days: u32, max_days: u32 },
  Price { min: f64, max: f64 },
  Search(String),
  Category(i64),
  /// Plans created by the logged-in user
  Mine,
  Popular,
}

impl PlanQuery {
  fn request(&self) -> (String, Vec<(&'static str, String)>) {
    match self {
      Self::All => ("planes".to_string(), vec![]),
      Self::Municipality(id) => (format!("planes/municipalidad/{}", id), vec![]),
      Self::Status(status) => (format!("planes/estado/{}", status), vec![]),
      Self::Difficulty(level) => (format!("planes/dificultad/{}", level), vec![]),
      Self::Duration { min_days, max_days } => (
        "planes/duracion".to_string(),
        vec![
          ("duracionMin", min_days.to_string()),
          ("duracionMax", max_days.to_string()),
        ],
      ),
      Self::Price { min, max } => (
        "planes/precio".to_string(),
        vec![("precioMin", min.to_string()), ("precioMax", max.to_string())],
      ),
      Self::Search(term) => ("planes/search".to_string(), vec![("termino", term.clone())]),
      Self::Category(id) => (format!("planes/categoria/{}", id), vec![]),
      Self::Mine => ("planes/mis-planes".to_string(), vec![]),
      Self::Popular => ("planes/populares".to_string(), vec![]),
    }
  }

  fn validate(&self) -> Result<(), Error> {
    match self {
      Self::Duration { min_days, max_days } if min_days > max_days => Err(Error::InvalidInput(
        format!("Rango de duración inválido: {} - {} días", min_days, max_days),
      )),
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
pub struct PlanRepository {
  api: ApiClient,
}

impl PlanRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn list(&self, query: PlanQuery) -> ResourceStream<Vec<TourPlan>> {
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

  pub fn get_by_id(&self, id: i64) -> ResourceStream<TourPlan> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("planes/{}", id)).await })
  }

  pub fn create(&self, request: TourPlanRequest) -> ResourceStream<TourPlan> {
    let api = self.api.clone();
    observe(async move {
      let created: TourPlan = api.post("planes", &request).await?;
      info!(id = created.id, name = %created.name, "plan created");
      Ok(created)
    })
  }

  pub fn update(&self, id: i64, request: TourPlanRequest) -> ResourceStream<TourPlan> {
    let api = self.api.clone();
    observe(async move { api.put(&format!("planes/{}", id), &request).await })
  }

  pub fn delete(&self, id: i64) -> ResourceStream<()> {
    let api = self.api.clone();
    observe(async move {
      api.delete(&format!("planes/{}", id)).await?;
      info!(id, "plan deleted");
      Ok(())
    })
  }

  pub fn change_status(&self, id: i64, status: PlanStatus) -> ResourceStream<TourPlan> {
    let api = self.api.clone();
    observe(async move {
      let updated: TourPlan = api
        .patch_with(
          &format!("planes/{}/estado", id),
          &[("estado", status.to_string())],
        )
        .await?;
      info!(id, %status, "plan status changed");
      Ok(updated)
    })
  }
}
