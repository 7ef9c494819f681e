use tracing::{debug, info};

use super::cache::relocate_entrepreneur;
use super::{observe, ResourceStream};
use crate::api::ApiClient;
use crate::cache::CacheLayer;
use crate::error::Error;
use crate::geo;
use crate::models::{
  CoordinateValidation, Distance, EntrepreneurLocation, LocationRequest, LocationUpdate,
  NearbyKind, NearbyResults, ServiceLocation,
};

fn check(latitude: f64, longitude: f64) -> Result<(), Error> {
  if geo::is_valid_coordinate(latitude, longitude) {
    Ok(())
  } else {
    Err(Error::InvalidInput(format!(
      "Coordenadas inválidas: ({}, {})",
      latitude, longitude
    )))
  }
}

/// Map-oriented endpoints. Coordinates are range-checked before any request
/// goes out; entrepreneur moves are written through to the row cache.
#[derive(Clone)]
pub struct LocationRepository {
  api: ApiClient,
  cache: CacheLayer,
}

impl LocationRepository {
  pub fn new(api: ApiClient, cache: CacheLayer) -> Self {
    Self { api, cache }
  }

  pub fn entrepreneurs(&self) -> ResourceStream<Vec<EntrepreneurLocation>> {
    let api = self.api.clone();
    observe(async move { api.get("ubicaciones/emprendedores").await })
  }

  pub fn services(&self) -> ResourceStream<Vec<ServiceLocation>> {
    let api = self.api.clone();
    observe(async move { api.get("ubicaciones/servicios").await })
  }

  pub fn nearby(
    &self,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    kind: Option<NearbyKind>,
  ) -> ResourceStream<NearbyResults> {
    let api = self.api.clone();
    observe(async move {
      check(latitude, longitude)?;
      if radius_km.is_nan() || radius_km <= 0.0 {
        return Err(Error::InvalidInput(format!("Radio inválido: {}", radius_km)));
      }
      let mut params = vec![
        ("latitud", latitude.to_string()),
        ("longitud", longitude.to_string()),
        ("radio", radius_km.to_string()),
      ];
      if let Some(kind) = kind {
        params.push(("tipo", kind.as_param().to_string()));
      }
      api.get_with("ubicaciones/cercanos", &params).await
    })
  }

  pub fn distance(&self, from: (f64, f64), to: (f64, f64)) -> ResourceStream<Distance> {
    let api = self.api.clone();
    observe(async move {
      check(from.0, from.1)?;
      check(to.0, to.1)?;
      api
        .get_with(
          "ubicaciones/distancia",
          &[
            ("latitudOrigen", from.0),
            ("longitudOrigen", from.1),
            ("latitudDestino", to.0),
            ("longitudDestino", to.1),
          ],
        )
        .await
    })
  }

  /// Ask the backend whether a point is usable; out-of-range values are
  /// answered locally.
  pub fn validate(&self, latitude: f64, longitude: f64) -> ResourceStream<CoordinateValidation> {
    let api = self.api.clone();
    observe(async move {
      if !geo::is_valid_coordinate(latitude, longitude) {
        return Ok(CoordinateValidation {
          valid: false,
          message: Some(format!("Coordenadas inválidas: ({}, {})", latitude, longitude)),
        });
      }
      api
        .get_with(
          "ubicaciones/validar-coordenadas",
          &[("latitud", latitude), ("longitud", longitude)],
        )
        .await
    })
  }

  pub fn update_entrepreneur_location(
    &self,
    entrepreneur_id: i64,
    request: LocationRequest,
  ) -> ResourceStream<LocationUpdate> {
    let repo = self.clone();
    observe(async move {
      check(request.latitude, request.longitude)?;
      let update: LocationUpdate = repo
        .api
        .put(&format!("ubicaciones/emprendedor/{}", entrepreneur_id), &request)
        .await?;
      info!(entrepreneur_id, "entrepreneur location updated");

      let (latitude, longitude) = (update.latitude, update.longitude);
      let full_address = update.full_address.clone().or(request.full_address);
      let cached = repo
        .cache
        .write(move |conn| {
          relocate_entrepreneur(
            conn,
            entrepreneur_id,
            latitude,
            longitude,
            full_address.as_deref(),
          )
        })
        .await?;
      debug!(entrepreneur_id, cached, "cached location refreshed");
      Ok(update)
    })
  }

  pub fn update_service_location(
    &self,
    service_id: i64,
    request: LocationRequest,
  ) -> ResourceStream<LocationUpdate> {
    let api = self.api.clone();
    observe(async move {
      check(request.latitude, request.longitude)?;
      let update: LocationUpdate = api
        .put(&format!("ubicaciones/servicio/{}", service_id), &request)
        .await?;
      info!(service_id, "service location updated");
      Ok(update)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::SqliteStorage;
  use crate::models::Entrepreneur;
  use crate::repository::testing::{api_for, unreachable_api};
  use crate::repository::{EntrepreneurQuery, Resource};
  use futures::StreamExt;
  use httpmock::prelude::*;
  use serde_json::json;

  fn cache() -> CacheLayer {
    CacheLayer::new(SqliteStorage::open_in_memory().unwrap())
  }

  fn lodge_at(latitude: f64, longitude: f64) -> Entrepreneur {
    Entrepreneur {
      id: 3,
      business_name: "Casa Lago".to_string(),
      sector: "Hospedaje".to_string(),
      address: None,
      latitude: Some(latitude),
      longitude: Some(longitude),
      full_address: None,
      phone: None,
      email: None,
      website: None,
      description: None,
      products: None,
      services: None,
      user_id: 11,
      municipality: None,
      category: None,
    }
  }

  #[tokio::test]
  async fn invalid_coordinates_never_reach_the_network() {
    let repo = LocationRepository::new(unreachable_api(), cache());
    let request = LocationRequest {
      latitude: 95.0,
      longitude: -70.0,
      full_address: None,
    };
    let states: Vec<_> = repo.update_service_location(1, request).collect().await;
    assert_eq!(
      states[1],
      Resource::Error("Coordenadas inválidas: (95, -70)".to_string())
    );
  }

  #[tokio::test]
  async fn validate_answers_out_of_range_locally() {
    let repo = LocationRepository::new(unreachable_api(), cache());
    let states: Vec<_> = repo.validate(-15.8, 200.0).collect().await;
    let validation = states[1].data().unwrap();
    assert!(!validation.valid);
  }

  #[tokio::test]
  async fn nearby_sends_kind() {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when
          .method(GET)
          .path("/api/ubicaciones/cercanos")
          .query_param("latitud", "-15.84")
          .query_param("tipo", "servicio");
        then
          .status(200)
          .json_body(json!({ "emprendedores": [], "servicios": [] }));
      })
      .await;

    let repo = LocationRepository::new(api_for(&server), cache());
    let states: Vec<_> = repo
      .nearby(-15.84, -70.02, 5.0, Some(NearbyKind::Services))
      .collect()
      .await;

    assert_eq!(states[1], Resource::Success(NearbyResults::default()));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn moving_an_entrepreneur_updates_the_cached_row() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(PUT).path("/api/ubicaciones/emprendedor/3");
        then.status(200).json_body(json!({
          "latitud": -13.53,
          "longitud": -71.97,
          "direccionCompleta": "Av. Sol 120, Cusco",
          "tieneUbicacionValida": true
        }));
      })
      .await;

    let cache = cache();
    cache.store(lodge_at(-15.84, -69.99)).await.unwrap();

    let repo = LocationRepository::new(api_for(&server), cache.clone());
    let request = LocationRequest {
      latitude: -13.53,
      longitude: -71.97,
      full_address: None,
    };
    let states: Vec<_> = repo.update_entrepreneur_location(3, request).collect().await;
    assert!(states[1].is_success());

    let row = cache.cached::<Entrepreneur>(3).await.unwrap().unwrap().entity;
    assert_eq!(row.coordinates(), Some((-13.53, -71.97)));
    assert_eq!(row.full_address.as_deref(), Some("Av. Sol 120, Cusco"));

    let old_spot = cache
      .cached_list::<Entrepreneur>(EntrepreneurQuery::Nearby {
        latitude: -15.84,
        longitude: -69.99,
        radius_km: 1.0,
      })
      .await
      .unwrap();
    assert!(old_spot.is_empty());
  }
}
