use tracing::info;

use super::cache::EntrepreneurQuery;
use super::{observe, observe_cached, segment, ResourceStream};
use crate::api::ApiClient;
use crate::cache::{CacheLayer, CacheResult};
use crate::error::Error;
use crate::geo;
use crate::models::{Entrepreneur, EntrepreneurRequest};

/// Default search radius for nearby lookups, in km
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Entrepreneurs, backed by the local cache.
#[derive(Clone)]
pub struct EntrepreneurRepository {
  api: ApiClient,
  cache: CacheLayer,
}

impl EntrepreneurRepository {
  pub fn new(api: ApiClient, cache: CacheLayer) -> Self {
    Self { api, cache }
  }

  /// List entrepreneurs answering `query`, falling back to cached rows
  /// (hydrated with their cached municipality) when the network fails.
  pub fn list(&self, query: EntrepreneurQuery) -> ResourceStream<Vec<Entrepreneur>> {
    let repo = self.clone();
    observe_cached("entrepreneurs", async move {
      if let EntrepreneurQuery::Nearby {
        latitude,
        longitude,
        radius_km,
      } = query
      {
        if !geo::is_valid_coordinate(latitude, longitude) {
          return Err(Error::InvalidInput(format!(
            "Coordenadas inválidas: ({}, {})",
            latitude, longitude
          )));
        }
        if radius_km.is_nan() || radius_km <= 0.0 {
          return Err(Error::InvalidInput("El radio debe ser mayor que cero".to_string()));
        }
      }

      let (path, params): (String, Vec<(&str, f64)>) = match &query {
        EntrepreneurQuery::All => ("emprendedores".to_string(), vec![]),
        EntrepreneurQuery::Municipality(id) => (format!("emprendedores/municipalidad/{}", id), vec![]),
        EntrepreneurQuery::Sector(s) => (format!("emprendedores/rubro/{}", segment(s)), vec![]),
        EntrepreneurQuery::Category(id) => (format!("emprendedores/categoria/{}", id), vec![]),
        EntrepreneurQuery::OwnedBy(_) => ("emprendedores/mi-emprendedor".to_string(), vec![]),
        EntrepreneurQuery::Nearby {
          latitude,
          longitude,
          radius_km,
        } => (
          "emprendedores/cercanos".to_string(),
          vec![
            ("latitud", *latitude),
            ("longitud", *longitude),
            ("radio", *radius_km),
          ],
        ),
      };
      let owned = matches!(query, EntrepreneurQuery::OwnedBy(_));

      repo
        .cache
        .fetch_list::<Entrepreneur, _, _>(query, || async {
          if owned {
            let mine: Entrepreneur = repo.api.get(&path).await?;
            Ok(vec![mine])
          } else if params.is_empty() {
            repo.api.get(&path).await
          } else {
            repo.api.get_with(&path, &params).await
          }
        })
        .await
    })
  }

  pub fn get_all(&self) -> ResourceStream<Vec<Entrepreneur>> {
    self.list(EntrepreneurQuery::All)
  }

  pub fn by_municipality(&self, municipality_id: i64) -> ResourceStream<Vec<Entrepreneur>> {
    self.list(EntrepreneurQuery::Municipality(municipality_id))
  }

  pub fn nearby(&self, latitude: f64, longitude: f64, radius_km: f64) -> ResourceStream<Vec<Entrepreneur>> {
    self.list(EntrepreneurQuery::Nearby {
      latitude,
      longitude,
      radius_km,
    })
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<Entrepreneur> {
    let repo = self.clone();
    observe_cached("entrepreneur", async move {
      let path = format!("emprendedores/{}", id);
      repo
        .cache
        .fetch_one::<Entrepreneur, _, _>(id, || repo.api.get(&path))
        .await
    })
  }

  /// The entrepreneur profile of the logged-in user.
  pub fn mine(&self) -> ResourceStream<Entrepreneur> {
    let repo = self.clone();
    observe_cached("my entrepreneur", async move {
      let path = "emprendedores/mi-emprendedor";
      match repo.api.session().current().and_then(|s| s.user_id) {
        Some(user_id) => {
          repo
            .cache
            .fetch_single::<Entrepreneur, _, _>(EntrepreneurQuery::OwnedBy(user_id), || {
              repo.api.get(path)
            })
            .await
        }
        None => {
          let mine: Entrepreneur = repo.api.get(path).await?;
          Ok(CacheResult::from_network(repo.cache.store(mine).await?))
        }
      }
    })
  }

  pub fn create(&self, request: EntrepreneurRequest) -> ResourceStream<Entrepreneur> {
    let repo = self.clone();
    observe(async move {
      let created: Entrepreneur = repo.api.post("emprendedores", &request).await?;
      info!(id = created.id, name = %created.business_name, "entrepreneur created");
      repo.cache.store(created).await
    })
  }

  pub fn update(&self, id: i64, request: EntrepreneurRequest) -> ResourceStream<Entrepreneur> {
    let repo = self.clone();
    observe(async move {
      let updated: Entrepreneur = repo
        .api
        .put(&format!("emprendedores/{}", id), &request)
        .await?;
      info!(id, "entrepreneur updated");
      repo.cache.store(updated).await
    })
  }

  pub fn delete(&self, id: i64) -> ResourceStream<()> {
    let repo = self.clone();
    observe(async move {
      repo.api.delete(&format!("emprendedores/{}", id)).await?;
      repo.cache.evict::<Entrepreneur>(id).await?;
      info!(id, "entrepreneur deleted");
      Ok(())
    })
  }
}
