use tracing::info;

use super::cache::MunicipalityQuery;
use super::{observe, observe_cached, segment, ResourceStream};
use crate::api::ApiClient;
use crate::cache::{CacheLayer, CacheResult};
use crate::models::{Municipality, MunicipalityRequest};

/// Municipalities, backed by the local cache.
#[derive(Clone)]
pub struct MunicipalityRepository {
  api: ApiClient,
  cache: CacheLayer,
}

impl MunicipalityRepository {
  pub fn new(api: ApiClient, cache: CacheLayer) -> Self {
    Self { api, cache }
  }

  /// List municipalities answering `query`, falling back to cached rows
  /// for the same query when the network fails.
  pub fn list(&self, query: MunicipalityQuery) -> ResourceStream<Vec<Municipality>> {
    let repo = self.clone();
    observe_cached("municipalities", async move {
      let path = match &query {
        MunicipalityQuery::All => "municipalidades".to_string(),
        MunicipalityQuery::Department(d) => format!("municipalidades/departamento/{}", segment(d)),
        MunicipalityQuery::Province(p) => format!("municipalidades/provincia/{}", segment(p)),
        MunicipalityQuery::District(d) => format!("municipalidades/distrito/{}", segment(d)),
        MunicipalityQuery::OwnedBy(_) => "municipalidades/mi-municipalidad".to_string(),
      };
      let owned = matches!(query, MunicipalityQuery::OwnedBy(_));

      repo
        .cache
        .fetch_list::<Municipality, _, _>(query, || async {
          if owned {
            // The remote answers a single resource for this one
            let mine: Municipality = repo.api.get(&path).await?;
            Ok(vec![mine])
          } else {
            repo.api.get(&path).await
          }
        })
        .await
    })
  }

  pub fn get_all(&self) -> ResourceStream<Vec<Municipality>> {
    self.list(MunicipalityQuery::All)
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<Municipality> {
    let repo = self.clone();
    observe_cached("municipality", async move {
      let path = format!("municipalidades/{}", id);
      repo
        .cache
        .fetch_one::<Municipality, _, _>(id, || repo.api.get(&path))
        .await
    })
  }

  /// The municipality managed by the logged-in user.
  pub fn mine(&self) -> ResourceStream<Municipality> {
    let repo = self.clone();
    observe_cached("my municipality", async move {
      let path = "municipalidades/mi-municipalidad";
      match repo.api.session().current().and_then(|s| s.user_id) {
        Some(user_id) => {
          repo
            .cache
            .fetch_single::<Municipality, _, _>(MunicipalityQuery::OwnedBy(user_id), || {
              repo.api.get(path)
            })
            .await
        }
        // Token-only session: no owner to look up in the cache
        None => {
          let mine: Municipality = repo.api.get(path).await?;
          Ok(CacheResult::from_network(repo.cache.store(mine).await?))
        }
      }
    })
  }

  pub fn create(&self, request: MunicipalityRequest) -> ResourceStream<Municipality> {
    let repo = self.clone();
    observe(async move {
      let created: Municipality = repo.api.post("municipalidades", &request).await?;
      info!(id = created.id, name = %created.name, "municipality created");
      repo.cache.store(created).await
    })
  }

  pub fn update(&self, id: i64, request: MunicipalityRequest) -> ResourceStream<Municipality> {
    let repo = self.clone();
    observe(async move {
      let updated: Municipality = repo
        .api
        .put(&format!("municipalidades/{}", id), &request)
        .await?;
      info!(id, "municipality updated");
      repo.cache.store(updated).await
    })
  }

  pub fn delete(&self, id: i64) -> ResourceStream<()> {
    let repo = self.clone();
    observe(async move {
      repo.api.delete(&format!("municipalidades/{}", id)).await?;
      repo.cache.evict::<Municipality>(id).await?;
      info!(id, "municipality deleted");
      Ok(())
    })
  }
}
