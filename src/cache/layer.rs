//! Cache layer that orchestrates caching logic with network fetching.

use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::{CacheStorage, SqliteStorage};
use super::traits::{CacheQuery, CacheResult, Cacheable, CachedEntity};
use crate::error::Result;

/// How reads of cacheable entities consult the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
  /// Always ask the network; the cache is only a fallback when it fails.
  #[default]
  NetworkFirst,
  /// Serve cached rows younger than `max_age` without a network call.
  CacheFirst { max_age: Duration },
}

/// Cache layer that manages caching logic and network fetching.
///
/// This layer sits between the repositories and the api client,
/// keeping the row cache consistent and serving it when the network fails.
pub struct CacheLayer<S: CacheStorage = SqliteStorage> {
  storage: Arc<S>,
  policy: FetchPolicy,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self::from_shared(Arc::new(storage))
  }

  pub fn from_shared(storage: Arc<S>) -> Self {
    Self {
      storage,
      policy: FetchPolicy::default(),
    }
  }

  pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn policy(&self) -> FetchPolicy {
    self.policy
  }

  pub fn storage(&self) -> &Arc<S> {
    &self.storage
  }

  /// Check if cached data is fresh enough to skip the network.
  fn is_fresh(&self, cached_at: DateTime<Utc>) -> bool {
    match self.policy {
      FetchPolicy::NetworkFirst => false,
      FetchPolicy::CacheFirst { max_age } => Utc::now() - cached_at <= max_age,
    }
  }

  /// Run a storage call on the blocking pool.
  async fn blocking<R, F>(&self, f: F) -> Result<R>
  where
    R: Send + 'static,
    F: FnOnce(&S) -> Result<R> + Send + 'static,
  {
    let storage = Arc::clone(&self.storage);
    tokio::task::spawn_blocking(move || f(&storage)).await?
  }

  /// Fetch a list answering `query`.
  ///
  /// 1. Under `CacheFirst`, return the cached rows if the remote answered
  ///    this same query in full within `max_age`
  /// 2. Fetch from network and write the rows (replacing the table for
  ///    full-list queries), recording the query as fetched
  /// 3. On network failure, return the cached rows for the same query
  /// 4. With nothing cached, return the network error
  pub async fn fetch_list<T, F, Fut>(
    &self,
    query: T::Query,
    fetcher: F,
  ) -> Result<CacheResult<Vec<T>>>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    if matches!(self.policy, FetchPolicy::CacheFirst { .. }) {
      match self.fresh_list::<T>(query.clone()).await {
        Ok(Some((rows, fetched_at))) => {
          debug!(query = %query.description(), "serving fresh cache");
          return Ok(CacheResult::from_cache(entities(rows), fetched_at));
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "cache read failed, going to network"),
      }
    }

    match fetcher().await {
      Ok(data) => {
        let fetched = query.clone();
        let data = self
          .blocking(move |s| {
            if fetched.is_full_list() {
              s.replace_all(&data)?;
            } else {
              s.upsert(&data)?;
            }
            s.mark_fetched::<T>(&fetched)?;
            Ok(data)
          })
          .await?;
        Ok(CacheResult::from_network(data))
      }
      Err(err) => {
        let description = query.description();
        match self.cached_list::<T>(query).await {
          Ok(rows) if !rows.is_empty() => {
            warn!(query = %description, error = %err, "network failed, serving cache");
            let cached_at = oldest(&rows).unwrap_or_else(Utc::now);
            Ok(CacheResult::offline(entities(rows), cached_at))
          }
          Ok(_) => Err(err),
          Err(cache_err) => {
            warn!(error = %cache_err, "cache fallback failed");
            Err(err)
          }
        }
      }
    }
  }

  /// Fetch a single entity by id with caching.
  pub async fn fetch_one<T, F, Fut>(&self, id: i64, fetcher: F) -> Result<CacheResult<T>>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    if matches!(self.policy, FetchPolicy::CacheFirst { .. }) {
      match self.cached::<T>(id).await {
        Ok(Some(cached)) if self.is_fresh(cached.cached_at) => {
          debug!(entity_type = T::entity_type(), id, "serving fresh cache");
          return Ok(CacheResult::from_cache(cached.entity, cached.cached_at));
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "cache read failed, going to network"),
      }
    }

    match fetcher().await {
      Ok(data) => Ok(CacheResult::from_network(self.store(data).await?)),
      Err(err) => match self.cached::<T>(id).await {
        Ok(Some(cached)) => {
          warn!(entity_type = T::entity_type(), id, error = %err, "network failed, serving cache");
          Ok(CacheResult::offline(cached.entity, cached.cached_at))
        }
        Ok(None) => Err(err),
        Err(cache_err) => {
          warn!(error = %cache_err, "cache fallback failed");
          Err(err)
        }
      },
    }
  }

  /// Fetch the single entity answering `query` (e.g. "owned by user 7").
  ///
  /// The remote answer is upserted; the fallback is the first cached row
  /// matching the query.
  pub async fn fetch_single<T, F, Fut>(&self, query: T::Query, fetcher: F) -> Result<CacheResult<T>>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    match fetcher().await {
      Ok(data) => Ok(CacheResult::from_network(self.store(data).await?)),
      Err(err) => {
        let description = query.description();
        match self.cached_list::<T>(query).await {
          Ok(rows) => match rows.into_iter().next() {
            Some(cached) => {
              warn!(query = %description, error = %err, "network failed, serving cache");
              Ok(CacheResult::offline(cached.entity, cached.cached_at))
            }
            None => Err(err),
          },
          Err(cache_err) => {
            warn!(error = %cache_err, "cache fallback failed");
            Err(err)
          }
        }
      }
    }
  }

  /// Cached rows for `query` when the remote answered it in full within
  /// the freshness window.
  async fn fresh_list<T: Cacheable>(
    &self,
    query: T::Query,
  ) -> Result<Option<(Vec<CachedEntity<T>>, DateTime<Utc>)>> {
    let fetched_at = self
      .blocking({
        let query = query.clone();
        move |s| s.fetched_at::<T>(&query)
      })
      .await?;
    match fetched_at {
      Some(at) if self.is_fresh(at) => Ok(Some((self.cached_list::<T>(query).await?, at))),
      _ => Ok(None),
    }
  }

  /// Upsert one entity (after a successful remote write), handing it back.
  pub async fn store<T: Cacheable>(&self, entity: T) -> Result<T> {
    self
      .blocking(move |s| {
        s.upsert(std::slice::from_ref(&entity))?;
        Ok(entity)
      })
      .await
  }

  /// Run entity-specific SQL against the cache (partial row updates).
  pub async fn write<R, F>(&self, f: F) -> Result<R>
  where
    R: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<R> + Send + 'static,
  {
    self.blocking(move |s| s.write(f)).await
  }

  /// Remove one row (after a successful remote delete).
  pub async fn evict<T: Cacheable>(&self, id: i64) -> Result<bool> {
    self.blocking(move |s| s.remove::<T>(id)).await
  }

  /// Read cached rows without touching the network.
  pub async fn cached_list<T: Cacheable>(&self, query: T::Query) -> Result<Vec<CachedEntity<T>>> {
    self.blocking(move |s| s.query::<T>(&query)).await
  }

  pub async fn cached<T: Cacheable>(&self, id: i64) -> Result<Option<CachedEntity<T>>> {
    self.blocking(move |s| s.get::<T>(id)).await
  }
}

impl<S: CacheStorage> Clone for CacheLayer<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      policy: self.policy,
    }
  }
}

fn oldest<T>(rows: &[CachedEntity<T>]) -> Option<DateTime<Utc>> {
  rows.iter().map(|r| r.cached_at).min()
}

fn entities<T>(rows: Vec<CachedEntity<T>>) -> Vec<T> {
  rows.into_iter().map(|r| r.entity).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::CacheSource;
  use crate::error::Error;
  use crate::models::{EntrepreneurBasic, Municipality};
  use crate::repository::MunicipalityQuery;

  fn layer() -> CacheLayer {
    CacheLayer::new(SqliteStorage::open_in_memory().unwrap())
  }

  fn municipality(id: i64, name: &str) -> Municipality {
    Municipality {
      id,
      name: name.to_string(),
      department: "Puno".to_string(),
      province: "Puno".to_string(),
      district: name.to_string(),
      address: None,
      phone: None,
      website: None,
      description: None,
      user_id: 1,
      entrepreneurs: vec![EntrepreneurBasic {
        id: 10 + id,
        business_name: format!("Negocio {}", id),
        sector: "Turismo".to_string(),
      }],
    }
  }

  fn offline() -> Error {
    Error::Server {
      status: 503,
      message: "Servicio no disponible".to_string(),
    }
  }

  #[tokio::test]
  async fn remote_success_caches_every_returned_row() {
    let cache = layer();
    let data = vec![municipality(1, "Puno"), municipality(2, "Juli")];

    let result = cache
      .fetch_list(MunicipalityQuery::All, || {
        let data = data.clone();
        async move { Ok(data) }
      })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Network);
    assert_eq!(result.data, data);
    for m in &data {
      let cached = cache.cached::<Municipality>(m.id).await.unwrap().unwrap();
      assert_eq!(&cached.entity, m);
    }
  }

  #[tokio::test]
  async fn remote_failure_serves_cached_row() {
    let cache = layer();
    cache.store(municipality(1, "Puno")).await.unwrap();

    let result = cache
      .fetch_one(1, || async { Err::<Municipality, _>(offline()) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Offline);
    assert_eq!(result.data.name, "Puno");
  }

  #[tokio::test]
  async fn remote_failure_with_empty_cache_returns_the_remote_error() {
    let cache = layer();
    let err = cache
      .fetch_list(MunicipalityQuery::All, || async {
        Err::<Vec<Municipality>, _>(offline())
      })
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "Servicio no disponible");
  }

  #[tokio::test]
  async fn full_list_refresh_drops_rows_deleted_remotely() {
    let cache = layer();
    cache.store(municipality(1, "Puno")).await.unwrap();
    cache.store(municipality(2, "Juli")).await.unwrap();

    cache
      .fetch_list(MunicipalityQuery::All, || async { Ok(vec![municipality(2, "Juli")]) })
      .await
      .unwrap();

    assert!(cache.cached::<Municipality>(1).await.unwrap().is_none());
    assert!(cache.cached::<Municipality>(2).await.unwrap().is_some());
  }

  #[tokio::test]
  async fn filtered_refresh_only_upserts() {
    let cache = layer();
    cache.store(municipality(1, "Puno")).await.unwrap();

    cache
      .fetch_list(MunicipalityQuery::Department("Cusco".to_string()), || async {
        Ok(vec![Municipality {
          department: "Cusco".to_string(),
          ..municipality(3, "Urubamba")
        }])
      })
      .await
      .unwrap();

    assert!(cache.cached::<Municipality>(1).await.unwrap().is_some());
    assert!(cache.cached::<Municipality>(3).await.unwrap().is_some());
  }

  #[tokio::test]
  async fn cache_first_skips_network_while_fresh() {
    let cache = layer().with_policy(FetchPolicy::CacheFirst {
      max_age: Duration::minutes(5),
    });
    cache
      .fetch_list(MunicipalityQuery::All, || async { Ok(vec![municipality(1, "Puno")]) })
      .await
      .unwrap();

    let result = cache
      .fetch_list(MunicipalityQuery::All, || async {
        Err::<Vec<Municipality>, _>(offline())
      })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Cache);
    assert_eq!(result.data.len(), 1);
  }

  #[tokio::test]
  async fn cache_first_ignores_rows_stored_one_by_one() {
    let cache = layer().with_policy(FetchPolicy::CacheFirst {
      max_age: Duration::minutes(5),
    });
    // A detail read cached one row of the department
    cache.store(municipality(1, "Puno")).await.unwrap();

    let puno = MunicipalityQuery::Department("Puno".to_string());
    let result = cache
      .fetch_list(puno.clone(), || async {
        Ok(vec![municipality(1, "Puno"), municipality(2, "Juli")])
      })
      .await
      .unwrap();
    assert_eq!(result.source, CacheSource::Network);
    assert_eq!(result.data.len(), 2);

    let again = cache
      .fetch_list(puno, || async { Err::<Vec<Municipality>, _>(offline()) })
      .await
      .unwrap();
    assert_eq!(again.source, CacheSource::Cache);
    assert_eq!(again.data.len(), 2);
  }

  #[tokio::test]
  async fn cache_first_with_empty_cache_goes_to_network() {
    let cache = layer().with_policy(FetchPolicy::CacheFirst {
      max_age: Duration::minutes(5),
    });

    let result = cache
      .fetch_one(4, || async { Ok(municipality(4, "Ilave")) })
      .await
      .unwrap();
    assert_eq!(result.source, CacheSource::Network);
  }

  #[tokio::test]
  async fn evict_removes_row() {
    let cache = layer();
    cache.store(municipality(1, "Puno")).await.unwrap();
    assert!(cache.evict::<Municipality>(1).await.unwrap());
    assert!(!cache.evict::<Municipality>(1).await.unwrap());
  }
}
