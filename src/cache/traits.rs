//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::fmt::Debug;

/// A logical query against a cached table (e.g. "all municipalities",
/// "entrepreneurs of municipality 5").
pub trait CacheQuery: Debug + Clone + Send + Sync + 'static {
  /// True when a successful remote answer to this query is the complete set
  /// of rows, so anything missing from it was deleted remotely.
  fn is_full_list(&self) -> bool;

  /// Human readable description for logs.
  fn description(&self) -> String;
}

/// Trait for entities that have a row-oriented table in the local cache.
///
/// Implementors own their SQL: the storage only decides when to call it and
/// wraps the calls in transactions.
pub trait Cacheable: Debug + Clone + Send + Sync + 'static {
  type Query: CacheQuery;

  /// Table name, also used in log fields
  fn entity_type() -> &'static str;

  /// Remote primary key
  fn cache_id(&self) -> i64;

  /// Insert-or-replace the row keyed by `cache_id()`.
  fn upsert_row(conn: &Connection, entity: &Self) -> rusqlite::Result<()>;

  fn select_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<CachedEntity<Self>>>;

  fn select(conn: &Connection, query: &Self::Query) -> rusqlite::Result<Vec<CachedEntity<Self>>>;
}

/// A single cached entity.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntity<T> {
  /// The cached entity, hydrated with its cached relations
  pub entity: T,
  /// When the row was last written
  pub cached_at: DateTime<Utc>,
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from cached data that is still fresh.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at: Some(cached_at),
    }
  }

  /// Create a new cache result for offline mode.
  pub fn offline(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from cache, within the freshness window
  Cache,
  /// Remote call failed, serving whatever the cache had
  Offline,
}
