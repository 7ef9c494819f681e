//! Cache storage trait and SQLite implementation.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use super::traits::{CacheQuery, Cacheable, CachedEntity};
use crate::error::{Error, Result};

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync + 'static {
  /// Insert-or-replace every entity by primary id.
  fn upsert<T: Cacheable>(&self, entities: &[T]) -> Result<()>;

  /// Upsert `entities` and delete every other row of the table.
  fn replace_all<T: Cacheable>(&self, entities: &[T]) -> Result<()>;

  /// Get a single entity by id.
  fn get<T: Cacheable>(&self, id: i64) -> Result<Option<CachedEntity<T>>>;

  /// Get the cached rows answering a logical query.
  fn query<T: Cacheable>(&self, query: &T::Query) -> Result<Vec<CachedEntity<T>>>;

  /// Delete a row. Returns whether it existed.
  fn remove<T: Cacheable>(&self, id: i64) -> Result<bool>;

  /// Record that the remote answered `query` in full just now.
  fn mark_fetched<T: Cacheable>(&self, query: &T::Query) -> Result<()>;

  /// When `query` was last answered in full, if ever.
  fn fetched_at<T: Cacheable>(&self, query: &T::Query) -> Result<Option<DateTime<Utc>>>;

  /// Run entity-specific SQL in a transaction.
  fn write<R, F>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&Connection) -> rusqlite::Result<R>;
}

/// SQLite-based cache storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open (or create) the cache database at `path`.
  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    debug!(path = %path.display(), "opened cache database");
    Self::from_connection(conn)
  }

  /// Cache that lives only as long as this value.
  pub fn open_in_memory() -> Result<Self> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    conn.execute_batch(CACHE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|_| Error::StoragePoisoned)
  }
}

/// Schema for cache tables.
///
/// `entrepreneurs.municipality_id` deliberately has no enforced foreign key:
/// an entrepreneur may be cached before (or without) its municipality, and
/// hydration treats a missing parent as unresolved.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS municipalities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    department TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    district TEXT NOT NULL DEFAULT '',
    address TEXT,
    phone TEXT,
    website TEXT,
    description TEXT,
    user_id INTEGER NOT NULL DEFAULT 0,
    -- denormalized basic entrepreneur references (JSON array)
    entrepreneurs TEXT NOT NULL DEFAULT '[]',
    cached_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_municipalities_department ON municipalities(department);
CREATE INDEX IF NOT EXISTS idx_municipalities_province ON municipalities(province);
CREATE INDEX IF NOT EXISTS idx_municipalities_district ON municipalities(district);
CREATE INDEX IF NOT EXISTS idx_municipalities_user ON municipalities(user_id);

CREATE TABLE IF NOT EXISTS entrepreneurs (
    id INTEGER PRIMARY KEY,
    business_name TEXT NOT NULL,
    sector TEXT NOT NULL DEFAULT '',
    address TEXT,
    latitude REAL,
    longitude REAL,
    full_address TEXT,
    phone TEXT,
    email TEXT,
    website TEXT,
    description TEXT,
    products TEXT,
    services TEXT,
    user_id INTEGER NOT NULL DEFAULT 0,
    municipality_id INTEGER,
    category_id INTEGER,
    category_name TEXT,
    cached_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_entrepreneurs_municipality ON entrepreneurs(municipality_id);
CREATE INDEX IF NOT EXISTS idx_entrepreneurs_category ON entrepreneurs(category_id);
CREATE INDEX IF NOT EXISTS idx_entrepreneurs_sector ON entrepreneurs(sector);
CREATE INDEX IF NOT EXISTS idx_entrepreneurs_user ON entrepreneurs(user_id);

-- list queries the remote answered in full, keyed by query description
CREATE TABLE IF NOT EXISTS cache_queries (
    entity_type TEXT NOT NULL,
    description TEXT NOT NULL,
    fetched_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (entity_type, description)
);
"#;

impl CacheStorage for SqliteStorage {
  fn upsert<T: Cacheable>(&self, entities: &[T]) -> Result<()> {
    let mut conn = self.lock()?;
    let tx = conn.transaction()?;
    for entity in entities {
      T::upsert_row(&tx, entity)?;
    }
    tx.commit()?;

    debug!(entity_type = T::entity_type(), count = entities.len(), "upserted rows");
    Ok(())
  }

  fn replace_all<T: Cacheable>(&self, entities: &[T]) -> Result<()> {
    let ids: Vec<i64> = entities.iter().map(Cacheable::cache_id).collect();
    let ids_json = serde_json::Value::from(ids).to_string();

    let mut conn = self.lock()?;
    let tx = conn.transaction()?;
    for entity in entities {
      T::upsert_row(&tx, entity)?;
    }
    let removed = tx.execute(
      &format!(
        "DELETE FROM {} WHERE id NOT IN (SELECT value FROM json_each(?1))",
        T::entity_type()
      ),
      params![ids_json],
    )?;
    tx.commit()?;

    debug!(
      entity_type = T::entity_type(),
      count = entities.len(),
      removed,
      "replaced table"
    );
    Ok(())
  }

  fn get<T: Cacheable>(&self, id: i64) -> Result<Option<CachedEntity<T>>> {
    let conn = self.lock()?;
    Ok(T::select_by_id(&conn, id)?)
  }

  fn query<T: Cacheable>(&self, query: &T::Query) -> Result<Vec<CachedEntity<T>>> {
    let conn = self.lock()?;
    let rows = T::select(&conn, query)?;
    debug!(
      entity_type = T::entity_type(),
      query = %query.description(),
      count = rows.len(),
      "cache read"
    );
    Ok(rows)
  }

  fn remove<T: Cacheable>(&self, id: i64) -> Result<bool> {
    let conn = self.lock()?;
    let removed = conn.execute(
      &format!("DELETE FROM {} WHERE id = ?1", T::entity_type()),
      params![id],
    )?;
    Ok(removed > 0)
  }

  fn mark_fetched<T: Cacheable>(&self, query: &T::Query) -> Result<()> {
    let conn = self.lock()?;
    conn.execute(
      "INSERT OR REPLACE INTO cache_queries (entity_type, description, fetched_at)
       VALUES (?1, ?2, datetime('now'))",
      params![T::entity_type(), query.description()],
    )?;
    Ok(())
  }

  fn fetched_at<T: Cacheable>(&self, query: &T::Query) -> Result<Option<DateTime<Utc>>> {
    let conn = self.lock()?;
    let fetched_at = conn
      .query_row(
        "SELECT fetched_at FROM cache_queries WHERE entity_type = ?1 AND description = ?2",
        params![T::entity_type(), query.description()],
        |row| cached_at_column(row, 0),
      )
      .optional()?;
    Ok(fetched_at)
  }

  fn write<R, F>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&Connection) -> rusqlite::Result<R>,
  {
    let mut conn = self.lock()?;
    let tx = conn.transaction()?;
    let result = f(&*tx)?;
    tx.commit()?;
    Ok(result)
  }
}

/// Parse a datetime string from SQLite format.
pub(crate) fn parse_datetime(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
}

/// Read a `cached_at` column, surfacing bad timestamps as conversion errors.
pub(crate) fn cached_at_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  let raw: String = row.get(idx)?;
  parse_datetime(&raw).map_err(|e| {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
  })
}
