//! Row-oriented local cache for the entities the client keeps offline.
//!
//! This module provides the caching mechanism that:
//! - Stores one table per cacheable entity, keyed by the remote id
//! - Replaces a table wholesale on full-list refreshes and upserts otherwise
//! - Serves cached rows when the network fails (offline mode)
//! - Optionally serves fresh rows without a network call (`FetchPolicy::CacheFirst`)

mod layer;
mod storage;
mod traits;

pub use layer::{CacheLayer, FetchPolicy};
pub use storage::{CacheStorage, SqliteStorage};
pub(crate) use storage::cached_at_column;
pub use traits::{CacheQuery, CacheResult, CacheSource, Cacheable, CachedEntity};
