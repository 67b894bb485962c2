//! Result envelope for cache reads.

use chrono::{DateTime, Utc};

/// Result of a cache read, including the data and metadata about where
/// it came from.
///
/// Cache reads always resolve to one of these. A failed fetch is
/// absorbed into an `Offline` envelope carrying the last cached value
/// and the error text; callers never see an `Err`.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The best available data.
  pub data: T,
  /// Where the data came from.
  pub source: CacheSource,
  /// When the data was cached, if it was served from cache.
  pub cached_at: Option<DateTime<Utc>>,
  /// The absorbed fetch error, when the read fell back to cached data.
  pub error: Option<String>,
}

impl<T> CacheResult<T> {
  /// Fresh data straight from the network.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
      error: None,
    }
  }

  /// Data served from a fresh cache.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
      cached_at: Some(cached_at),
      error: None,
    }
  }

  /// Previously cached data served because a fetch failed.
  pub fn offline(data: T, cached_at: Option<DateTime<Utc>>, error: impl Into<String>) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
      cached_at,
      error: Some(error.into()),
    }
  }
}

/// Indicates where returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from the network.
  Network,
  /// Data from cache, still considered fresh.
  CacheFresh,
  /// A fetch failed; serving the last cached value, which may be empty.
  Offline,
}
