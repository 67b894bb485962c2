//! Coordinator that decides, per read, between the cache and the network.

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;
use std::future::Future;
use tracing::{debug, warn};

use super::collection::Collection;
use super::result::CacheResult;

/// Staleness policy and fetch orchestration for cached collections.
///
/// A single stale time applies to every collection. Reads never fail:
/// a fetch error or timeout degrades to the last cached value.
pub struct CacheCoordinator {
  /// How long before cached data is considered stale
  stale_time: Duration,
  /// Hard cap on a single fetch; a hung backend degrades to the cached value
  fetch_timeout: std::time::Duration,
}

impl CacheCoordinator {
  pub fn new() -> Self {
    Self {
      stale_time: Duration::minutes(5),
      fetch_timeout: std::time::Duration::from_secs(30),
    }
  }

  /// Set the stale time for cached data.
  #[allow(dead_code)]
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  /// Set the per-fetch timeout.
  #[allow(dead_code)]
  pub fn with_fetch_timeout(mut self, fetch_timeout: std::time::Duration) -> Self {
    self.fetch_timeout = fetch_timeout;
    self
  }

  /// Read a collection with cache-first strategy.
  ///
  /// 1. Unless `force`, a fresh cache (non-empty, within the stale time)
  ///    is served immediately without any network I/O.
  /// 2. Otherwise take the collection's fetch slot. Callers that queued
  ///    behind an identical fetch re-check freshness after acquiring it
  ///    and are usually satisfied without a second network call.
  /// 3. Run the fetcher. Success replaces the items wholesale and stamps
  ///    `last_fetched_at`; failure or timeout leaves the collection
  ///    untouched and returns the previous value as an offline result.
  pub async fn fetch<T, F, Fut>(
    &self,
    collection: &Collection<T>,
    force: bool,
    fetcher: F,
  ) -> CacheResult<Vec<T>>
  where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    if !force {
      if let Some(hit) = self.try_serve_cached(collection).await {
        debug!(collection = collection.name(), "cache hit");
        return hit;
      }
    }

    // At most one real fetch in flight per collection.
    let _fetch_slot = collection.fetch_lock.lock().await;

    if !force {
      if let Some(hit) = self.try_serve_cached(collection).await {
        debug!(
          collection = collection.name(),
          "coalesced into a fetch that completed while waiting"
        );
        return hit;
      }
    }

    let _in_flight = collection.begin_fetch();
    match tokio::time::timeout(self.fetch_timeout, fetcher()).await {
      Ok(Ok(items)) => {
        let mut state = collection.state.write().await;
        state.items = items.clone();
        state.last_fetched_at = Some(Utc::now());
        CacheResult::from_network(items)
      }
      Ok(Err(err)) => self.serve_fallback(collection, err.to_string()).await,
      Err(_) => {
        let error = format!("fetch timed out after {:?}", self.fetch_timeout);
        self.serve_fallback(collection, error).await
      }
    }
  }

  /// Return the cached items if the collection is fresh.
  async fn try_serve_cached<T: Clone>(
    &self,
    collection: &Collection<T>,
  ) -> Option<CacheResult<Vec<T>>> {
    let state = collection.state.read().await;
    let fetched_at = state.last_fetched_at?;
    if state.items.is_empty() || self.is_stale(fetched_at) {
      return None;
    }
    Some(CacheResult::from_cache(state.items.clone(), fetched_at))
  }

  /// Serve the previous cached value after a failed fetch.
  async fn serve_fallback<T: Clone>(
    &self,
    collection: &Collection<T>,
    error: String,
  ) -> CacheResult<Vec<T>> {
    warn!(
      collection = collection.name(),
      error = %error,
      "fetch failed, serving last cached value"
    );
    let state = collection.state.read().await;
    CacheResult::offline(state.items.clone(), state.last_fetched_at, error)
  }

  fn is_stale(&self, fetched_at: DateTime<Utc>) -> bool {
    Utc::now() - fetched_at > self.stale_time
  }
}
