//! In-memory cached collections.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};

/// A named, in-memory cached list.
///
/// Items are only ever replaced wholesale by a successful fetch, and
/// `last_fetched_at` is set iff at least one fetch has succeeded. State
/// lives for the process lifetime; nothing is persisted across runs.
pub struct Collection<T> {
  name: &'static str,
  pub(crate) state: RwLock<CollectionState<T>>,
  /// Serializes real fetches: at most one in flight per collection.
  pub(crate) fetch_lock: Mutex<()>,
  in_flight: AtomicUsize,
}

#[derive(Debug)]
pub(crate) struct CollectionState<T> {
  pub(crate) items: Vec<T>,
  pub(crate) last_fetched_at: Option<DateTime<Utc>>,
}

impl<T> Collection<T> {
  /// Create an empty, never-fetched collection.
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      state: RwLock::new(CollectionState {
        items: Vec::new(),
        last_fetched_at: None,
      }),
      fetch_lock: Mutex::new(()),
      in_flight: AtomicUsize::new(0),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Whether at least one fetch is currently in flight.
  pub fn is_loading(&self) -> bool {
    self.in_flight.load(Ordering::SeqCst) > 0
  }

  pub(crate) fn begin_fetch(&self) -> InFlightGuard<'_> {
    InFlightGuard::new(&self.in_flight)
  }

  #[cfg(test)]
  pub(crate) async fn seed(&self, items: Vec<T>, fetched_at: DateTime<Utc>) {
    let mut state = self.state.write().await;
    state.items = items;
    state.last_fetched_at = Some(fetched_at);
  }
}

/// Keeps the in-flight count accurate on every exit path, including
/// cancellation of the owning future.
pub(crate) struct InFlightGuard<'a> {
  counter: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
  fn new(counter: &'a AtomicUsize) -> Self {
    counter.fetch_add(1, Ordering::SeqCst);
    Self { counter }
  }
}

impl Drop for InFlightGuard<'_> {
  fn drop(&mut self) {
    self.counter.fetch_sub(1, Ordering::SeqCst);
  }
}
