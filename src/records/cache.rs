//! The shared data cache for the two dashboard collections.

use std::sync::Arc;

use crate::cache::{CacheCoordinator, CacheResult, Collection};

use super::source::RecordSource;
use super::types::{project_matters, Assignee, Matter};

/// Staleness-aware store for the matter and assignee lists.
///
/// One instance is constructed at startup and shared by every consumer.
/// Reads never fail: a fetch error degrades to the last cached value,
/// which may be empty if nothing was ever fetched. The two collections
/// are independent; neither blocks the other.
pub struct DataCache {
  source: Arc<dyn RecordSource>,
  coordinator: CacheCoordinator,
  matters: Collection<Matter>,
  assignees: Collection<Assignee>,
}

/// Result of a forced refresh of both collections.
#[derive(Debug)]
pub struct RefreshOutcome {
  pub matters: CacheResult<Vec<Matter>>,
  pub assignees: CacheResult<Vec<Assignee>>,
}

impl DataCache {
  pub fn new(source: Arc<dyn RecordSource>) -> Self {
    Self {
      source,
      coordinator: CacheCoordinator::new(),
      matters: Collection::new("matters"),
      assignees: Collection::new("assignees"),
    }
  }

  /// Replace the default coordinator policy (stale time, fetch timeout).
  #[allow(dead_code)]
  pub fn with_coordinator(mut self, coordinator: CacheCoordinator) -> Self {
    self.coordinator = coordinator;
    self
  }

  /// The matter list, projected and sorted by display name.
  ///
  /// With `force` false a fresh cached list is served without network
  /// I/O; otherwise the list is re-fetched, and on failure the previous
  /// value is returned instead.
  pub async fn fetch_matters(&self, force: bool) -> CacheResult<Vec<Matter>> {
    let source = Arc::clone(&self.source);
    self
      .coordinator
      .fetch(&self.matters, force, move || async move {
        let records = source.fetch_matters_list().await?;
        Ok(project_matters(&records))
      })
      .await
  }

  /// The assignee list (staff display names), in server order.
  pub async fn fetch_assignees(&self, force: bool) -> CacheResult<Vec<Assignee>> {
    let source = Arc::clone(&self.source);
    self
      .coordinator
      .fetch(&self.assignees, force, move || async move {
        source.fetch_assignee_list().await
      })
      .await
  }

  /// Force-refresh both collections.
  ///
  /// The fetches run concurrently; one failing does not stop the other
  /// from updating its cache. Resolves once both finish.
  pub async fn refresh_cache(&self) -> RefreshOutcome {
    let (matters, assignees) = tokio::join!(self.fetch_matters(true), self.fetch_assignees(true));
    RefreshOutcome { matters, assignees }
  }

  #[allow(dead_code)]
  pub fn matters_loading(&self) -> bool {
    self.matters.is_loading()
  }

  #[allow(dead_code)]
  pub fn assignees_loading(&self) -> bool {
    self.assignees.is_loading()
  }
}

#[cfg(test)]
pub(crate) mod test_support {
  use async_trait::async_trait;
  use color_eyre::{eyre::eyre, Result};
  use serde_json::Value;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use crate::records::api_types::ApiMatterRecord;
  use crate::records::source::RecordSource;

  pub(crate) fn record(id: &str, fields: &[(&str, &str)]) -> ApiMatterRecord {
    ApiMatterRecord {
      id: id.to_string(),
      fields: fields
        .iter()
        .map(|(name, value)| ((*name).to_string(), Value::String((*value).to_string())))
        .collect(),
    }
  }

  /// In-memory record source with call counting and optional failures.
  pub(crate) struct StubSource {
    pub(crate) matter_records: Vec<ApiMatterRecord>,
    pub(crate) assignees: Vec<String>,
    pub(crate) fail_matters: bool,
    pub(crate) fail_assignees: bool,
    matter_calls: AtomicUsize,
    assignee_calls: AtomicUsize,
  }

  impl StubSource {
    pub(crate) fn new() -> Self {
      Self {
        matter_records: vec![
          record(
            "rec2",
            &[
              ("Matter Name", "Zeta"),
              ("Type of Case", "Probate"),
              ("Client", "Zimmer"),
            ],
          ),
          record("rec1", &[("Client", "Alpha")]),
        ],
        assignees: vec!["Dana".to_string(), "Lee".to_string()],
        fail_matters: false,
        fail_assignees: false,
        matter_calls: AtomicUsize::new(0),
        assignee_calls: AtomicUsize::new(0),
      }
    }

    pub(crate) fn failing() -> Self {
      Self {
        fail_matters: true,
        fail_assignees: true,
        ..Self::new()
      }
    }

    pub(crate) fn matter_calls(&self) -> usize {
      self.matter_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn assignee_calls(&self) -> usize {
      self.assignee_calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl RecordSource for StubSource {
    async fn fetch_matters_list(&self) -> Result<Vec<ApiMatterRecord>> {
      self.matter_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_matters {
        return Err(eyre!("matters endpoint unavailable"));
      }
      Ok(self.matter_records.clone())
    }

    async fn fetch_assignee_list(&self) -> Result<Vec<String>> {
      self.assignee_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_assignees {
        return Err(eyre!("assignees endpoint unavailable"));
      }
      Ok(self.assignees.clone())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::test_support::StubSource;
  use super::*;
  use crate::cache::CacheSource;
  use chrono::{Duration, Utc};

  fn cache_with(source: StubSource) -> (Arc<StubSource>, DataCache) {
    let source = Arc::new(source);
    let cache = DataCache::new(source.clone() as Arc<dyn RecordSource>);
    (source, cache)
  }

  fn matter(id: &str, name: &str) -> Matter {
    Matter {
      id: id.to_string(),
      name: name.to_string(),
      case_type: String::new(),
      client: String::new(),
    }
  }

  #[tokio::test]
  async fn matters_are_projected_and_sorted() {
    let (_source, cache) = cache_with(StubSource::new());

    let result = cache.fetch_matters(false).await;

    assert_eq!(result.source, CacheSource::Network);
    let names: Vec<&str> = result.data.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
    // rec1 has no Matter Name and projects its client as the name.
    assert_eq!(result.data[0].id, "rec1");
    assert_eq!(result.data[0].client, "Alpha");
    assert_eq!(result.data[1].case_type, "Probate");
  }

  #[tokio::test]
  async fn second_read_is_served_from_cache() {
    let (source, cache) = cache_with(StubSource::new());

    cache.fetch_matters(false).await;
    let result = cache.fetch_matters(false).await;

    assert_eq!(source.matter_calls(), 1);
    assert_eq!(result.source, CacheSource::CacheFresh);
  }

  #[tokio::test]
  async fn force_refetches_a_fresh_cache() {
    let (source, cache) = cache_with(StubSource::new());

    cache.fetch_matters(false).await;
    let result = cache.fetch_matters(true).await;

    assert_eq!(source.matter_calls(), 2);
    assert_eq!(result.source, CacheSource::Network);
  }

  #[tokio::test]
  async fn stale_matters_are_refetched() {
    let (source, cache) = cache_with(StubSource::new());
    cache
      .matters
      .seed(vec![matter("old", "Old")], Utc::now() - Duration::seconds(301))
      .await;

    let result = cache.fetch_matters(false).await;

    assert_eq!(source.matter_calls(), 1);
    assert_eq!(result.source, CacheSource::Network);
    assert_eq!(result.data.len(), 2);
  }

  #[tokio::test]
  async fn failed_fetch_keeps_previous_matters() {
    let (_source, cache) = cache_with(StubSource::failing());
    let seeded = vec![matter("rec9", "Kept")];
    let seeded_at = Utc::now() - Duration::seconds(400);
    cache.matters.seed(seeded.clone(), seeded_at).await;

    let result = cache.fetch_matters(false).await;

    assert_eq!(result.data, seeded);
    assert_eq!(result.source, CacheSource::Offline);
    let state = cache.matters.state.read().await;
    assert_eq!(state.last_fetched_at, Some(seeded_at));
  }

  #[tokio::test]
  async fn failure_with_empty_cache_resolves_to_empty() {
    let (_source, cache) = cache_with(StubSource::failing());

    let matters = cache.fetch_matters(false).await;
    let assignees = cache.fetch_assignees(false).await;

    assert!(matters.data.is_empty());
    assert!(matters.error.is_some());
    assert!(assignees.data.is_empty());
  }

  #[tokio::test]
  async fn refresh_force_fetches_both_collections() {
    let (source, cache) = cache_with(StubSource::new());
    cache.fetch_matters(false).await;
    cache.fetch_assignees(false).await;

    let outcome = cache.refresh_cache().await;

    assert_eq!(source.matter_calls(), 2);
    assert_eq!(source.assignee_calls(), 2);
    assert_eq!(outcome.matters.source, CacheSource::Network);
    assert_eq!(outcome.assignees.source, CacheSource::Network);
  }

  #[tokio::test]
  async fn refresh_updates_the_surviving_collection() {
    let mut stub = StubSource::new();
    stub.fail_matters = true;
    let (_source, cache) = cache_with(stub);

    let outcome = cache.refresh_cache().await;

    assert_eq!(outcome.matters.source, CacheSource::Offline);
    assert_eq!(outcome.assignees.source, CacheSource::Network);
    assert_eq!(outcome.assignees.data, vec!["Dana", "Lee"]);

    let assignees_state = cache.assignees.state.read().await;
    assert!(assignees_state.last_fetched_at.is_some());
    let matters_state = cache.matters.state.read().await;
    assert!(matters_state.last_fetched_at.is_none());
  }

  #[tokio::test]
  async fn loading_is_clear_after_reads() {
    let (_source, cache) = cache_with(StubSource::new());

    cache.fetch_matters(false).await;
    cache.fetch_assignees(false).await;

    assert!(!cache.matters_loading());
    assert!(!cache.assignees_loading());
  }
}
