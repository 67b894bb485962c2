//! Seam between the cached collections and the record-service backend.

use async_trait::async_trait;
use color_eyre::Result;

use super::api_types::ApiMatterRecord;

/// Backend the cached collections are loaded from.
///
/// Implemented by the HTTP client in production; tests drive the cache
/// with in-memory fakes. Failures are plain `Err`s here — the cache
/// coordinator is what absorbs them.
#[async_trait]
pub trait RecordSource: Send + Sync {
  /// Fetch the full raw matter list.
  async fn fetch_matters_list(&self) -> Result<Vec<ApiMatterRecord>>;

  /// Fetch the staff assignee list (display names).
  async fn fetch_assignee_list(&self) -> Result<Vec<String>>;
}
