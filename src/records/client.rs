//! HTTP client for the record-service proxy.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::BackendConfig;

use super::api_types::{ApiMatterRecord, ApiMattersResponse};
use super::source::RecordSource;

const MATTERS_ENDPOINT: &str = "/api/matters";
const ASSIGNEES_ENDPOINT: &str = "/api/assignees";

/// Record-service proxy client.
#[derive(Clone)]
pub struct RecordsClient {
  http: Client,
  base_url: Url,
}

impl RecordsClient {
  /// Create a new client against the configured proxy.
  ///
  /// The session token is attached as a bearer credential when present;
  /// without one the proxy rejects reads and the cache keeps serving
  /// whatever it already holds.
  pub fn new(config: &BackendConfig, token: Option<&str>) -> Result<Self> {
    let base_url = Url::parse(&config.url)
      .map_err(|e| eyre!("Invalid backend URL {}: {}", config.url, e))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
      let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| eyre!("Invalid session token: {}", e))?;
      headers.insert(AUTHORIZATION, value);
    }

    let http = Client::builder()
      .default_headers(headers)
      .timeout(config.request_timeout())
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  /// GET an endpoint and parse the JSON response, checking the status.
  async fn get_json<T: DeserializeOwned>(
    &self,
    endpoint: &str,
    query: &[(&str, &str)],
  ) -> Result<T> {
    let url = self
      .base_url
      .join(endpoint)
      .map_err(|e| eyre!("Invalid endpoint {}: {}", endpoint, e))?;

    let mut request = self.http.get(url);
    if !query.is_empty() {
      request = request.query(query);
    }

    let response = request
      .send()
      .await
      .map_err(|e| eyre!("Request to {} failed: {}", endpoint, e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(eyre!("HTTP {} from {}: {}", status, endpoint, body));
    }

    response
      .json::<T>()
      .await
      .map_err(|e| eyre!("Failed to parse response from {}: {}", endpoint, e))
  }
}

#[async_trait]
impl RecordSource for RecordsClient {
  async fn fetch_matters_list(&self) -> Result<Vec<ApiMatterRecord>> {
    let mut all_records = Vec::new();
    let mut offset: Option<String> = None;

    loop {
      let page: ApiMattersResponse = match &offset {
        Some(cursor) => {
          self
            .get_json(MATTERS_ENDPOINT, &[("offset", cursor.as_str())])
            .await?
        }
        None => self.get_json(MATTERS_ENDPOINT, &[]).await?,
      };

      all_records.extend(page.records);

      match page.offset {
        Some(next) => offset = Some(next),
        None => break,
      }
    }

    Ok(all_records)
  }

  async fn fetch_assignee_list(&self) -> Result<Vec<String>> {
    self.get_json(ASSIGNEES_ENDPOINT, &[]).await
  }
}
