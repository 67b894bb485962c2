//! Serde-deserializable types matching the record-service proxy responses.
//!
//! These types are separate from domain types to allow clean
//! deserialization while keeping domain types focused on application
//! needs. Record fields are dynamically shaped: the proxy passes the
//! store's field map through without enforcing a schema client-side.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// A raw matter record: an opaque id plus a free-form field map.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMatterRecord {
  pub id: String,
  #[serde(default)]
  pub fields: HashMap<String, Value>,
}

impl ApiMatterRecord {
  /// Read a field as a string, if present and string-valued.
  pub fn field_str(&self, name: &str) -> Option<&str> {
    self.fields.get(name).and_then(Value::as_str)
  }
}

/// One page of the matter list. `offset` is the cursor for the next
/// page, absent on the last page.
#[derive(Debug, Deserialize)]
pub struct ApiMattersResponse {
  #[serde(default)]
  pub records: Vec<ApiMatterRecord>,
  pub offset: Option<String>,
}
