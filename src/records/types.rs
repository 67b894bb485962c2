use crate::records::api_types::ApiMatterRecord;

/// A staff member's display name.
pub type Assignee = String;

/// A matter projected for list views and pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matter {
  pub id: String,
  pub name: String,
  pub case_type: String,
  pub client: String,
}

impl Matter {
  /// Project a raw record into a list-view matter.
  ///
  /// The display name prefers the "Matter Name" field, falling back to
  /// "Client", then "Unknown". Lead records frequently carry only a
  /// client name.
  pub fn from_record(record: &ApiMatterRecord) -> Self {
    let name = record
      .field_str("Matter Name")
      .or_else(|| record.field_str("Client"))
      .unwrap_or("Unknown")
      .to_string();

    Self {
      id: record.id.clone(),
      name,
      case_type: record
        .field_str("Type of Case")
        .unwrap_or_default()
        .to_string(),
      client: record.field_str("Client").unwrap_or_default().to_string(),
    }
  }
}

/// Project a raw batch into matters sorted by display name, ascending
/// and case-insensitive.
pub fn project_matters(records: &[ApiMatterRecord]) -> Vec<Matter> {
  let mut matters: Vec<Matter> = records.iter().map(Matter::from_record).collect();
  matters.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
  matters
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::Value;
  use std::collections::HashMap;

  fn record(id: &str, fields: &[(&str, &str)]) -> ApiMatterRecord {
    ApiMatterRecord {
      id: id.to_string(),
      fields: fields
        .iter()
        .map(|(name, value)| ((*name).to_string(), Value::String((*value).to_string())))
        .collect(),
    }
  }

  #[test]
  fn name_falls_back_to_client_then_unknown() {
    let with_name = record("1", &[("Matter Name", "Estate of Smith")]);
    assert_eq!(Matter::from_record(&with_name).name, "Estate of Smith");

    let client_only = record("2", &[("Client", "Jones")]);
    assert_eq!(Matter::from_record(&client_only).name, "Jones");

    let bare = record("3", &[]);
    let matter = Matter::from_record(&bare);
    assert_eq!(matter.name, "Unknown");
    assert_eq!(matter.case_type, "");
    assert_eq!(matter.client, "");
  }

  #[test]
  fn non_string_name_field_is_ignored() {
    let mut fields = HashMap::new();
    fields.insert("Matter Name".to_string(), Value::Number(7.into()));
    fields.insert("Client".to_string(), Value::String("Nguyen".to_string()));
    let record = ApiMatterRecord {
      id: "4".to_string(),
      fields,
    };

    assert_eq!(Matter::from_record(&record).name, "Nguyen");
  }

  #[test]
  fn projection_sorts_case_insensitively() {
    let records = vec![
      record("1", &[("Matter Name", "zeta")]),
      record("2", &[("Matter Name", "Alpha")]),
      record("3", &[("Matter Name", "beta")]),
    ];

    let names: Vec<String> = project_matters(&records)
      .into_iter()
      .map(|m| m.name)
      .collect();
    assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
  }
}
