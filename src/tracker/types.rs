use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An issue exactly as the tracker returned it.
///
/// Custom fields vary per Jira instance, so `fields` stays untyped here and
/// is resolved by the normalizer using the configured field ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIssue {
    pub key: String,
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawIssue {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }
}

/// One page of a `search` response
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "startAt", default)]
    pub start_at: u64,
    #[serde(rename = "maxResults", default)]
    pub max_results: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}
