//! Raw tracker issue → typed record
//!
//! Every optional or nested field is resolved here exactly once, so nothing
//! downstream re-checks presence. Malformed fields fall back to their
//! defaults and are logged; normalization never fails.

use super::record::{ChildIssue, IssueRecord, ParentIssue, UNASSIGNED};
use super::timestamp::Timestamp;
use crate::tracker::RawIssue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Ids of the instance-specific custom fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldMapping {
    pub story_point: String,
    pub category: String,
    pub assignees: String,
    pub start_date: String,
    pub end_date: String,
    pub epic: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            story_point: "customfield_10016".to_string(),
            category: "customfield_10100".to_string(),
            assignees: "customfield_10101".to_string(),
            start_date: "customfield_10102".to_string(),
            end_date: "customfield_10103".to_string(),
            epic: "customfield_10001".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssueNormalizer {
    fields: FieldMapping,
    team: String,
}

impl IssueNormalizer {
    pub fn new(fields: FieldMapping, team: impl Into<String>) -> Self {
        Self {
            fields,
            team: team.into(),
        }
    }

    pub fn normalize_parent(&self, raw: &RawIssue) -> ParentIssue {
        ParentIssue {
            record: self.record(raw, raw.id.clone()),
            epic_key: raw
                .field(&self.fields.epic)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            story_point: story_point(raw, &self.fields.story_point),
            created_at: timestamp(raw, "created"),
        }
    }

    /// Children are fetched by parent id, so their id is the parent's
    pub fn normalize_child(&self, raw: &RawIssue, parent_id: &str) -> ChildIssue {
        ChildIssue {
            record: self.record(raw, parent_id.to_string()),
            category: category(raw, &self.fields.category),
        }
    }

    fn record(&self, raw: &RawIssue, id: String) -> IssueRecord {
        IssueRecord {
            key: raw.key.clone(),
            id,
            sprint: latest_sprint_label(raw),
            issue_type: nested_str(raw, "issuetype", "name").unwrap_or_default(),
            status: nested_str(raw, "status", "name").unwrap_or_default(),
            summary: raw
                .field("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            team: self.team.clone(),
            assignee: nested_str(raw, "assignee", "displayName")
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            assignees: assignees(raw, &self.fields.assignees),
            start_at: timestamp(raw, &self.fields.start_date),
            end_at: timestamp(raw, &self.fields.end_date),
        }
    }
}

fn nested_str(raw: &RawIssue, field: &str, key: &str) -> Option<String> {
    raw.field(field)?
        .get(key)?
        .as_str()
        .map(str::to_string)
}

/// Labels containing "Sprint", greatest in plain string order.
///
/// This is lexicographic, not numeric: "Sprint 9" outranks "Sprint 10".
pub fn latest_sprint_label(raw: &RawIssue) -> String {
    let mut sprints: Vec<&str> = raw
        .field("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .filter(|label| label.contains("Sprint"))
                .collect()
        })
        .unwrap_or_default();

    sprints.sort_unstable_by(|a, b| b.cmp(a));
    sprints.first().map(|s| s.to_string()).unwrap_or_default()
}

fn story_point(raw: &RawIssue, field: &str) -> f64 {
    match raw.field(field) {
        None => 0.0,
        Some(value) => match value.as_f64() {
            Some(points) if points.is_finite() && points >= 0.0 => points,
            _ => {
                warn!(issue = %raw.key, value = %value, "Ignoring invalid story point");
                0.0
            }
        },
    }
}

fn category(raw: &RawIssue, field: &str) -> String {
    raw.field(field)
        .and_then(|category| category.get("value"))
        .and_then(Value::as_str)
        .unwrap_or(UNASSIGNED)
        .to_string()
}

fn assignees(raw: &RawIssue, field: &str) -> String {
    match raw.field(field).and_then(Value::as_array) {
        Some(users) => users
            .iter()
            .map(|user| {
                user.get("displayName")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(";"),
        None => UNASSIGNED.to_string(),
    }
}

fn timestamp(raw: &RawIssue, field: &str) -> Timestamp {
    let value = raw.field(field).and_then(Value::as_str);
    Timestamp::parse(value).unwrap_or_else(|e| {
        warn!(issue = %raw.key, field, error = %e, "Unparseable timestamp, treating as unset");
        Timestamp::Unset
    })
}
