use super::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Sentinel for ownership and category fields the tracker left empty
pub const UNASSIGNED: &str = "unassigned";

/// Fields shared by parent and child issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    pub id: String,
    pub sprint: String,
    pub issue_type: String,
    pub status: String,
    pub summary: String,
    pub team: String,
    pub assignee: String,
    /// Display names of all assignees joined with `;`
    pub assignees: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

/// A top-level work item carrying the story-point estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentIssue {
    pub record: IssueRecord,
    pub epic_key: String,
    pub story_point: f64,
    pub created_at: Timestamp,
}

/// A sub-task logging time against its parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildIssue {
    /// `record.id` holds the parent's id
    pub record: IssueRecord,
    pub category: String,
}

impl ParentIssue {
    pub fn key(&self) -> &str {
        &self.record.key
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }
}

impl ChildIssue {
    pub fn key(&self) -> &str {
        &self.record.key
    }

    pub fn parent_id(&self) -> &str {
        &self.record.id
    }
}
