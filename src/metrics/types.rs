use crate::issues::{ChildIssue, ParentIssue, Timestamp};
use serde::{Deserialize, Serialize};

/// Release dates and count, filled in by later reporting steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseTracking {
    pub created_at: Timestamp,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentMetrics {
    pub issue: ParentIssue,
    /// Business hours logged by all children
    pub time_spent: f64,
    /// Hours per story point
    pub process_time: f64,
    pub cycle_time: f64,
    pub cycle_time_per_point: f64,
    pub lead_time: f64,
    pub release: ReleaseTracking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildMetrics {
    pub issue: ChildIssue,
    /// Business hours between the child's own start and end
    pub process_time: f64,
}

impl ParentMetrics {
    pub fn key(&self) -> &str {
        self.issue.key()
    }
}

impl ChildMetrics {
    pub fn key(&self) -> &str {
        self.issue.key()
    }
}
