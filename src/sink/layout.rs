//! Column layouts for the parent and child sheets
//!
//! Records are flattened into values in column order. The layout then
//! coerces by position: the id column becomes an integer and timestamp
//! columns lose their offset, with unset timestamps written as empty cells.

use super::sheet::Cell;
use crate::issues::Timestamp;
use crate::metrics::{ChildMetrics, ParentMetrics};
use std::ops::RangeInclusive;
use tracing::warn;

/// A record field before sheet coercion
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Timestamp(Timestamp),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        FieldValue::Timestamp(value)
    }
}

#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub headers: &'static [&'static str],
    pub id_column: usize,
    pub timestamp_columns: RangeInclusive<usize>,
}

pub const PARENT_HEADERS: &[&str] = &[
    "key",
    "id",
    "epic_key",
    "sprint",
    "issue_type",
    "status",
    "summary",
    "story_point",
    "team",
    "assignee",
    "assignees",
    "created_date",
    "start_date",
    "end_date",
    "time_spent",
    "process_time",
    "cycle_time_story_point",
    "cycle_time",
    "lead_time",
    "release_created_date",
    "release_start_date",
    "release_end_date",
    "release_count",
];

pub const CHILD_HEADERS: &[&str] = &[
    "key",
    "id",
    "sprint",
    "issue_type",
    "status",
    "summary",
    "category",
    "team",
    "assignee",
    "assignees",
    "start_date",
    "end_date",
    "process_time",
];

impl SheetLayout {
    pub fn parent() -> Self {
        Self {
            headers: PARENT_HEADERS,
            id_column: 1,
            timestamp_columns: 11..=13,
        }
    }

    pub fn child() -> Self {
        Self {
            headers: CHILD_HEADERS,
            id_column: 1,
            timestamp_columns: 10..=11,
        }
    }

    pub fn coerce(&self, values: Vec<FieldValue>) -> Vec<Cell> {
        values
            .into_iter()
            .enumerate()
            .map(|(column, value)| self.coerce_cell(column, value))
            .collect()
    }

    fn coerce_cell(&self, column: usize, value: FieldValue) -> Cell {
        if column == self.id_column {
            return match value {
                FieldValue::Text(text) => match text.trim().parse::<i64>() {
                    Ok(id) => Cell::Integer(id),
                    Err(_) => {
                        warn!(id = %text, "Non-numeric issue id written as text");
                        Cell::Text(text)
                    }
                },
                other => plain_cell(other),
            };
        }

        if self.timestamp_columns.contains(&column) {
            if let FieldValue::Timestamp(timestamp) = &value {
                return timestamp.wall_clock().map_or(Cell::Empty, Cell::DateTime);
            }
        }

        plain_cell(value)
    }
}

fn plain_cell(value: FieldValue) -> Cell {
    match value {
        FieldValue::Text(text) => Cell::Text(text),
        FieldValue::Number(number) => Cell::Number(number),
        FieldValue::Integer(integer) => Cell::Integer(integer),
        FieldValue::Timestamp(Timestamp::Unset) => Cell::Empty,
        FieldValue::Timestamp(Timestamp::At(instant)) => Cell::Text(instant.to_rfc3339()),
    }
}

/// Parent record fields in sheet column order
pub fn parent_values(metrics: &ParentMetrics) -> Vec<FieldValue> {
    let parent = &metrics.issue;
    let record = &parent.record;
    vec![
        record.key.as_str().into(),
        record.id.as_str().into(),
        parent.epic_key.as_str().into(),
        record.sprint.as_str().into(),
        record.issue_type.as_str().into(),
        record.status.as_str().into(),
        record.summary.as_str().into(),
        parent.story_point.into(),
        record.team.as_str().into(),
        record.assignee.as_str().into(),
        record.assignees.as_str().into(),
        parent.created_at.into(),
        record.start_at.into(),
        record.end_at.into(),
        metrics.time_spent.into(),
        metrics.process_time.into(),
        metrics.cycle_time_per_point.into(),
        metrics.cycle_time.into(),
        metrics.lead_time.into(),
        metrics.release.created_at.into(),
        metrics.release.start_at.into(),
        metrics.release.end_at.into(),
        FieldValue::Integer(i64::from(metrics.release.count)),
    ]
}

/// Child record fields in sheet column order
pub fn child_values(metrics: &ChildMetrics) -> Vec<FieldValue> {
    let child = &metrics.issue;
    let record = &child.record;
    vec![
        record.key.as_str().into(),
        record.id.as_str().into(),
        record.sprint.as_str().into(),
        record.issue_type.as_str().into(),
        record.status.as_str().into(),
        record.summary.as_str().into(),
        child.category.as_str().into(),
        record.team.as_str().into(),
        record.assignee.as_str().into(),
        record.assignees.as_str().into(),
        record.start_at.into(),
        record.end_at.into(),
        metrics.process_time.into(),
    ]
}
