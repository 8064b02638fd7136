//! Record sink
//!
//! Enriched records are upserted into keyed worksheets: a row whose key is
//! already present is overwritten by column position, anything else is
//! appended.

pub mod errors;
pub mod file;
pub mod layout;
pub mod sheet;

pub use errors::SinkError;
pub use file::WorkbookFileSink;
pub use layout::{child_values, parent_values, FieldValue, SheetLayout};
pub use sheet::{Cell, UpsertOutcome, Workbook, Worksheet};

use crate::metrics::{ChildMetrics, ParentMetrics};
use async_trait::async_trait;
use serde::Serialize;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub parents_inserted: usize,
    pub parents_updated: usize,
    pub children_inserted: usize,
    pub children_updated: usize,
}

#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn write(
        &self,
        parents: &[ParentMetrics],
        children: &[ChildMetrics],
    ) -> Result<WriteSummary, SinkError>;
}
