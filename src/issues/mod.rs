// Normalized issue records and the raw-to-record mapping

pub mod normalize;
pub mod record;
pub mod timestamp;

pub use normalize::{latest_sprint_label, FieldMapping, IssueNormalizer};
pub use record::{ChildIssue, IssueRecord, ParentIssue, UNASSIGNED};
pub use timestamp::Timestamp;
