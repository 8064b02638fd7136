//! Issue tracker integration
//!
//! The pipeline only depends on the [`IssueSource`] trait; [`JiraClient`] is
//! the HTTP implementation used by the binary.

pub mod client;
pub mod errors;
pub mod query;
pub mod types;

pub use client::JiraClient;
pub use errors::TrackerError;
pub use query::QueryTemplates;
pub use types::{RawIssue, SearchPage};

use async_trait::async_trait;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// Source of raw issues, queried with a JQL expression
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Run a search and return every matching issue, all pages included
    async fn search(&self, jql: &str) -> Result<Vec<RawIssue>, TrackerError>;
}
