//! Sprint collection pipeline
//!
//! Fetches the sprint's parent issues, then each parent's children, and
//! aggregates every pair. Nothing reaches the sink until aggregation has
//! finished for the whole sprint.

use crate::calendar::WorkCalendar;
use crate::issues::{ChildIssue, IssueNormalizer, ParentIssue};
use crate::metrics::{ChildMetrics, MetricsAggregator, ParentMetrics, SprintSummary};
use crate::observability::OperationTimer;
use crate::sink::{RecordSink, SinkError, WriteSummary};
use crate::telemetry::create_issue_span;
use crate::tracker::{IssueSource, QueryTemplates, TrackerError};
use chrono::NaiveDateTime;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn, Instrument};

/// What to do when a parent's children cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run; nothing is written
    #[default]
    Abort,
    /// Log the parent, leave it out of the output and carry on
    Skip,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to fetch parent issues: {0}")]
    ParentFetch(#[source] TrackerError),
    #[error("Failed to fetch children of {parent}: {source}")]
    ChildFetch {
        parent: String,
        #[source]
        source: TrackerError,
    },
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Output of one collection run, in parent query order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SprintRun {
    pub parents: Vec<ParentMetrics>,
    pub children: Vec<ChildMetrics>,
    /// Keys of parents left out under [`FailurePolicy::Skip`]
    pub failed: Vec<String>,
}

impl SprintRun {
    pub fn summary(&self) -> SprintSummary {
        SprintSummary::from_metrics(&self.parents, &self.children).with_failures(self.failed.clone())
    }
}

pub struct SprintPipeline<'a> {
    source: Arc<dyn IssueSource>,
    normalizer: IssueNormalizer,
    calendar: &'a WorkCalendar,
    queries: QueryTemplates,
    concurrency: usize,
    policy: FailurePolicy,
}

impl<'a> SprintPipeline<'a> {
    pub fn new(
        source: Arc<dyn IssueSource>,
        normalizer: IssueNormalizer,
        calendar: &'a WorkCalendar,
        queries: QueryTemplates,
    ) -> Self {
        Self {
            source,
            normalizer,
            calendar,
            queries,
            concurrency: 1,
            policy: FailurePolicy::default(),
        }
    }

    /// Number of parents whose children are fetched at the same time
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(&self, now: NaiveDateTime) -> Result<SprintRun, PipelineError> {
        let timer = OperationTimer::new("sprint_collection");
        let parent_query = self.queries.parent_query();
        debug!(jql = %parent_query, "Fetching parent issues");

        let raw_parents = self
            .source
            .search(&parent_query)
            .await
            .map_err(PipelineError::ParentFetch)?;
        info!(
            sprint = %self.queries.sprint(),
            parent_count = raw_parents.len(),
            concurrency = self.concurrency,
            "Fetched parent issues"
        );

        let parents: Vec<ParentIssue> = raw_parents
            .iter()
            .map(|raw| self.normalizer.normalize_parent(raw))
            .collect();

        let aggregator = MetricsAggregator::new(self.calendar, now);
        let mut run = SprintRun::default();

        let mut fetches = stream::iter(parents)
            .map(|parent| async move {
                let span = create_issue_span(&parent.record.key);
                let children = self.fetch_children(&parent).instrument(span).await;
                (parent, children)
            })
            .buffered(self.concurrency);

        while let Some((parent, children)) = fetches.next().await {
            match children {
                Ok(children) => {
                    let (parent_metrics, child_metrics) = aggregator.aggregate(parent, children);
                    run.parents.push(parent_metrics);
                    run.children.extend(child_metrics);
                }
                Err(source) => match self.policy {
                    FailurePolicy::Abort => {
                        return Err(PipelineError::ChildFetch {
                            parent: parent.record.key,
                            source,
                        });
                    }
                    FailurePolicy::Skip => {
                        warn!(
                            issue_key = %parent.record.key,
                            error = %source,
                            "Skipping parent whose children could not be fetched"
                        );
                        run.failed.push(parent.record.key);
                    }
                },
            }
        }

        let duration_ms = timer.finish();
        info!(
            parents = run.parents.len(),
            children = run.children.len(),
            failed = run.failed.len(),
            duration_ms = duration_ms,
            "Sprint aggregation complete"
        );
        Ok(run)
    }

    /// Run the pipeline, then upsert everything in one sink write
    pub async fn run_and_write(
        &self,
        now: NaiveDateTime,
        sink: &dyn RecordSink,
    ) -> Result<(SprintRun, WriteSummary), PipelineError> {
        let run = self.run(now).await?;
        let written = sink.write(&run.parents, &run.children).await?;
        Ok((run, written))
    }

    async fn fetch_children(&self, parent: &ParentIssue) -> Result<Vec<ChildIssue>, TrackerError> {
        let parent_id = parent.id();
        let raw_children = self.source.search(&self.queries.child_query(parent_id)).await?;
        debug!(child_count = raw_children.len(), "Fetched child issues");

        Ok(raw_children
            .iter()
            .map(|raw| self.normalizer.normalize_child(raw, parent_id))
            .collect())
    }
}
