// sprint-metrics library - business-hours sprint productivity metrics
// This exposes the core components for testing and integration

pub mod calendar;
pub mod cli;
pub mod config;
pub mod issues;
pub mod metrics;
pub mod observability;
pub mod pipeline;
pub mod sink;
pub mod telemetry;
pub mod tracker;

// Re-export key types for easy access
pub use calendar::{CalendarError, HolidayCalendar, HolidaySet, WorkCalendar, WorkHours};
pub use config::{AppConfig, ConfigError};
pub use issues::{ChildIssue, FieldMapping, IssueNormalizer, IssueRecord, ParentIssue, Timestamp};
pub use metrics::{ChildMetrics, MetricsAggregator, ParentMetrics, ReleaseTracking, SprintSummary};
pub use observability::{OperationTimer, TrackerApiMetrics};
pub use pipeline::{FailurePolicy, PipelineError, SprintPipeline, SprintRun};
pub use sink::{RecordSink, SinkError, WorkbookFileSink, WriteSummary};
pub use telemetry::{create_issue_span, create_run_span, generate_correlation_id, init_telemetry};
pub use tracker::{IssueSource, JiraClient, QueryTemplates, RawIssue, TrackerError};
