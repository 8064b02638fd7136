use crate::config::ObservabilityConfig;
use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so command output on stdout stays machine readable.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!(json = config.json_logs, "Telemetry initialized");
    Ok(())
}

/// Generate a correlation ID linking every event of one run
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Root span for a collection run
pub fn create_run_span(sprint: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "sprint_run",
        run.id = correlation_id,
        sprint = sprint,
    )
}

/// Span around the work done for one parent issue
pub fn create_issue_span(issue_key: &str) -> tracing::Span {
    tracing::info_span!("parent_issue", issue.key = issue_key)
}
