use crate::config::AppConfig;
use crate::issues::IssueNormalizer;
use crate::pipeline::{SprintPipeline, SprintRun};
use crate::sink::{RecordSink, WorkbookFileSink};
use crate::telemetry::{create_run_span, generate_correlation_id};
use crate::tracker::JiraClient;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, Instrument};

pub struct CollectCommand {
    pub config: AppConfig,
    pub sprint: Option<String>,
    pub dry_run: bool,
    pub json: bool,
}

impl CollectCommand {
    pub fn new(config: AppConfig, sprint: Option<String>) -> Self {
        Self {
            config,
            sprint,
            dry_run: false,
            json: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub async fn execute(&self) -> Result<()> {
        let mut config = self.config.clone();
        if let Some(sprint) = &self.sprint {
            config.tracker.sprint = sprint.clone();
        }
        config.validate().context("Configuration is not valid")?;

        let calendar = config.work_calendar()?;
        let client = JiraClient::new(&config.tracker).context("Failed to build tracker client")?;
        let api_metrics = client.metrics();
        let normalizer = IssueNormalizer::new(config.tracker.fields.clone(), config.tracker.team.clone());

        let pipeline = SprintPipeline::new(
            Arc::new(client),
            normalizer,
            &calendar,
            config.query_templates(),
        )
        .with_concurrency(config.pipeline.concurrency)
        .with_failure_policy(config.pipeline.failure_policy);

        let correlation_id = generate_correlation_id();
        let span = create_run_span(&config.tracker.sprint, &correlation_id);
        let now = chrono::Local::now().naive_local();

        if !self.json {
            println!("📊 SPRINT METRICS COLLECTION");
            println!("============================");
            println!("🏃 Sprint: {}", config.tracker.sprint);
            println!("🆔 Run: {correlation_id}");
            println!();
        }

        let run: SprintRun = if self.dry_run {
            let run = pipeline.run(now).instrument(span).await?;
            if !self.json {
                println!("🧪 Dry run: workbook not written");
            }
            run
        } else {
            let sink = WorkbookFileSink::new(&config.sink);
            let (run, written) = pipeline
                .run_and_write(now, &sink as &dyn RecordSink)
                .instrument(span)
                .await?;
            if !self.json {
                println!(
                    "💾 Workbook {}: {} parent(s) inserted, {} updated; {} child row(s) inserted, {} updated",
                    sink.path().display(),
                    written.parents_inserted,
                    written.parents_updated,
                    written.children_inserted,
                    written.children_updated
                );
            }
            run
        };

        api_metrics.log_stats();
        info!(run_id = %correlation_id, "Collection finished");

        let summary = run.summary();
        if self.json {
            println!("{}", summary.to_json()?);
        } else {
            println!();
            print!("{}", summary.format_report());
        }
        Ok(())
    }
}
