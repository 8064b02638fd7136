use crate::calendar::{CalendarError, HolidaySet, WorkCalendar, WorkHours};
use crate::issues::FieldMapping;
use crate::pipeline::FailurePolicy;
use crate::tracker::QueryTemplates;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "sprint-metrics.toml";
const ENV_PREFIX: &str = "SPRINT_METRICS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to write configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub calendar: CalendarConfig,
    pub sink: SinkConfig,
    pub pipeline: PipelineConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// REST API root, e.g. `https://example.atlassian.net/rest/api/2/`
    pub base_url: String,
    /// Account used for basic auth (can be set via JIRA_USERNAME)
    pub username: Option<String>,
    /// API token or password (can be set via JIRA_API_TOKEN)
    pub api_token: Option<String>,
    /// Sprint clause every query starts with
    pub sprint: String,
    /// Appended to the sprint clause to select parent issues
    pub parent_jql: String,
    /// Appended to the sprint clause, followed by the parent id, to select children
    pub child_jql: String,
    /// Team name stamped on every record
    pub team: String,
    pub page_size: u32,
    pub timeout_seconds: u64,
    pub rate_limit: RateLimitConfig,
    pub fields: FieldMapping,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: None,
            api_token: None,
            sprint: String::new(),
            parent_jql: " AND issuetype = Story".to_string(),
            child_jql: " AND issuetype = Sub-task AND parent = ".to_string(),
            team: String::new(),
            page_size: 100,
            timeout_seconds: 30,
            rate_limit: RateLimitConfig::default(),
            fields: FieldMapping::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_capacity: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 5,
            burst_capacity: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub work_start: String,
    pub work_end: String,
    pub break_start: String,
    pub break_end: String,
    /// Holiday dates as YYYY-MM-DD
    pub holidays: Vec<String>,
    /// Optional file with one holiday per line (`date[,name]`)
    pub holidays_file: Option<PathBuf>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            work_start: "10:00".to_string(),
            work_end: "19:00".to_string(),
            break_start: "12:00".to_string(),
            break_end: "13:00".to_string(),
            holidays: Vec::new(),
            holidays_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Workbook file the enriched records are upserted into
    pub path: PathBuf,
    pub parent_sheet: String,
    pub child_sheet: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sprint-metrics.json"),
            parent_sheet: "parent_data".to_string(),
            child_sheet: "child_data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Parents whose children are fetched concurrently
    pub concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (`sprint-metrics.toml` or an explicit path)
    /// 3. Environment variables (prefixed with SPRINT_METRICS__, `__` between sections)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
            }
            None => {}
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // Credentials commonly live in the environment under tracker-neutral names
        if app_config.tracker.username.is_none() {
            app_config.tracker.username = std::env::var("JIRA_USERNAME").ok();
        }
        if app_config.tracker.api_token.is_none() {
            app_config.tracker.api_token = std::env::var("JIRA_API_TOKEN").ok();
        }

        Ok(app_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<(), dotenvy::Error> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    /// Check everything a run needs before any request is made
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.work_calendar()?;

        if self.tracker.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("tracker.base_url"));
        }
        if self.tracker.sprint.trim().is_empty() {
            return Err(ConfigError::Missing("tracker.sprint"));
        }
        if self.pipeline.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "pipeline.concurrency",
                message: "must be at least 1".to_string(),
            });
        }
        if self.sink.parent_sheet == self.sink.child_sheet {
            return Err(ConfigError::Invalid {
                field: "sink.child_sheet",
                message: "parent and child sheets must differ".to_string(),
            });
        }
        Ok(())
    }

    /// Build the immutable work calendar
    pub fn work_calendar(&self) -> Result<WorkCalendar, ConfigError> {
        let calendar = &self.calendar;
        let hours = WorkHours::parse(
            &calendar.work_start,
            &calendar.work_end,
            &calendar.break_start,
            &calendar.break_end,
        )?;

        let mut holidays = HolidaySet::from_dates(&calendar.holidays)?;
        if let Some(path) = &calendar.holidays_file {
            holidays = holidays.merge(HolidaySet::load_file(path)?);
        }

        Ok(WorkCalendar::new(hours, holidays)?)
    }

    pub fn query_templates(&self) -> QueryTemplates {
        QueryTemplates::new(
            self.tracker.sprint.clone(),
            self.tracker.parent_jql.clone(),
            self.tracker.child_jql.clone(),
        )
    }

    /// Copy safe to print: credentials are masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.tracker.api_token.is_some() {
            copy.tracker.api_token = Some("********".to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
