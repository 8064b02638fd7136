use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "sprint-metrics")]
#[command(about = "Business-hours productivity metrics for tracker sprints")]
#[command(long_about = "sprint-metrics pulls a sprint's stories and sub-tasks from Jira, measures \
                       the working hours spent on each one under a configurable work calendar, and \
                       upserts the results into a keyed workbook. Start with 'sprint-metrics config' \
                       to check your settings.")]
pub struct Cli {
    /// Configuration file (defaults to ./sprint-metrics.toml when present)
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the sprint, compute metrics and write them to the workbook
    Collect {
        /// Override the configured sprint clause
        #[arg(long, help = "JQL sprint clause, e.g. 'sprint = 42'")]
        sprint: Option<String>,
        /// Compute and report without writing the workbook
        #[arg(long, help = "Compute metrics without writing the workbook")]
        dry_run: bool,
        /// Print the summary as JSON
        #[arg(long, help = "Print the sprint summary as JSON")]
        json: bool,
    },
    /// Business hours between two timestamps under the configured calendar
    Hours {
        /// Start, e.g. 2024-06-14T18:00 or 2024-06-14T18:00:00.000+0900
        #[arg(long, help = "Start timestamp")]
        start: String,
        /// End, same formats as --start
        #[arg(long, help = "End timestamp")]
        end: String,
    },
    /// Validate and print the effective configuration
    Config {
        /// Write a default configuration file instead
        #[arg(long, value_name = "PATH", help = "Write a default configuration file to PATH")]
        write_default: Option<PathBuf>,
    },
}
