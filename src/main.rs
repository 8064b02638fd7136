use anyhow::Result;
use clap::Parser;
use sprint_metrics::cli::commands::{
    show_usage_guidance, CollectCommand, ConfigCommand, HoursCommand,
};
use sprint_metrics::cli::{Cli, Commands};
use sprint_metrics::{init_telemetry, AppConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = AppConfig::load_env_file() {
        eprintln!("⚠️  Ignoring unreadable .env file: {e}");
    }
    let config = AppConfig::load(cli.config.as_deref())?;
    init_telemetry(&config.observability)?;

    let result = tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            // Default behavior: no subcommand - explain how to get started
            None => show_usage_guidance().await,
            Some(Commands::Collect {
                sprint,
                dry_run,
                json,
            }) => {
                CollectCommand::new(config, sprint)
                    .with_dry_run(dry_run)
                    .with_json(json)
                    .execute()
                    .await
            }
            Some(Commands::Hours { start, end }) => {
                let calendar = config.work_calendar()?;
                HoursCommand::new(calendar, start, end).execute().await
            }
            Some(Commands::Config { write_default }) => {
                ConfigCommand::new(config, write_default).execute().await
            }
        }
    });

    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "Command failed");
    }
    result
}
