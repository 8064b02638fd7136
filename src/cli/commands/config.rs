use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct ConfigCommand {
    pub config: AppConfig,
    pub write_default: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn new(config: AppConfig, write_default: Option<PathBuf>) -> Self {
        Self {
            config,
            write_default,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        if let Some(path) = &self.write_default {
            if path.exists() {
                anyhow::bail!("{} already exists, refusing to overwrite", path.display());
            }
            AppConfig::default()
                .save_to_file(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Wrote default configuration to {}", path.display());
            println!("💡 Fill in [tracker] base_url and sprint, then run 'sprint-metrics collect'");
            return Ok(());
        }

        println!("⚙️  EFFECTIVE CONFIGURATION");
        println!("==========================");
        println!();
        print!("{}", self.config.redacted().to_toml()?);
        println!();

        match self.config.validate() {
            Ok(()) => {
                println!("✅ Configuration is valid");
                Ok(())
            }
            Err(e) => {
                println!("❌ {e}");
                Err(e.into())
            }
        }
    }
}
