use anyhow::Result;

pub mod collect;
pub mod config;
pub mod hours;

pub use collect::CollectCommand;
pub use config::ConfigCommand;
pub use hours::HoursCommand;

pub async fn show_usage_guidance() -> Result<()> {
    println!("📊 sprint-metrics - Sprint productivity in business hours");
    println!();
    println!("To get started:");
    println!("  ⚙️  sprint-metrics config --write-default sprint-metrics.toml   # Create a config");
    println!("  🔍 sprint-metrics config                                      # Check settings");
    println!("  🚀 sprint-metrics collect                                     # Collect the sprint");
    println!();
    println!("Tools:");
    println!("  ⏱️  sprint-metrics hours --start 2024-06-14T18:00 --end 2024-06-17T09:00");
    println!();
    println!("💡 Try 'sprint-metrics collect --dry-run' before the first real run!");
    Ok(())
}
