//! Config command implementation

use anyhow::Result;
use storepulse_core::config::default_config_path;
use storepulse_core::Config;

/// Print the resolved configuration and where it came from
pub fn cmd_config(config: &Config) -> Result<()> {
    println!();
    println!("⚙️  Configuration");
    match &config.source {
        Some(path) => println!("   Source: {}", path.display()),
        None => {
            println!("   Source: built-in defaults");
            if let Some(path) = default_config_path() {
                println!("   Override path: {}", path.display());
            }
        }
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   import.date_formats:            {}", config.import.date_formats.join(", "));
    println!("   import.default_store_id:        {}", config.import.default_store_id);
    println!("   abandoned_carts.recovery_rate:  {}", config.import.recovery_rate);
    println!("   report.include_seasonality:     {}", config.report.include_seasonality);
    println!("   report.narrative:               {}", config.report.narrative);
    println!();
    Ok(())
}
