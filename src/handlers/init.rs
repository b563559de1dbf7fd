//! Handler for the `init` command.

use anyhow::Result;
use colored::Colorize;
use repairtrack::engine::config::Config;
use repairtrack::engine::db::Db;

/// Initializes the repair store.
///
/// # Errors
/// Returns error if database initialization fails.
pub fn handle(config: &Config) -> Result<()> {
    Db::init(config)?;
    println!(
        "{} Initialized {}",
        "✓".green(),
        config.db_path().display()
    );
    Ok(())
}
