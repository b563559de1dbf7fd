//! Handler for the `list` command.

use anyhow::Result;
use colored::Colorize;
use repairtrack::engine::config::Config;
use repairtrack::engine::db::Db;
use repairtrack::engine::repo::RepairRepo;
use repairtrack::engine::types::RepairStatus;

use super::status_icon;

/// Lists repairs, optionally filtered to one status.
///
/// # Errors
/// Returns error if the status filter is unknown or the query fails.
pub fn handle(config: &Config, status: Option<&str>) -> Result<()> {
    let filter = status.map(str::parse::<RepairStatus>).transpose()?;

    let conn = Db::connect(config)?;
    let repo = RepairRepo::new(&conn);
    let repairs = match filter {
        Some(status) => repo.get_by_status(status)?,
        None => repo.get_all()?,
    };

    println!("{} Repairs:", "📋".cyan());

    if repairs.is_empty() {
        println!("   (No repairs booked)");
        return Ok(());
    }

    for repair in repairs {
        println!(
            "   {} [{}] {} ({}, {}%)",
            status_icon(repair.status),
            repair.booking_reference.blue(),
            repair.device,
            repair.status.to_string().dimmed(),
            repair.status.progress_percent()
        );
    }
    Ok(())
}
