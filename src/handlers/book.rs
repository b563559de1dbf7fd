//! Handler for the `book` command.

use anyhow::{bail, Result};
use colored::Colorize;
use repairtrack::engine::config::Config;
use repairtrack::engine::db::Db;
use repairtrack::engine::repo::RepairRepo;
use repairtrack::engine::tracking::format_pence;
use repairtrack::engine::types::NewRepair;

/// Books a new repair and prints its tracking details.
///
/// # Errors
/// Returns error if the device is blank, the quote is negative, or the insert fails.
pub fn handle(
    config: &Config,
    device: String,
    description: Option<String>,
    customer: Option<String>,
    quote: Option<i64>,
) -> Result<()> {
    if device.trim().is_empty() {
        bail!("Device must not be empty");
    }
    if quote.is_some_and(|q| q < 0) {
        bail!("Quoted price must not be negative");
    }

    let conn = Db::connect(config)?;
    let repo = RepairRepo::new(&conn);
    let repair = repo.add(&NewRepair {
        device: device.trim().to_string(),
        repair_description: description,
        customer_name: customer,
        quoted_price_pence: quote,
    })?;

    println!(
        "{} Booked [{}] {}",
        "✓".green(),
        repair.booking_reference.yellow(),
        repair.device
    );
    println!("   id:    {}", repair.id.to_string().dimmed());
    if let Some(pence) = repair.quoted_price_pence {
        println!("   quote: {}", format_pence(pence));
    }
    Ok(())
}
