//! Handler for the `update` command.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use repairtrack::engine::config::Config;
use repairtrack::engine::db::Db;
use repairtrack::engine::repo::RepairRepo;
use repairtrack::engine::resolver::TrackingResolver;
use repairtrack::engine::types::RepairStatus;

/// Applies an operator update to a repair.
///
/// Status is parsed strictly here; any status may follow any other.
///
/// # Errors
/// Returns error if nothing to update, input is malformed, or the repair is unknown.
pub fn handle(
    config: &Config,
    repair_ref: &str,
    status: Option<&str>,
    scheduled: Option<&str>,
    estimate: Option<&str>,
) -> Result<()> {
    if status.is_none() && scheduled.is_none() && estimate.is_none() {
        bail!("Nothing to update. Pass --status, --scheduled, or --estimate.");
    }

    let status = status.map(str::parse::<RepairStatus>).transpose()?;
    let scheduled = scheduled.map(parse_timestamp).transpose()?;
    let estimate = estimate.map(parse_timestamp).transpose()?;

    let mut conn = Db::connect(config)?;
    let tx = conn.transaction()?;

    let repair = TrackingResolver::new(&tx).resolve(repair_ref)?;
    let repo = RepairRepo::new(&tx);

    if let Some(date) = scheduled {
        repo.set_schedule(repair.id, date)?;
    }
    if let Some(date) = estimate {
        repo.set_estimate(repair.id, date)?;
    }
    if let Some(status) = status {
        repo.update_status(repair.id, status)?;
    }

    tx.commit()?;

    let shown = status.unwrap_or(repair.status);
    println!(
        "{} Updated [{}] {} ({})",
        "✓".green(),
        repair.booking_reference.yellow(),
        repair.device,
        shown.to_string().dimmed()
    );
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp '{raw}' (expected RFC 3339, e.g. 2025-06-02T10:00:00Z)"))
}
