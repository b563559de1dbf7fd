//! Handler for the `track` command.

use anyhow::{bail, Result};
use colored::Colorize;
use repairtrack::engine::config::Config;
use repairtrack::engine::progress::TimelineEntry;
use repairtrack::engine::tracking::{track, TrackingResponse};

use super::status_icon;

/// Looks up a repair by tracking reference and shows its progress.
///
/// # Errors
/// Returns the customer-facing message if the store or the lookup fails.
pub fn handle(config: &Config, reference: &str, json: bool) -> Result<()> {
    let response = match track(config, reference) {
        Ok(r) => r,
        Err(err) => bail!(err.public_message()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_human(&response);
    Ok(())
}

fn print_human(response: &TrackingResponse) {
    println!(
        "{} [{}] {}",
        status_icon(response.status),
        response.booking_reference.cyan().bold(),
        response.device
    );
    if let Some(description) = &response.repair_description {
        println!("   Repair:   {description}");
    }
    println!(
        "   Status:   {} {}",
        response.status,
        progress_bar(response.progress).dimmed()
    );
    if let Some(eta) = response.estimated_completion {
        println!("   Expected: {}", eta.format("%Y-%m-%d %H:%M"));
    }
    if let Some(price) = &response.quoted_price {
        println!("   Quote:    {price}");
    }
    println!();

    println!("{}", "Timeline:".dimmed().underline());
    for entry in &response.timeline {
        print_entry(entry);
    }
}

fn print_entry(entry: &TimelineEntry) {
    let when = entry.timestamp.map_or_else(
        || "                ".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    );
    if entry.completed {
        println!("   {}  {}  {}", "✓".green(), when.dimmed(), entry.message);
    } else {
        println!("   {}  {}  {}", "○".dimmed(), when, entry.message.dimmed());
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) / 5;
    format!("[{}{}] {percent}%", "#".repeat(filled), "-".repeat(20 - filled))
}
