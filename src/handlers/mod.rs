pub mod book;
pub mod init;
pub mod list;
pub mod track;
pub mod update;

use colored::Colorize;
use repairtrack::engine::types::RepairStatus;

/// Shared status badge for human output.
pub(crate) fn status_icon(status: RepairStatus) -> colored::ColoredString {
    match status {
        RepairStatus::Completed => "✓".green(),
        RepairStatus::ReadyForPickup => "★".green(),
        RepairStatus::InProgress => "⚙".yellow(),
        RepairStatus::Confirmed | RepairStatus::Pending => "●".cyan(),
        RepairStatus::Draft => "○".dimmed(),
        RepairStatus::Cancelled => "✗".red(),
    }
}
