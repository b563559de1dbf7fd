//! Core types for repair tracking.
//!
//! Note: `ProgressProjection` (the customer-facing view) lives in `progress.rs`.
//! `Repair` here is the stored record in SQLite.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stored status of a repair.
///
/// The set is closed. Reads from storage or from untrusted callers go
/// through the lenient `From` conversions, which fall back to `Draft`;
/// operator input goes through `FromStr`, which rejects unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    Draft,
    Pending,
    Confirmed,
    InProgress,
    ReadyForPickup,
    Completed,
    Cancelled,
}

impl RepairStatus {
    pub const ALL: [Self; 7] = [
        Self::Draft,
        Self::Pending,
        Self::Confirmed,
        Self::InProgress,
        Self::ReadyForPickup,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The wire/storage spelling of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::ReadyForPickup => "ready_for_pickup",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Fixed completion percentage shown to customers.
    ///
    /// Coarse and non-linear on purpose: it mirrors typical dwell time per
    /// stage, it is not measured from data.
    #[must_use]
    pub fn progress_percent(self) -> u8 {
        match self {
            Self::Draft => 5,
            Self::Pending => 10,
            Self::Confirmed => 25,
            Self::InProgress => 60,
            Self::ReadyForPickup => 90,
            Self::Completed => 100,
            Self::Cancelled => 0,
        }
    }

    /// Returns true for states that never progress further.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected operator input for a status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown repair status '{0}' (expected one of: draft, pending, confirmed, in_progress, ready_for_pickup, completed, cancelled)")]
pub struct StatusParseError(pub String);

impl FromStr for RepairStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}

impl From<&str> for RepairStatus {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or(Self::Draft)
    }
}

impl From<Option<&str>> for RepairStatus {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Self::Draft, Self::from)
    }
}

impl From<String> for RepairStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Timestamps that drive the timeline.
///
/// Only `created_at` is guaranteed; the rest appear as the repair moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairTimestamps {
    pub created_at: DateTime<Utc>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub actual_completion: Option<DateTime<Utc>>,
}

impl RepairTimestamps {
    #[must_use]
    pub fn created(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            scheduled_date: None,
            updated_at: None,
            estimated_completion: None,
            actual_completion: None,
        }
    }
}

/// A repair record as stored.
#[derive(Debug, Clone)]
pub struct Repair {
    pub id: Uuid,
    pub booking_reference: String,
    pub device: String,
    pub repair_description: Option<String>,
    pub customer_name: Option<String>,
    pub quoted_price_pence: Option<i64>,
    pub status: RepairStatus,
    pub timestamps: RepairTimestamps,
}

/// Input for booking a new repair.
#[derive(Debug, Clone, Default)]
pub struct NewRepair {
    pub device: String,
    pub repair_description: Option<String>,
    pub customer_name: Option<String>,
    pub quoted_price_pence: Option<i64>,
}

/// Derives the public booking reference (`RT-` + 8 uppercase hex digits) from a record id.
#[must_use]
pub fn booking_reference_for(id: Uuid) -> String {
    let simple = id.simple().to_string();
    format!("RT-{}", simple[..8].to_uppercase())
}
