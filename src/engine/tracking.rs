//! Tracking response: the public view of one repair.

use super::config::Config;
use super::db::Db;
use super::progress::{project, ProgressProjection, TimelineEntry};
use super::resolver::{TrackingError, TrackingResolver};
use super::types::{Repair, RepairStatus};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// What the tracking endpoint returns for a repair.
///
/// `status`, `progress` and `timeline` come straight from the projection;
/// the rest is copied off the record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub tracking_id: Uuid,
    pub booking_reference: String,
    pub status: RepairStatus,
    pub progress: u8,
    pub timeline: Vec<TimelineEntry>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub device: String,
    pub repair_description: Option<String>,
    pub quoted_price: Option<String>,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl TrackingResponse {
    #[must_use]
    pub fn from_repair(repair: Repair) -> Self {
        let ProgressProjection {
            current_status,
            progress_percent,
            timeline,
        } = project(
            repair.status,
            &repair.timestamps,
            repair.repair_description.as_deref(),
        );
        let stamps = repair.timestamps;

        Self {
            tracking_id: repair.id,
            booking_reference: repair.booking_reference,
            status: current_status,
            progress: progress_percent,
            timeline,
            estimated_completion: stamps.estimated_completion,
            device: repair.device,
            repair_description: repair.repair_description,
            quoted_price: repair.quoted_price_pence.map(format_pence),
            customer_name: repair.customer_name,
            created_at: stamps.created_at,
            last_updated: stamps.updated_at.unwrap_or(stamps.created_at),
        }
    }
}

/// Resolves a tracking identifier and builds its response.
///
/// Failures are logged here with their detail; callers should show
/// [`TrackingError::public_message`] to the customer and not retry.
///
/// # Errors
/// Returns a `TrackingError` if the reference is invalid, unknown, or the store fails.
pub fn lookup(conn: &Connection, reference: &str) -> Result<TrackingResponse, TrackingError> {
    match TrackingResolver::new(conn).resolve(reference) {
        Ok(repair) => {
            info!(id = %repair.id, status = %repair.status, "tracking lookup");
            Ok(TrackingResponse::from_repair(repair))
        }
        Err(err) => {
            warn!(reference, error = %err, "tracking lookup failed");
            Err(err)
        }
    }
}

/// Opens the store and looks up a tracking identifier.
///
/// A store that cannot be opened is reported as `Storage`, so the customer
/// sees the same generic message as any other lookup failure.
///
/// # Errors
/// Returns a `TrackingError` if the store cannot be opened or the lookup fails.
pub fn track(config: &Config, reference: &str) -> Result<TrackingResponse, TrackingError> {
    let conn = Db::connect(config).map_err(|err| {
        warn!(reference, error = %format!("{err:#}"), "tracking store unavailable");
        TrackingError::Storage(err)
    })?;
    lookup(&conn, reference)
}

/// Formats a price held in pence as pounds, e.g. `12900` → `"£129.00"`.
#[must_use]
pub fn format_pence(pence: i64) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let abs = pence.unsigned_abs();
    format!("{sign}£{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::repo::RepairRepo;
    use crate::engine::types::NewRepair;

    fn book(conn: &Connection, description: Option<&str>) -> Repair {
        RepairRepo::new(conn)
            .add(&NewRepair {
                device: "iPhone 14 Pro".to_string(),
                repair_description: description.map(str::to_string),
                customer_name: Some("Alex Morgan".to_string()),
                quoted_price_pence: Some(8_950),
            })
            .unwrap()
    }

    #[test]
    fn test_lookup_builds_projection() {
        let conn = Db::in_memory().unwrap();
        let repair = book(&conn, Some("Battery replacement"));
        RepairRepo::new(&conn)
            .update_status(repair.id, RepairStatus::InProgress)
            .unwrap();

        let response = lookup(&conn, &repair.booking_reference).unwrap();
        assert_eq!(response.status, RepairStatus::InProgress);
        assert_eq!(response.progress, 60);
        assert_eq!(response.timeline.len(), 5);
        assert_eq!(response.timeline[2].message, "Battery replacement work in progress");
        assert_eq!(response.quoted_price.as_deref(), Some("£89.50"));
        assert!(response.last_updated >= response.created_at);
    }

    #[test]
    fn test_response_json_shape() {
        let conn = Db::in_memory().unwrap();
        let repair = book(&conn, None);

        let response = lookup(&conn, &repair.id.to_string()).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "draft");
        assert_eq!(json["progress"], 5);
        assert_eq!(json["bookingReference"], repair.booking_reference.as_str());
        assert!(json["estimatedCompletion"].is_null());
        assert_eq!(json["timeline"][0]["completed"], true);
        assert!(json["timeline"][1]["timestamp"].is_null());
        assert_eq!(json["timeline"][1]["status"], "confirmed");
    }

    #[test]
    fn test_lookup_rejects_short_reference() {
        let conn = Db::in_memory().unwrap();
        let err = lookup(&conn, "RT").unwrap_err();
        assert!(matches!(err, TrackingError::ReferenceTooShort));
    }

    #[test]
    fn test_track_without_store_is_generic() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            data_dir: dir.path().join("missing"),
            log_json: false,
        };

        let err = track(&config, "RT-3F9A12BC").unwrap_err();
        assert!(matches!(err, TrackingError::Storage(_)));
        assert_eq!(err.public_message(), "Unable to retrieve tracking information");
    }

    #[test]
    fn test_track_opens_store_and_resolves() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            log_json: false,
        };
        let repair = book(&Db::init(&config).unwrap(), Some("Hinge repair"));

        let response = track(&config, &repair.booking_reference).unwrap();
        assert_eq!(response.tracking_id, repair.id);
        assert_eq!(response.progress, 5);
    }

    #[test]
    fn test_format_pence() {
        assert_eq!(format_pence(0), "£0.00");
        assert_eq!(format_pence(5), "£0.05");
        assert_eq!(format_pence(12_900), "£129.00");
        assert_eq!(format_pence(-250), "-£2.50");
    }
}
