//! Repair Repository: All database operations in one place.

use super::types::{booking_reference_for, NewRepair, Repair, RepairStatus, RepairTimestamps};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const REPAIR_SELECT: &str = "SELECT id, booking_reference, device, repair_description, \
     customer_name, quoted_price_pence, status, created_at, scheduled_date, updated_at, \
     estimated_completion, actual_completion FROM repairs";

/// How many ids `add` tries before giving up on a free booking reference.
pub const MAX_BOOKING_ATTEMPTS: usize = 5;

pub struct RepairRepo<'a> {
    conn: &'a Connection,
}

impl<'a> RepairRepo<'a> {
    /// Creates a new repository instance borrowing the connection.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Books a new repair in `draft` status.
    ///
    /// # Errors
    /// Returns an error if the insertion fails.
    pub fn add(&self, new: &NewRepair) -> Result<Repair> {
        self.add_with_ids(new, Uuid::new_v4)
    }

    /// Books a repair, drawing record ids from `next_id`.
    ///
    /// Booking references only carry 32 bits of the id, so a clash on the
    /// unique reference is retried with a fresh id up to
    /// [`MAX_BOOKING_ATTEMPTS`] times.
    fn add_with_ids(&self, new: &NewRepair, mut next_id: impl FnMut() -> Uuid) -> Result<Repair> {
        for attempt in 1..=MAX_BOOKING_ATTEMPTS {
            let id = next_id();
            let repair = Repair {
                id,
                booking_reference: booking_reference_for(id),
                device: new.device.clone(),
                repair_description: new.repair_description.clone(),
                customer_name: new.customer_name.clone(),
                quoted_price_pence: new.quoted_price_pence,
                status: RepairStatus::Draft,
                timestamps: RepairTimestamps::created(Utc::now()),
            };

            match self.insert(&repair) {
                Ok(()) => {
                    info!(id = %repair.id, reference = %repair.booking_reference, "repair booked");
                    return Ok(repair);
                }
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    warn!(
                        reference = %repair.booking_reference,
                        attempt,
                        "booking reference already taken, retrying"
                    );
                }
                Err(e) => return Err(e).context("Failed to insert repair"),
            }
        }
        bail!("Failed to insert repair: no free booking reference after {MAX_BOOKING_ATTEMPTS} attempts")
    }

    fn insert(&self, repair: &Repair) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO repairs (id, booking_reference, device, repair_description, \
             customer_name, quoted_price_pence, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                repair.id.to_string(),
                repair.booking_reference,
                repair.device,
                repair.repair_description,
                repair.customer_name,
                repair.quoted_price_pence,
                repair.status.as_str(),
                repair.timestamps.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Retrieves all repairs, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_all(&self) -> Result<Vec<Repair>> {
        let sql = format!("{REPAIR_SELECT} ORDER BY created_at");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_repair)?;
        let mut repairs = Vec::new();
        for repair in rows {
            repairs.push(repair?);
        }
        Ok(repairs)
    }

    /// Retrieves repairs currently in the given status, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_by_status(&self, status: RepairStatus) -> Result<Vec<Repair>> {
        let sql = format!("{REPAIR_SELECT} WHERE status = ?1 ORDER BY created_at");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![status.as_str()], row_to_repair)?;
        let mut repairs = Vec::new();
        for repair in rows {
            repairs.push(repair?);
        }
        Ok(repairs)
    }

    /// Finds a repair by its record id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Repair>> {
        let sql = format!("{REPAIR_SELECT} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id.to_string()], row_to_repair)
            .optional()
            .context("Search by ID failed")
    }

    /// Finds a repair by its booking reference (case-insensitive).
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_reference(&self, reference: &str) -> Result<Option<Repair>> {
        let sql = format!("{REPAIR_SELECT} WHERE LOWER(booking_reference) = LOWER(?1)");
        self.conn
            .query_row(&sql, params![reference], row_to_repair)
            .optional()
            .context("Search by booking reference failed")
    }

    /// Moves a repair to a new status and stamps `updated_at`.
    ///
    /// Any transition is accepted. Completing a repair also stamps
    /// `actual_completion` unless one is already recorded.
    ///
    /// # Errors
    /// Returns an error if the repair does not exist or the update fails.
    pub fn update_status(&self, id: Uuid, status: RepairStatus) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let rows = self.conn.execute(
            "UPDATE repairs SET status = ?1, updated_at = ?2, \
             actual_completion = CASE WHEN ?1 = 'completed' AND actual_completion IS NULL \
             THEN ?2 ELSE actual_completion END \
             WHERE id = ?3",
            params![status.as_str(), now, id.to_string()],
        )?;
        if rows == 0 {
            bail!("Repair {id} not found");
        }
        debug!(%id, %status, "repair status updated");
        Ok(())
    }

    /// Records when the repair is booked in for work.
    ///
    /// # Errors
    /// Returns an error if the repair does not exist or the update fails.
    pub fn set_schedule(&self, id: Uuid, scheduled_date: DateTime<Utc>) -> Result<()> {
        self.set_timestamp(id, TimestampColumn::ScheduledDate, scheduled_date)
    }

    /// Records when the repair is expected to be ready.
    ///
    /// # Errors
    /// Returns an error if the repair does not exist or the update fails.
    pub fn set_estimate(&self, id: Uuid, estimated_completion: DateTime<Utc>) -> Result<()> {
        self.set_timestamp(id, TimestampColumn::EstimatedCompletion, estimated_completion)
    }

    fn set_timestamp(&self, id: Uuid, column: TimestampColumn, value: DateTime<Utc>) -> Result<()> {
        let rows = self.conn.execute(
            column.update_sql(),
            params![value.to_rfc3339(), Utc::now().to_rfc3339(), id.to_string()],
        )?;
        if rows == 0 {
            bail!("Repair {id} not found");
        }
        debug!(%id, ?column, "repair timestamp updated");
        Ok(())
    }
}

/// Operator-settable timestamp columns. Each maps to a fixed statement.
#[derive(Debug, Clone, Copy)]
enum TimestampColumn {
    ScheduledDate,
    EstimatedCompletion,
}

impl TimestampColumn {
    fn update_sql(self) -> &'static str {
        match self {
            Self::ScheduledDate => {
                "UPDATE repairs SET scheduled_date = ?1, updated_at = ?2 WHERE id = ?3"
            }
            Self::EstimatedCompletion => {
                "UPDATE repairs SET estimated_completion = ?1, updated_at = ?2 WHERE id = ?3"
            }
        }
    }
}

/// Converts a database row to a Repair.
///
/// Unknown status strings read back as `draft`; malformed ids or
/// timestamps are conversion errors.
///
/// # Errors
/// Returns a `rusqlite` error if data conversion fails.
pub fn row_to_repair(row: &rusqlite::Row) -> rusqlite::Result<Repair> {
    let id_raw: String = row.get(0)?;
    let id = Uuid::parse_str(&id_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let status: Option<String> = row.get(6)?;

    Ok(Repair {
        id,
        booking_reference: row.get(1)?,
        device: row.get(2)?,
        repair_description: row.get(3)?,
        customer_name: row.get(4)?,
        quoted_price_pence: row.get(5)?,
        status: RepairStatus::from(status.as_deref()),
        timestamps: RepairTimestamps {
            created_at: timestamp_at(row, 7)?,
            scheduled_date: optional_timestamp_at(row, 8)?,
            updated_at: optional_timestamp_at(row, 9)?,
            estimated_completion: optional_timestamp_at(row, 10)?,
            actual_completion: optional_timestamp_at(row, 11)?,
        },
    })
}

fn timestamp_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(idx, &raw)
}

fn optional_timestamp_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|r| parse_timestamp(idx, &r)).transpose()
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
