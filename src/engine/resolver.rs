//! Tracking Resolver: Matches a customer's tracking identifier to a repair.

use super::repo::RepairRepo;
use super::types::Repair;
use rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

/// Shortest tracking identifier accepted before any lookup is attempted.
pub const MIN_REFERENCE_LEN: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("tracking reference must be at least {} characters", MIN_REFERENCE_LEN)]
    ReferenceTooShort,

    #[error("no repair matches '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TrackingError {
    /// What a customer is shown.
    ///
    /// Anything past input validation collapses to one generic message;
    /// the detail goes to the log instead.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::ReferenceTooShort => self.to_string(),
            Self::NotFound(_) | Self::Storage(_) => {
                "Unable to retrieve tracking information".to_string()
            }
        }
    }
}

pub struct TrackingResolver<'a> {
    repo: RepairRepo<'a>,
}

impl<'a> TrackingResolver<'a> {
    /// Creates a new resolver.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            repo: RepairRepo::new(conn),
        }
    }

    /// Resolves a tracking identifier: a record UUID or a booking reference.
    ///
    /// # Errors
    /// Returns `ReferenceTooShort` for identifiers under four characters,
    /// `NotFound` when nothing matches, `Storage` if the lookup itself fails.
    pub fn resolve(&self, reference: &str) -> Result<Repair, TrackingError> {
        let reference = reference.trim();
        if reference.chars().count() < MIN_REFERENCE_LEN {
            return Err(TrackingError::ReferenceTooShort);
        }

        let found = match Uuid::parse_str(reference) {
            Ok(id) => {
                debug!(%id, "resolving tracking reference as record id");
                self.repo.find_by_id(id)?
            }
            Err(_) => {
                debug!(reference, "resolving tracking reference as booking reference");
                self.repo.find_by_reference(reference)?
            }
        };

        found.ok_or_else(|| TrackingError::NotFound(reference.to_string()))
    }
}
