//! Progress Projection: Computes what a customer sees on the tracking page.
//!
//! This module answers "how far along is my repair, and what happens next?"
//! from nothing but the current status and the timestamps already on the
//! record. It is a pure function: no I/O, no shared state, safe to call from
//! any number of threads at once.
//!
//! The timeline is a display model only. It does not enforce which status
//! transitions are legal; the store accepts any status change.

use super::types::{RepairStatus, RepairTimestamps};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Label used when the repair has no description of its own.
pub const DEFAULT_DESCRIPTION: &str = "Device repair";

/// The forward order of milestones. `Cancelled` sits outside it and
/// `Pending` is folded into `Confirmed` on the timeline.
pub const CANONICAL_SEQUENCE: [RepairStatus; 5] = [
    RepairStatus::Draft,
    RepairStatus::Confirmed,
    RepairStatus::InProgress,
    RepairStatus::ReadyForPickup,
    RepairStatus::Completed,
];

/// One milestone on the customer timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub status: RepairStatus,
    pub message: String,
    /// `None` for projected milestones, and for reached ones whose source
    /// timestamp has not been recorded yet.
    pub timestamp: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl TimelineEntry {
    fn reached(status: RepairStatus, message: String, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            status,
            message,
            timestamp,
            completed: true,
        }
    }

    fn projected(status: RepairStatus) -> Self {
        Self {
            status,
            message: projected_message(status).to_string(),
            timestamp: None,
            completed: false,
        }
    }
}

/// Derived, never stored: rebuilt on every tracking lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressProjection {
    pub current_status: RepairStatus,
    pub progress_percent: u8,
    pub timeline: Vec<TimelineEntry>,
}

impl ProgressProjection {
    /// Milestones already reached.
    pub fn completed_steps(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.timeline.iter().filter(|e| e.completed)
    }

    /// Milestones still ahead.
    pub fn projected_steps(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.timeline.iter().filter(|e| !e.completed)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.current_status.is_terminal()
    }
}

/// Projects a repair's status and timestamps onto the customer timeline.
///
/// Total over its inputs: a missing description falls back to
/// [`DEFAULT_DESCRIPTION`] and missing optional timestamps simply leave the
/// matching entry undated. Callers holding a raw status string should
/// convert it with `RepairStatus::from`, which maps unknown values to
/// `Draft`.
#[must_use]
pub fn project(
    current_status: RepairStatus,
    timestamps: &RepairTimestamps,
    repair_description: Option<&str>,
) -> ProgressProjection {
    let description = repair_description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);

    let mut timeline = Vec::with_capacity(CANONICAL_SEQUENCE.len());

    // The repair existing at all is the first milestone.
    timeline.push(TimelineEntry::reached(
        RepairStatus::Draft,
        "Repair request received".to_string(),
        Some(timestamps.created_at),
    ));

    if current_status != RepairStatus::Draft {
        timeline.push(TimelineEntry::reached(
            RepairStatus::Confirmed,
            "Repair confirmed and scheduled".to_string(),
            timestamps.scheduled_date.or(timestamps.updated_at),
        ));
    }

    if matches!(
        current_status,
        RepairStatus::InProgress | RepairStatus::ReadyForPickup | RepairStatus::Completed
    ) {
        timeline.push(TimelineEntry::reached(
            RepairStatus::InProgress,
            format!("{description} work in progress"),
            timestamps.updated_at,
        ));
    }

    if matches!(
        current_status,
        RepairStatus::ReadyForPickup | RepairStatus::Completed
    ) {
        timeline.push(TimelineEntry::reached(
            RepairStatus::ReadyForPickup,
            "Repair complete, ready for collection".to_string(),
            timestamps.estimated_completion.or(timestamps.updated_at),
        ));
    }

    if current_status == RepairStatus::Completed {
        timeline.push(TimelineEntry::reached(
            RepairStatus::Completed,
            "Device collected".to_string(),
            timestamps.actual_completion,
        ));
    }

    if !current_status.is_terminal() {
        let remaining: Vec<_> = CANONICAL_SEQUENCE
            .into_iter()
            .filter(|step| !timeline.iter().any(|e| e.status == *step))
            .map(TimelineEntry::projected)
            .collect();
        timeline.extend(remaining);
    }

    ProgressProjection {
        current_status,
        progress_percent: current_status.progress_percent(),
        timeline,
    }
}

/// Fixed wording for milestones that have not been reached yet.
fn projected_message(status: RepairStatus) -> &'static str {
    match status {
        RepairStatus::Draft => "Repair request",
        RepairStatus::Pending | RepairStatus::Confirmed => "Repair confirmation and scheduling",
        RepairStatus::InProgress => "Repair work in progress",
        RepairStatus::ReadyForPickup => "Quality check and ready for collection",
        RepairStatus::Completed => "Device collection",
        RepairStatus::Cancelled => "Repair cancelled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap()
    }

    fn full_timestamps() -> RepairTimestamps {
        RepairTimestamps {
            created_at: ts(1),
            scheduled_date: Some(ts(2)),
            updated_at: Some(ts(3)),
            estimated_completion: Some(ts(4)),
            actual_completion: Some(ts(5)),
        }
    }

    fn statuses(p: &ProgressProjection) -> Vec<RepairStatus> {
        p.timeline.iter().map(|e| e.status).collect()
    }

    #[test]
    fn test_progress_matches_lookup_table() {
        let expected = [
            (RepairStatus::Draft, 5),
            (RepairStatus::Pending, 10),
            (RepairStatus::Confirmed, 25),
            (RepairStatus::InProgress, 60),
            (RepairStatus::ReadyForPickup, 90),
            (RepairStatus::Completed, 100),
            (RepairStatus::Cancelled, 0),
        ];
        for (status, percent) in expected {
            let p = project(status, &full_timestamps(), None);
            assert_eq!(p.progress_percent, percent, "{status}");
            assert_eq!(p.current_status, status);
        }
    }

    #[test]
    fn test_unknown_status_behaves_as_draft() {
        let stamps = full_timestamps();
        let draft = project(RepairStatus::Draft, &stamps, Some("Battery"));
        for raw in [Some("bogus"), Some(""), None] {
            let p = project(RepairStatus::from(raw), &stamps, Some("Battery"));
            assert_eq!(p, draft);
        }
    }

    #[test]
    fn test_timeline_never_empty() {
        let stamps = RepairTimestamps::created(ts(1));
        for status in RepairStatus::ALL {
            let p = project(status, &stamps, None);
            assert!(!p.timeline.is_empty(), "{status}");
            assert_eq!(p.timeline[0].status, RepairStatus::Draft);
            assert!(p.timeline[0].completed);
        }
    }

    #[test]
    fn test_past_entries_precede_projected() {
        for status in RepairStatus::ALL {
            let p = project(status, &full_timestamps(), None);
            let first_projected = p.timeline.iter().position(|e| !e.completed);
            if let Some(idx) = first_projected {
                assert!(p.timeline[idx..].iter().all(|e| !e.completed), "{status}");
            }
        }
    }

    #[test]
    fn test_completed_has_no_projection() {
        let p = project(RepairStatus::Completed, &full_timestamps(), None);
        assert!(p.timeline.iter().all(|e| e.completed));
        assert!(p.timeline.iter().all(|e| e.timestamp.is_some()));
        assert_eq!(p.timeline.len(), 5);
        assert_eq!(p.timeline[4].timestamp, Some(ts(5)));
    }

    #[test]
    fn test_completed_without_actual_completion_only_null_is_last() {
        let mut stamps = full_timestamps();
        stamps.actual_completion = None;
        let p = project(RepairStatus::Completed, &stamps, None);

        let undated: Vec<_> = p.timeline.iter().filter(|e| e.timestamp.is_none()).collect();
        assert_eq!(undated.len(), 1);
        assert_eq!(undated[0].status, RepairStatus::Completed);
        assert!(undated[0].completed);
    }

    #[test]
    fn test_in_progress_three_done_two_projected() {
        let p = project(RepairStatus::InProgress, &full_timestamps(), None);
        assert_eq!(
            statuses(&p),
            vec![
                RepairStatus::Draft,
                RepairStatus::Confirmed,
                RepairStatus::InProgress,
                RepairStatus::ReadyForPickup,
                RepairStatus::Completed,
            ]
        );
        assert_eq!(p.completed_steps().count(), 3);
        assert_eq!(p.projected_steps().count(), 2);
        assert!(p.timeline[..3].iter().all(|e| e.completed));
        assert!(p.timeline[3..].iter().all(|e| !e.completed && e.timestamp.is_none()));
        assert_eq!(p.timeline[2].message, "Device repair work in progress");
    }

    #[test]
    fn test_cancelled_projects_nothing() {
        let p = project(RepairStatus::Cancelled, &full_timestamps(), None);
        assert_eq!(p.projected_steps().count(), 0);
        assert_eq!(statuses(&p), vec![RepairStatus::Draft, RepairStatus::Confirmed]);
        assert!(p.is_terminal());

        let bare = project(RepairStatus::Cancelled, &RepairTimestamps::created(ts(1)), None);
        assert_eq!(bare.projected_steps().count(), 0);
    }

    #[test]
    fn test_pending_folds_into_confirmed() {
        let p = project(RepairStatus::Pending, &full_timestamps(), None);
        assert_eq!(
            statuses(&p),
            vec![
                RepairStatus::Draft,
                RepairStatus::Confirmed,
                RepairStatus::InProgress,
                RepairStatus::ReadyForPickup,
                RepairStatus::Completed,
            ]
        );
        assert_eq!(p.completed_steps().count(), 2);
        assert_eq!(p.timeline[1].timestamp, Some(ts(2)));
    }

    #[test]
    fn test_confirmed_falls_back_to_updated_at() {
        let stamps = RepairTimestamps {
            updated_at: Some(ts(3)),
            ..RepairTimestamps::created(ts(1))
        };
        let p = project(RepairStatus::Confirmed, &stamps, None);
        assert_eq!(p.timeline[1].timestamp, Some(ts(3)));
        assert_eq!(p.projected_steps().count(), 3);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let stamps = full_timestamps();
        let a = project(RepairStatus::ReadyForPickup, &stamps, Some("Keyboard"));
        let b = project(RepairStatus::ReadyForPickup, &stamps, Some("Keyboard"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ready_for_pickup_scenario() {
        let stamps = RepairTimestamps {
            created_at: ts(1),
            scheduled_date: Some(ts(2)),
            updated_at: Some(ts(3)),
            estimated_completion: Some(ts(4)),
            actual_completion: None,
        };
        let p = project(RepairStatus::ReadyForPickup, &stamps, Some("Screen replacement"));

        assert_eq!(p.progress_percent, 90);
        let shape: Vec<_> = p
            .timeline
            .iter()
            .map(|e| (e.status, e.timestamp, e.completed))
            .collect();
        assert_eq!(
            shape,
            vec![
                (RepairStatus::Draft, Some(ts(1)), true),
                (RepairStatus::Confirmed, Some(ts(2)), true),
                (RepairStatus::InProgress, Some(ts(3)), true),
                (RepairStatus::ReadyForPickup, Some(ts(4)), true),
                (RepairStatus::Completed, None, false),
            ]
        );
        assert!(p.timeline[2].message.contains("Screen replacement"));
        assert_eq!(p.timeline[4].message, "Device collection");
    }

    #[test]
    fn test_draft_scenario() {
        let p = project(RepairStatus::Draft, &RepairTimestamps::created(ts(1)), None);

        assert_eq!(p.progress_percent, 5);
        assert_eq!(p.timeline[0].timestamp, Some(ts(1)));
        assert!(p.timeline[0].completed);

        let projected: Vec<_> = p.projected_steps().map(|e| (e.status, e.message.as_str())).collect();
        assert_eq!(
            projected,
            vec![
                (RepairStatus::Confirmed, "Repair confirmation and scheduling"),
                (RepairStatus::InProgress, "Repair work in progress"),
                (RepairStatus::ReadyForPickup, "Quality check and ready for collection"),
                (RepairStatus::Completed, "Device collection"),
            ]
        );
        assert!(p.projected_steps().all(|e| e.timestamp.is_none()));
    }

    #[test]
    fn test_blank_description_uses_default() {
        let p = project(RepairStatus::InProgress, &full_timestamps(), Some("   "));
        assert_eq!(p.timeline[2].message, "Device repair work in progress");
    }
}
