//! Fatal error taxonomy.
//!
//! Only conditions that abort the pipeline live here. Expected outcomes of
//! a run (infeasibility, unscheduled requirements) are result data on
//! [`crate::scheduler::RunSummary`], never errors.

use thiserror::Error;

/// Categories of snapshot problems detected before optimization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIssueKind {
    /// No active teaching days.
    MissingDays,
    /// No time slots at all.
    MissingSlots,
    /// Slots exist but every one is a break.
    MissingTeachingSlots,
    /// No rooms.
    MissingRooms,
    /// No active class-course assignments match the run filter.
    MissingRequirements,
    /// Two entities share an identifier within one namespace.
    DuplicateId,
    /// An assignment references a class that does not exist.
    UnknownClass,
    /// An assignment or preference references a course that does not exist.
    UnknownCourse,
    /// An assignment references a lecturer that does not exist.
    UnknownLecturer,
    /// An existing timetable entry references an unknown day, slot, or room.
    UnknownPlacement,
}

/// One problem found while validating the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotIssue {
    /// Issue category.
    pub kind: SnapshotIssueKind,
    /// Human-readable description naming the offending entity.
    pub message: String,
}

impl SnapshotIssue {
    pub(crate) fn new(kind: SnapshotIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Fatal, pre-run: the problem instance is missing prerequisites or is
/// structurally malformed. The optimizer never runs on such an instance.
///
/// All detected issues are collected before failing, so the operator can
/// fix the data in one pass.
#[derive(Debug, Clone, Error)]
#[error("problem instance is incomplete: {}", summary(.issues))]
pub struct DataIncompleteError {
    /// Every issue found, in detection order.
    pub issues: Vec<SnapshotIssue>,
}

impl DataIncompleteError {
    /// Whether any issue of the given kind was detected.
    pub fn has(&self, kind: SnapshotIssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

fn summary(issues: &[SnapshotIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Top-level error for a scheduling run.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The snapshot failed pre-run validation.
    #[error(transparent)]
    DataIncomplete(#[from] DataIncompleteError),
    /// User-supplied run parameters are out of bounds.
    #[error("invalid run parameters: {0}")]
    InvalidParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_joins_issues() {
        let err = DataIncompleteError {
            issues: vec![
                SnapshotIssue::new(SnapshotIssueKind::MissingDays, "no active days"),
                SnapshotIssue::new(SnapshotIssueKind::MissingRooms, "no rooms"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("no active days"));
        assert!(msg.contains("no rooms"));
        assert!(err.has(SnapshotIssueKind::MissingDays));
        assert!(!err.has(SnapshotIssueKind::MissingSlots));
    }

    #[test]
    fn test_schedule_error_from_data_incomplete() {
        let err: ScheduleError = DataIncompleteError {
            issues: vec![SnapshotIssue::new(
                SnapshotIssueKind::MissingRequirements,
                "no requirements",
            )],
        }
        .into();
        assert!(matches!(err, ScheduleError::DataIncomplete(_)));
    }
}
