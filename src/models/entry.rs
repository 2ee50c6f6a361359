//! Placement decisions and materialized timetable entries.
//!
//! A [`Gene`] is one in-flight placement decision inside a candidate
//! timetable; a [`TimetableEntry`] is the persistable record produced by
//! the materializer once the run finishes.

use serde::{Deserialize, Serialize};

use super::ids::{ClassId, CourseId, DayId, LecturerId, RequirementId, RoomId, SlotId};

/// One placement decision: a requirement pinned to a (day, slot, room).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    /// The requirement being placed.
    pub requirement: RequirementId,
    /// Day of the placement.
    pub day: DayId,
    /// Time slot of the placement.
    pub slot: SlotId,
    /// Room of the placement.
    pub room: RoomId,
}

impl Gene {
    /// Creates a placement decision.
    pub fn new(requirement: RequirementId, day: DayId, slot: SlotId, room: RoomId) -> Self {
        Self {
            requirement,
            day,
            slot,
            room,
        }
    }
}

/// A persistable timetable record.
///
/// Created once by the materializer, never mutated by the core afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// Source requirement (class-course assignment row).
    pub requirement_id: RequirementId,
    /// Class attending.
    pub class_id: ClassId,
    /// Course taught.
    pub course_id: CourseId,
    /// Lecturer, if one was assigned.
    pub lecturer: Option<LecturerId>,
    /// Scheduled day.
    pub day: DayId,
    /// Scheduled slot.
    pub slot: SlotId,
    /// Scheduled room.
    pub room: RoomId,
    /// Division label from the requirement.
    pub division_label: String,
    /// Semester of the run.
    pub semester: u8,
    /// Academic year of the run (e.g. "2025/2026").
    pub academic_year: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_is_copy() {
        let gene = Gene::new(RequirementId(1), DayId(2), SlotId(3), RoomId(4));
        let copy = gene;
        assert_eq!(gene, copy);
        assert_eq!(copy.room, RoomId(4));
    }

    #[test]
    fn test_entry_serde_round_trip() {
        let entry = TimetableEntry {
            requirement_id: RequirementId(1),
            class_id: ClassId(2),
            course_id: CourseId(3),
            lecturer: None,
            day: DayId(4),
            slot: SlotId(5),
            room: RoomId(6),
            division_label: "B".into(),
            semester: 2,
            academic_year: "2025/2026".into(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: TimetableEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
        assert!(json.contains("\"lecturer\":null"));
    }
}
