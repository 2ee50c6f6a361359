//! Teaching requirement model.
//!
//! A requirement is one (class, course, lecturer?) obligation that needs a
//! (day, slot, room) placement in the generated timetable. The lecturer
//! may be unassigned; every downstream component treats that as a
//! first-class state.

use serde::{Deserialize, Serialize};

use super::ids::{ClassId, CourseId, LecturerId, RequirementId};
use super::pool::RoomType;

/// One teaching obligation for the run's semester and stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Unique requirement identifier (class-course assignment row).
    pub id: RequirementId,
    /// Class (cohort) attending the session.
    pub class_id: ClassId,
    /// Course being taught.
    pub course_id: CourseId,
    /// Assigned lecturer, if any.
    pub lecturer: Option<LecturerId>,
    /// Course code, used as a deterministic tie-break in the repair pass.
    pub course_code: String,
    /// Contact hours per week.
    pub weekly_hours: u8,
    /// Number of students, matched against room capacity.
    pub class_size: u32,
    /// Preferred room type for the course, if any.
    pub preferred_room: Option<RoomType>,
    /// Division label carried through to the materialized entry.
    pub division_label: String,
}

impl Requirement {
    /// Creates a requirement with no lecturer and default attributes.
    pub fn new(
        id: impl Into<RequirementId>,
        class_id: impl Into<ClassId>,
        course_id: impl Into<CourseId>,
    ) -> Self {
        Self {
            id: id.into(),
            class_id: class_id.into(),
            course_id: course_id.into(),
            lecturer: None,
            course_code: String::new(),
            weekly_hours: 1,
            class_size: 0,
            preferred_room: None,
            division_label: String::new(),
        }
    }

    /// Assigns a lecturer.
    pub fn with_lecturer(mut self, lecturer: impl Into<LecturerId>) -> Self {
        self.lecturer = Some(lecturer.into());
        self
    }

    /// Sets the course code.
    pub fn with_course_code(mut self, code: impl Into<String>) -> Self {
        self.course_code = code.into();
        self
    }

    /// Sets weekly contact hours.
    pub fn with_weekly_hours(mut self, hours: u8) -> Self {
        self.weekly_hours = hours;
        self
    }

    /// Sets the class size.
    pub fn with_class_size(mut self, size: u32) -> Self {
        self.class_size = size;
        self
    }

    /// Sets the preferred room type.
    pub fn with_preferred_room(mut self, room_type: RoomType) -> Self {
        self.preferred_room = Some(room_type);
        self
    }

    /// Sets the division label.
    pub fn with_division(mut self, label: impl Into<String>) -> Self {
        self.division_label = label.into();
        self
    }

    /// Whether a lecturer is assigned.
    #[inline]
    pub fn has_lecturer(&self) -> bool {
        self.lecturer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_builder() {
        let req = Requirement::new(1, 10, 20)
            .with_lecturer(5)
            .with_course_code("CS101")
            .with_weekly_hours(3)
            .with_class_size(45)
            .with_preferred_room(RoomType::Lab)
            .with_division("A");

        assert_eq!(req.id, RequirementId(1));
        assert_eq!(req.class_id, ClassId(10));
        assert_eq!(req.course_id, CourseId(20));
        assert_eq!(req.lecturer, Some(LecturerId(5)));
        assert_eq!(req.course_code, "CS101");
        assert_eq!(req.weekly_hours, 3);
        assert_eq!(req.class_size, 45);
        assert_eq!(req.preferred_room, Some(RoomType::Lab));
        assert_eq!(req.division_label, "A");
        assert!(req.has_lecturer());
    }

    #[test]
    fn test_unassigned_lecturer_is_none() {
        let req = Requirement::new(1, 10, 20);
        assert!(!req.has_lecturer());
        assert_eq!(req.lecturer, None);
    }
}
