//! Timetabling domain models.
//!
//! Core data types for representing a timetable generation problem and its
//! solution: typed identifiers, teaching requirements, the run-scoped
//! resource pool, and placement records.
//!
//! # Domain Mapping
//!
//! | timetabler | University |
//! |------------|-----------|
//! | Requirement | Class-course teaching obligation |
//! | ResourcePool | Rooms, time-slot grid, teaching days |
//! | Gene | One (day, slot, room) placement decision |
//! | TimetableEntry | Persistable schedule row |

mod entry;
mod ids;
mod pool;
mod requirement;

pub use entry::{Gene, TimetableEntry};
pub use ids::{
    ClassId, CourseId, DayId, LecturerId, RequirementId, RoomId, SlotId, StreamId,
};
pub use pool::{Day, ResourcePool, Room, RoomType, TimeSlot};
pub use requirement::Requirement;
