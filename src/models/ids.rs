//! Typed entity identifiers.
//!
//! Each entity namespace (days, slots, rooms, classes, courses, lecturers,
//! requirements, streams) gets its own `Copy` newtype over the storage
//! layer's integer key. Separate types keep conflict-map keys from
//! colliding across namespaces, and an unassigned lecturer is
//! `Option<LecturerId>` rather than a sentinel value.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw storage-layer key.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a teaching day.
    DayId
);
id_type!(
    /// Identifier of a time slot within a day.
    SlotId
);
id_type!(
    /// Identifier of a room.
    RoomId
);
id_type!(
    /// Identifier of a student class (cohort).
    ClassId
);
id_type!(
    /// Identifier of a course.
    CourseId
);
id_type!(
    /// Identifier of a lecturer.
    LecturerId
);
id_type!(
    /// Identifier of a teaching requirement (class-course assignment row).
    RequirementId
);
id_type!(
    /// Identifier of a scheduling stream (e.g. Regular / Evening / Weekend).
    StreamId
);
