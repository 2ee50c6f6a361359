//! Constraint checking.
//!
//! Pure placement checks against an [`Occupancy`] state. Hard constraints
//! make a timetable unusable (double-bookings, capacity overflow, break
//! placement); soft constraints degrade quality (daily overload, room-type
//! mismatch). The fitness evaluator wants full itemization, so
//! [`ConstraintChecker::hard_violations`] never short-circuits;
//! [`ConstraintChecker::placeable`] is the short-circuiting probe for the
//! repair pass's placement search.

mod occupancy;

pub use occupancy::Occupancy;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Gene, Requirement, ResourcePool, Room, RoomId, SlotId, TimeSlot};

/// Hard constraint breaches. Any one makes a placement unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardViolationKind {
    /// Room already occupied at (day, slot).
    RoomOccupied,
    /// Class already attending another course at (day, slot).
    ClassOccupied,
    /// Lecturer already teaching at (day, slot).
    LecturerOccupied,
    /// Room capacity below class size.
    RoomTooSmall,
    /// Placement lands on a break slot.
    BreakSlot,
}

/// Soft constraint breaches. Tolerable, but penalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoftViolationKind {
    /// Lecturer teaching more sessions in a day than the cap.
    LecturerDailyOverload,
    /// Class attending more sessions in a day than the cap.
    ClassDailyOverload,
    /// Room type differs from the course's preferred type.
    RoomTypeMismatch,
}

/// Tunable constraint thresholds.
///
/// The caps mirror the institution's policy and are soft for fitness
/// scoring; the greedy repair pass enforces them as hard to stay
/// deterministic and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Maximum sessions a lecturer teaches per day.
    pub lecturer_daily_cap: u32,
    /// Maximum sessions a class attends per day.
    pub class_daily_cap: u32,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            lecturer_daily_cap: 4,
            class_daily_cap: 3,
        }
    }
}

impl ConstraintConfig {
    /// Sets the lecturer sessions-per-day cap.
    pub fn with_lecturer_daily_cap(mut self, cap: u32) -> Self {
        self.lecturer_daily_cap = cap;
        self
    }

    /// Sets the class sessions-per-day cap.
    pub fn with_class_daily_cap(mut self, cap: u32) -> Self {
        self.class_daily_cap = cap;
        self
    }
}

/// Placement checker over a run's resource pool.
///
/// Holds by-id lookup tables so every check is O(1).
#[derive(Debug, Clone)]
pub struct ConstraintChecker<'a> {
    rooms: HashMap<RoomId, &'a Room>,
    slots: HashMap<SlotId, &'a TimeSlot>,
    config: ConstraintConfig,
}

impl<'a> ConstraintChecker<'a> {
    /// Builds a checker for the pool.
    pub fn new(pool: &'a ResourcePool, config: ConstraintConfig) -> Self {
        Self {
            rooms: pool.room_index(),
            slots: pool.slots().iter().map(|s| (s.id, s)).collect(),
            config,
        }
    }

    /// Checker thresholds.
    pub fn config(&self) -> &ConstraintConfig {
        &self.config
    }

    /// Collects every hard violation a placement would incur against the
    /// committed state, in check order: room occupied, class occupied,
    /// lecturer occupied, capacity, break slot.
    pub fn hard_violations(
        &self,
        gene: Gene,
        req: &Requirement,
        occ: &Occupancy,
    ) -> Vec<HardViolationKind> {
        let mut violations = Vec::new();

        if occ.room_occupant(gene.day, gene.slot, gene.room).is_some() {
            violations.push(HardViolationKind::RoomOccupied);
        }
        if occ
            .class_occupant(gene.day, gene.slot, req.class_id)
            .is_some()
        {
            violations.push(HardViolationKind::ClassOccupied);
        }
        if let Some(lecturer) = req.lecturer {
            if occ
                .lecturer_occupant(gene.day, gene.slot, lecturer)
                .is_some()
            {
                violations.push(HardViolationKind::LecturerOccupied);
            }
        }
        if let Some(room) = self.rooms.get(&gene.room) {
            if !room.fits(req.class_size) {
                violations.push(HardViolationKind::RoomTooSmall);
            }
        }
        if let Some(slot) = self.slots.get(&gene.slot) {
            if slot.is_break {
                violations.push(HardViolationKind::BreakSlot);
            }
        }

        violations
    }

    /// Short-circuiting probe: whether the placement clears every hard
    /// check and both daily-load caps. Used by the repair pass, which
    /// treats the caps as hard.
    pub fn placeable(&self, gene: Gene, req: &Requirement, occ: &Occupancy) -> bool {
        if occ.room_occupant(gene.day, gene.slot, gene.room).is_some() {
            return false;
        }
        if occ
            .class_occupant(gene.day, gene.slot, req.class_id)
            .is_some()
        {
            return false;
        }
        if let Some(lecturer) = req.lecturer {
            if occ
                .lecturer_occupant(gene.day, gene.slot, lecturer)
                .is_some()
            {
                return false;
            }
            if occ.lecturer_sessions(gene.day, lecturer) >= self.config.lecturer_daily_cap {
                return false;
            }
        }
        if occ.class_sessions(gene.day, req.class_id) >= self.config.class_daily_cap {
            return false;
        }
        match self.rooms.get(&gene.room) {
            Some(room) if room.fits(req.class_size) => {}
            _ => return false,
        }
        match self.slots.get(&gene.slot) {
            Some(slot) if !slot.is_break => {}
            _ => return false,
        }
        true
    }

    /// Room-type preference penalty: 0 when the room matches the course's
    /// preferred type or no preference exists, 1 otherwise.
    pub fn room_type_penalty(&self, req: &Requirement, room: RoomId) -> u32 {
        match (&req.preferred_room, self.rooms.get(&room)) {
            (Some(preferred), Some(room)) if room.room_type != *preferred => 1,
            _ => 0,
        }
    }
}
