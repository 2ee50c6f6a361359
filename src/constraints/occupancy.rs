//! Typed conflict maps.
//!
//! Conflict detection runs tens of thousands of times per run
//! (population × generations × genes), so every probe must be O(1)
//! amortized. Three separate maps keyed by `(day, slot, resource-id)`
//! cover rooms, classes, and lecturers; separate key types keep the
//! namespaces from colliding. Two daily-load counters back the
//! sessions-per-day caps.

use std::collections::HashMap;

use crate::models::{ClassId, DayId, Gene, LecturerId, Requirement, RequirementId, RoomId, SlotId};

/// Incrementally maintained occupancy state for one candidate timetable.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    rooms: HashMap<(DayId, SlotId, RoomId), RequirementId>,
    classes: HashMap<(DayId, SlotId, ClassId), RequirementId>,
    lecturers: HashMap<(DayId, SlotId, LecturerId), RequirementId>,
    class_daily: HashMap<(DayId, ClassId), u32>,
    lecturer_daily: HashMap<(DayId, LecturerId), u32>,
}

impl Occupancy {
    /// Creates an empty occupancy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an occupancy pre-seeded with committed placements.
    pub fn seeded<'a>(committed: impl IntoIterator<Item = (&'a Requirement, Gene)>) -> Self {
        let mut occ = Self::new();
        for (req, gene) in committed {
            occ.commit(gene, req);
        }
        occ
    }

    /// Records a placement. The first committer of a (day, slot, resource)
    /// keeps the occupancy; later colliding commits leave it unchanged, so
    /// conflict reports name the earliest occupant.
    pub fn commit(&mut self, gene: Gene, req: &Requirement) {
        self.rooms
            .entry((gene.day, gene.slot, gene.room))
            .or_insert(gene.requirement);
        self.classes
            .entry((gene.day, gene.slot, req.class_id))
            .or_insert(gene.requirement);
        if let Some(lecturer) = req.lecturer {
            self.lecturers
                .entry((gene.day, gene.slot, lecturer))
                .or_insert(gene.requirement);
        }
        *self.class_daily.entry((gene.day, req.class_id)).or_insert(0) += 1;
        if let Some(lecturer) = req.lecturer {
            *self
                .lecturer_daily
                .entry((gene.day, lecturer))
                .or_insert(0) += 1;
        }
    }

    /// Requirement occupying the room at (day, slot), if any.
    #[inline]
    pub fn room_occupant(&self, day: DayId, slot: SlotId, room: RoomId) -> Option<RequirementId> {
        self.rooms.get(&(day, slot, room)).copied()
    }

    /// Requirement occupying the class at (day, slot), if any.
    #[inline]
    pub fn class_occupant(
        &self,
        day: DayId,
        slot: SlotId,
        class: ClassId,
    ) -> Option<RequirementId> {
        self.classes.get(&(day, slot, class)).copied()
    }

    /// Requirement occupying the lecturer at (day, slot), if any.
    #[inline]
    pub fn lecturer_occupant(
        &self,
        day: DayId,
        slot: SlotId,
        lecturer: LecturerId,
    ) -> Option<RequirementId> {
        self.lecturers.get(&(day, slot, lecturer)).copied()
    }

    /// Sessions already committed for the class on the day.
    #[inline]
    pub fn class_sessions(&self, day: DayId, class: ClassId) -> u32 {
        self.class_daily.get(&(day, class)).copied().unwrap_or(0)
    }

    /// Sessions already committed for the lecturer on the day.
    #[inline]
    pub fn lecturer_sessions(&self, day: DayId, lecturer: LecturerId) -> u32 {
        self.lecturer_daily
            .get(&(day, lecturer))
            .copied()
            .unwrap_or(0)
    }

    /// Room usage counts across all committed placements, for
    /// load-balancing heuristics.
    pub fn room_usage(&self) -> HashMap<RoomId, u32> {
        let mut usage = HashMap::new();
        for (day_slot_room, _) in &self.rooms {
            *usage.entry(day_slot_room.2).or_insert(0) += 1;
        }
        usage
    }

    /// Daily class session counts above the given cap, as
    /// `(day, class, sessions)` tuples sorted for deterministic reports.
    pub fn class_overloads(&self, cap: u32) -> Vec<(DayId, ClassId, u32)> {
        let mut over: Vec<_> = self
            .class_daily
            .iter()
            .filter(|(_, &count)| count > cap)
            .map(|(&(day, class), &count)| (day, class, count))
            .collect();
        over.sort();
        over
    }

    /// Daily lecturer session counts above the given cap, as
    /// `(day, lecturer, sessions)` tuples sorted for deterministic reports.
    pub fn lecturer_overloads(&self, cap: u32) -> Vec<(DayId, LecturerId, u32)> {
        let mut over: Vec<_> = self
            .lecturer_daily
            .iter()
            .filter(|(_, &count)| count > cap)
            .map(|(&(day, lecturer), &count)| (day, lecturer, count))
            .collect();
        over.sort();
        over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Requirement;

    fn req(id: u32, class: u32, lecturer: Option<u32>) -> Requirement {
        let mut r = Requirement::new(id, class, 1);
        if let Some(l) = lecturer {
            r = r.with_lecturer(l);
        }
        r
    }

    fn gene(req_id: u32, day: u32, slot: u32, room: u32) -> Gene {
        Gene::new(
            RequirementId(req_id),
            DayId(day),
            SlotId(slot),
            RoomId(room),
        )
    }

    #[test]
    fn test_commit_and_probe() {
        let mut occ = Occupancy::new();
        let r1 = req(1, 10, Some(5));
        occ.commit(gene(1, 1, 1, 1), &r1);

        assert_eq!(
            occ.room_occupant(DayId(1), SlotId(1), RoomId(1)),
            Some(RequirementId(1))
        );
        assert_eq!(
            occ.class_occupant(DayId(1), SlotId(1), ClassId(10)),
            Some(RequirementId(1))
        );
        assert_eq!(
            occ.lecturer_occupant(DayId(1), SlotId(1), LecturerId(5)),
            Some(RequirementId(1))
        );
        assert_eq!(occ.room_occupant(DayId(1), SlotId(2), RoomId(1)), None);
    }

    #[test]
    fn test_first_committer_keeps_occupancy() {
        let mut occ = Occupancy::new();
        occ.commit(gene(1, 1, 1, 1), &req(1, 10, None));
        occ.commit(gene(2, 1, 1, 1), &req(2, 11, None));

        // Room stays attributed to the first requirement.
        assert_eq!(
            occ.room_occupant(DayId(1), SlotId(1), RoomId(1)),
            Some(RequirementId(1))
        );
    }

    #[test]
    fn test_no_lecturer_entry_for_unassigned() {
        let mut occ = Occupancy::new();
        occ.commit(gene(1, 1, 1, 1), &req(1, 10, None));
        assert_eq!(occ.lecturer_sessions(DayId(1), LecturerId(0)), 0);
    }

    #[test]
    fn test_daily_counts() {
        let mut occ = Occupancy::new();
        let r = req(1, 10, Some(5));
        occ.commit(gene(1, 1, 1, 1), &r);
        occ.commit(gene(2, 1, 2, 1), &r);
        occ.commit(gene(3, 2, 1, 1), &r);

        assert_eq!(occ.class_sessions(DayId(1), ClassId(10)), 2);
        assert_eq!(occ.class_sessions(DayId(2), ClassId(10)), 1);
        assert_eq!(occ.lecturer_sessions(DayId(1), LecturerId(5)), 2);
    }

    #[test]
    fn test_overload_reports_sorted() {
        let mut occ = Occupancy::new();
        let r = req(1, 10, Some(5));
        for slot in 1..=4 {
            occ.commit(gene(slot, 1, slot, slot), &r);
        }
        let class_over = occ.class_overloads(3);
        assert_eq!(class_over, vec![(DayId(1), ClassId(10), 4)]);
        assert!(occ.lecturer_overloads(4).is_empty());
        assert_eq!(occ.lecturer_overloads(3), vec![(DayId(1), LecturerId(5), 4)]);
    }

    #[test]
    fn test_room_usage() {
        let mut occ = Occupancy::new();
        occ.commit(gene(1, 1, 1, 7), &req(1, 10, None));
        occ.commit(gene(2, 1, 2, 7), &req(2, 11, None));
        occ.commit(gene(3, 2, 1, 8), &req(3, 12, None));

        let usage = occ.room_usage();
        assert_eq!(usage[&RoomId(7)], 2);
        assert_eq!(usage[&RoomId(8)], 1);
    }

    #[test]
    fn test_seeded() {
        let r1 = req(1, 10, None);
        let g1 = gene(1, 1, 1, 1);
        let occ = Occupancy::seeded([(&r1, g1)]);
        assert_eq!(
            occ.room_occupant(DayId(1), SlotId(1), RoomId(1)),
            Some(RequirementId(1))
        );
    }
}
