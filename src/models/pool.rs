//! Resource pool: rooms, time slots, and days.
//!
//! The pool is assembled once per run by the loader and shared by
//! reference across every candidate evaluation. Nothing here is mutated
//! during optimization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ids::{DayId, RoomId, SlotId};

/// A teachable room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Human-readable name (e.g. "LT-3", "Physics Lab B").
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Room classification, matched against course preferences.
    pub room_type: RoomType,
}

/// Room classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    /// Standard lecture room.
    Lecture,
    /// Laboratory.
    Lab,
    /// Large auditorium / theatre.
    Auditorium,
    /// Institution-specific type.
    Custom(String),
}

/// One time slot in the daily grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: SlotId,
    /// Start, minutes from midnight.
    pub start_minute: u16,
    /// End, minutes from midnight.
    pub end_minute: u16,
    /// Break slots never receive placements.
    pub is_break: bool,
}

/// A teaching day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    /// Unique day identifier.
    pub id: DayId,
    /// Human-readable name (e.g. "Monday").
    pub name: String,
    /// Position in the week, ascending.
    pub ordering: u8,
}

/// Immutable-for-the-run sets of rooms, slots, and days.
///
/// Days are kept sorted by `ordering` and slots by `start_minute`, so
/// deterministic scans (repair pass, reports) read in calendar order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    days: Vec<Day>,
    slots: Vec<TimeSlot>,
    rooms: Vec<Room>,
}

impl Room {
    /// Creates a lecture room.
    pub fn new(id: impl Into<RoomId>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            room_type: RoomType::Lecture,
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the room type.
    pub fn with_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    /// Whether the room seats a class of the given size.
    #[inline]
    pub fn fits(&self, class_size: u32) -> bool {
        self.capacity >= class_size
    }
}

impl TimeSlot {
    /// Creates a teaching slot.
    pub fn new(id: impl Into<SlotId>, start_minute: u16, end_minute: u16) -> Self {
        Self {
            id: id.into(),
            start_minute,
            end_minute,
            is_break: false,
        }
    }

    /// Marks the slot as a break.
    pub fn as_break(mut self) -> Self {
        self.is_break = true;
        self
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end_minute.saturating_sub(self.start_minute)
    }
}

impl Day {
    /// Creates a day.
    pub fn new(id: impl Into<DayId>, name: impl Into<String>, ordering: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ordering,
        }
    }
}

impl ResourcePool {
    /// Assembles a pool, sorting days by ordering and slots by start time.
    pub fn new(mut days: Vec<Day>, mut slots: Vec<TimeSlot>, rooms: Vec<Room>) -> Self {
        days.sort_by_key(|d| (d.ordering, d.id));
        slots.sort_by_key(|s| (s.start_minute, s.id));
        Self { days, slots, rooms }
    }

    /// All days, in calendar order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// All slots, in start-time order (break slots included).
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// All rooms, in load order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Slots that may receive placements (non-break), in start-time order.
    pub fn teaching_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter().filter(|s| !s.is_break)
    }

    /// Number of non-break slots.
    pub fn teaching_slot_count(&self) -> usize {
        self.teaching_slots().count()
    }

    /// Looks up a room by id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Looks up a slot by id.
    pub fn slot(&self, id: SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Looks up a day by id.
    pub fn day(&self, id: DayId) -> Option<&Day> {
        self.days.iter().find(|d| d.id == id)
    }

    /// Total number of distinct (day, teaching slot, room) placements.
    pub fn placement_count(&self) -> usize {
        self.days.len() * self.teaching_slot_count() * self.rooms.len()
    }

    /// Room lookup table for O(1) capacity/type checks.
    pub fn room_index(&self) -> HashMap<RoomId, &Room> {
        self.rooms.iter().map(|r| (r.id, r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pool() -> ResourcePool {
        ResourcePool::new(
            vec![Day::new(2, "Tuesday", 2), Day::new(1, "Monday", 1)],
            vec![
                TimeSlot::new(3, 660, 720).as_break(),
                TimeSlot::new(1, 480, 540),
                TimeSlot::new(2, 540, 600),
            ],
            vec![
                Room::new(1, 30).with_name("A1"),
                Room::new(2, 50).with_name("Lab").with_type(RoomType::Lab),
            ],
        )
    }

    #[test]
    fn test_days_sorted_by_ordering() {
        let pool = sample_pool();
        assert_eq!(pool.days()[0].name, "Monday");
        assert_eq!(pool.days()[1].name, "Tuesday");
    }

    #[test]
    fn test_slots_sorted_by_start() {
        let pool = sample_pool();
        let starts: Vec<u16> = pool.slots().iter().map(|s| s.start_minute).collect();
        assert_eq!(starts, vec![480, 540, 660]);
    }

    #[test]
    fn test_teaching_slots_exclude_breaks() {
        let pool = sample_pool();
        assert_eq!(pool.teaching_slot_count(), 2);
        assert!(pool.teaching_slots().all(|s| !s.is_break));
    }

    #[test]
    fn test_placement_count() {
        let pool = sample_pool();
        // 2 days x 2 teaching slots x 2 rooms
        assert_eq!(pool.placement_count(), 8);
    }

    #[test]
    fn test_lookups() {
        let pool = sample_pool();
        assert_eq!(pool.room(RoomId(2)).unwrap().capacity, 50);
        assert_eq!(pool.slot(SlotId(1)).unwrap().duration_minutes(), 60);
        assert_eq!(pool.day(DayId(1)).unwrap().name, "Monday");
        assert!(pool.room(RoomId(99)).is_none());
    }

    #[test]
    fn test_room_fits() {
        let room = Room::new(1, 30);
        assert!(room.fits(30));
        assert!(!room.fits(31));
    }

    #[test]
    fn test_room_index() {
        let pool = sample_pool();
        let index = pool.room_index();
        assert_eq!(index[&RoomId(1)].name, "A1");
        assert_eq!(index.len(), 2);
    }
}
