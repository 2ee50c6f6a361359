//! Entity loading: storage snapshot → validated problem instance.
//!
//! The persistence layer hands the core a [`Snapshot`] of raw rows. The
//! loader filters it by stream/semester/academic-year, joins the rows into
//! [`Requirement`]s and a [`ResourcePool`], precomputes lookup tables, and
//! validates the result. Validation collects every problem before failing:
//! missing prerequisites (no days, no teaching slots, no rooms, no
//! requirements) and structural faults (duplicate ids, dangling
//! references) all surface in one [`DataIncompleteError`].

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{DataIncompleteError, SnapshotIssue, SnapshotIssueKind};
use crate::models::{
    ClassId, CourseId, Day, DayId, Gene, LecturerId, Requirement, RequirementId, ResourcePool,
    Room, RoomId, RoomType, SlotId, StreamId, TimeSlot,
};

/// A class (cohort) row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Class identifier.
    pub id: ClassId,
    /// Class name.
    pub name: String,
    /// Number of students.
    pub size: u32,
    /// Division label (e.g. "A", "B").
    pub division_label: String,
    /// Stream the class belongs to.
    pub stream: StreamId,
}

/// A course row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course identifier.
    pub id: CourseId,
    /// Course code (e.g. "CS101").
    pub code: String,
    /// Course title.
    pub name: String,
}

/// A lecturer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerRecord {
    /// Lecturer identifier.
    pub id: LecturerId,
    /// Lecturer name.
    pub name: String,
}

/// A class-course assignment row: the raw form of a teaching requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Assignment identifier, becomes the requirement id.
    pub id: RequirementId,
    /// Class attending.
    pub class_id: ClassId,
    /// Course taught.
    pub course_id: CourseId,
    /// Lecturer, if one has been assigned.
    pub lecturer: Option<LecturerId>,
    /// Contact hours per week.
    pub weekly_hours: u8,
    /// Semester the assignment belongs to.
    pub semester: u8,
    /// Academic year the assignment belongs to.
    pub academic_year: String,
    /// Inactive assignments are excluded from scheduling.
    pub active: bool,
}

/// Course → preferred room type row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPreference {
    /// Course the preference applies to.
    pub course_id: CourseId,
    /// Preferred room type.
    pub room_type: RoomType,
}

/// An already-persisted timetable entry, for "clear before regenerate"
/// semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingEntry {
    /// Requirement the entry schedules.
    pub requirement_id: RequirementId,
    /// Scheduled day.
    pub day: DayId,
    /// Scheduled slot.
    pub slot: SlotId,
    /// Scheduled room.
    pub room: RoomId,
}

/// Scopes a run to one stream, semester, and academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFilter {
    /// Stream whose classes participate.
    pub stream: StreamId,
    /// Semester to schedule.
    pub semester: u8,
    /// Academic year to schedule (e.g. "2025/2026").
    pub academic_year: String,
}

impl RunFilter {
    /// Creates a filter.
    pub fn new(stream: impl Into<StreamId>, semester: u8, academic_year: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            semester,
            academic_year: academic_year.into(),
        }
    }
}

/// Raw storage snapshot for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Active teaching days.
    pub days: Vec<Day>,
    /// Time-slot grid (break slots included).
    pub slots: Vec<TimeSlot>,
    /// Available rooms.
    pub rooms: Vec<Room>,
    /// Classes across all streams.
    pub classes: Vec<ClassRecord>,
    /// Courses.
    pub courses: Vec<CourseRecord>,
    /// Lecturers.
    pub lecturers: Vec<LecturerRecord>,
    /// Class-course assignments across all semesters.
    pub assignments: Vec<AssignmentRecord>,
    /// Course room-type preferences.
    pub preferences: Vec<RoomPreference>,
    /// Previously persisted entries, consulted when not clearing.
    pub existing: Vec<ExistingEntry>,
}

/// The validated, in-memory problem instance the optimizer runs on.
///
/// Owned by the invoking caller; every optimization component borrows it.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    /// Rooms, slots, and days for the run.
    pub pool: ResourcePool,
    /// Requirements to place, in stable load order.
    pub requirements: Vec<Requirement>,
    /// Pre-committed placements kept from a previous run, with their
    /// requirements. Only populated when the run does not clear existing
    /// entries; these never move.
    pub baseline: Vec<(Requirement, Gene)>,
    /// Lecturer → course ids they teach in this run (sorted).
    pub lecturer_courses: HashMap<LecturerId, Vec<CourseId>>,
    /// Course → preferred room type.
    pub course_preferences: HashMap<CourseId, RoomType>,
    /// Semester being scheduled.
    pub semester: u8,
    /// Academic year being scheduled.
    pub academic_year: String,
    /// Stream being scheduled.
    pub stream: StreamId,
}

impl ProblemInstance {
    /// Finds a requirement by id, searching both the optimization set and
    /// the baseline.
    pub fn requirement(&self, id: RequirementId) -> Option<&Requirement> {
        self.requirements
            .iter()
            .find(|r| r.id == id)
            .or_else(|| self.baseline.iter().map(|(r, _)| r).find(|r| r.id == id))
    }

    /// Number of requirements in the optimization set.
    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }
}

impl Snapshot {
    /// Filters, joins, and validates the snapshot into a problem instance.
    ///
    /// With `clear_existing` set, previously persisted entries are ignored
    /// and every in-scope requirement is rescheduled. Otherwise entries for
    /// in-scope requirements become an immutable baseline: their
    /// requirements leave the optimization set and their placements
    /// pre-occupy the conflict maps.
    pub fn load(
        &self,
        filter: &RunFilter,
        clear_existing: bool,
    ) -> Result<ProblemInstance, DataIncompleteError> {
        let mut issues = Vec::new();

        self.check_duplicates(&mut issues);
        self.check_references(&mut issues);

        let class_index: HashMap<ClassId, &ClassRecord> =
            self.classes.iter().map(|c| (c.id, c)).collect();
        let course_index: HashMap<CourseId, &CourseRecord> =
            self.courses.iter().map(|c| (c.id, c)).collect();
        let preference_index: HashMap<CourseId, &RoomType> = self
            .preferences
            .iter()
            .map(|p| (p.course_id, &p.room_type))
            .collect();

        // Requirements in scope: active, matching semester/year, class in stream.
        let in_scope: Vec<&AssignmentRecord> = self
            .assignments
            .iter()
            .filter(|a| {
                a.active
                    && a.semester == filter.semester
                    && a.academic_year == filter.academic_year
                    && class_index
                        .get(&a.class_id)
                        .is_some_and(|c| c.stream == filter.stream)
            })
            .collect();

        if self.days.is_empty() {
            issues.push(SnapshotIssue::new(
                SnapshotIssueKind::MissingDays,
                "no active days",
            ));
        }
        if self.slots.is_empty() {
            issues.push(SnapshotIssue::new(
                SnapshotIssueKind::MissingSlots,
                "no time slots",
            ));
        } else if self.slots.iter().all(|s| s.is_break) {
            issues.push(SnapshotIssue::new(
                SnapshotIssueKind::MissingTeachingSlots,
                "every time slot is a break",
            ));
        }
        if self.rooms.is_empty() {
            issues.push(SnapshotIssue::new(
                SnapshotIssueKind::MissingRooms,
                "no rooms",
            ));
        }
        if in_scope.is_empty() {
            issues.push(SnapshotIssue::new(
                SnapshotIssueKind::MissingRequirements,
                format!(
                    "no active class-course assignments for stream {} semester {} year {}",
                    filter.stream, filter.semester, filter.academic_year
                ),
            ));
        }

        if !issues.is_empty() {
            return Err(DataIncompleteError { issues });
        }

        // Join assignments into requirements. References were validated
        // above, so the index lookups cannot miss here.
        let mut requirements: Vec<Requirement> = in_scope
            .iter()
            .map(|a| {
                let class = class_index[&a.class_id];
                let course = course_index[&a.course_id];
                let mut req = Requirement::new(a.id, a.class_id, a.course_id)
                    .with_course_code(course.code.clone())
                    .with_weekly_hours(a.weekly_hours)
                    .with_class_size(class.size)
                    .with_division(class.division_label.clone());
                if let Some(lecturer) = a.lecturer {
                    req = req.with_lecturer(lecturer);
                }
                if let Some(room_type) = preference_index.get(&a.course_id) {
                    req = req.with_preferred_room((*room_type).clone());
                }
                req
            })
            .collect();
        requirements.sort_by_key(|r| r.id);

        // Lookup tables.
        let mut lecturer_courses: HashMap<LecturerId, Vec<CourseId>> = HashMap::new();
        for req in &requirements {
            if let Some(lecturer) = req.lecturer {
                lecturer_courses.entry(lecturer).or_default().push(req.course_id);
            }
        }
        for courses in lecturer_courses.values_mut() {
            courses.sort();
            courses.dedup();
        }
        let course_preferences: HashMap<CourseId, RoomType> = self
            .preferences
            .iter()
            .map(|p| (p.course_id, p.room_type.clone()))
            .collect();

        // Baseline extraction for "clear existing" off.
        let mut baseline = Vec::new();
        if !clear_existing {
            let placed: HashMap<RequirementId, &ExistingEntry> = self
                .existing
                .iter()
                .map(|e| (e.requirement_id, e))
                .collect();
            let mut kept = Vec::with_capacity(requirements.len());
            for req in requirements {
                match placed.get(&req.id) {
                    Some(entry) => {
                        let gene = Gene::new(req.id, entry.day, entry.slot, entry.room);
                        baseline.push((req, gene));
                    }
                    None => kept.push(req),
                }
            }
            baseline.sort_by_key(|(r, _)| r.id);
            requirements = kept;
        }

        let pool = ResourcePool::new(self.days.clone(), self.slots.clone(), self.rooms.clone());
        debug!(
            "loaded instance: {} requirements, {} baseline, {} placements",
            requirements.len(),
            baseline.len(),
            pool.placement_count()
        );

        Ok(ProblemInstance {
            pool,
            requirements,
            baseline,
            lecturer_courses,
            course_preferences,
            semester: filter.semester,
            academic_year: filter.academic_year.clone(),
            stream: filter.stream,
        })
    }

    fn check_duplicates(&self, issues: &mut Vec<SnapshotIssue>) {
        fn sweep<I: Copy + Eq + std::hash::Hash + std::fmt::Display>(
            ids: impl Iterator<Item = I>,
            entity: &str,
            issues: &mut Vec<SnapshotIssue>,
        ) {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    issues.push(SnapshotIssue::new(
                        SnapshotIssueKind::DuplicateId,
                        format!("duplicate {entity} id {id}"),
                    ));
                }
            }
        }

        sweep(self.days.iter().map(|d| d.id), "day", issues);
        sweep(self.slots.iter().map(|s| s.id), "slot", issues);
        sweep(self.rooms.iter().map(|r| r.id), "room", issues);
        sweep(self.classes.iter().map(|c| c.id), "class", issues);
        sweep(self.courses.iter().map(|c| c.id), "course", issues);
        sweep(self.lecturers.iter().map(|l| l.id), "lecturer", issues);
        sweep(self.assignments.iter().map(|a| a.id), "assignment", issues);
    }

    fn check_references(&self, issues: &mut Vec<SnapshotIssue>) {
        let class_ids: HashSet<ClassId> = self.classes.iter().map(|c| c.id).collect();
        let course_ids: HashSet<CourseId> = self.courses.iter().map(|c| c.id).collect();
        let lecturer_ids: HashSet<LecturerId> = self.lecturers.iter().map(|l| l.id).collect();

        for a in &self.assignments {
            if !class_ids.contains(&a.class_id) {
                issues.push(SnapshotIssue::new(
                    SnapshotIssueKind::UnknownClass,
                    format!("assignment {} references unknown class {}", a.id, a.class_id),
                ));
            }
            if !course_ids.contains(&a.course_id) {
                issues.push(SnapshotIssue::new(
                    SnapshotIssueKind::UnknownCourse,
                    format!(
                        "assignment {} references unknown course {}",
                        a.id, a.course_id
                    ),
                ));
            }
            if let Some(lecturer) = a.lecturer {
                if !lecturer_ids.contains(&lecturer) {
                    issues.push(SnapshotIssue::new(
                        SnapshotIssueKind::UnknownLecturer,
                        format!("assignment {} references unknown lecturer {}", a.id, lecturer),
                    ));
                }
            }
        }

        for p in &self.preferences {
            if !course_ids.contains(&p.course_id) {
                issues.push(SnapshotIssue::new(
                    SnapshotIssueKind::UnknownCourse,
                    format!("room preference references unknown course {}", p.course_id),
                ));
            }
        }

        let day_ids: HashSet<DayId> = self.days.iter().map(|d| d.id).collect();
        let slot_ids: HashSet<SlotId> = self.slots.iter().map(|s| s.id).collect();
        let room_ids: HashSet<RoomId> = self.rooms.iter().map(|r| r.id).collect();
        for e in &self.existing {
            if !day_ids.contains(&e.day)
                || !slot_ids.contains(&e.slot)
                || !room_ids.contains(&e.room)
            {
                issues.push(SnapshotIssue::new(
                    SnapshotIssueKind::UnknownPlacement,
                    format!(
                        "existing entry for requirement {} references an unknown day, slot, or room",
                        e.requirement_id
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            days: vec![Day::new(1, "Monday", 1), Day::new(2, "Tuesday", 2)],
            slots: vec![
                TimeSlot::new(1, 480, 540),
                TimeSlot::new(2, 540, 600),
                TimeSlot::new(3, 600, 660).as_break(),
            ],
            rooms: vec![Room::new(1, 30).with_name("A1"), Room::new(2, 60).with_name("A2")],
            classes: vec![
                ClassRecord {
                    id: ClassId(1),
                    name: "CS-1".into(),
                    size: 25,
                    division_label: "A".into(),
                    stream: StreamId(1),
                },
                ClassRecord {
                    id: ClassId(2),
                    name: "CS-2".into(),
                    size: 50,
                    division_label: "B".into(),
                    stream: StreamId(2),
                },
            ],
            courses: vec![
                CourseRecord {
                    id: CourseId(1),
                    code: "CS101".into(),
                    name: "Intro".into(),
                },
                CourseRecord {
                    id: CourseId(2),
                    code: "CS201".into(),
                    name: "Algorithms".into(),
                },
            ],
            lecturers: vec![LecturerRecord {
                id: LecturerId(1),
                name: "Dr. A".into(),
            }],
            assignments: vec![
                AssignmentRecord {
                    id: RequirementId(1),
                    class_id: ClassId(1),
                    course_id: CourseId(1),
                    lecturer: Some(LecturerId(1)),
                    weekly_hours: 2,
                    semester: 1,
                    academic_year: "2025/2026".into(),
                    active: true,
                },
                AssignmentRecord {
                    id: RequirementId(2),
                    class_id: ClassId(1),
                    course_id: CourseId(2),
                    lecturer: None,
                    weekly_hours: 3,
                    semester: 1,
                    academic_year: "2025/2026".into(),
                    active: true,
                },
                // Other stream
                AssignmentRecord {
                    id: RequirementId(3),
                    class_id: ClassId(2),
                    course_id: CourseId(1),
                    lecturer: Some(LecturerId(1)),
                    weekly_hours: 2,
                    semester: 1,
                    academic_year: "2025/2026".into(),
                    active: true,
                },
                // Inactive
                AssignmentRecord {
                    id: RequirementId(4),
                    class_id: ClassId(1),
                    course_id: CourseId(1),
                    lecturer: None,
                    weekly_hours: 1,
                    semester: 1,
                    academic_year: "2025/2026".into(),
                    active: false,
                },
            ],
            preferences: vec![RoomPreference {
                course_id: CourseId(2),
                room_type: RoomType::Lab,
            }],
            existing: vec![],
        }
    }

    fn filter() -> RunFilter {
        RunFilter::new(1, 1, "2025/2026")
    }

    #[test]
    fn test_load_filters_by_stream_and_active() {
        let instance = sample_snapshot().load(&filter(), true).unwrap();
        let ids: Vec<RequirementId> = instance.requirements.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RequirementId(1), RequirementId(2)]);
    }

    #[test]
    fn test_load_joins_class_and_course_data() {
        let instance = sample_snapshot().load(&filter(), true).unwrap();
        let req = instance.requirement(RequirementId(1)).unwrap();
        assert_eq!(req.class_size, 25);
        assert_eq!(req.course_code, "CS101");
        assert_eq!(req.division_label, "A");
        assert_eq!(req.lecturer, Some(LecturerId(1)));

        let pref = instance.requirement(RequirementId(2)).unwrap();
        assert_eq!(pref.preferred_room, Some(RoomType::Lab));
        assert_eq!(pref.lecturer, None);
    }

    #[test]
    fn test_lookup_tables() {
        let instance = sample_snapshot().load(&filter(), true).unwrap();
        assert_eq!(
            instance.lecturer_courses[&LecturerId(1)],
            vec![CourseId(1)]
        );
        assert_eq!(instance.course_preferences[&CourseId(2)], RoomType::Lab);
    }

    #[test]
    fn test_missing_days() {
        let mut snapshot = sample_snapshot();
        snapshot.days.clear();
        let err = snapshot.load(&filter(), true).unwrap_err();
        assert!(err.has(SnapshotIssueKind::MissingDays));
    }

    #[test]
    fn test_missing_slots_and_all_breaks() {
        let mut snapshot = sample_snapshot();
        snapshot.slots.clear();
        let err = snapshot.load(&filter(), true).unwrap_err();
        assert!(err.has(SnapshotIssueKind::MissingSlots));

        let mut snapshot = sample_snapshot();
        for slot in &mut snapshot.slots {
            slot.is_break = true;
        }
        let err = snapshot.load(&filter(), true).unwrap_err();
        assert!(err.has(SnapshotIssueKind::MissingTeachingSlots));
    }

    #[test]
    fn test_missing_rooms() {
        let mut snapshot = sample_snapshot();
        snapshot.rooms.clear();
        let err = snapshot.load(&filter(), true).unwrap_err();
        assert!(err.has(SnapshotIssueKind::MissingRooms));
    }

    #[test]
    fn test_missing_requirements_for_filter() {
        let snapshot = sample_snapshot();
        let err = snapshot
            .load(&RunFilter::new(1, 2, "2025/2026"), true)
            .unwrap_err();
        assert!(err.has(SnapshotIssueKind::MissingRequirements));
    }

    #[test]
    fn test_collects_multiple_issues() {
        let mut snapshot = sample_snapshot();
        snapshot.days.clear();
        snapshot.rooms.clear();
        let err = snapshot.load(&filter(), true).unwrap_err();
        assert!(err.issues.len() >= 2);
    }

    #[test]
    fn test_duplicate_ids_detected() {
        let mut snapshot = sample_snapshot();
        snapshot.rooms.push(Room::new(1, 99));
        let err = snapshot.load(&filter(), true).unwrap_err();
        assert!(err.has(SnapshotIssueKind::DuplicateId));
    }

    #[test]
    fn test_dangling_references_detected() {
        let mut snapshot = sample_snapshot();
        snapshot.assignments[0].class_id = ClassId(99);
        snapshot.assignments[1].lecturer = Some(LecturerId(99));
        snapshot.preferences.push(RoomPreference {
            course_id: CourseId(99),
            room_type: RoomType::Lecture,
        });
        let err = snapshot.load(&filter(), true).unwrap_err();
        assert!(err.has(SnapshotIssueKind::UnknownClass));
        assert!(err.has(SnapshotIssueKind::UnknownLecturer));
        assert!(err.has(SnapshotIssueKind::UnknownCourse));
    }

    #[test]
    fn test_baseline_extraction_when_keeping_existing() {
        let mut snapshot = sample_snapshot();
        snapshot.existing.push(ExistingEntry {
            requirement_id: RequirementId(1),
            day: DayId(1),
            slot: SlotId(1),
            room: RoomId(1),
        });

        let instance = snapshot.load(&filter(), false).unwrap();
        assert_eq!(instance.requirements.len(), 1);
        assert_eq!(instance.requirements[0].id, RequirementId(2));
        assert_eq!(instance.baseline.len(), 1);
        let (req, gene) = &instance.baseline[0];
        assert_eq!(req.id, RequirementId(1));
        assert_eq!(gene.room, RoomId(1));
        // Baseline requirements still resolvable by id.
        assert!(instance.requirement(RequirementId(1)).is_some());
    }

    #[test]
    fn test_clear_existing_ignores_baseline() {
        let mut snapshot = sample_snapshot();
        snapshot.existing.push(ExistingEntry {
            requirement_id: RequirementId(1),
            day: DayId(1),
            slot: SlotId(1),
            room: RoomId(1),
        });

        let instance = snapshot.load(&filter(), true).unwrap();
        assert_eq!(instance.requirements.len(), 2);
        assert!(instance.baseline.is_empty());
    }

    #[test]
    fn test_existing_entry_with_unknown_placement() {
        let mut snapshot = sample_snapshot();
        snapshot.existing.push(ExistingEntry {
            requirement_id: RequirementId(1),
            day: DayId(9),
            slot: SlotId(1),
            room: RoomId(1),
        });
        let err = snapshot.load(&filter(), false).unwrap_err();
        assert!(err.has(SnapshotIssueKind::UnknownPlacement));
    }
}
