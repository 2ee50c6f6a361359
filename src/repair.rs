//! Greedy first-fit repair pass.
//!
//! After the GA converges, requirements that are still unplaced or still
//! hard-violating get one deterministic placement attempt each: the first
//! (day, slot, room) combination that clears every hard check wins. No
//! optimality search happens here; the pass trades quality for guaranteed
//! termination in at most |requirements| x |slots| x |rooms| probes.
//! Daily-load caps are enforced as hard in this pass to keep it bounded
//! and deterministic.

use itertools::iproduct;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constraints::{ConstraintChecker, Occupancy};
use crate::loader::ProblemInstance;
use crate::models::{Gene, Requirement, RequirementId, Room, TimeSlot};

/// Why a requirement could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnscheduledReason {
    /// No lecturer assigned and the policy requires one.
    NoLecturer,
    /// No room in the pool seats the class.
    NoSuitableRoom,
    /// The slot grid has no non-break slots.
    NoTeachingSlots,
    /// Every (day, slot, room) combination was tried and conflicted.
    ConflictExhausted,
}

/// A requirement the repair pass gave up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unscheduled {
    /// The requirement left out.
    pub requirement: RequirementId,
    /// Why placement failed.
    pub reason: UnscheduledReason,
}

/// Repair-pass policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairPolicy {
    /// Refuse to place requirements with no lecturer assigned. Off by
    /// default: an unassigned requirement simply cannot collide on the
    /// lecturer dimension.
    pub require_lecturer: bool,
}

/// Result of a repair pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairOutcome {
    /// Placements found, in attempt order.
    pub placed: Vec<Gene>,
    /// Requirements given up on, with reasons.
    pub unscheduled: Vec<Unscheduled>,
}

/// Deterministic first-fit scheduler for leftover requirements.
pub struct GreedyRepair<'a> {
    instance: &'a ProblemInstance,
    checker: &'a ConstraintChecker<'a>,
    policy: RepairPolicy,
}

impl<'a> GreedyRepair<'a> {
    /// Creates a repair pass with the default policy.
    pub fn new(instance: &'a ProblemInstance, checker: &'a ConstraintChecker<'a>) -> Self {
        Self {
            instance,
            checker,
            policy: RepairPolicy::default(),
        }
    }

    /// Sets the policy.
    pub fn with_policy(mut self, policy: RepairPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attempts to place every pending requirement against the committed
    /// occupancy, mutating it as placements land.
    ///
    /// Pending requirements are attempted in priority order:
    /// lecturer-assigned before unassigned, larger class first, course
    /// code ascending, then requirement id.
    pub fn place(&self, pending: &[&Requirement], occ: &mut Occupancy) -> RepairOutcome {
        let mut queue: Vec<&Requirement> = pending.to_vec();
        queue.sort_by(|a, b| {
            b.has_lecturer()
                .cmp(&a.has_lecturer())
                .then(b.class_size.cmp(&a.class_size))
                .then(a.course_code.cmp(&b.course_code))
                .then(a.id.cmp(&b.id))
        });

        let teaching: Vec<&TimeSlot> = self.instance.pool.teaching_slots().collect();
        let mut outcome = RepairOutcome::default();

        for req in queue {
            if self.policy.require_lecturer && !req.has_lecturer() {
                outcome.unscheduled.push(Unscheduled {
                    requirement: req.id,
                    reason: UnscheduledReason::NoLecturer,
                });
                continue;
            }
            if teaching.is_empty() {
                outcome.unscheduled.push(Unscheduled {
                    requirement: req.id,
                    reason: UnscheduledReason::NoTeachingSlots,
                });
                continue;
            }

            let rooms = self.ordered_rooms(req, occ);
            if rooms.is_empty() {
                outcome.unscheduled.push(Unscheduled {
                    requirement: req.id,
                    reason: UnscheduledReason::NoSuitableRoom,
                });
                continue;
            }

            match self.first_fit(req, &rooms, &teaching, occ) {
                Some(gene) => {
                    occ.commit(gene, req);
                    outcome.placed.push(gene);
                }
                None => {
                    outcome.unscheduled.push(Unscheduled {
                        requirement: req.id,
                        reason: UnscheduledReason::ConflictExhausted,
                    });
                }
            }
        }

        debug!(
            "repair pass: {} placed, {} unscheduled",
            outcome.placed.len(),
            outcome.unscheduled.len()
        );
        outcome
    }

    /// Capacity-sufficient rooms ordered for this requirement:
    /// preferred-type match first, then least-used (load balancing), then
    /// smallest sufficient capacity, then id.
    fn ordered_rooms(&self, req: &Requirement, occ: &Occupancy) -> Vec<&Room> {
        let usage = occ.room_usage();
        let mut rooms: Vec<&Room> = self
            .instance
            .pool
            .rooms()
            .iter()
            .filter(|r| r.fits(req.class_size))
            .collect();
        rooms.sort_by(|a, b| {
            let a_mismatch = self.checker.room_type_penalty(req, a.id);
            let b_mismatch = self.checker.room_type_penalty(req, b.id);
            a_mismatch
                .cmp(&b_mismatch)
                .then_with(|| {
                    usage
                        .get(&a.id)
                        .copied()
                        .unwrap_or(0)
                        .cmp(&usage.get(&b.id).copied().unwrap_or(0))
                })
                .then(a.capacity.cmp(&b.capacity))
                .then(a.id.cmp(&b.id))
        });
        rooms
    }

    /// First (day, slot, room) combination clearing every hard check.
    fn first_fit(
        &self,
        req: &Requirement,
        rooms: &[&Room],
        teaching: &[&TimeSlot],
        occ: &Occupancy,
    ) -> Option<Gene> {
        for (day, slot) in iproduct!(self.instance.pool.days(), teaching) {
            for room in rooms {
                let gene = Gene::new(req.id, day.id, slot.id, room.id);
                if self.checker.placeable(gene, req, occ) {
                    return Some(gene);
                }
            }
        }
        None
    }
}
