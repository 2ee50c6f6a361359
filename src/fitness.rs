//! Fitness evaluation.
//!
//! Aggregates constraint-checker output into a single scalar plus an
//! itemized breakdown per candidate. Hard violations dominate the score
//! (weights are orders of magnitude apart), so any feasible timetable
//! outranks every infeasible one. The human-readable quality rating is
//! reporting-only; the algorithm never branches on it.

use serde::{Deserialize, Serialize};

use crate::constraints::{
    ConstraintChecker, HardViolationKind, Occupancy, SoftViolationKind,
};
use crate::loader::ProblemInstance;
use crate::models::{ClassId, DayId, Gene, LecturerId, RequirementId, RoomId};

/// One itemized hard violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardViolation {
    /// What was breached.
    pub kind: HardViolationKind,
    /// Requirement whose placement breached it.
    pub requirement: RequirementId,
    /// Earlier-committed requirement it collides with, for the occupancy
    /// kinds.
    pub conflicts_with: Option<RequirementId>,
}

/// One itemized soft violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoftViolation {
    /// Lecturer over the sessions-per-day cap.
    LecturerDailyOverload {
        /// Overloaded lecturer.
        lecturer: LecturerId,
        /// Day of the overload.
        day: DayId,
        /// Sessions scheduled that day.
        sessions: u32,
    },
    /// Class over the sessions-per-day cap.
    ClassDailyOverload {
        /// Overloaded class.
        class: ClassId,
        /// Day of the overload.
        day: DayId,
        /// Sessions scheduled that day.
        sessions: u32,
    },
    /// Room type differs from the course's preference.
    RoomTypeMismatch {
        /// Requirement placed in the wrong room type.
        requirement: RequirementId,
        /// Room it was placed in.
        room: RoomId,
    },
}

impl SoftViolation {
    /// Violation category.
    pub fn kind(&self) -> SoftViolationKind {
        match self {
            SoftViolation::LecturerDailyOverload { .. } => SoftViolationKind::LecturerDailyOverload,
            SoftViolation::ClassDailyOverload { .. } => SoftViolationKind::ClassDailyOverload,
            SoftViolation::RoomTypeMismatch { .. } => SoftViolationKind::RoomTypeMismatch,
        }
    }
}

/// Human-readable quality band, derived from violation counts normalized
/// by problem size. Reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityRating {
    /// Hard violations remain.
    Poor,
    /// Feasible, but many soft violations.
    Fair,
    /// Feasible with few soft violations.
    Good,
    /// Feasible and free of soft violations.
    Excellent,
}

impl QualityRating {
    /// Rates a breakdown: infeasible is always `Poor`; feasible candidates
    /// band by soft violations per requirement (none → `Excellent`,
    /// ≤ 1 per 4 requirements → `Good`, otherwise `Fair`).
    pub fn from_counts(hard: usize, soft: usize, requirements: usize) -> Self {
        if hard > 0 {
            QualityRating::Poor
        } else if soft == 0 {
            QualityRating::Excellent
        } else if soft * 4 <= requirements.max(1) {
            QualityRating::Good
        } else {
            QualityRating::Fair
        }
    }
}

/// Penalty weights. `hard` sits orders of magnitude above `soft` so
/// feasibility always dominates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Penalty per hard violation.
    pub hard: f64,
    /// Penalty per soft violation.
    pub soft: f64,
    /// Flat bonus so a clean timetable scores positive.
    pub quality_bonus: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            hard: 1000.0,
            soft: 10.0,
            quality_bonus: 100.0,
        }
    }
}

impl FitnessWeights {
    /// Sets the hard-violation weight.
    pub fn with_hard(mut self, weight: f64) -> Self {
        self.hard = weight;
        self
    }

    /// Sets the soft-violation weight.
    pub fn with_soft(mut self, weight: f64) -> Self {
        self.soft = weight;
        self
    }
}

/// Per-candidate fitness record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessResult {
    /// Aggregate score, higher is better.
    pub score: f64,
    /// Itemized hard violations, in gene order.
    pub hard: Vec<HardViolation>,
    /// Itemized soft violations, deterministically ordered.
    pub soft: Vec<SoftViolation>,
    /// Zero hard violations.
    pub feasible: bool,
    /// Reporting band.
    pub rating: QualityRating,
}

impl FitnessResult {
    /// Number of hard violations.
    #[inline]
    pub fn hard_count(&self) -> usize {
        self.hard.len()
    }

    /// Number of soft violations.
    #[inline]
    pub fn soft_count(&self) -> usize {
        self.soft.len()
    }
}

/// Evaluates candidate gene vectors against a problem instance.
///
/// Baseline placements (kept from a previous run) are pre-committed into
/// every evaluation, so new genes colliding with them are penalized.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    instance: &'a ProblemInstance,
    checker: ConstraintChecker<'a>,
    weights: FitnessWeights,
    base: Occupancy,
}

impl<'a> FitnessEvaluator<'a> {
    /// Builds an evaluator. The baseline occupancy is seeded once here and
    /// cloned per evaluation.
    pub fn new(
        instance: &'a ProblemInstance,
        checker: ConstraintChecker<'a>,
        weights: FitnessWeights,
    ) -> Self {
        let base = Occupancy::seeded(instance.baseline.iter().map(|(req, gene)| (req, *gene)));
        Self {
            instance,
            checker,
            weights,
            base,
        }
    }

    /// The checker this evaluator scores with.
    pub fn checker(&self) -> &ConstraintChecker<'a> {
        &self.checker
    }

    /// Evaluates one candidate. `genes` must be index-aligned with the
    /// instance's requirement list (the chromosome invariant).
    pub fn evaluate(&self, genes: &[Gene]) -> FitnessResult {
        debug_assert_eq!(genes.len(), self.instance.requirements.len());

        let mut occ = self.base.clone();
        let mut hard = Vec::new();

        for (req, gene) in self.instance.requirements.iter().zip(genes) {
            debug_assert_eq!(req.id, gene.requirement);
            for kind in self.checker.hard_violations(*gene, req, &occ) {
                let conflicts_with = match kind {
                    HardViolationKind::RoomOccupied => {
                        occ.room_occupant(gene.day, gene.slot, gene.room)
                    }
                    HardViolationKind::ClassOccupied => {
                        occ.class_occupant(gene.day, gene.slot, req.class_id)
                    }
                    HardViolationKind::LecturerOccupied => req
                        .lecturer
                        .and_then(|l| occ.lecturer_occupant(gene.day, gene.slot, l)),
                    _ => None,
                };
                hard.push(HardViolation {
                    kind,
                    requirement: gene.requirement,
                    conflicts_with,
                });
            }
            occ.commit(*gene, req);
        }

        let config = self.checker.config();
        let mut soft = Vec::new();
        for (day, class, sessions) in occ.class_overloads(config.class_daily_cap) {
            soft.push(SoftViolation::ClassDailyOverload {
                class,
                day,
                sessions,
            });
        }
        for (day, lecturer, sessions) in occ.lecturer_overloads(config.lecturer_daily_cap) {
            soft.push(SoftViolation::LecturerDailyOverload {
                lecturer,
                day,
                sessions,
            });
        }
        for (req, gene) in self.instance.requirements.iter().zip(genes) {
            if self.checker.room_type_penalty(req, gene.room) > 0 {
                soft.push(SoftViolation::RoomTypeMismatch {
                    requirement: gene.requirement,
                    room: gene.room,
                });
            }
        }

        let score = self.weights.quality_bonus
            - self.weights.hard * hard.len() as f64
            - self.weights.soft * soft.len() as f64;
        let feasible = hard.is_empty();
        let rating =
            QualityRating::from_counts(hard.len(), soft.len(), self.instance.requirement_count());

        FitnessResult {
            score,
            hard,
            soft,
            feasible,
            rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintConfig;
    use crate::models::{
        Day, Requirement, ResourcePool, Room, RoomType, SlotId, TimeSlot,
    };
    use std::collections::HashMap;

    fn instance_with(requirements: Vec<Requirement>) -> ProblemInstance {
        ProblemInstance {
            pool: ResourcePool::new(
                vec![Day::new(1, "Monday", 1), Day::new(2, "Tuesday", 2)],
                vec![
                    TimeSlot::new(1, 480, 540),
                    TimeSlot::new(2, 540, 600),
                    TimeSlot::new(3, 600, 660).as_break(),
                ],
                vec![
                    Room::new(1, 30).with_name("A1"),
                    Room::new(2, 60).with_name("Lab").with_type(RoomType::Lab),
                ],
            ),
            requirements,
            baseline: Vec::new(),
            lecturer_courses: HashMap::new(),
            course_preferences: HashMap::new(),
            semester: 1,
            academic_year: "2025/2026".into(),
            stream: crate::models::StreamId(1),
        }
    }

    fn gene(req: u32, day: u32, slot: u32, room: u32) -> Gene {
        Gene::new(RequirementId(req), DayId(day), SlotId(slot), RoomId(room))
    }

    fn evaluator(instance: &ProblemInstance) -> FitnessEvaluator<'_> {
        FitnessEvaluator::new(
            instance,
            ConstraintChecker::new(&instance.pool, ConstraintConfig::default()),
            FitnessWeights::default(),
        )
    }

    #[test]
    fn test_clean_chromosome_is_feasible() {
        let instance = instance_with(vec![
            Requirement::new(1, 10, 1).with_class_size(25),
            Requirement::new(2, 11, 1).with_class_size(25),
        ]);
        let evaluator = evaluator(&instance);

        let result = evaluator.evaluate(&[gene(1, 1, 1, 1), gene(2, 1, 1, 2)]);
        assert!(result.feasible);
        assert_eq!(result.hard_count(), 0);
        assert_eq!(result.rating, QualityRating::Excellent);
        assert!((result.score - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_room_collision_flagged_once_with_occupant() {
        let instance = instance_with(vec![
            Requirement::new(1, 10, 1).with_class_size(25),
            Requirement::new(2, 11, 1).with_class_size(25),
        ]);
        let evaluator = evaluator(&instance);

        let result = evaluator.evaluate(&[gene(1, 1, 1, 1), gene(2, 1, 1, 1)]);
        assert!(!result.feasible);
        assert_eq!(result.rating, QualityRating::Poor);
        assert_eq!(
            result.hard,
            vec![HardViolation {
                kind: HardViolationKind::RoomOccupied,
                requirement: RequirementId(2),
                conflicts_with: Some(RequirementId(1)),
            }]
        );
    }

    #[test]
    fn test_hard_outweighs_any_soft_total() {
        let instance = instance_with(vec![
            Requirement::new(1, 10, 1)
                .with_class_size(25)
                .with_preferred_room(RoomType::Lab),
            Requirement::new(2, 11, 1).with_class_size(25),
        ]);
        let evaluator = evaluator(&instance);

        // One soft violation (room-type mismatch).
        let soft_only = evaluator.evaluate(&[gene(1, 1, 1, 1), gene(2, 1, 2, 1)]);
        // One hard violation (room collision), no soft.
        let hard_only = evaluator.evaluate(&[gene(1, 1, 1, 2), gene(2, 1, 1, 2)]);

        assert!(soft_only.feasible);
        assert!(!hard_only.feasible);
        assert!(soft_only.score > hard_only.score);
    }

    #[test]
    fn test_daily_overload_soft_violations() {
        // Class cap is 3/day: four sessions on Monday overload it.
        let reqs: Vec<Requirement> = (1..=4)
            .map(|i| Requirement::new(i, 10, 1).with_class_size(25))
            .collect();
        let instance = instance_with(reqs);
        let evaluator = evaluator(&instance);

        // Four distinct placements for the same class on day 1: two slots
        // x two rooms, so class-occupied collisions also appear.
        let genes = vec![
            gene(1, 1, 1, 1),
            gene(2, 1, 2, 1),
            gene(3, 1, 1, 2),
            gene(4, 1, 2, 2),
        ];
        let result = evaluator.evaluate(&genes);
        assert!(result
            .soft
            .iter()
            .any(|v| v.kind() == SoftViolationKind::ClassDailyOverload));
    }

    #[test]
    fn test_baseline_collision_penalized() {
        let mut instance = instance_with(vec![Requirement::new(2, 11, 1).with_class_size(25)]);
        instance.baseline = vec![(
            Requirement::new(1, 10, 1).with_class_size(25),
            gene(1, 1, 1, 1),
        )];
        let evaluator = evaluator(&instance);

        let result = evaluator.evaluate(&[gene(2, 1, 1, 1)]);
        assert_eq!(result.hard_count(), 1);
        assert_eq!(result.hard[0].kind, HardViolationKind::RoomOccupied);
        assert_eq!(result.hard[0].conflicts_with, Some(RequirementId(1)));
    }

    #[test]
    fn test_quality_rating_bands() {
        assert_eq!(QualityRating::from_counts(1, 0, 10), QualityRating::Poor);
        assert_eq!(QualityRating::from_counts(0, 0, 10), QualityRating::Excellent);
        assert_eq!(QualityRating::from_counts(0, 2, 10), QualityRating::Good);
        assert_eq!(QualityRating::from_counts(0, 5, 10), QualityRating::Fair);
        assert!(QualityRating::Excellent > QualityRating::Poor);
    }

    #[test]
    fn test_result_serde_round_trip() {
        let instance = instance_with(vec![Requirement::new(1, 10, 1).with_class_size(25)]);
        let evaluator = evaluator(&instance);
        let result = evaluator.evaluate(&[gene(1, 1, 3, 1)]); // break slot

        let json = serde_json::to_string(&result).unwrap();
        let back: FitnessResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.hard[0].kind, HardViolationKind::BreakSlot);
    }
}
