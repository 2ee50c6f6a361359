//! Timetable chromosome.
//!
//! One gene per requirement, index-aligned with the instance's requirement
//! list: `genes[i]` places `requirements[i]`. Operators recombine and
//! re-randomize genes positionally, so the one-gene-per-requirement
//! invariant holds by construction and no requirement is ever duplicated
//! or dropped.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::loader::ProblemInstance;
use crate::models::{Gene, Requirement, ResourcePool, Room, TimeSlot};

/// A complete candidate timetable.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    /// Placement decisions, index-aligned with the requirement list.
    pub genes: Vec<Gene>,
}

impl Chromosome {
    /// Creates a random candidate for the instance.
    ///
    /// Initialization is biased toward viable placements where the filter
    /// is cheap: only non-break slots are drawn, and rooms are drawn from
    /// the capacity-sufficient subset when one exists. Everything else is
    /// left to fitness pressure.
    pub fn random<R: Rng>(instance: &ProblemInstance, rng: &mut R) -> Self {
        let genes = instance
            .requirements
            .iter()
            .map(|req| random_gene(req, &instance.pool, rng))
            .collect();
        Self { genes }
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Checks the cardinality invariant: exactly one gene per requirement,
    /// in requirement-list order.
    pub fn covers(&self, requirements: &[Requirement]) -> bool {
        self.genes.len() == requirements.len()
            && self
                .genes
                .iter()
                .zip(requirements)
                .all(|(gene, req)| gene.requirement == req.id)
    }
}

/// Draws a random placement for one requirement.
///
/// The pool is validated by the loader, so days, teaching slots, and rooms
/// are all non-empty.
pub fn random_gene<R: Rng>(req: &Requirement, pool: &ResourcePool, rng: &mut R) -> Gene {
    let day = pool.days().choose(rng).unwrap().id;
    let teaching: Vec<&TimeSlot> = pool.teaching_slots().collect();
    let slot = teaching.choose(rng).unwrap().id;

    let fitting: Vec<&Room> = pool
        .rooms()
        .iter()
        .filter(|r| r.fits(req.class_size))
        .collect();
    let room = match fitting.choose(rng) {
        Some(room) => room.id,
        None => pool.rooms().choose(rng).unwrap().id,
    };

    Gene::new(req.id, day, slot, room)
}

/// Uniform crossover: each requirement's gene comes from either parent by
/// coin flip, mirrored across the two children.
pub fn uniform_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let mut c1 = Vec::with_capacity(p1.len());
    let mut c2 = Vec::with_capacity(p2.len());
    for (g1, g2) in p1.genes.iter().zip(&p2.genes) {
        if rng.random_bool(0.5) {
            c1.push(*g1);
            c2.push(*g2);
        } else {
            c1.push(*g2);
            c2.push(*g1);
        }
    }
    (Chromosome { genes: c1 }, Chromosome { genes: c2 })
}

/// Single-point crossover: children swap gene tails at a random cut.
pub fn single_point_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let len = p1.len().min(p2.len());
    if len < 2 {
        return (p1.clone(), p2.clone());
    }
    let cut = rng.random_range(1..len);

    let mut c1 = p1.genes[..cut].to_vec();
    c1.extend_from_slice(&p2.genes[cut..]);
    let mut c2 = p2.genes[..cut].to_vec();
    c2.extend_from_slice(&p1.genes[cut..]);
    (Chromosome { genes: c1 }, Chromosome { genes: c2 })
}

/// Mutation: re-randomizes each gene's (day, slot, room) with probability
/// `rate`. When the rate selects nothing, one random gene is re-drawn
/// anyway so mutation always perturbs non-empty chromosomes.
pub fn mutate<R: Rng>(
    chromosome: &mut Chromosome,
    instance: &ProblemInstance,
    rate: f64,
    rng: &mut R,
) {
    if chromosome.is_empty() || rate <= 0.0 {
        return;
    }

    let mut mutated = 0usize;
    for (gene, req) in chromosome.genes.iter_mut().zip(&instance.requirements) {
        if rng.random_bool(rate) {
            *gene = random_gene(req, &instance.pool, rng);
            mutated += 1;
        }
    }
    if mutated == 0 {
        let idx = rng.random_range(0..chromosome.genes.len());
        chromosome.genes[idx] = random_gene(&instance.requirements[idx], &instance.pool, rng);
    }
}
