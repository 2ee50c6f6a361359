//! The generation pipeline.
//!
//! Stage order: Loader → GA engine → greedy repair (against the GA's
//! committed output) → materializer. The pipeline always completes and
//! returns a [`RunReport`] describing its degree of success; only bad
//! input data or out-of-bounds parameters abort it.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};

use crate::constraints::{ConstraintChecker, ConstraintConfig, Occupancy};
use crate::error::ScheduleError;
use crate::fitness::{FitnessEvaluator, FitnessResult, FitnessWeights, QualityRating};
use crate::ga::{Chromosome, GaConfig, GaEngine, GaOutcome, GenerationStats, TerminationReason};
use crate::loader::{ProblemInstance, RunFilter, Snapshot};
use crate::materialize::materialize;
use crate::models::{Gene, Requirement, RequirementId, TimetableEntry};
use crate::repair::{GreedyRepair, RepairPolicy, Unscheduled};

/// User-facing run parameters, validated against the form bounds before
/// the pipeline starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    /// Population size (50–500).
    pub population_size: usize,
    /// Generation cap (100–2000).
    pub max_generations: u32,
    /// Per-gene mutation rate (0.01–0.5).
    pub mutation_rate: f64,
    /// Crossover rate (0.1–1.0).
    pub crossover_rate: f64,
    /// Wall-clock budget for the GA stage.
    pub max_runtime: Option<Duration>,
    /// Drop existing entries and reschedule everything in scope. When
    /// off, existing placements are kept as an immutable baseline.
    pub clear_existing: bool,
    /// Seed for reproducible runs; production runs leave this unset.
    pub seed: Option<u64>,
    /// Evaluation worker count override.
    pub workers: Option<usize>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            mutation_rate: 0.1,
            crossover_rate: 0.9,
            max_runtime: None,
            clear_existing: true,
            seed: None,
            workers: None,
        }
    }
}

impl RunParams {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, n: u32) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_max_runtime(mut self, runtime: Duration) -> Self {
        self.max_runtime = Some(runtime);
        self
    }

    /// Keeps existing entries as a baseline instead of clearing.
    pub fn keep_existing(mut self) -> Self {
        self.clear_existing = false;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the form bounds.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !(50..=500).contains(&self.population_size) {
            return Err(ScheduleError::InvalidParams(format!(
                "population_size {} outside 50..=500",
                self.population_size
            )));
        }
        if !(100..=2000).contains(&self.max_generations) {
            return Err(ScheduleError::InvalidParams(format!(
                "max_generations {} outside 100..=2000",
                self.max_generations
            )));
        }
        if !(0.01..=0.5).contains(&self.mutation_rate) {
            return Err(ScheduleError::InvalidParams(format!(
                "mutation_rate {} outside 0.01..=0.5",
                self.mutation_rate
            )));
        }
        if !(0.1..=1.0).contains(&self.crossover_rate) {
            return Err(ScheduleError::InvalidParams(format!(
                "crossover_rate {} outside 0.1..=1.0",
                self.crossover_rate
            )));
        }
        Ok(())
    }
}

/// What a run achieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Generations the GA evolved.
    pub generations: u32,
    /// Total pipeline wall time in milliseconds.
    pub elapsed_ms: u64,
    /// Score of the GA's best candidate.
    pub best_score: f64,
    /// Hard violations in the GA's best candidate.
    pub hard_violations: usize,
    /// Soft violations in the GA's best candidate.
    pub soft_violations: usize,
    /// Whether the GA's best candidate was feasible on its own.
    pub ga_feasible: bool,
    /// Quality band of the GA's best candidate.
    pub quality: QualityRating,
    /// Whether the final committed timetable covers every requirement
    /// (GA-clean placements plus repair additions, zero left out).
    pub feasible: bool,
    /// Entries produced for persistence.
    pub scheduled: usize,
    /// Placements contributed by the repair pass.
    pub repaired: usize,
    /// Requirements left out, with reasons.
    pub unscheduled: Vec<Unscheduled>,
    /// Why the GA stopped.
    pub termination: TerminationReason,
}

/// Full result of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Persistable entries. Baseline placements kept from a previous run
    /// are not re-emitted; they are already stored.
    pub entries: Vec<TimetableEntry>,
    /// Run summary.
    pub summary: RunSummary,
    /// Per-generation GA diagnostics.
    pub log: Vec<GenerationStats>,
}

/// Configurable pipeline front door.
#[derive(Debug, Clone, Default)]
pub struct TimetableScheduler {
    constraints: ConstraintConfig,
    weights: FitnessWeights,
    policy: RepairPolicy,
    ga_template: GaConfig,
}

impl TimetableScheduler {
    /// Creates a scheduler with default constraint thresholds, weights,
    /// and GA template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets constraint thresholds.
    pub fn with_constraints(mut self, config: ConstraintConfig) -> Self {
        self.constraints = config;
        self
    }

    /// Sets fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the repair policy.
    pub fn with_policy(mut self, policy: RepairPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the GA template the run parameters are merged into (elitism,
    /// tournament size, stagnation, target quality).
    pub fn with_ga_template(mut self, template: GaConfig) -> Self {
        self.ga_template = template;
        self
    }

    /// Runs the full pipeline.
    pub fn run(
        &self,
        snapshot: &Snapshot,
        filter: &RunFilter,
        params: &RunParams,
    ) -> Result<RunReport, ScheduleError> {
        params.validate()?;
        let start = Instant::now();

        let instance = snapshot.load(filter, params.clear_existing)?;
        info!(
            "instance loaded in {:?}: {} requirements, {} baseline placements",
            start.elapsed(),
            instance.requirement_count(),
            instance.baseline.len()
        );

        let checker = ConstraintChecker::new(&instance.pool, self.constraints.clone());
        let evaluator = FitnessEvaluator::new(&instance, checker.clone(), self.weights.clone());

        let ga_start = Instant::now();
        let outcome = self.run_ga(&instance, &evaluator, params);
        info!(
            "GA stage finished in {:?}: {} generations, best score {:.1}",
            ga_start.elapsed(),
            outcome.generations,
            outcome.best_fitness.score
        );

        // Clean GA placements stay committed; hard-violating ones go back
        // through the repair queue.
        let violating: HashSet<RequirementId> = outcome
            .best_fitness
            .hard
            .iter()
            .map(|v| v.requirement)
            .collect();
        let mut committed: Vec<(&Requirement, Gene)> = instance
            .baseline
            .iter()
            .map(|(req, gene)| (req, *gene))
            .collect();
        let mut clean_genes: Vec<Gene> = Vec::new();
        let mut pending: Vec<&Requirement> = Vec::new();
        for (req, gene) in instance.requirements.iter().zip(&outcome.best.genes) {
            if violating.contains(&req.id) {
                pending.push(req);
            } else {
                committed.push((req, *gene));
                clean_genes.push(*gene);
            }
        }

        let repair_start = Instant::now();
        let mut occ = Occupancy::seeded(committed);
        let repair = GreedyRepair::new(&instance, &checker).with_policy(self.policy);
        let repaired = repair.place(&pending, &mut occ);
        info!(
            "repair stage finished in {:?}: {} placed, {} unscheduled",
            repair_start.elapsed(),
            repaired.placed.len(),
            repaired.unscheduled.len()
        );

        let entries = materialize(
            &instance,
            clean_genes.iter().chain(&repaired.placed).copied(),
        );

        let summary = RunSummary {
            generations: outcome.generations,
            elapsed_ms: start.elapsed().as_millis() as u64,
            best_score: outcome.best_fitness.score,
            hard_violations: outcome.best_fitness.hard_count(),
            soft_violations: outcome.best_fitness.soft_count(),
            ga_feasible: outcome.best_fitness.feasible,
            quality: outcome.best_fitness.rating,
            feasible: repaired.unscheduled.is_empty(),
            scheduled: entries.len(),
            repaired: repaired.placed.len(),
            unscheduled: repaired.unscheduled,
            termination: outcome.termination,
        };

        Ok(RunReport {
            entries,
            summary,
            log: outcome.log,
        })
    }

    /// Builds the effective GA configuration and runs the engine. When
    /// the baseline already covers everything there is nothing to evolve,
    /// so the GA stage degenerates to a single evaluation.
    fn run_ga(
        &self,
        instance: &ProblemInstance,
        evaluator: &FitnessEvaluator<'_>,
        params: &RunParams,
    ) -> GaOutcome {
        if instance.requirements.is_empty() {
            let best = Chromosome { genes: Vec::new() };
            let best_fitness: FitnessResult = evaluator.evaluate(&best.genes);
            return GaOutcome {
                best,
                best_fitness,
                generations: 0,
                elapsed: Duration::ZERO,
                termination: TerminationReason::GenerationCap,
                log: Vec::new(),
            };
        }

        let mut config = self
            .ga_template
            .clone()
            .with_population_size(params.population_size)
            .with_max_generations(params.max_generations)
            .with_mutation_rate(params.mutation_rate)
            .with_crossover_rate(params.crossover_rate)
            .scaled_to(
                instance.requirement_count(),
                instance.pool.placement_count(),
            );
        config.time_limit = params.max_runtime;
        config.seed = params.seed;
        config.workers = params.workers;

        GaEngine::new(instance, evaluator, config).run()
    }
}
