//! Evolutionary loop.
//!
//! Drives population initialization, parallel fitness evaluation,
//! selection, crossover, mutation, and elitism until a termination
//! condition fires. The engine always returns its best-found candidate,
//! feasible or not; infeasibility is result data, never an error.
//!
//! # Concurrency
//!
//! Fitness evaluation is the dominant cost and embarrassingly parallel:
//! each generation's candidates are scored on a bounded rayon pool, with
//! a barrier before selection. Workers read the shared instance and write
//! only their own result slot, so no locking is involved. On wall-clock
//! expiry the in-flight generation finishes before the loop exits.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::chromosome::{mutate, single_point_crossover, uniform_crossover, Chromosome};
use super::config::{CrossoverType, GaConfig};
use crate::fitness::{FitnessEvaluator, FitnessResult};
use crate::loader::ProblemInstance;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Generation cap reached.
    GenerationCap,
    /// Wall-clock budget exhausted.
    TimeBudget,
    /// Best score unchanged for the configured number of generations.
    Stagnation,
    /// A feasible candidate at or above the target rating appeared.
    QualityTarget,
    /// Cancelled through the cancel handle.
    Cancelled,
}

/// Per-generation diagnostics for the run log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index (0 = initial population).
    pub generation: u32,
    /// Best score seen so far.
    pub best_score: f64,
    /// Mean score of the current population.
    pub mean_score: f64,
    /// Hard violations of the best candidate.
    pub best_hard: usize,
    /// Soft violations of the best candidate.
    pub best_soft: usize,
    /// Milliseconds since the run started.
    pub elapsed_ms: u64,
}

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    /// Best candidate found, regardless of feasibility.
    pub best: Chromosome,
    /// Fitness breakdown of the best candidate.
    pub best_fitness: FitnessResult,
    /// Evolved generations (excludes the initial population).
    pub generations: u32,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Why the loop stopped.
    pub termination: TerminationReason,
    /// Per-generation diagnostics.
    pub log: Vec<GenerationStats>,
}

/// Genetic algorithm engine for one problem instance.
pub struct GaEngine<'a> {
    instance: &'a ProblemInstance,
    evaluator: &'a FitnessEvaluator<'a>,
    config: GaConfig,
    cancelled: Arc<AtomicBool>,
}

impl<'a> GaEngine<'a> {
    /// Creates an engine. The configuration should already be validated.
    pub fn new(
        instance: &'a ProblemInstance,
        evaluator: &'a FitnessEvaluator<'a>,
        config: GaConfig,
    ) -> Self {
        Self {
            instance,
            evaluator,
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for cancelling the run from another thread. The loop exits
    /// at the next generation boundary.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Runs the evolutionary loop to termination.
    pub fn run(&self) -> GaOutcome {
        let start = Instant::now();
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let workers = self.config.resolved_workers();
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .ok();

        let mut population: Vec<Chromosome> = (0..self.config.population_size)
            .map(|_| Chromosome::random(self.instance, &mut rng))
            .collect();
        let mut results = self.evaluate_all(thread_pool.as_ref(), &population);
        let mut order = rank_indices(&results);

        let mut best = population[order[0]].clone();
        let mut best_result = results[order[0]].clone();
        let mut log = vec![stats(0, &best_result, &results, start)];

        let mut generation = 0u32;
        let mut stagnation = 0u32;
        let termination;

        loop {
            if self.cancelled.load(AtomicOrdering::Relaxed) {
                termination = TerminationReason::Cancelled;
                break;
            }
            if let Some(limit) = self.config.time_limit {
                if start.elapsed() >= limit {
                    termination = TerminationReason::TimeBudget;
                    break;
                }
            }
            if let Some(target) = self.config.target_quality {
                if best_result.feasible && best_result.rating >= target {
                    termination = TerminationReason::QualityTarget;
                    break;
                }
            }
            if self.config.stagnation_limit > 0 && stagnation >= self.config.stagnation_limit {
                termination = TerminationReason::Stagnation;
                break;
            }
            if generation >= self.config.max_generations {
                termination = TerminationReason::GenerationCap;
                break;
            }

            // Elites carry over unchanged with their cached results.
            let elite_count = self.config.elite_count.min(population.len());
            let mut next_population: Vec<Chromosome> = order[..elite_count]
                .iter()
                .map(|&i| population[i].clone())
                .collect();
            let mut next_results: Vec<FitnessResult> = order[..elite_count]
                .iter()
                .map(|&i| results[i].clone())
                .collect();

            let offspring_target = self.config.population_size - elite_count;
            let mut offspring = Vec::with_capacity(offspring_target);
            while offspring.len() < offspring_target {
                let p1 = &population[self.tournament(&results, &mut rng)];
                let p2 = &population[self.tournament(&results, &mut rng)];

                let (mut c1, mut c2) = if rng.random_bool(self.config.crossover_rate) {
                    match self.config.crossover {
                        CrossoverType::Uniform => uniform_crossover(p1, p2, &mut rng),
                        CrossoverType::SinglePoint => single_point_crossover(p1, p2, &mut rng),
                    }
                } else {
                    (p1.clone(), p2.clone())
                };
                mutate(&mut c1, self.instance, self.config.mutation_rate, &mut rng);
                mutate(&mut c2, self.instance, self.config.mutation_rate, &mut rng);

                offspring.push(c1);
                if offspring.len() < offspring_target {
                    offspring.push(c2);
                }
            }

            let offspring_results = self.evaluate_all(thread_pool.as_ref(), &offspring);
            next_population.extend(offspring);
            next_results.extend(offspring_results);

            population = next_population;
            results = next_results;
            order = rank_indices(&results);
            generation += 1;

            let champion = order[0];
            if better(&results[champion], &best_result) {
                best = population[champion].clone();
                best_result = results[champion].clone();
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            log.push(stats(generation, &best_result, &results, start));
            if generation % 25 == 0 {
                debug!(
                    "generation {generation}: best score {:.1}, {} hard, {} soft",
                    best_result.score,
                    best_result.hard_count(),
                    best_result.soft_count()
                );
            }
        }

        info!(
            "GA finished after {generation} generations in {:?}: best score {:.1} ({} hard, {} soft), {:?}",
            start.elapsed(),
            best_result.score,
            best_result.hard_count(),
            best_result.soft_count(),
            termination
        );

        GaOutcome {
            best,
            best_fitness: best_result,
            generations: generation,
            elapsed: start.elapsed(),
            termination,
            log,
        }
    }

    /// Scores every candidate, in parallel when a pool is available.
    /// Result order matches candidate order.
    fn evaluate_all(
        &self,
        pool: Option<&rayon::ThreadPool>,
        candidates: &[Chromosome],
    ) -> Vec<FitnessResult> {
        match pool {
            Some(pool) => pool.install(|| {
                candidates
                    .par_iter()
                    .map(|c| self.evaluator.evaluate(&c.genes))
                    .collect()
            }),
            None => candidates
                .iter()
                .map(|c| self.evaluator.evaluate(&c.genes))
                .collect(),
        }
    }

    /// Tournament selection over result indices.
    fn tournament<R: Rng>(&self, results: &[FitnessResult], rng: &mut R) -> usize {
        let mut winner = rng.random_range(0..results.len());
        for _ in 1..self.config.tournament_size {
            let challenger = rng.random_range(0..results.len());
            if compare(&results[challenger], challenger, &results[winner], winner)
                == Ordering::Less
            {
                winner = challenger;
            }
        }
        winner
    }
}

/// Candidate ordering: fewer hard violations, then higher score, then
/// lower index. The index tie-break keeps seeded runs deterministic.
fn compare(a: &FitnessResult, ai: usize, b: &FitnessResult, bi: usize) -> Ordering {
    a.hard_count()
        .cmp(&b.hard_count())
        .then_with(|| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| ai.cmp(&bi))
}

/// Strictly better, ignoring the index tie-break.
fn better(candidate: &FitnessResult, incumbent: &FitnessResult) -> bool {
    match candidate.hard_count().cmp(&incumbent.hard_count()) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => candidate.score > incumbent.score,
    }
}

/// Indices sorted best-first.
fn rank_indices(results: &[FitnessResult]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| compare(&results[a], a, &results[b], b));
    order
}

fn stats(
    generation: u32,
    best: &FitnessResult,
    results: &[FitnessResult],
    start: Instant,
) -> GenerationStats {
    let mean_score = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
    };
    GenerationStats {
        generation,
        best_score: best.score,
        mean_score,
        best_hard: best.hard_count(),
        best_soft: best.soft_count(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}
