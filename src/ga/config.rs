//! GA configuration.
//!
//! [`GaConfig`] holds every parameter of the evolutionary loop.
//!
//! # Defaults
//!
//! ```
//! use timetabler::ga::GaConfig;
//!
//! let config = GaConfig::default();
//! assert_eq!(config.population_size, 100);
//! assert_eq!(config.max_generations, 500);
//! ```
//!
//! # Builder Pattern
//!
//! ```
//! use std::time::Duration;
//! use timetabler::ga::{CrossoverType, GaConfig};
//!
//! let config = GaConfig::default()
//!     .with_population_size(200)
//!     .with_crossover(CrossoverType::SinglePoint)
//!     .with_mutation_rate(0.05)
//!     .with_time_limit(Duration::from_secs(30))
//!     .with_seed(42);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fitness::QualityRating;

/// Crossover strategy for timetable chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Per-requirement coin flip between parents.
    Uniform,
    /// One cut point over the requirement sequence.
    SinglePoint,
}

/// Configuration for the genetic algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of candidates in the population.
    ///
    /// Larger populations increase diversity but slow down each
    /// generation. Typical range: 50–500.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: u32,

    /// Probability of recombining a selected parent pair (0.0–1.0).
    ///
    /// When crossover is not applied, the parents are cloned.
    pub crossover_rate: f64,

    /// Per-gene re-randomization probability applied to offspring
    /// (0.0–1.0).
    pub mutation_rate: f64,

    /// Crossover strategy.
    pub crossover: CrossoverType,

    /// Candidates copied unchanged into the next generation.
    ///
    /// At least 1 guarantees monotonic non-regression of the best score.
    pub elite_count: usize,

    /// Tournament size for parent selection.
    pub tournament_size: usize,

    /// Generations with no improvement before stopping (0 disables).
    pub stagnation_limit: u32,

    /// Wall-clock budget. The in-flight generation always completes.
    pub time_limit: Option<Duration>,

    /// Stop as soon as a feasible candidate at or above this rating
    /// appears.
    pub target_quality: Option<QualityRating>,

    /// Random seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Parallel evaluation workers. `None` uses the number of available
    /// cores, bounded to 4.
    pub workers: Option<usize>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            crossover: CrossoverType::Uniform,
            elite_count: 2,
            tournament_size: 3,
            stagnation_limit: 50,
            time_limit: None,
            target_quality: None,
            seed: None,
            workers: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size (minimum 2).
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n.max(2);
        self
    }

    /// Sets the generation cap.
    pub fn with_max_generations(mut self, n: u32) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, crossover: CrossoverType) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the tournament size (minimum 1).
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Sets the stagnation limit (0 disables).
    pub fn with_stagnation_limit(mut self, limit: u32) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the early-stop quality target.
    pub fn with_target_quality(mut self, target: QualityRating) -> Self {
        self.target_quality = Some(target);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the evaluation worker count (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.elite_count >= self.population_size {
            return Err("elite_count must be below population_size".into());
        }
        Ok(())
    }

    /// Resolved worker count: configured value, or available cores bounded
    /// to 4.
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .min(4)
        })
    }

    /// Adapts population and generation counts to the instance size so
    /// total evaluation work stays bounded: large instances trade
    /// population for generations, tiny instances shed surplus of both.
    ///
    /// `placements` is the (day, teaching slot, room) combination count.
    pub fn scaled_to(mut self, requirements: usize, placements: usize) -> Self {
        let cells = requirements.saturating_mul(placements);
        if cells > 100_000 {
            self.population_size = (self.population_size / 2).max(50);
            self.max_generations = self.max_generations.saturating_mul(2);
        } else if cells < 1_000 {
            self.population_size = self.population_size.min(50);
            self.max_generations = self.max_generations.min(200);
        }
        self.elite_count = self.elite_count.min(self.population_size.saturating_sub(1));
        self
    }
}
