//! Genetic algorithm optimization.
//!
//! The chromosome is positional: one gene per requirement, index-aligned
//! with the instance's requirement list, so crossover and mutation
//! preserve the one-gene-per-requirement invariant by construction.
//!
//! # Submodules
//!
//! - [`config`]: loop parameters with adaptive scaling
//! - [`chromosome`]: representation and genetic operators
//! - [`engine`]: the evolutionary loop
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"

mod chromosome;
mod config;
mod engine;

pub use chromosome::{
    mutate, random_gene, single_point_crossover, uniform_crossover, Chromosome,
};
pub use config::{CrossoverType, GaConfig};
pub use engine::{GaEngine, GaOutcome, GenerationStats, TerminationReason};
