//! **pareto-alloc** searches for Pareto optimal ways of splitting resources
//! between sectors. It evolves a population of allocation vectors with
//! [NSGA-II], trading off four competing objectives at once instead of
//! collapsing them into a single score.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! # Allocations and objectives
//!
//! A candidate allocation is a vector of `n_sectors` values, each in
//! `[0, 1]`. [`SectorObjectives`] scores it on four objectives, all of which
//! are minimized:
//! - **balance** - total distance of the allocations from an even `0.5`
//! - **smoothness** - sum of squared steps between neighbouring sectors
//! - **diversity** - the negated standard deviation of the allocations
//! - **equity** - the largest allocation
//!
//! Different objective functions can be plugged in through the
//! [`Objectives`] trait, which closures of type `Fn(&[f64]) -> [f64; 4]`
//! implement.
//!
//! # The generational loop
//!
//! [`Nsga2`] drives the search. After drawing and scoring a random
//! population, every generation
//! 1. **selects** parents with binary tournaments on rank and crowding
//!    distance ([`selection`])
//! 2. **recombines** them with simulated binary crossover
//!    ([`recombination`])
//! 3. **mutates** the offspring with polynomial mutation ([`mutation`])
//! 4. **scores** the offspring ([`objective`])
//! 5. **ranks** parents and offspring together into Pareto fronts
//!    ([`sorting`], [`crowding`]) and keeps the best `population_size` of
//!    them
//! 6. **terminates** once the generation limit is reached, the rank-0 front
//!    collapses, a custom [`Terminator`] fires or the run is cancelled
//!    ([`termination`])
//!
//! The returned population is ordered best first. Its rank-0 members form
//! the Pareto front.
//!
//! # Parallelization
//!
//! With [`Config::parallel`] set, objective evaluation, domination counting
//! and crowding distances are computed with [rayon]. None of these steps
//! draw random numbers, so a seeded run yields the same populations either
//! way. For small populations, the overhead usually outweighs the gain.
//! Benchmark, if in doubt.
//!
//! # Logging
//!
//! The crate reports progress through [tracing]: run start and end at
//! `info`, a summary of every generation at `debug`, phase transitions at
//! `trace` and individuals with non-finite objectives at `warn`. Install any
//! subscriber to see them.
//!
//! # Example
//!
//! ```
//! use pareto_alloc::{optimize, Config};
//!
//! let config = Config::builder()
//!   .n_sectors(6)
//!   .population_size(40)
//!   .n_generations(30)
//!   .seed(2024)
//!   .build();
//! let population = optimize(config).unwrap();
//! assert_eq!(population.len(), 40);
//!
//! let front: Vec<_> = population.iter().filter(|i| i.rank() == 0).collect();
//! assert!(!front.is_empty());
//! ```
//!
//! [NSGA-II]: https://sci2s.ugr.es/sites/default/files/files/Teaching/OtherPostGraduateCourses/Metaheuristicas/Deb_NSGAII.pdf
//! [`Terminator`]: crate::termination::Terminator
//! [`Objectives`]: crate::objective::Objectives
//! [`SectorObjectives`]: crate::objective::SectorObjectives
//! [`Nsga2`]: crate::optimizer::nsga::Nsga2

#![warn(missing_docs)]

pub mod config;
pub mod crowding;
pub mod error;
pub mod individual;
pub mod mutation;
pub mod objective;
pub mod optimizer;
pub mod recombination;
pub mod score;
pub mod selection;
pub mod sorting;
pub mod termination;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use individual::Individual;
pub use objective::{Objectives, SectorObjectives};
pub use optimizer::{nsga::Nsga2, OptimizationResult, Optimizer};
pub use score::{Score, Scores};
pub use termination::{TerminationReason, Terminator};

/// Runs NSGA-II over the sector allocation objectives and returns the final
/// population, best first. Filter it by `rank() == 0` to get the Pareto
/// front.
///
/// # Errors
///
/// Fails before creating any population if `config` doesn't validate, and
/// with [`Error::Computation`] if a whole generation scores non-finite.
pub fn optimize(config: Config) -> Result<Vec<Individual>> {
  Nsga2::new(config)?.optimize()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_optimize() {
    let config = Config::builder()
      .n_sectors(4)
      .population_size(10)
      .n_generations(5)
      .seed(3)
      .build();
    let population = optimize(config).unwrap();
    assert_eq!(population.len(), 10);
    assert!(population.iter().all(|i| i.variables().len() == 4));
    assert_eq!(population[0].rank(), 0);
  }

  #[test]
  fn test_optimize_fails_fast() {
    let config = Config::builder()
      .n_sectors(4)
      .population_size(10)
      .n_generations(0)
      .build();
    assert!(matches!(
      optimize(config),
      Err(Error::Config(ConfigError::GenerationCount(0)))
    ));
  }

  #[test]
  fn test_seed_reproducibility() {
    let config = || {
      Config::builder()
        .n_sectors(3)
        .population_size(8)
        .n_generations(4)
        .seed(99)
        .build()
    };
    assert_eq!(optimize(config()).unwrap(), optimize(config()).unwrap());
  }
}
