//! Run configuration.

use std::sync::{atomic::AtomicBool, Arc};

use typed_builder::TypedBuilder;

use crate::error::ConfigError;

/// Default probability of recombining a pair of parents.
pub const DEFAULT_CROSSOVER_PROB: f64 = 0.9;
/// Default per-variable mutation probability.
pub const DEFAULT_MUTATION_PROB: f64 = 0.1;
/// Default SBX distribution index.
pub const DEFAULT_ETA_C: f64 = 20.0;
/// Default polynomial mutation distribution index.
pub const DEFAULT_ETA_M: f64 = 20.0;
/// Default threshold of the rank-0 mean crowding distance criterion.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 1e-4;

/// Parameters of a single optimization run.
///
/// Built with a compile time verified builder from `typed-builder`: the three
/// size parameters are required, everything else falls back to the
/// conventional NSGA-II defaults.
/// ```
/// # use pareto_alloc::Config;
/// let config = Config::builder()
///   .n_sectors(8)
///   .population_size(40)
///   .n_generations(25)
///   .seed(7)
///   .build();
/// assert_eq!(config.crossover_prob, 0.9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(TypedBuilder, Debug, Clone)]
pub struct Config {
  /// Length of every decision vector.
  pub n_sectors: usize,
  /// Number of individuals kept after every generation.
  pub population_size: usize,
  /// Upper bound on the number of bred generations.
  pub n_generations: usize,
  /// Probability that a parent pair is recombined instead of copied.
  #[builder(default = DEFAULT_CROSSOVER_PROB)]
  pub crossover_prob: f64,
  /// Probability that a single variable of an offspring is mutated.
  #[builder(default = DEFAULT_MUTATION_PROB)]
  pub mutation_prob: f64,
  /// SBX distribution index. Larger values keep offspring closer to parents.
  #[builder(default = DEFAULT_ETA_C)]
  pub eta_c: f64,
  /// Polynomial mutation distribution index. Larger values make smaller
  /// perturbations.
  #[builder(default = DEFAULT_ETA_M)]
  pub eta_m: f64,
  /// Seed of the random stream. Runs with equal configs and seeds are
  /// identical generation by generation.
  #[builder(default, setter(strip_option))]
  pub seed: Option<u64>,
  /// Stops the run once the mean crowding distance of the rank-0 front drops
  /// below this value. `None` disables the criterion.
  ///
  /// Boundary members of a front always have infinite crowding distance, so
  /// this criterion only fires on degenerate fronts. The generation limit is
  /// the reliable stopping rule.
  #[builder(default = Some(DEFAULT_CONVERGENCE_THRESHOLD))]
  pub convergence_threshold: Option<f64>,
  /// Evaluates objectives, domination rows and crowding distances with
  /// [rayon]. Results do not depend on this flag.
  #[builder(default = false)]
  pub parallel: bool,
  /// Cooperative cancellation flag, checked before every generation.
  #[builder(default, setter(strip_option))]
  pub cancel: Option<Arc<AtomicBool>>,
}

impl Config {
  /// Checks every parameter, returning the first invalid one.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.n_sectors < 1 {
      return Err(ConfigError::SectorCount(self.n_sectors));
    }
    if self.population_size < 2 {
      return Err(ConfigError::PopulationSize(self.population_size));
    }
    if self.n_generations < 1 {
      return Err(ConfigError::GenerationCount(self.n_generations));
    }
    validate_probability("crossover_prob", self.crossover_prob)?;
    validate_probability("mutation_prob", self.mutation_prob)?;
    validate_distribution_index("eta_c", self.eta_c)?;
    validate_distribution_index("eta_m", self.eta_m)?;
    if let Some(threshold) = self.convergence_threshold {
      if !threshold.is_finite() || threshold < 0.0 {
        return Err(ConfigError::ConvergenceThreshold(threshold));
      }
    }
    Ok(())
  }
}

fn validate_probability(
  name: &'static str,
  value: f64,
) -> Result<(), ConfigError> {
  if !(0.0..=1.0).contains(&value) {
    return Err(ConfigError::Probability { name, value });
  }
  Ok(())
}

fn validate_distribution_index(
  name: &'static str,
  value: f64,
) -> Result<(), ConfigError> {
  if !value.is_finite() || value < 0.0 {
    return Err(ConfigError::DistributionIndex { name, value });
  }
  Ok(())
}
