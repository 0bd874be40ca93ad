//! Errors produced while configuring or running an optimization.

/// An alias for results returned throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can stop an optimization run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The run was rejected before any population was created.
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),
  /// Every individual of a generation produced non-finite objectives, so
  /// nothing could be ranked.
  #[error("no finite objectives in generation {generation}")]
  Computation {
    /// Generation in which the evaluation failed. `0` is the initial
    /// population.
    generation: usize,
  },
}

/// A single invalid configuration parameter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
  /// Decision vectors need at least one component.
  #[error("n_sectors must be at least 1, got {0}")]
  SectorCount(usize),
  /// Selection needs at least two individuals to pair.
  #[error("population_size must be at least 2, got {0}")]
  PopulationSize(usize),
  /// At least one generation must be bred.
  #[error("n_generations must be at least 1, got {0}")]
  GenerationCount(usize),
  /// A probability outside of `[0, 1]`.
  #[error("{name} must be between 0.0 and 1.0, got: {value}")]
  Probability {
    /// Name of the parameter.
    name: &'static str,
    /// Offending value.
    value: f64,
  },
  /// A negative or non-finite SBX or mutation distribution index.
  #[error("{name} must be a finite non-negative number, got: {value}")]
  DistributionIndex {
    /// Name of the parameter.
    name: &'static str,
    /// Offending value.
    value: f64,
  },
  /// A negative or non-finite crowding convergence threshold.
  #[error("convergence_threshold must be finite and non-negative, got: {0}")]
  ConvergenceThreshold(f64),
}
