//! Candidate allocation vectors and population initialization.

use rand::Rng;

use crate::{
  error::{ConfigError, Result},
  score::{Scores, OBJECTIVE_NUM},
};

/// A candidate allocation: a decision vector with components in `[0, 1]`
/// and the data derived from it.
///
/// Objectives are recomputed whenever the decision vector changes. Rank and
/// crowding distance describe the individual's position within the last
/// population it was ranked in and mean nothing before the first ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct Individual {
  pub(crate) variables: Vec<f64>,
  pub(crate) objectives: Scores,
  pub(crate) rank: usize,
  pub(crate) crowding_distance: f64,
}

impl Individual {
  /// Creates an unevaluated, unranked individual owning `variables`.
  pub fn new(variables: Vec<f64>) -> Self {
    Self {
      variables,
      objectives: [f64::NAN; OBJECTIVE_NUM],
      rank: usize::MAX,
      crowding_distance: 0.0,
    }
  }

  /// Draws every component independently and uniformly from `[0, 1]`.
  pub fn random<R: Rng + ?Sized>(n_sectors: usize, rng: &mut R) -> Self {
    Self::new((0..n_sectors).map(|_| rng.gen_range(0.0..=1.0)).collect())
  }

  /// The decision vector.
  pub fn variables(&self) -> &[f64] {
    &self.variables
  }

  /// The objective vector. All objectives are minimized.
  pub fn objectives(&self) -> &Scores {
    &self.objectives
  }

  /// Front index, `0` being the Pareto front.
  pub fn rank(&self) -> usize {
    self.rank
  }

  /// Crowding distance within the individual's front. Either non-negative or
  /// positive infinity.
  pub fn crowding_distance(&self) -> f64 {
    self.crowding_distance
  }

  /// Returns `false` for individuals whose objectives could not be ranked.
  pub fn has_finite_objectives(&self) -> bool {
    self.objectives.iter().all(|o| o.is_finite())
  }
}

/// Creates `population_size` individuals of `n_sectors` uniformly drawn
/// components each.
///
/// # Errors
///
/// Fails if `n_sectors < 1` or `population_size < 2`.
pub fn initialize_population<R: Rng + ?Sized>(
  n_sectors: usize,
  population_size: usize,
  rng: &mut R,
) -> Result<Vec<Individual>> {
  if n_sectors < 1 {
    return Err(ConfigError::SectorCount(n_sectors).into());
  }
  if population_size < 2 {
    return Err(ConfigError::PopulationSize(population_size).into());
  }
  Ok(
    (0..population_size)
      .map(|_| Individual::random(n_sectors, rng))
      .collect(),
  )
}
