//! Abstract optimizer and the outcome of a run.

pub mod nsga;

use crate::{
  error::Result,
  individual::Individual,
  score::{Scores, OBJECTIVE_NUM},
  termination::TerminationReason,
};

/// Represents an abstract optimizer.
pub trait Optimizer: Sized {
  /// Runs `Optimizer` until a termination condition is met, then returns
  /// the last found population.
  fn optimize(self) -> Result<Vec<Individual>>;
}

/// Final state of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationResult {
  /// The last population, best first by rank and then crowding distance.
  pub population: Vec<Individual>,
  /// Number of bred generations.
  pub generations: usize,
  /// The condition that stopped the run.
  pub reason: TerminationReason,
}

impl OptimizationResult {
  /// Members of the last population no other member dominates.
  pub fn pareto_front(&self) -> Vec<&Individual> {
    self
      .population
      .iter()
      .filter(|i| i.rank() == 0 && i.has_finite_objectives())
      .collect()
  }

  /// Per-objective mean over the Pareto front, `None` if the front is empty.
  pub fn mean_front_objectives(&self) -> Option<Scores> {
    let front = self.pareto_front();
    if front.is_empty() {
      return None;
    }
    let mut mean = [0.0; OBJECTIVE_NUM];
    for individual in &front {
      for (m, o) in mean.iter_mut().zip(individual.objectives()) {
        *m += o;
      }
    }
    Some(mean.map(|m| m / front.len() as f64))
  }
}
