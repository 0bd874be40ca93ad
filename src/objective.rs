//! Objective functions and their evaluation over a population.

use rayon::prelude::*;

use crate::{individual::Individual, score::Scores};

/// An operator that scores a decision vector on every objective.
///
/// Implementations must be pure: the same vector always yields the same
/// scores. That is what allows evaluating a population in parallel without
/// affecting reproducibility.
///
/// # Examples
/// ```
/// # use pareto_alloc::objective::Objectives;
/// let o = |x: &[f64]| [x[0], 1.0 - x[0], 0.0, 0.0];
/// assert_eq!(o.evaluate(&[0.25]), [0.25, 0.75, 0.0, 0.0]);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Objectives {
  /// Returns the objective vector of `variables`. Lower is better.
  fn evaluate(&self, variables: &[f64]) -> Scores;
}

impl<F> Objectives for F
where
  F: Fn(&[f64]) -> Scores,
{
  fn evaluate(&self, variables: &[f64]) -> Scores {
    self(variables)
  }
}

/// The four sector allocation objectives: balance, smoothness, diversity and
/// equity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SectorObjectives;

impl Objectives for SectorObjectives {
  fn evaluate(&self, variables: &[f64]) -> Scores {
    [
      balance(variables),
      smoothness(variables),
      diversity(variables),
      equity(variables),
    ]
  }
}

/// Total distance of the allocations from an even `0.5` split.
pub fn balance(x: &[f64]) -> f64 {
  x.iter().map(|v| (v - 0.5).abs()).sum()
}

/// Sum of squared steps between neighbouring sectors. `0` for a single
/// sector.
pub fn smoothness(x: &[f64]) -> f64 {
  x.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum()
}

/// Negated sample standard deviation of the allocations. `0` for a single
/// sector.
pub fn diversity(x: &[f64]) -> f64 {
  let n = x.len();
  if n < 2 {
    return 0.0;
  }
  let mean = x.iter().sum::<f64>() / n as f64;
  let variance =
    x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
  -variance.sqrt()
}

/// The largest allocation magnitude.
pub fn equity(x: &[f64]) -> f64 {
  x.iter().fold(0.0, |max, v| v.abs().max(max))
}

/// Scores every individual in place, optionally across rayon's thread pool.
pub(crate) fn evaluate_all<O>(
  objectives: &O,
  individuals: &mut [Individual],
  parallel: bool,
) where
  O: Objectives + Sync,
{
  if parallel {
    individuals
      .par_iter_mut()
      .for_each(|i| i.objectives = objectives.evaluate(&i.variables));
  } else {
    individuals
      .iter_mut()
      .for_each(|i| i.objectives = objectives.evaluate(&i.variables));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const EPS: f64 = 1e-12;

  #[test]
  fn test_sector_objectives() {
    let x = [0.0, 0.5, 1.0];
    let [f1, f2, f3, f4] = SectorObjectives.evaluate(&x);
    assert!((f1 - 1.0).abs() < EPS);
    assert!((f2 - 0.5).abs() < EPS);
    // sample variance of (0, .5, 1) is .25
    assert!((f3 + 0.5).abs() < EPS);
    assert!((f4 - 1.0).abs() < EPS);
  }

  #[test]
  fn test_single_sector() {
    let [f1, f2, f3, f4] = SectorObjectives.evaluate(&[0.3]);
    assert!((f1 - 0.2).abs() < EPS);
    assert_eq!(f2, 0.0);
    assert_eq!(f3, 0.0);
    assert!((f4 - 0.3).abs() < EPS);
  }

  #[test]
  fn test_constant_vector() {
    let scores = SectorObjectives.evaluate(&[0.5; 6]);
    assert_eq!(scores, [0.0, 0.0, 0.0, 0.5]);
  }

  #[test]
  fn test_objectives_from_closure() {
    let o = |x: &[f64]| [x.len() as f64, 0.0, 0.0, 0.0];
    assert_eq!(o.evaluate(&[0.1, 0.2]), [2.0, 0.0, 0.0, 0.0]);
  }

  #[test]
  fn test_parallel_evaluation_matches_sequential() {
    let mut a: Vec<_> = (0..32)
      .map(|i| Individual::new(vec![i as f64 / 32.0, 1.0 - i as f64 / 64.0]))
      .collect();
    let mut b = a.clone();
    evaluate_all(&SectorObjectives, &mut a, false);
    evaluate_all(&SectorObjectives, &mut b, true);
    assert_eq!(a, b);
    assert!(a.iter().all(Individual::has_finite_objectives));
  }
}
