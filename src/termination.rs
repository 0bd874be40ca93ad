//! Termination operators and utilities.

use crate::{crowding::mean_front_crowding, individual::Individual};

/// An operator that decides, after every bred generation, whether the run
/// should stop.
///
/// # Examples
/// ```
/// # use pareto_alloc::{termination::Terminator, Individual};
/// // stop as soon as some individual allocates nothing to its first sector
/// let mut t =
///   |_: usize, p: &[Individual]| p.iter().any(|i| i.variables()[0] == 0.0);
/// assert!(!t.terminate(1, &[]));
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Terminator {
  /// If returns `true`, the run is terminated. `generation` counts bred
  /// generations, starting at `1`; `population` is already ranked.
  fn terminate(&mut self, generation: usize, population: &[Individual]) -> bool;
}

impl<F> Terminator for F
where
  F: FnMut(usize, &[Individual]) -> bool,
{
  fn terminate(
    &mut self,
    generation: usize,
    population: &[Individual],
  ) -> bool {
    self(generation, population)
  }
}

/// A `Terminator` that terminates the run as soon as a certain number of
/// generations have passed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GenerationTerminator(pub usize);

impl Terminator for GenerationTerminator {
  fn terminate(&mut self, generation: usize, _: &[Individual]) -> bool {
    generation >= self.0
  }
}

/// A `Terminator` that terminates the run once the mean crowding distance of
/// the rank-0 front falls below a threshold.
///
/// Front boundaries carry infinite crowding distance, which makes the mean
/// infinite for nearly every front. Expect this criterion to fire only on
/// degenerate fronts.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CrowdingTerminator(pub f64);

impl Terminator for CrowdingTerminator {
  fn terminate(&mut self, _: usize, population: &[Individual]) -> bool {
    mean_front_crowding(population).is_some_and(|mean| mean < self.0)
  }
}

/// Why a run stopped.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TerminationReason {
  /// The configured number of generations was bred.
  GenerationLimit,
  /// The rank-0 mean crowding distance dropped below the threshold.
  Converged,
  /// The cancellation flag was raised.
  Cancelled,
  /// A caller supplied `Terminator` fired.
  Custom,
}
