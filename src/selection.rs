//! Parent selection.

use std::cmp::Ordering;

use rand::Rng;

use crate::individual::Individual;

/// The crowded comparison: the lower rank wins, and within a rank the larger
/// crowding distance wins. Returns `Less` if `a` is preferred.
pub fn crowded_cmp(a: &Individual, b: &Individual) -> Ordering {
  a.rank
    .cmp(&b.rank)
    .then_with(|| b.crowding_distance.total_cmp(&a.crowding_distance))
}

/// Binary tournament: draws two individuals with replacement and returns the
/// index of the one preferred by [`crowded_cmp`]. An exact tie is settled by
/// a fair coin.
///
/// # Panics
///
/// Panics if `population` is empty.
pub fn binary_tournament<R: Rng + ?Sized>(
  population: &[Individual],
  rng: &mut R,
) -> usize {
  let a = rng.gen_range(0..population.len());
  let b = rng.gen_range(0..population.len());
  match crowded_cmp(&population[a], &population[b]) {
    Ordering::Less => a,
    Ordering::Greater => b,
    Ordering::Equal => {
      if rng.gen_bool(0.5) {
        a
      } else {
        b
      }
    }
  }
}

/// Runs two tournaments, returning the indices of a breeding pair. Both may
/// point at the same individual.
pub fn select_pair<R: Rng + ?Sized>(
  population: &[Individual],
  rng: &mut R,
) -> (usize, usize) {
  (
    binary_tournament(population, rng),
    binary_tournament(population, rng),
  )
}
