//! Crowding distance, the per-front diversity estimate.

use itertools::Itertools;
use rayon::prelude::*;

use crate::{
  individual::Individual,
  score::{Scores, OBJECTIVE_NUM},
  sorting::Front,
};

/// Computes crowding distances of the individuals scored by `front`.
///
/// For each objective the members are ordered by that objective. When the
/// objective has a non-zero range, the first and the last member get an
/// infinite contribution and every interior member gets the gap between its
/// neighbours divided by the range. An objective with zero range contributes
/// nothing to anyone.
///
/// A front whose members all share one objective vector, including a front
/// of a single member, has no interior: every member is a boundary and gets
/// infinite distance.
/// ```
/// # use pareto_alloc::crowding::crowding_distances;
/// let front = [
///   [1.0, 5.0, 0.0, 0.0],
///   [3.0, 3.0, 0.0, 0.0],
///   [5.0, 1.0, 0.0, 0.0],
/// ];
/// let d = crowding_distances(&front);
/// assert!(d[0].is_infinite() && d[2].is_infinite());
/// assert_eq!(d[1], 2.0);
/// ```
pub fn crowding_distances(front: &[Scores]) -> Vec<f64> {
  let n = front.len();
  let mut distances = vec![0.0; n];
  let mut degenerate = true;

  for o_idx in 0..OBJECTIVE_NUM {
    // order members by their score of objective `o`
    let order: Vec<usize> = (0..n)
      .sorted_by(|&a, &b| front[a][o_idx].total_cmp(&front[b][o_idx]))
      .collect();
    let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
      return distances;
    };
    let range = front[last][o_idx] - front[first][o_idx];
    if range <= 0.0 {
      continue;
    }
    degenerate = false;
    distances[first] = f64::INFINITY;
    distances[last] = f64::INFINITY;
    for (prev, idx, next) in order.iter().copied().tuple_windows() {
      distances[idx] += (front[next][o_idx] - front[prev][o_idx]) / range;
    }
  }

  if degenerate {
    distances.fill(f64::INFINITY);
  }
  distances
}

/// Writes the crowding distance of every member of every front. Fronts are
/// disjoint, so with `parallel` set they are processed concurrently.
pub fn assign_crowding_distances(
  individuals: &mut [Individual],
  fronts: &[Front],
  parallel: bool,
) {
  let front_distances = |front: &Front| {
    let scores: Vec<Scores> =
      front.iter().map(|&idx| individuals[idx].objectives).collect();
    crowding_distances(&scores)
  };
  let distances: Vec<Vec<f64>> = if parallel {
    fronts.par_iter().map(front_distances).collect()
  } else {
    fronts.iter().map(front_distances).collect()
  };

  for (front, distances) in fronts.iter().zip(distances) {
    for (&idx, distance) in front.iter().zip(distances) {
      individuals[idx].crowding_distance = distance;
    }
  }
}

/// Mean crowding distance over the rank-0 members of `individuals`. Infinite
/// as soon as one member is a front boundary, `None` without rank-0 members.
pub fn mean_front_crowding(individuals: &[Individual]) -> Option<f64> {
  let (sum, count) = individuals
    .iter()
    .filter(|i| i.rank == 0 && i.has_finite_objectives())
    .fold((0.0, 0usize), |(sum, count), i| {
      (sum + i.crowding_distance, count + 1)
    });
  (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sorting::assign_ranks;

  #[test]
  fn test_empty_front() {
    assert!(crowding_distances(&[]).is_empty());
  }

  #[test]
  fn test_single_member() {
    let d = crowding_distances(&[[1.0, 2.0, 3.0, 4.0]]);
    assert_eq!(d, vec![f64::INFINITY]);
  }

  #[test]
  fn test_two_members() {
    let d = crowding_distances(&[[1.0, 3.0, 0.0, 0.0], [3.0, 1.0, 0.0, 0.0]]);
    assert!(d.iter().all(|d| d.is_infinite()));
  }

  #[test]
  fn test_identical_members() {
    let d = crowding_distances(&[[0.5, 0.0, -0.1, 0.7]; 4]);
    assert_eq!(d, vec![f64::INFINITY; 4]);
  }

  #[test]
  fn test_evenly_spaced() {
    let front: Vec<Scores> = (0..5)
      .map(|i| [i as f64, 4.0 - i as f64, 1.0, 1.0])
      .collect();
    let d = crowding_distances(&front);
    assert!(d[0].is_infinite());
    assert!(d[4].is_infinite());
    // two objectives contribute 2/4 each, the constant ones nothing
    for d in &d[1..4] {
      assert!((d - 1.0).abs() < 1e-12, "expected 1.0, got {d}");
    }
  }

  #[test]
  fn test_zero_range_objective_contributes_nothing() {
    let front = [
      [1.0, 5.0, 0.0, 0.0],
      [2.0, 5.0, 0.0, 0.0],
      [4.0, 5.0, 0.0, 0.0],
    ];
    let d = crowding_distances(&front);
    assert!(d[0].is_infinite());
    assert!(d[2].is_infinite());
    assert!((d[1] - 1.0).abs() < 1e-12);
  }

  #[test]
  fn test_extremes_along_each_objective_are_infinite() {
    let front = [
      [0.0, 0.9, 0.3, 0.5],
      [0.2, 0.1, 0.6, 0.4],
      [0.4, 0.5, 0.1, 0.9],
      [0.6, 0.3, 0.9, 0.2],
      [0.8, 0.7, 0.4, 0.6],
    ];
    let d = crowding_distances(&front);
    for o_idx in 0..OBJECTIVE_NUM {
      let min = (0..5)
        .min_by(|&a, &b| front[a][o_idx].total_cmp(&front[b][o_idx]))
        .unwrap();
      let max = (0..5)
        .max_by(|&a, &b| front[a][o_idx].total_cmp(&front[b][o_idx]))
        .unwrap();
      assert!(d[min].is_infinite());
      assert!(d[max].is_infinite());
    }
  }

  #[test]
  fn test_assign_per_front() {
    let mut individuals: Vec<_> = [
      [1.0, 5.0, 0.0, 0.0],
      [3.0, 3.0, 0.0, 0.0],
      [5.0, 1.0, 0.0, 0.0],
      [4.0, 4.0, 0.0, 0.0],
      [6.0, 6.0, 0.0, 0.0],
    ]
    .into_iter()
    .map(|objectives| Individual {
      objectives,
      ..Individual::new(vec![0.0])
    })
    .collect();
    let ranking = assign_ranks(&mut individuals, false);
    let mut parallel = individuals.clone();
    assign_crowding_distances(&mut individuals, &ranking.fronts, false);
    assign_crowding_distances(&mut parallel, &ranking.fronts, true);
    assert_eq!(individuals, parallel);

    assert_eq!(individuals[1].crowding_distance(), 2.0);
    // (4, 4) and (6, 6) are alone in their fronts
    assert!(individuals[3].crowding_distance().is_infinite());
    assert!(individuals[4].crowding_distance().is_infinite());
    assert_eq!(mean_front_crowding(&individuals), Some(f64::INFINITY));
  }

  #[test]
  fn test_mean_front_crowding() {
    let individual = |rank, crowding_distance| Individual {
      objectives: [0.0; OBJECTIVE_NUM],
      rank,
      crowding_distance,
      ..Individual::new(vec![])
    };
    assert_eq!(mean_front_crowding(&[]), None);
    let population =
      [individual(0, 1.0), individual(0, 3.0), individual(1, 9.0)];
    assert_eq!(mean_front_crowding(&population), Some(2.0));
  }
}
