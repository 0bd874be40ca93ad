//! Fast non-dominated sorting.

use std::cmp::Ordering;

use itertools::Itertools;
use rayon::prelude::*;

use crate::{
  individual::Individual,
  score::{ParetoDominance, Scores},
};

/// Index of an individual in the slice being sorted.
pub type SolutionIndex = usize;
/// Indices of the individuals sharing one rank.
pub type Front = Vec<SolutionIndex>;

// number of individuals dominating an individual
type DominanceCounter = usize;
// indices of individuals dominated by an individual
type DominanceList = Vec<SolutionIndex>;

/// Partitions `scores` into Pareto fronts, best first.
///
/// Every index appears in exactly one front. Individuals with equal
/// objective vectors don't dominate each other and end up in the same
/// front. With `parallel` set, domination rows are computed with [rayon];
/// the peeling of fronts stays sequential. Runs in
/// `O(objectives * scores.len()^2)`.
/// ```
/// # use pareto_alloc::sorting::non_dominated_sort;
/// let scores = [
///   [1.0, 5.0, 0.0, 0.0],
///   [3.0, 3.0, 0.0, 0.0],
///   [4.0, 4.0, 0.0, 0.0], // dominated by the second one
/// ];
/// assert_eq!(non_dominated_sort(&scores, false), vec![vec![0, 1], vec![2]]);
/// ```
pub fn non_dominated_sort(scores: &[Scores], parallel: bool) -> Vec<Front> {
  let (dominance_lists, mut dominance_counters) = if parallel {
    dominance_rows_par(scores)
  } else {
    dominance_rows(scores)
  };

  let mut fronts = Vec::new();
  let mut current: Front = (0..scores.len())
    .filter(|&idx| dominance_counters[idx] == 0)
    .collect();
  while !current.is_empty() {
    let mut next = Front::new();
    // for each individual `p` in the current front...
    for &p_idx in &current {
      // release every individual `q` it dominates
      for &q_idx in &dominance_lists[p_idx] {
        dominance_counters[q_idx] -= 1;
        if dominance_counters[q_idx] == 0 {
          next.push(q_idx);
        }
      }
    }
    next.sort_unstable();
    fronts.push(std::mem::replace(&mut current, next));
  }

  debug_assert_eq!(
    fronts.iter().map(Vec::len).sum::<usize>(),
    scores.len(),
    "fronts must cover every individual exactly once"
  );
  fronts
}

fn dominance_rows(
  scores: &[Scores],
) -> (Vec<DominanceList>, Vec<DominanceCounter>) {
  let mut dominance_lists = vec![DominanceList::new(); scores.len()];
  let mut dominance_counters = vec![0; scores.len()];
  // for each unique pair of individuals `p` and `q`...
  for (p_idx, q_idx) in (0..scores.len()).tuple_combinations() {
    match scores[p_idx].dominance(&scores[q_idx]) {
      Ordering::Less => {
        dominance_lists[p_idx].push(q_idx);
        dominance_counters[q_idx] += 1;
      }
      Ordering::Greater => {
        dominance_lists[q_idx].push(p_idx);
        dominance_counters[p_idx] += 1;
      }
      Ordering::Equal => {}
    }
  }
  (dominance_lists, dominance_counters)
}

fn dominance_rows_par(
  scores: &[Scores],
) -> (Vec<DominanceList>, Vec<DominanceCounter>) {
  // each row compares against every other individual, so rows are
  // independent at the cost of comparing each pair twice
  (0..scores.len())
    .into_par_iter()
    .map(|p_idx| {
      let mut dominated = DominanceList::new();
      let mut dominators = 0;
      for (q_idx, q_sc) in scores.iter().enumerate() {
        match scores[p_idx].dominance(q_sc) {
          Ordering::Less => dominated.push(q_idx),
          Ordering::Greater => dominators += 1,
          Ordering::Equal => {}
        }
      }
      (dominated, dominators)
    })
    .unzip()
}

/// Outcome of ranking a population.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ranking {
  /// Fronts of individuals with finite objectives, best first.
  pub fronts: Vec<Front>,
  /// Individuals left out of the ranking because of non-finite objectives.
  pub flagged: Vec<SolutionIndex>,
}

/// Sorts `individuals` into fronts and writes each one's rank.
///
/// Individuals with non-finite objectives never take part in a comparison.
/// They are reported in [`Ranking::flagged`] and receive the rank one past
/// the last front, so they lose every tournament and are the last to survive
/// truncation.
pub fn assign_ranks(individuals: &mut [Individual], parallel: bool) -> Ranking {
  let (valid, flagged): (Vec<_>, Vec<_>) = (0..individuals.len())
    .partition(|&idx| individuals[idx].has_finite_objectives());
  let scores: Vec<Scores> =
    valid.iter().map(|&idx| individuals[idx].objectives).collect();

  let fronts: Vec<Front> = non_dominated_sort(&scores, parallel)
    .into_iter()
    .map(|front| front.into_iter().map(|idx| valid[idx]).collect())
    .collect();

  for (rank, front) in fronts.iter().enumerate() {
    for &idx in front {
      individuals[idx].rank = rank;
    }
  }
  for &idx in &flagged {
    individuals[idx].rank = fronts.len();
    individuals[idx].crowding_distance = 0.0;
  }

  Ranking { fronts, flagged }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scores(points: &[(f64, f64)]) -> Vec<Scores> {
    points.iter().map(|&(a, b)| [a, b, 0.0, 0.0]).collect()
  }

  #[test]
  fn test_empty() {
    assert!(non_dominated_sort(&[], false).is_empty());
    assert!(non_dominated_sort(&[], true).is_empty());
  }

  #[test]
  fn test_clear_dominance() {
    let s = scores(&[(3.0, 3.0), (1.0, 1.0), (2.0, 2.0)]);
    assert_eq!(
      non_dominated_sort(&s, false),
      vec![vec![1], vec![2], vec![0]]
    );
  }

  #[test]
  fn test_mixed_fronts() {
    let s = scores(&[
      (1.0, 5.0),
      (3.0, 3.0),
      (5.0, 1.0),
      (4.0, 4.0), // dominated by (3, 3)
      (6.0, 6.0), // dominated by (4, 4) too
    ]);
    let fronts = non_dominated_sort(&s, false);
    assert_eq!(fronts, vec![vec![0, 1, 2], vec![3], vec![4]]);
    assert_eq!(non_dominated_sort(&s, true), fronts);
  }

  #[test]
  fn test_equal_vectors_share_front() {
    let s = scores(&[(2.0, 2.0), (2.0, 2.0), (2.0, 2.0), (3.0, 3.0)]);
    assert_eq!(non_dominated_sort(&s, false), vec![vec![0, 1, 2], vec![3]]);
  }

  #[test]
  fn test_fronts_cover_population() {
    let s: Vec<Scores> = (0..40)
      .map(|i| {
        let x = i as f64;
        [(x * 7.0) % 11.0, (x * 3.0) % 5.0, (x * 5.0) % 13.0, x % 4.0]
      })
      .collect();
    let fronts = non_dominated_sort(&s, false);
    assert_eq!(non_dominated_sort(&s, true), fronts);

    let mut seen: Vec<_> = fronts.iter().flatten().copied().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..40).collect::<Vec<_>>());

    // no member of a front is dominated by a member of the same or a later
    // front
    for (rank, front) in fronts.iter().enumerate() {
      for &p in front {
        for later in &fronts[rank..] {
          for &q in later {
            assert!(!s[q].dominates(&s[p]));
          }
        }
      }
    }
  }

  #[test]
  fn test_assign_ranks_flags_non_finite() {
    let mut individuals: Vec<_> = [
      [1.0, 1.0, 0.0, 0.0],
      [f64::NAN, 0.0, 0.0, 0.0],
      [2.0, 2.0, 0.0, 0.0],
      [0.0, f64::INFINITY, 0.0, 0.0],
    ]
    .into_iter()
    .map(|objectives| Individual {
      objectives,
      ..Individual::new(vec![0.5])
    })
    .collect();

    let ranking = assign_ranks(&mut individuals, false);
    assert_eq!(ranking.fronts, vec![vec![0], vec![2]]);
    assert_eq!(ranking.flagged, vec![1, 3]);
    assert_eq!(individuals[0].rank(), 0);
    assert_eq!(individuals[2].rank(), 1);
    assert_eq!(individuals[1].rank(), 2);
    assert_eq!(individuals[3].rank(), 2);
  }
}
