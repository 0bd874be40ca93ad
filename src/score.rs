//! Type aliases for objective values and the Pareto dominance relation.

use std::cmp::Ordering;

/// Number of objectives every decision vector is scored on.
pub const OBJECTIVE_NUM: usize = 4;

/// An alias for a single objective value. Lower is better.
pub type Score = f64;

/// An alias for an objective vector: one `Score` per objective.
pub type Scores = [Score; OBJECTIVE_NUM];

/// Describes pareto dominance for arrays of `Score`s.
pub trait ParetoDominance {
  /// Returns `Less` if `self` dominates `other`, `Greater` if `other`
  /// dominates `self`, otherwise `Equal`. `self` dominates `other` if no
  /// `self` value is greater than the respective `other` value and at least
  /// one is smaller.
  ///
  /// Values that don't compare (NaN) count as equal. Callers keep non-finite
  /// vectors out of ranking altogether.
  fn dominance(&self, other: &Self) -> Ordering;

  /// Returns `true` if `self` dominates `other`.
  fn dominates(&self, other: &Self) -> bool {
    self.dominance(other) == Ordering::Less
  }
}

impl ParetoDominance for [Score] {
  fn dominance(&self, other: &Self) -> Ordering {
    let mut ord = Ordering::Equal;
    for (a, b) in self.iter().zip(other) {
      match (ord, a.partial_cmp(b).unwrap_or(Ordering::Equal)) {
        (Ordering::Equal, next_ord) => ord = next_ord,
        (Ordering::Greater, Ordering::Less)
        | (Ordering::Less, Ordering::Greater) => return Ordering::Equal,
        _ => {}
      }
    }
    ord
  }
}
