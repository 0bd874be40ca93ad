//! Polynomial mutation.

use rand::Rng;

use crate::recombination::{LOWER_BOUND, UPPER_BOUND};

/// Perturbs a single variable in `[0, 1]` for a uniform draw `u` in
/// `[0, 1)`.
///
/// Draws below `0.5` move the value down, the rest move it up, and the step
/// scales with the distance to the bound it moves towards, so a variable
/// sitting on a bound can only be pushed inwards.
pub fn perturb(value: f64, u: f64, eta_m: f64) -> f64 {
  let range = UPPER_BOUND - LOWER_BOUND;
  let delta_lower = (value - LOWER_BOUND) / range;
  let delta_upper = (UPPER_BOUND - value) / range;
  let exponent = eta_m + 1.0;

  let delta = if u < 0.5 {
    let base = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - delta_lower).powf(exponent);
    base.powf(1.0 / exponent) - 1.0
  } else {
    let base = 2.0 * (1.0 - u)
      + 2.0 * (u - 0.5) * (1.0 - delta_upper).powf(exponent);
    1.0 - base.powf(1.0 / exponent)
  };

  (value + delta * range).clamp(LOWER_BOUND, UPPER_BOUND)
}

/// Mutates each variable of `variables` independently with probability
/// `mutation_prob`.
///
/// Only the given vector is touched; offspring own their vectors, so no
/// other individual can observe the change.
///
/// # Panics
///
/// Panics if `mutation_prob` is outside of `[0, 1]`.
pub fn polynomial_mutation<R: Rng + ?Sized>(
  variables: &mut [f64],
  mutation_prob: f64,
  eta_m: f64,
  rng: &mut R,
) {
  for value in variables.iter_mut() {
    if rng.gen_bool(mutation_prob) {
      *value = perturb(*value, rng.gen(), eta_m);
    }
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  #[test]
  fn test_perturb_direction() {
    assert!(perturb(0.5, 0.1, 20.0) < 0.5);
    assert!(perturb(0.5, 0.9, 20.0) > 0.5);
    assert!((perturb(0.5, 0.5, 20.0) - 0.5).abs() < 1e-12);
  }

  #[test]
  fn test_perturb_on_bounds() {
    // a variable on a bound can't leave the interval
    assert_eq!(perturb(0.0, 0.0, 20.0), 0.0);
    assert!(perturb(1.0, 0.999, 20.0) <= 1.0);
    assert!(perturb(1.0, 0.001, 20.0) < 1.0);
    for i in 0..100 {
      let u = i as f64 / 100.0;
      assert!((0.0..=1.0).contains(&perturb(0.0, u, 20.0)));
      assert!((0.0..=1.0).contains(&perturb(1.0, u, 20.0)));
      assert!((0.0..=1.0).contains(&perturb(0.3, u, 0.0)));
    }
  }

  #[test]
  fn test_zero_probability_is_noop() {
    let mut rng = StdRng::seed_from_u64(17);
    let original = vec![0.0, 0.25, 0.5, 0.75, 1.0];
    let mut variables = original.clone();
    for _ in 0..100 {
      polynomial_mutation(&mut variables, 0.0, 20.0, &mut rng);
    }
    assert_eq!(variables, original);
  }

  #[test]
  fn test_full_probability_mutates_in_bounds() {
    let mut rng = StdRng::seed_from_u64(23);
    let original = vec![0.1, 0.4, 0.6, 0.9];
    let mut variables = original.clone();
    polynomial_mutation(&mut variables, 1.0, 20.0, &mut rng);
    assert_ne!(variables, original);
    assert!(variables.iter().all(|v| (0.0..=1.0).contains(v)));
  }
}
