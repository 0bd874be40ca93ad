//! Simulated binary crossover (SBX).

use rand::Rng;

/// Lower bound of every decision variable.
pub const LOWER_BOUND: f64 = 0.0;
/// Upper bound of every decision variable.
pub const UPPER_BOUND: f64 = 1.0;

/// SBX spread factor for a uniform draw `u` in `[0, 1)`.
///
/// Values near `1` keep offspring close to their parents; the larger
/// `eta_c`, the more likely that is.
pub fn spread_factor(u: f64, eta_c: f64) -> f64 {
  let exponent = 1.0 / (eta_c + 1.0);
  if u <= 0.5 {
    (2.0 * u).powf(exponent)
  } else {
    (1.0 / (2.0 * (1.0 - u))).powf(exponent)
  }
}

/// Recombines two parent vectors into two offspring vectors.
///
/// With probability `1 - crossover_prob` the pair is left alone and the
/// offspring are exact copies of the parents. Otherwise every variable draws
/// its own spread factor and both offspring values are clamped into
/// `[0, 1]`.
///
/// # Panics
///
/// Panics if `crossover_prob` is outside of `[0, 1]`.
///
/// # Examples
/// ```
/// # use pareto_alloc::recombination::sbx;
/// # use rand::{rngs::StdRng, SeedableRng};
/// let mut rng = StdRng::seed_from_u64(0);
/// let (a, b) = sbx(&[0.2, 0.4], &[0.6, 0.8], 0.0, 20.0, &mut rng);
/// assert_eq!((a, b), (vec![0.2, 0.4], vec![0.6, 0.8]));
/// ```
pub fn sbx<R: Rng + ?Sized>(
  parent_a: &[f64],
  parent_b: &[f64],
  crossover_prob: f64,
  eta_c: f64,
  rng: &mut R,
) -> (Vec<f64>, Vec<f64>) {
  debug_assert_eq!(parent_a.len(), parent_b.len());
  if !rng.gen_bool(crossover_prob) {
    return (parent_a.to_vec(), parent_b.to_vec());
  }

  parent_a
    .iter()
    .zip(parent_b)
    .map(|(&a, &b)| {
      let beta = spread_factor(rng.gen(), eta_c);
      let c = 0.5 * ((1.0 + beta) * a + (1.0 - beta) * b);
      let d = 0.5 * ((1.0 - beta) * a + (1.0 + beta) * b);
      (
        c.clamp(LOWER_BOUND, UPPER_BOUND),
        d.clamp(LOWER_BOUND, UPPER_BOUND),
      )
    })
    .unzip()
}
