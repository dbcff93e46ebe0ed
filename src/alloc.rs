//! Allocation helpers: scores and weights to a pmf, and pmf sampling.
//!
//! These are deterministic. Sums and exponentials are computed in `f64` and the
//! resulting probabilities stored as `f32`; CDF walks accumulate in `f32` in
//! index order, which is part of the reproducibility contract.

use crate::{MwtError, Result};

/// Softmax distribution `p_i = exp(lambda * s_i) / sum_j exp(lambda * s_j)`.
///
/// Uses the max-trick for numerical stability, so large `lambda * s` values do
/// not overflow. Non-finite scores are rejected.
pub fn softmax_pmf(lambda: f32, scores: &[f32]) -> Result<Vec<f32>> {
    if scores.is_empty() {
        return Err(MwtError::distribution("empty score vector"));
    }
    if !lambda.is_finite() {
        return Err(MwtError::distribution("lambda must be finite"));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(MwtError::distribution("non-finite score"));
    }

    let lambda = lambda as f64;
    let max_z = scores
        .iter()
        .map(|&s| lambda * s as f64)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut w: Vec<f64> = Vec::with_capacity(scores.len());
    let mut denom = 0.0;
    for &s in scores {
        let x = (lambda * s as f64 - max_z).exp();
        denom += x;
        w.push(x);
    }
    // The max entry contributes exp(0) = 1, so denom >= 1 here.
    Ok(w.into_iter().map(|x| (x / denom) as f32).collect())
}

/// Normalize non-negative weights to sum to one.
///
/// Fails with `InvalidDistribution` on negative or non-finite entries, or when
/// the total mass is not positive.
pub fn normalize_pmf(weights: &[f32]) -> Result<Vec<f32>> {
    if weights.is_empty() {
        return Err(MwtError::distribution("empty pmf"));
    }
    let mut sum = 0.0f64;
    for (i, &w) in weights.iter().enumerate() {
        if !w.is_finite() {
            return Err(MwtError::distribution(format!("non-finite entry at index {i}")));
        }
        if w < 0.0 {
            return Err(MwtError::distribution(format!("negative entry {w} at index {i}")));
        }
        sum += w as f64;
    }
    if sum <= 0.0 {
        return Err(MwtError::distribution("pmf sums to zero"));
    }
    Ok(weights.iter().map(|&w| (w as f64 / sum) as f32).collect())
}

/// Sample a 0-based index from `pmf` with a uniform draw `r` in `[0, 1)`.
///
/// Returns the first index whose cumulative mass exceeds `r`. If rounding
/// leaves the walk short of `r`, the last index with positive mass is used.
/// Returns `None` only for an empty or all-zero pmf.
pub fn sample_cdf(pmf: &[f32], r: f32) -> Option<usize> {
    let mut cdf = 0.0f32;
    for (i, &p) in pmf.iter().enumerate() {
        cdf += p;
        if p > 0.0 && cdf > r {
            return Some(i);
        }
    }
    // Numerical fallback.
    pmf.iter().rposition(|&p| p > 0.0)
}
