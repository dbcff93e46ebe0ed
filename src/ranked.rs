//! Ranked (multi-action) sampling without replacement.
//!
//! Each output slot consumes exactly one `uniform01` draw `r`. The slot is
//! filled by walking the cumulative mass of the *original* normalized pmf in
//! index order, already-chosen indices included, and taking the first index
//! that is both past the threshold (`cdf > r`) and not yet chosen. Mass is not
//! renormalized after a removal.
//!
//! This rejection-without-renormalization scheme is not the same distribution
//! as true sequential sampling without replacement: slots after the first do
//! not follow the renormalized remaining mass. Logged rankings depend on it,
//! so it is kept as is.
//! Only the first slot's probability is reported; it is exact.

use crate::alloc::normalize_pmf;
use crate::rng::UniformSource;
use crate::{ActionIndex, MwtError, Result};

/// Produce a ranking (permutation of `1..=pmf.len()`) from `weights`.
///
/// Returns the ranking and the probability of its top action. Fails with
/// `InvalidDistribution` for invalid weights, and with
/// `DeterministicDistribution` when more than one action exists but a single
/// action carries all of the mass.
pub fn rank_without_replacement<R: UniformSource + ?Sized>(
    weights: &[f32],
    rng: &mut R,
) -> Result<(Vec<ActionIndex>, f32)> {
    let pmf = normalize_pmf(weights)?;
    let size = pmf.len();
    if size > 1 {
        if let Some(i) = pmf.iter().position(|&p| p >= 1.0) {
            return Err(MwtError::DeterministicDistribution {
                action: i as ActionIndex + 1,
            });
        }
    }

    // 1-based bitmap; slot 0 unused.
    let mut exists = vec![false; size + 1];
    let mut ranking: Vec<ActionIndex> = Vec::with_capacity(size);
    let mut top_probability = 0.0f32;

    for slot in 0..size {
        let r = rng.uniform01();
        let idx = scan_unchosen(&pmf, &exists, r)
            .or_else(|| last_unchosen(&pmf, &exists))
            .unwrap_or(0);
        exists[idx + 1] = true;
        ranking.push(idx as ActionIndex + 1);
        if slot == 0 {
            top_probability = pmf[idx];
        }
    }
    Ok((ranking, top_probability))
}

fn scan_unchosen(pmf: &[f32], exists: &[bool], r: f32) -> Option<usize> {
    let mut cdf = 0.0f32;
    for (i, &p) in pmf.iter().enumerate() {
        cdf += p;
        if cdf > r && !exists[i + 1] {
            return Some(i);
        }
    }
    None
}

// Fallback when rounding or earlier picks leave nothing past the threshold.
fn last_unchosen(pmf: &[f32], exists: &[bool]) -> Option<usize> {
    let unchosen = |i: &usize| !exists[*i + 1];
    (0..pmf.len())
        .rev()
        .filter(unchosen)
        .find(|&i| pmf[i] > 0.0)
        .or_else(|| (0..pmf.len()).rev().find(unchosen))
}
