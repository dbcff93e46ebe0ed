//! Deterministic per-decision random draws.
//!
//! RULE: no strategy may touch a platform or thread-local RNG. Every draw
//! comes from a [`UniformSource`], and in production that source is a fresh
//! [`DeterministicRng`] seeded from [`crate::seed_hash`] for each decision.
//!
//! Generator: PCG-64 MCG (`rand_pcg::Pcg64Mcg`, 128-bit state, XSL-RR output),
//! seeded through `SeedableRng::seed_from_u64`. Both are value-stable in
//! `rand_pcg`/`rand_core`, so the sequence for a seed is reproducible.
//!
//! Conversions (part of the contract):
//! - `uniform01`: top 24 bits of `next_u64`, scaled by `2^-24`, giving an `f32` in `[0, 1)`.
//! - `uniform_int(lo, hi)`: `lo + next_u64 % (hi - lo + 1)`, one draw. Modulo bias is
//!   below `2^-32` for any `u32` span.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Source of uniform draws consumed by exploration strategies.
///
/// Strategies consume draws in a fixed, strategy-defined order; changing that
/// order changes outcomes for existing keys.
pub trait UniformSource {
    /// Uniform `f32` in `[0, 1)`.
    fn uniform01(&mut self) -> f32;

    /// Uniform integer in `[lo, hi]` (inclusive). If `hi < lo` the bounds are swapped.
    fn uniform_int(&mut self, lo: u32, hi: u32) -> u32;
}

/// Seeded generator owned by exactly one in-flight decision.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    inner: Pcg64Mcg,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Generator for the decision `(app_id, key)`.
    pub fn for_decision(app_id: &str, key: &str) -> Self {
        Self::new(crate::seed_hash(app_id, key))
    }

    /// Raw 64-bit draw.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

impl UniformSource for DeterministicRng {
    fn uniform01(&mut self) -> f32 {
        let bits = self.inner.next_u64() >> 40;
        bits as f32 * (1.0 / (1u32 << 24) as f32)
    }

    fn uniform_int(&mut self, lo: u32, hi: u32) -> u32 {
        let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        let span = (hi - lo) as u64 + 1;
        lo + (self.inner.next_u64() % span) as u32
    }
}

/// A source that replays a fixed script of draws.
///
/// Useful for pinning a strategy to a known draw (`r = 0.4`) in tests and for
/// replay tooling. Integer draws map a scripted `r` onto `[lo, hi]` as
/// `lo + floor(r * span)`. When the script runs out, the last value repeats.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    draws: Vec<f32>,
    next: usize,
}

impl ScriptedDraws {
    pub fn new(draws: Vec<f32>) -> Self {
        Self {
            draws,
            next: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.next
    }

    fn take(&mut self) -> f32 {
        let r = match self.draws.get(self.next) {
            Some(r) => *r,
            None => self.draws.last().copied().unwrap_or(0.0),
        };
        self.next += 1;
        r.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

impl UniformSource for ScriptedDraws {
    fn uniform01(&mut self) -> f32 {
        self.take()
    }

    fn uniform_int(&mut self, lo: u32, hi: u32) -> u32 {
        let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        let span = (hi - lo) as u64 + 1;
        let off = ((self.take() as f64) * span as f64).floor() as u64;
        lo + off.min(span - 1) as u32
    }
}
