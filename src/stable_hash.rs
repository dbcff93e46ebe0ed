//! Deterministic seed derivation for exploration decisions.
//!
//! Logged decisions are replayed by other processes (and possibly other
//! implementations), so the seed must be a pure, publicly specified function of
//! the `(app_id, key)` bytes. Language-default hashers are randomized or
//! unspecified and must never be used here.
//!
//! Algorithm (64-bit, no endianness dependence since input is consumed byte by byte):
//! 1. FNV-1a over `app_id`, starting from the standard FNV-64 offset basis
//! 2. continue FNV-1a over a single `0xFF` separator byte
//! 3. continue FNV-1a over `key`
//! 4. SplitMix64 finalizer on the result
//!
//! `0xFF` never occurs in UTF-8, so `("ab", "c")` and `("a", "bc")` hash differently.

const FNV_OFFSET_BASIS: u64 = 14695981039346656037u64;
const FNV_PRIME: u64 = 1099511628211u64;
const KEY_SEPARATOR: u8 = 0xFF;

/// Seed for the decision identified by `(app_id, key)`.
///
/// Identical inputs give identical seeds for the lifetime of the system; there
/// is no hidden state.
#[must_use]
pub fn seed_hash(app_id: &str, key: &str) -> u64 {
    seed_hash_bytes(app_id.as_bytes(), key.as_bytes())
}

/// Byte-level form of [`seed_hash`]. Total over all byte sequences.
#[must_use]
pub fn seed_hash_bytes(app_id: &[u8], key: &[u8]) -> u64 {
    let mut h = fnv1a(FNV_OFFSET_BASIS, app_id);
    h = fnv1a(h, &[KEY_SEPARATOR]);
    h = fnv1a(h, key);
    splitmix64(h)
}

#[inline]
fn fnv1a(mut h: u64, bytes: &[u8]) -> u64 {
    for b in bytes {
        h ^= *b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
