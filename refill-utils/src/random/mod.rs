//! Random source abstraction for loot-seed randomization.

mod xoroshiro;

pub use xoroshiro::Xoroshiro;

use std::time::{SystemTime, UNIX_EPOCH};

/// A deterministic, forkable random source.
///
/// Each loot record draws from its own source, so there is no shared
/// state across records.
pub trait RandomSource {
    /// Derives an independent source from this one.
    fn fork(&mut self) -> Self
    where
        Self: Sized;

    /// Returns the next pseudo-random `i64`.
    fn next_i64(&mut self) -> i64;
}

/// Derives a seed from the system clock.
///
/// Used when the host does not supply its own seed, e.g. when
/// constructing the per-access source for seed randomization.
#[must_use]
pub fn seed_from_time() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    millis ^ (u64::from(nanos) << 32)
}
