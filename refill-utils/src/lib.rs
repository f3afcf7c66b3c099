//! # Refill Utils
//!
//! Leaf types shared by the refill engine: namespaced identifiers and
//! the random source used for loot-seed randomization.

/// Namespaced `namespace:path` identifiers.
pub mod identifier;
/// Random number generation.
pub mod random;

pub use identifier::{Identifier, IdentifierError};
pub use random::{RandomSource, Xoroshiro, seed_from_time};
