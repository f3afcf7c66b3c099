//! # Refill Core
//!
//! A loot-container refill engine for Minecraft-style servers.
//!
//! Containers that were populated from a loot table can be refilled on
//! later accesses, subject to a cooldown, a refill-count ceiling, and
//! per-player reloot permissions. The host owns the container slots and
//! the loot-table evaluation; this crate owns the decision of *whether*
//! a given access pops the original loot, refills from the saved table,
//! or does nothing, plus the persistence of that bookkeeping.
//!
//! The entry points are [`engine::RefillEngine::on_access`] for the
//! per-open decision and [`nbt::try_load_loot_table`] /
//! [`nbt::try_save_loot_table`] around the host's save cycle.

/// Configuration file model and loading.
pub mod config;
/// The capability trait containers implement to be refillable.
pub mod container;
/// The refill decision engine.
pub mod engine;
/// NBT persistence of the refill record.
pub mod nbt;
/// The reloot permission seam.
pub mod permission;
/// Resolved refill policies.
pub mod policy;
/// The durable per-container record.
pub mod record;

pub use config::{RefillConfig, RefillProperties};
pub use container::{RefillableContainer, SimpleLootContainer};
pub use engine::{RefillAction, RefillEngine};
pub use nbt::MalformedRecordError;
pub use permission::{
    ALLOW_RELOOT_NODE, DefaultPermissions, PermissionProvider, StaticPermissions,
};
pub use policy::{RefillPolicy, UNLIMITED_REFILLS};
pub use record::LootRecord;
