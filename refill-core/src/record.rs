//! The durable per-container refill record.

use refill_utils::Identifier;
use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::config::RefillProperties;
use crate::policy::RefillPolicy;

/// Per-container refill bookkeeping.
///
/// Created alongside the container, mutated only by the decision
/// engine, and persisted inside the container's save blob once the
/// original loot has been popped. The container's live loot-table
/// pointer is not duplicated here; the engine reads it through
/// [`crate::container::RefillableContainer`].
#[derive(Debug, Clone, PartialEq)]
pub struct LootRecord {
    pub(crate) saved_table: Option<Identifier>,
    pub(crate) saved_seed: i64,
    pub(crate) looted_by: FxHashSet<Uuid>,
    pub(crate) refill_count: i32,
    pub(crate) last_refill_time: i64,
    pub(crate) policy: RefillPolicy,
    pub(crate) has_instance_override: bool,
}

impl LootRecord {
    /// Creates a fresh record with zeroed counters.
    #[must_use]
    pub fn new(policy: RefillPolicy) -> Self {
        Self {
            saved_table: None,
            saved_seed: 0,
            looted_by: FxHashSet::default(),
            refill_count: 0,
            last_refill_time: 0,
            policy,
            has_instance_override: false,
        }
    }

    /// The table refills draw from, set on first pop.
    #[must_use]
    pub fn saved_table(&self) -> Option<&Identifier> {
        self.saved_table.as_ref()
    }

    /// The seed reused when seed randomization is disabled.
    #[must_use]
    pub const fn saved_seed(&self) -> i64 {
        self.saved_seed
    }

    /// Whether the given actor has received loot from this record.
    #[must_use]
    pub fn has_looted(&self, actor: Uuid) -> bool {
        self.looted_by.contains(&actor)
    }

    /// Number of distinct actors that have received loot.
    #[must_use]
    pub fn looter_count(&self) -> usize {
        self.looted_by.len()
    }

    /// Number of refills performed so far, excluding the initial pop.
    #[must_use]
    pub const fn refill_count(&self) -> i32 {
        self.refill_count
    }

    /// Wall-clock milliseconds of the most recent pop or refill.
    #[must_use]
    pub const fn last_refill_time(&self) -> i64 {
        self.last_refill_time
    }

    /// The resolved policy governing this record.
    #[must_use]
    pub const fn policy(&self) -> &RefillPolicy {
        &self.policy
    }

    /// Whether this record carries its own persisted property override.
    #[must_use]
    pub const fn has_instance_override(&self) -> bool {
        self.has_instance_override
    }

    /// Replaces the policy with a per-container override.
    ///
    /// The override is persisted with the record and survives later
    /// table-level config changes.
    pub fn set_instance_override(&mut self, properties: RefillProperties) {
        self.policy = properties.into();
        self.has_instance_override = true;
    }
}
