//! The refill decision engine.
//!
//! One call per container-open event. The engine decides whether the
//! access pops the original loot, schedules a refill from the saved
//! table, or does nothing, and updates the record accordingly. The host
//! performs the actual loot generation when it sees the live pointer
//! set afterwards.

use refill_utils::random::RandomSource;
use uuid::Uuid;

use crate::container::RefillableContainer;
use crate::permission::{ALLOW_RELOOT_NODE, PermissionProvider};
use crate::record::LootRecord;

/// Outcome of one access attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillAction {
    /// First access ever: the host should pop the original loot table.
    PopOriginal,
    /// The live pointer was re-armed from the saved table.
    Refill,
    /// Nothing to do.
    NoOp,
}

/// The decision engine, bound to a permission authority.
pub struct RefillEngine<'p> {
    permissions: &'p dyn PermissionProvider,
}

impl<'p> RefillEngine<'p> {
    /// Creates an engine using the given permission authority.
    #[must_use]
    pub const fn new(permissions: &'p dyn PermissionProvider) -> Self {
        Self { permissions }
    }

    /// Decides what happens for one access attempt.
    ///
    /// Exactly one [`RefillAction`] is produced per call. A missing
    /// actor always yields [`RefillAction::NoOp`] without mutating
    /// anything. `now_ms` is wall-clock milliseconds; `rng` supplies
    /// the fresh seed when the policy randomizes loot seeds.
    pub fn on_access<C, R>(
        &self,
        record: &mut LootRecord,
        container: &mut C,
        actor: Option<Uuid>,
        now_ms: i64,
        rng: &mut R,
    ) -> RefillAction
    where
        C: RefillableContainer + ?Sized,
        R: RandomSource,
    {
        let Some(actor) = actor else {
            return RefillAction::NoOp;
        };

        if let Some(original) = container.loot_table() {
            // Original loot has never been popped. Remember the table so
            // refills have a source; the host clears the live pointer
            // when it generates the items.
            record.saved_table = Some(original.clone());
            record.saved_seed = container.loot_table_seed();
            record.last_refill_time = now_ms;
            record.looted_by.insert(actor);
            return RefillAction::PopOriginal;
        }

        let Some(saved_table) = record.saved_table.clone() else {
            // Never had a loot table, nothing to refill from.
            return RefillAction::NoOp;
        };

        let empty_enough = container.is_empty() || record.policy.refill_non_empty;
        if !(empty_enough && self.can_refill_for(record, actor, now_ms)) {
            return RefillAction::NoOp;
        }

        record.looted_by.insert(actor);
        container.set_loot_table(Some(saved_table));
        let seed = if record.policy.randomize_loot_seed {
            rng.next_i64()
        } else {
            record.saved_seed
        };
        container.set_loot_table_seed(seed);
        record.last_refill_time = now_ms;
        record.refill_count += 1;

        RefillAction::Refill
    }

    fn can_refill_for(&self, record: &LootRecord, actor: Uuid, now_ms: i64) -> bool {
        let reloot_permission = self.permissions.check(
            actor,
            ALLOW_RELOOT_NODE,
            record.policy.allow_reloot_by_default,
        ) || !record.looted_by.contains(&actor);

        can_still_refill(record) && has_enough_time_passed(record, now_ms) && reloot_permission
    }
}

/// Whether the record has not reached its refill ceiling.
fn can_still_refill(record: &LootRecord) -> bool {
    record.refill_count < record.policy.max_refills || record.policy.is_unlimited()
}

/// Whether the cooldown since the last pop or refill has elapsed.
///
/// Strict comparison: an access at exactly the cooldown boundary is
/// not eligible. The policy value is seconds, timestamps are millis.
fn has_enough_time_passed(record: &LootRecord, now_ms: i64) -> bool {
    now_ms - record.last_refill_time > record.policy.min_wait_time * 1000
}
