//! Policy resolution.
//!
//! A [`RefillPolicy`] is the resolved, read-only bundle of tunables for
//! one container. It is computed at record-load time by layering the
//! global defaults, the per-loot-table override, and the persisted
//! per-container override, in that order.

use refill_utils::Identifier;

use crate::config::{RefillConfig, RefillProperties};

/// Sentinel for an unlimited refill count.
pub const UNLIMITED_REFILLS: i32 = -1;

/// Resolved refill tunables for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefillPolicy {
    /// Maximum number of refills, [`UNLIMITED_REFILLS`] for no ceiling.
    pub max_refills: i32,
    /// Minimum seconds between refills.
    pub min_wait_time: i64,
    /// Whether to refill even when the container still holds items.
    pub refill_non_empty: bool,
    /// Whether each refill draws a fresh loot seed.
    pub randomize_loot_seed: bool,
    /// Whether players may loot again without an explicit grant.
    pub allow_reloot_by_default: bool,
}

impl RefillPolicy {
    /// Resolves the effective policy for a container.
    ///
    /// Layering: global defaults, then the table override looked up by
    /// full identifier and falling back to the bare path, then the
    /// persisted per-container override. A layer that is present
    /// replaces every field, so per-container customization survives
    /// later table-level config edits while uncustomized containers
    /// track the config on each reload.
    #[must_use]
    pub fn resolve(
        config: &RefillConfig,
        table: &Identifier,
        instance_override: Option<RefillProperties>,
    ) -> Self {
        let mut properties = config.default_properties;

        if let Some(modifier) = config
            .loot_modifiers
            .get(&table.to_string())
            .or_else(|| config.loot_modifiers.get(table.path()))
        {
            properties = *modifier;
        }

        if let Some(custom) = instance_override {
            properties = custom;
        }

        properties.into()
    }

    /// Whether the refill count is uncapped.
    #[inline]
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.max_refills == UNLIMITED_REFILLS
    }

    /// Converts the policy back into persistable properties.
    #[must_use]
    pub const fn to_properties(self) -> RefillProperties {
        RefillProperties {
            max_refills: self.max_refills,
            min_wait_time: self.min_wait_time,
            refill_non_empty: self.refill_non_empty,
            randomize_loot_seed: self.randomize_loot_seed,
            allow_reloot_by_default: self.allow_reloot_by_default,
        }
    }
}

impl From<RefillProperties> for RefillPolicy {
    fn from(properties: RefillProperties) -> Self {
        Self {
            max_refills: properties.max_refills,
            min_wait_time: properties.min_wait_time,
            refill_non_empty: properties.refill_non_empty,
            randomize_loot_seed: properties.randomize_loot_seed,
            allow_reloot_by_default: properties.allow_reloot_by_default,
        }
    }
}
