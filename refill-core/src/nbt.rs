//! NBT persistence of the refill record.
//!
//! The record lives in a `ChestRefill` compound inside the container's
//! save blob, and is only written once the original loot has actually
//! been popped; an untouched container persists nothing extra.

use rustc_hash::FxHashSet;
use simdnbt::owned::{NbtCompound, NbtList, NbtTag};
use thiserror::Error;
use uuid::Uuid;

use refill_utils::{Identifier, IdentifierError};

use crate::config::{RefillConfig, RefillProperties};
use crate::container::RefillableContainer;
use crate::policy::RefillPolicy;
use crate::record::LootRecord;

/// Sub-compound holding the refill record.
pub const REFILL_TAG: &str = "ChestRefill";

/// Error produced when a persisted refill record cannot be read.
///
/// Per-container and recoverable: the host should log it and load the
/// rest of the world normally, treating this container as never looted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecordError {
    /// The `ChestRefill` compound carries no usable saved table.
    #[error("refill record has no SavedLootTable")]
    MissingSavedTable,
    /// A loot-table reference failed to parse.
    #[error("invalid loot table reference: {0}")]
    BadTableRef(#[from] IdentifierError),
}

/// Reads the refill record out of a container's save blob.
///
/// When no `ChestRefill` compound is present but the container carries
/// a live loot-table pointer, that pointer is promoted to the saved
/// table with empty history, so pre-existing worlds pick up refill
/// behavior on first load. The effective policy is resolved here, from
/// the given config plus any persisted per-container override.
pub fn load_record<C>(
    nbt: &NbtCompound,
    container: &C,
    config: &RefillConfig,
) -> Result<LootRecord, MalformedRecordError>
where
    C: RefillableContainer + ?Sized,
{
    let Some(NbtTag::Compound(refill_tag)) = nbt.get(REFILL_TAG) else {
        return Ok(promote_live_pointer(container, config));
    };

    let saved_str =
        nbt_string(refill_tag, "SavedLootTable").ok_or(MalformedRecordError::MissingSavedTable)?;
    let saved_table: Identifier = saved_str.parse()?;

    let mut looted_by = FxHashSet::default();
    if let Some(NbtTag::List(NbtList::String(uuids))) = refill_tag.get("LootedUUIDs") {
        for raw in uuids {
            let raw = raw.to_string();
            match Uuid::parse_str(&raw) {
                Ok(uuid) => {
                    looted_by.insert(uuid);
                }
                Err(_) => {
                    log::warn!("Skipping malformed looter UUID `{raw}` in refill record");
                }
            }
        }
    }

    let instance_override = match refill_tag.get("CustomValues") {
        Some(NbtTag::Compound(custom)) => Some(read_properties(custom)),
        _ => None,
    };

    let policy = RefillPolicy::resolve(config, &saved_table, instance_override);

    Ok(LootRecord {
        saved_table: Some(saved_table),
        saved_seed: nbt_i64(refill_tag, "SavedLootTableSeed").unwrap_or(0),
        looted_by,
        refill_count: nbt_i32(refill_tag, "RefillCounter").unwrap_or(0),
        last_refill_time: nbt_i64(refill_tag, "LastRefillTime").unwrap_or(0),
        policy,
        has_instance_override: instance_override.is_some(),
    })
}

/// Like [`load_record`], but degrades instead of failing: a malformed
/// record is logged and replaced by a fresh never-looted one, so a
/// single bad container cannot abort world load.
pub fn load_record_or_default<C>(
    nbt: &NbtCompound,
    container: &C,
    config: &RefillConfig,
) -> LootRecord
where
    C: RefillableContainer + ?Sized,
{
    match load_record(nbt, container, config) {
        Ok(record) => record,
        Err(err) => {
            log::warn!("Dropping refill record: {err}");
            LootRecord::new(config.default_properties.into())
        }
    }
}

/// Serializes the refill record, or `None` while the original loot has
/// not been popped yet (live pointer still set, or no saved table).
pub fn save_record<C>(record: &LootRecord, container: &C) -> Option<NbtCompound>
where
    C: RefillableContainer + ?Sized,
{
    if container.loot_table().is_some() {
        return None;
    }
    let saved_table = record.saved_table()?;

    let mut refill_tag = NbtCompound::new();
    refill_tag.insert(
        "SavedLootTable",
        NbtTag::String(saved_table.to_string().into()),
    );
    refill_tag.insert("SavedLootTableSeed", record.saved_seed());
    refill_tag.insert("RefillCounter", record.refill_count());
    refill_tag.insert("LastRefillTime", record.last_refill_time());

    let uuids: Vec<simdnbt::Mutf8String> = record
        .looted_by
        .iter()
        .map(|uuid| uuid.to_string().into())
        .collect();
    refill_tag.insert("LootedUUIDs", NbtTag::List(NbtList::String(uuids)));

    if record.has_instance_override() {
        let properties = record.policy().to_properties();
        let mut custom = NbtCompound::new();
        custom.insert(
            "RandomizeLootSeed",
            NbtTag::Byte(i8::from(properties.randomize_loot_seed)),
        );
        custom.insert(
            "RefillNonEmpty",
            NbtTag::Byte(i8::from(properties.refill_non_empty)),
        );
        custom.insert(
            "AllowReloot",
            NbtTag::Byte(i8::from(properties.allow_reloot_by_default)),
        );
        custom.insert("MaxRefills", properties.max_refills);
        custom.insert("MinWaitTime", properties.min_wait_time);
        refill_tag.insert("CustomValues", NbtTag::Compound(custom));
    }

    Some(refill_tag)
}

/// Restores the container's live loot-table pointer from the host-level
/// `LootTable` / `LootTableSeed` tags. Returns whether a pointer was
/// present.
pub fn try_load_loot_table<C>(
    nbt: &NbtCompound,
    container: &mut C,
) -> Result<bool, MalformedRecordError>
where
    C: RefillableContainer + ?Sized,
{
    let Some(raw) = nbt_string(nbt, "LootTable") else {
        return Ok(false);
    };
    let table: Identifier = raw.parse()?;
    container.set_loot_table(Some(table));
    container.set_loot_table_seed(nbt_i64(nbt, "LootTableSeed").unwrap_or(0));
    Ok(true)
}

/// Writes the refill record and the host-level loot-table tags into the
/// container's save blob. Returns whether a live pointer was written.
pub fn try_save_loot_table<C>(record: &LootRecord, container: &C, nbt: &mut NbtCompound) -> bool
where
    C: RefillableContainer + ?Sized,
{
    if let Some(refill_tag) = save_record(record, container) {
        nbt.insert(REFILL_TAG, NbtTag::Compound(refill_tag));
    }

    let Some(table) = container.loot_table() else {
        return false;
    };
    nbt.insert("LootTable", NbtTag::String(table.to_string().into()));
    let seed = container.loot_table_seed();
    if seed != 0 {
        nbt.insert("LootTableSeed", seed);
    }
    true
}

fn promote_live_pointer<C>(container: &C, config: &RefillConfig) -> LootRecord
where
    C: RefillableContainer + ?Sized,
{
    if let Some(table) = container.loot_table() {
        let mut record = LootRecord::new(RefillPolicy::resolve(config, table, None));
        record.saved_table = Some(table.clone());
        record.saved_seed = container.loot_table_seed();
        record
    } else {
        LootRecord::new(config.default_properties.into())
    }
}

fn read_properties(custom: &NbtCompound) -> RefillProperties {
    // Absent sub-keys fall back to type-appropriate zero values.
    RefillProperties {
        max_refills: nbt_i32(custom, "MaxRefills").unwrap_or(0),
        min_wait_time: nbt_i64(custom, "MinWaitTime").unwrap_or(0),
        refill_non_empty: nbt_bool(custom, "RefillNonEmpty").unwrap_or(false),
        randomize_loot_seed: nbt_bool(custom, "RandomizeLootSeed").unwrap_or(false),
        allow_reloot_by_default: nbt_bool(custom, "AllowReloot").unwrap_or(false),
    }
}

fn nbt_string(nbt: &NbtCompound, key: &str) -> Option<String> {
    match nbt.get(key)? {
        NbtTag::String(s) => Some(s.to_string()),
        _ => None,
    }
}

fn nbt_i32(nbt: &NbtCompound, key: &str) -> Option<i32> {
    match nbt.get(key)? {
        NbtTag::Byte(b) => Some(i32::from(*b)),
        NbtTag::Short(s) => Some(i32::from(*s)),
        NbtTag::Int(i) => Some(*i),
        _ => None,
    }
}

fn nbt_i64(nbt: &NbtCompound, key: &str) -> Option<i64> {
    match nbt.get(key)? {
        NbtTag::Byte(b) => Some(i64::from(*b)),
        NbtTag::Short(s) => Some(i64::from(*s)),
        NbtTag::Int(i) => Some(i64::from(*i)),
        NbtTag::Long(l) => Some(*l),
        _ => None,
    }
}

fn nbt_bool(nbt: &NbtCompound, key: &str) -> Option<bool> {
    match nbt.get(key)? {
        NbtTag::Byte(b) => Some(*b != 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::SimpleLootContainer;
    use crate::engine::{RefillAction, RefillEngine};
    use crate::permission::DefaultPermissions;
    use refill_utils::Xoroshiro;

    const DUNGEON: &str = "chests/simple_dungeon";

    fn dungeon() -> Identifier {
        Identifier::vanilla_static(DUNGEON)
    }

    fn popped_record(config: &RefillConfig) -> (LootRecord, SimpleLootContainer) {
        let mut record = LootRecord::new(RefillPolicy::resolve(config, &dungeon(), None));
        let mut container = SimpleLootContainer::with_loot_table(dungeon(), 1234);
        let engine = RefillEngine::new(&DefaultPermissions);
        let mut rng = Xoroshiro::from_seed(0);
        let action = engine.on_access(
            &mut record,
            &mut container,
            Some(Uuid::new_v4()),
            1000,
            &mut rng,
        );
        assert_eq!(action, RefillAction::PopOriginal);
        container.set_loot_table(None);
        (record, container)
    }

    #[test]
    fn untouched_container_persists_nothing() {
        let config = RefillConfig::default();
        let record = LootRecord::new(config.default_properties.into());
        let container = SimpleLootContainer::with_loot_table(dungeon(), 1234);

        // Live pointer still set: the vanilla tags say everything.
        assert!(save_record(&record, &container).is_none());

        let mut nbt = NbtCompound::new();
        assert!(try_save_loot_table(&record, &container, &mut nbt));
        assert!(matches!(nbt.get("LootTable"), Some(NbtTag::String(_))));
        assert!(nbt.get(REFILL_TAG).is_none());
    }

    #[test]
    fn record_without_saved_table_persists_nothing() {
        let config = RefillConfig::default();
        let record = LootRecord::new(config.default_properties.into());
        let container = SimpleLootContainer::new();
        assert!(save_record(&record, &container).is_none());

        let mut nbt = NbtCompound::new();
        assert!(!try_save_loot_table(&record, &container, &mut nbt));
        assert!(nbt.get("LootTable").is_none());
    }

    #[test]
    fn round_trip_preserves_record() {
        let config = RefillConfig::default();
        let (record, container) = popped_record(&config);

        let mut nbt = NbtCompound::new();
        try_save_loot_table(&record, &container, &mut nbt);
        let restored = load_record(&nbt, &container, &config).unwrap();

        assert_eq!(restored, record);
    }

    #[test]
    fn round_trip_preserves_custom_values() {
        let config = RefillConfig::default();
        let (mut record, container) = popped_record(&config);
        record.set_instance_override(RefillProperties {
            max_refills: 4,
            min_wait_time: 120,
            refill_non_empty: true,
            randomize_loot_seed: false,
            allow_reloot_by_default: true,
        });

        let mut nbt = NbtCompound::new();
        try_save_loot_table(&record, &container, &mut nbt);
        let restored = load_record(&nbt, &container, &config).unwrap();

        assert!(restored.has_instance_override());
        assert_eq!(restored, record);
    }

    #[test]
    fn instance_override_survives_config_change() {
        let config = RefillConfig::default();
        let (mut record, container) = popped_record(&config);
        record.set_instance_override(RefillProperties {
            max_refills: 4,
            min_wait_time: 120,
            refill_non_empty: false,
            randomize_loot_seed: false,
            allow_reloot_by_default: false,
        });

        let mut nbt = NbtCompound::new();
        try_save_loot_table(&record, &container, &mut nbt);

        // The table config changes between save and load; the persisted
        // per-container values still win.
        let mut changed = RefillConfig::default();
        changed.loot_modifiers.insert(
            "minecraft:chests/simple_dungeon".to_string(),
            RefillProperties {
                max_refills: 99,
                ..RefillProperties::default()
            },
        );
        let restored = load_record(&nbt, &container, &changed).unwrap();
        assert_eq!(restored.policy().max_refills, 4);
        assert_eq!(restored.policy().min_wait_time, 120);
    }

    #[test]
    fn uncustomized_record_tracks_latest_config() {
        let config = RefillConfig::default();
        let (record, container) = popped_record(&config);

        let mut nbt = NbtCompound::new();
        try_save_loot_table(&record, &container, &mut nbt);

        let mut changed = RefillConfig::default();
        changed.loot_modifiers.insert(
            "minecraft:chests/simple_dungeon".to_string(),
            RefillProperties {
                max_refills: 7,
                ..RefillProperties::default()
            },
        );
        let restored = load_record(&nbt, &container, &changed).unwrap();
        assert_eq!(restored.policy().max_refills, 7);
        assert!(!restored.has_instance_override());
    }

    #[test]
    fn absent_subkeys_default_to_zero() {
        let mut refill_tag = NbtCompound::new();
        refill_tag.insert(
            "SavedLootTable",
            NbtTag::String("minecraft:chests/simple_dungeon".to_string().into()),
        );
        let mut nbt = NbtCompound::new();
        nbt.insert(REFILL_TAG, NbtTag::Compound(refill_tag));

        let config = RefillConfig::default();
        let container = SimpleLootContainer::new();
        let record = load_record(&nbt, &container, &config).unwrap();

        assert_eq!(record.saved_table(), Some(&dungeon()));
        assert_eq!(record.saved_seed(), 0);
        assert_eq!(record.refill_count(), 0);
        assert_eq!(record.last_refill_time(), 0);
        assert_eq!(record.looter_count(), 0);
        assert!(!record.has_instance_override());
    }

    #[test]
    fn missing_saved_table_is_an_error() {
        let refill_tag = NbtCompound::new();
        let mut nbt = NbtCompound::new();
        nbt.insert(REFILL_TAG, NbtTag::Compound(refill_tag));

        let config = RefillConfig::default();
        let container = SimpleLootContainer::new();
        assert_eq!(
            load_record(&nbt, &container, &config),
            Err(MalformedRecordError::MissingSavedTable)
        );
    }

    #[test]
    fn malformed_saved_table_is_an_error() {
        let mut refill_tag = NbtCompound::new();
        refill_tag.insert("SavedLootTable", NbtTag::String(String::new().into()));
        let mut nbt = NbtCompound::new();
        nbt.insert(REFILL_TAG, NbtTag::Compound(refill_tag));

        let config = RefillConfig::default();
        let container = SimpleLootContainer::new();
        assert!(matches!(
            load_record(&nbt, &container, &config),
            Err(MalformedRecordError::BadTableRef(_))
        ));
    }

    #[test]
    fn malformed_looter_uuid_is_skipped() {
        let good = Uuid::new_v4();
        let mut refill_tag = NbtCompound::new();
        refill_tag.insert(
            "SavedLootTable",
            NbtTag::String("minecraft:chests/simple_dungeon".to_string().into()),
        );
        refill_tag.insert(
            "LootedUUIDs",
            NbtTag::List(NbtList::String(vec![
                good.to_string().into(),
                "not-a-uuid".to_string().into(),
            ])),
        );
        let mut nbt = NbtCompound::new();
        nbt.insert(REFILL_TAG, NbtTag::Compound(refill_tag));

        let config = RefillConfig::default();
        let container = SimpleLootContainer::new();
        let record = load_record(&nbt, &container, &config).unwrap();
        assert_eq!(record.looter_count(), 1);
        assert!(record.has_looted(good));
    }

    #[test]
    fn lenient_load_degrades_to_fresh_record() {
        let mut refill_tag = NbtCompound::new();
        refill_tag.insert("SavedLootTable", NbtTag::String(String::new().into()));
        let mut nbt = NbtCompound::new();
        nbt.insert(REFILL_TAG, NbtTag::Compound(refill_tag));

        let config = RefillConfig::default();
        let container = SimpleLootContainer::new();
        let record = load_record_or_default(&nbt, &container, &config);
        assert!(record.saved_table().is_none());
        assert_eq!(record.looter_count(), 0);
    }

    #[test]
    fn absent_tag_promotes_live_pointer() {
        let config = RefillConfig::default();
        let container = SimpleLootContainer::with_loot_table(dungeon(), 77);
        let nbt = NbtCompound::new();

        let record = load_record(&nbt, &container, &config).unwrap();
        assert_eq!(record.saved_table(), Some(&dungeon()));
        assert_eq!(record.saved_seed(), 77);
        assert_eq!(record.looter_count(), 0);
        assert_eq!(record.refill_count(), 0);
    }

    #[test]
    fn absent_tag_without_pointer_gives_fresh_record() {
        let config = RefillConfig::default();
        let container = SimpleLootContainer::new();
        let nbt = NbtCompound::new();

        let record = load_record(&nbt, &container, &config).unwrap();
        assert!(record.saved_table().is_none());
        assert_eq!(
            *record.policy(),
            RefillPolicy::from(config.default_properties)
        );
    }

    #[test]
    fn live_pointer_tags_round_trip() {
        let config = RefillConfig::default();
        let record = LootRecord::new(config.default_properties.into());
        let container = SimpleLootContainer::with_loot_table(dungeon(), 42);

        let mut nbt = NbtCompound::new();
        assert!(try_save_loot_table(&record, &container, &mut nbt));

        let mut restored = SimpleLootContainer::new();
        assert!(try_load_loot_table(&nbt, &mut restored).unwrap());
        assert_eq!(restored.loot_table(), Some(&dungeon()));
        assert_eq!(restored.loot_table_seed(), 42);
    }

    #[test]
    fn zero_seed_tag_is_elided() {
        let config = RefillConfig::default();
        let record = LootRecord::new(config.default_properties.into());
        let container = SimpleLootContainer::with_loot_table(dungeon(), 0);

        let mut nbt = NbtCompound::new();
        assert!(try_save_loot_table(&record, &container, &mut nbt));
        assert!(nbt.get("LootTableSeed").is_none());

        let mut restored = SimpleLootContainer::new();
        assert!(try_load_loot_table(&nbt, &mut restored).unwrap());
        assert_eq!(restored.loot_table_seed(), 0);
    }

    #[test]
    fn malformed_live_pointer_is_an_error() {
        let mut nbt = NbtCompound::new();
        nbt.insert("LootTable", NbtTag::String("Not Valid".to_string().into()));

        let mut container = SimpleLootContainer::new();
        assert!(try_load_loot_table(&nbt, &mut container).is_err());
        assert!(container.loot_table().is_none());
    }
}
