//! Configuration file model.
//!
//! The config carries the global default refill properties plus a map
//! of per-loot-table overrides, keyed either by the full identifier
//! (`minecraft:chests/simple_dungeon`) or by the bare path
//! (`chests/simple_dungeon`).

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../package-content/chest_refill.json5");

/// Default config file location relative to the server directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/chest_refill.json5";

/// Refill tunables for one loot table or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefillProperties {
    /// Maximum number of refills after the initial loot, `-1` for unlimited.
    pub max_refills: i32,
    /// Minimum seconds between refills.
    pub min_wait_time: i64,
    /// Whether to refill even when the container still holds items.
    pub refill_non_empty: bool,
    /// Whether each refill draws a fresh loot seed.
    pub randomize_loot_seed: bool,
    /// Whether players may loot again without an explicit permission grant.
    pub allow_reloot_by_default: bool,
}

impl Default for RefillProperties {
    fn default() -> Self {
        Self {
            max_refills: -1,
            min_wait_time: 900,
            refill_non_empty: false,
            randomize_loot_seed: true,
            allow_reloot_by_default: false,
        }
    }
}

/// The full refill configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RefillConfig {
    /// Properties applied to every loot table without an override.
    pub default_properties: RefillProperties,
    /// Per-loot-table overrides, keyed by full identifier or bare path.
    pub loot_modifiers: FxHashMap<String, RefillProperties>,
}

impl RefillConfig {
    /// Loads the config from the given path, writing the packaged
    /// default file first if none exists.
    ///
    /// # Panics
    /// This function will panic if the config file cannot be read or
    /// written, or if an existing file fails to parse or validate.
    #[must_use]
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            let config_str = fs::read_to_string(path).unwrap();
            let config: RefillConfig = serde_json5::from_str(&config_str).unwrap();
            config.validate().unwrap();
            config
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, DEFAULT_CONFIG).unwrap();
            Self::default()
        }
    }

    /// Checks value ranges for the defaults and every override.
    pub fn validate(&self) -> Result<(), &'static str> {
        Self::validate_properties(&self.default_properties)?;
        for properties in self.loot_modifiers.values() {
            Self::validate_properties(properties)?;
        }
        Ok(())
    }

    fn validate_properties(properties: &RefillProperties) -> Result<(), &'static str> {
        if properties.max_refills < -1 {
            return Err("max_refills must be -1 (unlimited) or non-negative");
        }
        if properties.min_wait_time < 0 {
            return Err("min_wait_time must be non-negative");
        }
        Ok(())
    }
}
