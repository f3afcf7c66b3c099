//! The reloot permission seam.
//!
//! Servers plug their permission backend in here; without one, every
//! query resolves to the fallback the engine supplies (the policy's
//! `allow_reloot_by_default`).

use rustc_hash::FxHashMap;
use uuid::Uuid;

/// Permission node checked before an actor may loot a container again.
pub const ALLOW_RELOOT_NODE: &str = "chestrefill.allowReloot";

/// A pluggable permission authority.
pub trait PermissionProvider {
    /// Checks a permission node for an actor.
    ///
    /// `default_value` is the answer when the backend has no explicit
    /// grant or denial for this actor and node.
    fn check(&self, actor: Uuid, node: &str, default_value: bool) -> bool;
}

/// Permission provider that answers the fallback for every query.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPermissions;

impl PermissionProvider for DefaultPermissions {
    fn check(&self, _actor: Uuid, _node: &str, default_value: bool) -> bool {
        default_value
    }
}

/// Permission provider backed by an explicit per-actor grant map.
///
/// Actors not in the map fall through to the default, like a server
/// permission plugin with no entry for them.
#[derive(Debug, Default, Clone)]
pub struct StaticPermissions {
    grants: FxHashMap<(Uuid, String), bool>,
}

impl StaticPermissions {
    /// Creates an empty grant map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an explicit grant or denial for an actor and node.
    pub fn set(&mut self, actor: Uuid, node: &str, granted: bool) {
        self.grants.insert((actor, node.to_string()), granted);
    }
}

impl PermissionProvider for StaticPermissions {
    fn check(&self, actor: Uuid, node: &str, default_value: bool) -> bool {
        self.grants
            .get(&(actor, node.to_string()))
            .copied()
            .unwrap_or(default_value)
    }
}
