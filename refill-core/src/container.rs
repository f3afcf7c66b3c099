//! The capability trait containers implement to be refillable.

use refill_utils::Identifier;

/// A container whose contents can be (re)generated from a loot table.
///
/// This is the seam between the engine and the host's block-entity
/// types: the engine only reads emptiness and drives the live
/// loot-table pointer and seed, it never touches item slots. Any chest,
/// barrel, or minecart type can implement this and share the refill
/// behavior.
pub trait RefillableContainer {
    /// Returns true if all item slots are empty.
    fn is_empty(&self) -> bool;

    /// The live loot-table pointer. Present until the host pops the
    /// original loot, then again whenever the engine schedules a refill.
    fn loot_table(&self) -> Option<&Identifier>;

    /// Sets the live loot-table pointer.
    fn set_loot_table(&mut self, table: Option<Identifier>);

    /// The seed the host will pass to loot generation.
    fn loot_table_seed(&self) -> i64;

    /// Sets the seed for the next loot generation.
    fn set_loot_table_seed(&mut self, seed: i64);
}

/// A minimal in-memory [`RefillableContainer`].
///
/// Tracks only what the engine observes: a filled-slot count and the
/// live pointer. Used in tests and by embedders that manage item slots
/// elsewhere.
#[derive(Debug, Default, Clone)]
pub struct SimpleLootContainer {
    loot_table: Option<Identifier>,
    loot_table_seed: i64,
    filled_slots: usize,
}

impl SimpleLootContainer {
    /// Creates an empty container with no loot table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container with a live loot table and seed.
    #[must_use]
    pub fn with_loot_table(table: Identifier, seed: i64) -> Self {
        Self {
            loot_table: Some(table),
            loot_table_seed: seed,
            filled_slots: 0,
        }
    }

    /// Sets the number of occupied item slots.
    pub fn set_filled_slots(&mut self, filled: usize) {
        self.filled_slots = filled;
    }
}

impl RefillableContainer for SimpleLootContainer {
    fn is_empty(&self) -> bool {
        self.filled_slots == 0
    }

    fn loot_table(&self) -> Option<&Identifier> {
        self.loot_table.as_ref()
    }

    fn set_loot_table(&mut self, table: Option<Identifier>) {
        self.loot_table = table;
    }

    fn loot_table_seed(&self) -> i64 {
        self.loot_table_seed
    }

    fn set_loot_table_seed(&mut self, seed: i64) {
        self.loot_table_seed = seed;
    }
}
