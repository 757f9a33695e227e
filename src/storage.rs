//! Storage for the registry's two tables
//!
//! Uses DashMap for lock-free concurrent access.

use crate::factory::AnyFactory;
use ahash::RandomState;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

/// Thread-safe provider and alias tables
///
/// - `providers`: registration name -> factory, last write wins
/// - `aliases`: capability type -> default registration name, first write wins
pub(crate) struct RegistryStorage {
    providers: DashMap<String, Arc<AnyFactory>, RandomState>,
    aliases: DashMap<TypeId, String, RandomState>,
}

/// Shard count for a given capacity hint.
///
/// Default DashMap uses num_cpus * 4 shards which is overkill for a
/// registry with a few dozen entries.
fn shard_amount(capacity: usize) -> usize {
    if capacity <= 16 {
        8
    } else if capacity <= 64 {
        16
    } else {
        32
    }
}

impl RegistryStorage {
    /// Create new empty storage.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create with pre-allocated capacity and a shard count scaled to it.
    pub fn with_capacity(capacity: usize) -> Self {
        let shards = shard_amount(capacity);
        Self {
            providers: DashMap::with_capacity_and_hasher_and_shard_amount(
                capacity,
                RandomState::new(),
                shards,
            ),
            aliases: DashMap::with_capacity_and_hasher_and_shard_amount(
                capacity,
                RandomState::new(),
                shards,
            ),
        }
    }

    /// Install a factory under a name, replacing any previous one
    #[inline]
    pub fn insert(&self, name: &str, factory: Arc<AnyFactory>) {
        self.providers.insert(name.to_owned(), factory);
    }

    /// Get a handle to the factory under a name.
    ///
    /// The shard guard is released before returning so the caller can
    /// invoke the factory while other threads (or the factory itself)
    /// read and write the table.
    #[inline]
    pub fn factory(&self, name: &str) -> Option<Arc<AnyFactory>> {
        self.providers.get(name).map(|f| Arc::clone(f.value()))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Record `name` as the default for `type_id` unless one exists.
    ///
    /// Returns true if this call created the alias.
    #[inline]
    pub fn alias_if_absent(&self, type_id: TypeId, name: &str) -> bool {
        let mut created = false;
        self.aliases.entry(type_id).or_insert_with(|| {
            created = true;
            name.to_owned()
        });
        created
    }

    /// Default registration name for a capability type
    #[inline]
    pub fn alias(&self, type_id: &TypeId) -> Option<String> {
        self.aliases.get(type_id).map(|name| name.value().clone())
    }

    /// Get number of installed factories
    #[inline]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    #[inline]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Clear both tables.
    ///
    /// Aliases go first: a concurrent resolve either misses the alias or
    /// misses the provider, and both report a missing registration.
    pub fn clear(&self) {
        self.aliases.clear();
        self.providers.clear();
    }

    /// All registration names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// (name, factory kind) pairs, sorted by name
    pub fn kinds(&self) -> Vec<(String, &'static str)> {
        let mut kinds: Vec<_> = self
            .providers
            .iter()
            .map(|r| (r.key().clone(), r.value().kind()))
            .collect();
        kinds.sort();
        kinds
    }
}

impl Default for RegistryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegistryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryStorage")
            .field("providers", &self.len())
            .field("aliases", &self.alias_count())
            .finish()
    }
}
