//! Process-wide identity for stored value types.
//!
//! This module provides [`TypeRegistry`], a thread-safe registry that hands out a dense
//! numeric [`TypeId`] for every value type that reaches a blackboard. The identity is
//! derived from [`std::any::TypeId`], which the compiler guarantees to be unique per
//! type, so two unrelated types can never alias onto the same typed store.
//!
//! # Stability
//!
//! Ids are assigned in first-use order and are stable for the lifetime of the process.
//! They carry no meaning across processes or across runs.
//!
//! # Thread Safety
//!
//! The registry uses lock-free reads via `DashMap` and minimal locking for writes. All
//! blackboards in a process share the [`global`] registry, so the same type resolves to
//! the same id regardless of which board asks.
//!
//! # Example
//!
//! ```rust
//! use blackboard::board::type_registry;
//!
//! let a = type_registry::resolve::<i32>();
//! let b = type_registry::resolve::<String>();
//!
//! assert_ne!(a, b);
//! assert_eq!(a, type_registry::resolve::<i32>());
//! ```

use std::{
    any::TypeId as StdTypeId,
    fmt,
    sync::{
        LazyLock, PoisonError, RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

/// A process-stable identifier for a stored value type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    /// Construct a new Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this ID for use in indexable storage.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TypeId {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata about a registered value type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// The dense type ID.
    id: TypeId,

    /// The Rust TypeId for runtime type checking.
    type_id: StdTypeId,

    /// The type's name, for diagnostics only.
    name: &'static str,
}

impl TypeInfo {
    fn new<T: 'static>(id: TypeId) -> Self {
        Self {
            id,
            type_id: StdTypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Get the type ID.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Get the Rust TypeId.
    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }

    /// Get the type name as reported by [`std::any::type_name`].
    ///
    /// Names are not guaranteed unique and are never used for identity.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A thread-safe registry mapping Rust types to dense [`TypeId`]s.
pub struct TypeRegistry {
    /// Map from Rust TypeId to our Id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<StdTypeId, TypeId>,

    /// Registered type entries, indexed by id. Protected by RwLock for rare writes.
    types: RwLock<Vec<Option<TypeInfo>>>,

    /// Next available type identifier.
    next_id: AtomicU32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a new, empty type registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            types: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Resolve the id for `T`, registering it on first use.
    ///
    /// Never fails, and always returns the same id for the same type.
    pub fn register<T: 'static>(&self) -> TypeId {
        let std_type_id = StdTypeId::of::<T>();

        // Fast path: already registered (lock-free read)
        if let Some(existing) = self.type_map.get(&std_type_id) {
            return *existing;
        }

        // Slow path: the entry API settles races between registering threads
        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::Entry::Vacant(vacant) => {
                let id_value = self.next_id.fetch_add(1, Ordering::Relaxed);
                let id = TypeId(id_value);

                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let index = id.index();
                if index >= types.len() {
                    types.resize(index + 1, None);
                }
                types[index] = Some(TypeInfo::new::<T>(id));
                vacant.insert(id);

                id
            }
        }
    }

    /// Get the ID for a type, if registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<TypeId> {
        self.type_map
            .get(&StdTypeId::of::<T>())
            .map(|entry| *entry.value())
    }

    /// Get the metadata for a registered id.
    pub fn info(&self, id: TypeId) -> Option<TypeInfo> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.index()).copied().flatten()
    }

    /// Number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_map.len()
    }

    /// Whether no types have been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_map.is_empty()
    }
}

static GLOBAL: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::new);

/// The registry shared by every blackboard in the process.
#[inline]
pub fn global() -> &'static TypeRegistry {
    &GLOBAL
}

/// Resolve the process-stable id of `T` through the [`global`] registry.
#[inline]
pub fn resolve<T: 'static>() -> TypeId {
    GLOBAL.register::<T>()
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    struct Position;
    struct Velocity;

    #[test]
    fn register_assigns_sequential_ids() {
        let registry = TypeRegistry::new();

        let a = registry.register::<Position>();
        let b = registry.register::<Velocity>();

        assert_eq!(a, TypeId::new(0));
        assert_eq!(b, TypeId::new(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_is_idempotent() {
        let registry = TypeRegistry::new();

        let first = registry.register::<Position>();
        let second = registry.register::<Position>();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_returns_none_for_unknown_type() {
        let registry = TypeRegistry::new();

        assert!(registry.get::<Position>().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn info_reports_type_name() {
        let registry = TypeRegistry::new();
        let id = registry.register::<String>();

        let info = registry.info(id).unwrap();

        assert_eq!(info.id(), id);
        assert_eq!(info.type_id(), StdTypeId::of::<String>());
        assert!(info.name().ends_with("String"));
    }

    #[test]
    fn info_returns_none_for_unassigned_id() {
        let registry = TypeRegistry::new();

        assert!(registry.info(TypeId::new(7)).is_none());
    }

    #[test]
    fn same_named_types_in_different_modules_do_not_alias() {
        mod a {
            pub struct Item;
        }
        mod b {
            pub struct Item;
        }
        let registry = TypeRegistry::new();

        assert_ne!(registry.register::<a::Item>(), registry.register::<b::Item>());
    }

    #[test]
    fn concurrent_registration_yields_one_id() {
        let registry = Arc::new(TypeRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.register::<Position>())
            })
            .collect();
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolve_is_stable_through_global_registry() {
        assert_eq!(resolve::<u64>(), resolve::<u64>());
        assert_ne!(resolve::<u64>(), resolve::<i64>());
        assert_eq!(global().get::<u64>(), Some(resolve::<u64>()));
    }
}
