//! The blackboard: a thread-safe, type-heterogeneous key-value store with change callbacks.
//!
//! A [`Blackboard`] lets independent modules exchange typed values by string key without
//! knowing about each other. Every value type gets its own [`TypedStore`], created lazily
//! the first time that type is written or subscribed to. The same key string can hold one
//! value per type at the same time:
//!
//! ```rust
//! use blackboard::Blackboard;
//!
//! let board = Blackboard::new();
//! board.write("k", 1_i32);
//! board.write("k", String::from("x"));
//!
//! assert_eq!(board.read::<i32>("k").unwrap(), 1);
//! assert_eq!(board.read::<String>("k").unwrap(), "x");
//! ```
//!
//! # Callbacks
//!
//! Observers register callbacks against a (type, key) pair in one of three shapes (see
//! [`callback`]). A write raises them in key, value, pair order before it returns.
//! Wipes never raise callbacks.
//!
//! # Locking
//!
//! A single mutex serializes the whole board across all types and keys. Every operation
//! holds it for its full duration, including the callbacks a write raises. A callback
//! therefore sees a consistent board, blocks every other caller while it runs, and must
//! never call back into the board that invoked it: a reentrant call deadlocks.
//!
//! A callback that panics unwinds out of the `write` that raised it. The value stays
//! committed and the board stays usable.

pub mod callback;
pub mod error;
pub mod store;
pub mod type_registry;

use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use log::{debug, trace};

pub use callback::{Callback, KeyCallback, PairCallback, Shape, Subscription, ValueCallback};
pub use error::{Error, Result};
pub use store::TypedStore;
pub use type_registry::{TypeId, TypeInfo, TypeRegistry};

use store::ErasedStore;

/// Marker trait for types that can be stored on a blackboard.
///
/// Values are cloned out on [`Blackboard::read`], and must be sendable because the
/// board can be shared between threads. Implemented for every qualifying type.
pub trait Value: 'static + Send + Clone {}

impl<T: 'static + Send + Clone> Value for T {}

/// Construction options for a [`Blackboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix for every log line emitted by the board.
    pub label: String,

    /// Number of value types to reserve room for up front.
    pub type_capacity: usize,

    /// Number of keys each new typed store reserves room for.
    pub key_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label: String::from("blackboard"),
            type_capacity: 0,
            key_capacity: 0,
        }
    }
}

impl Config {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_type_capacity(mut self, capacity: usize) -> Self {
        self.type_capacity = capacity;
        self
    }

    pub fn with_key_capacity(mut self, capacity: usize) -> Self {
        self.key_capacity = capacity;
        self
    }
}

/// Typed stores keyed by value type. Only ever touched under the board's lock.
struct Stores {
    stores: HashMap<TypeId, Box<dyn ErasedStore>>,
    key_capacity: usize,
}

impl Stores {
    /// Returns the store for `T`, creating it if this is the first use of `T`.
    fn get_or_insert<T: Value>(&mut self, label: &str) -> &mut TypedStore<T> {
        let id = type_registry::resolve::<T>();
        let key_capacity = self.key_capacity;
        let store = self.stores.entry(id).or_insert_with(|| {
            debug!(
                "{label}: created store {id} for '{}'",
                std::any::type_name::<T>()
            );
            Box::new(TypedStore::<T>::with_capacity(key_capacity))
        });
        match store.as_any_mut().downcast_mut::<TypedStore<T>>() {
            Some(store) => store,
            None => unreachable!(
                "store {id} does not hold '{}'",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Returns the store for `T`, or `TypeNotRegistered` if `T` was never used.
    fn get<T: Value>(&self) -> Result<&TypedStore<T>> {
        type_registry::global()
            .get::<T>()
            .and_then(|id| self.stores.get(&id))
            .and_then(|store| store.as_any().downcast_ref::<TypedStore<T>>())
            .ok_or_else(Error::type_not_registered::<T>)
    }

    fn get_mut<T: Value>(&mut self) -> Result<&mut TypedStore<T>> {
        type_registry::global()
            .get::<T>()
            .and_then(|id| self.stores.get_mut(&id))
            .and_then(|store| store.as_any_mut().downcast_mut::<TypedStore<T>>())
            .ok_or_else(Error::type_not_registered::<T>)
    }
}

/// A process-local, thread-safe, type-heterogeneous key-value store.
///
/// Share between threads with an `Arc<Blackboard>`. Dropping the board drops every
/// typed store, value and callback it owns.
pub struct Blackboard {
    config: Config,
    stores: Mutex<Stores>,
}

impl Blackboard {
    /// Creates an empty blackboard with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty blackboard with the given [`Config`].
    pub fn with_config(config: Config) -> Self {
        let stores = Stores {
            stores: HashMap::with_capacity(config.type_capacity),
            key_capacity: config.key_capacity,
        };
        Self {
            config,
            stores: Mutex::new(stores),
        }
    }

    /// The configuration the board was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Acquires the board lock.
    ///
    /// A panicking callback poisons the mutex while unwinding out of `write`. The value
    /// it was notified about is already committed, so the guarded state is consistent
    /// and the poison is discarded.
    fn lock(&self) -> MutexGuard<'_, Stores> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Values ====================

    /// Writes `value` at `key` and raises the callbacks registered for `(T, key)`.
    ///
    /// Equivalent to [`write_with(key, value, true)`](Self::write_with).
    ///
    /// # Reentrancy
    ///
    /// Callbacks run with the board locked. A callback that calls back into this board
    /// deadlocks.
    pub fn write<T: Value>(&self, key: impl Into<String>, value: T) {
        self.write_with(key, value, true);
    }

    /// Writes `value` at `key`, raising callbacks only if `raise_callbacks` is set.
    ///
    /// Creates the store for `T` on first use. The value is committed before any callback
    /// runs; a panicking callback propagates to the caller and skips the callbacks after it.
    pub fn write_with<T: Value>(&self, key: impl Into<String>, value: T, raise_callbacks: bool) {
        let key = key.into();
        let label = self.config.label.as_str();
        let mut stores = self.lock();
        let store = stores.get_or_insert::<T>(label);
        let replaced = store.set(key.as_str(), value);
        trace!(
            "{label}: {} '{key}' as '{}'",
            if replaced { "overwrote" } else { "inserted" },
            std::any::type_name::<T>()
        );
        if raise_callbacks {
            store.notify(&key);
        }
    }

    /// Returns a clone of the value of type `T` at `key`.
    ///
    /// Fails with [`Error::TypeNotRegistered`] if `T` was never written or subscribed to,
    /// and with [`Error::KeyNotFound`] if `key` holds no `T`.
    pub fn read<T: Value>(&self, key: &str) -> Result<T> {
        self.read_with::<T, T>(key, T::clone)
    }

    /// Runs `f` against the value of type `T` at `key` without cloning it.
    ///
    /// `f` runs with the board locked and must not call back into the board.
    pub fn read_with<T: Value, R>(&self, key: &str, f: impl FnOnce(&T) -> R) -> Result<R> {
        let stores = self.lock();
        let value = stores.get::<T>()?.get(key)?;
        Ok(f(value))
    }

    /// Returns `true` if `key` holds a value of type `T`.
    pub fn contains<T: Value>(&self, key: &str) -> bool {
        self.lock()
            .get::<T>()
            .is_ok_and(|store| store.contains(key))
    }

    /// Keys holding a value of type `T`, sorted.
    pub fn keys<T: Value>(&self) -> Result<Vec<String>> {
        let stores = self.lock();
        let mut keys: Vec<String> = stores.get::<T>()?.keys().map(str::to_owned).collect();
        keys.sort_unstable();
        Ok(keys)
    }

    /// Removes the value of type `T` at `key`. Values of other types under `key` are kept.
    ///
    /// Fails with [`Error::TypeNotRegistered`] if `T` has no store. A missing key is not
    /// an error.
    pub fn wipe_type_key<T: Value>(&self, key: &str) -> Result<()> {
        let mut stores = self.lock();
        if stores.get_mut::<T>()?.remove_key(key) {
            trace!(
                "{}: wiped '{key}' as '{}'",
                self.config.label,
                std::any::type_name::<T>()
            );
        }
        Ok(())
    }

    /// Removes the value at `key` from every type's store.
    pub fn wipe_key(&self, key: &str) {
        let mut stores = self.lock();
        let wiped = stores
            .stores
            .values_mut()
            .map(|store| store.wipe_key(key))
            .filter(|wiped| *wiped)
            .count();
        trace!("{}: wiped '{key}' from {wiped} stores", self.config.label);
    }

    /// Removes every value from every store, and every callback too if `wipe_callbacks`.
    ///
    /// Stores themselves survive, so types stay registered.
    pub fn wipe_board(&self, wipe_callbacks: bool) {
        let mut stores = self.lock();
        for store in stores.stores.values_mut() {
            store.wipe_all();
            if wipe_callbacks {
                store.clear_callbacks();
            }
        }
        debug!(
            "{}: wiped board (callbacks {})",
            self.config.label,
            if wipe_callbacks { "cleared" } else { "kept" }
        );
    }

    // ==================== Callbacks ====================

    /// Registers `callback` for `(T, key)`, replacing any callback of the same shape.
    ///
    /// Creates the store for `T` on first use, so subscribing before any write is legal.
    pub fn subscribe<T: Value>(&self, key: impl Into<String>, callback: Callback<T>) {
        let key = key.into();
        let shape = callback.shape();
        let label = self.config.label.as_str();
        let mut stores = self.lock();
        let replaced = stores.get_or_insert::<T>(label).set_callback(key.as_str(), callback);
        trace!(
            "{label}: {} {shape} callback on '{key}' as '{}'",
            if replaced { "replaced" } else { "registered" },
            std::any::type_name::<T>()
        );
    }

    /// Registers a callback receiving the written key.
    pub fn subscribe_key<T: Value>(
        &self,
        key: impl Into<String>,
        f: impl FnMut(&str) + Send + 'static,
    ) {
        self.subscribe::<T>(key, Callback::key(f));
    }

    /// Registers a callback receiving the written value.
    pub fn subscribe_value<T: Value>(
        &self,
        key: impl Into<String>,
        f: impl FnMut(&T) + Send + 'static,
    ) {
        self.subscribe::<T>(key, Callback::value(f));
    }

    /// Registers a callback receiving the written key and value.
    pub fn subscribe_pair<T: Value>(
        &self,
        key: impl Into<String>,
        f: impl FnMut(&str, &T) + Send + 'static,
    ) {
        self.subscribe::<T>(key, Callback::pair(f));
    }

    /// Returns `true` if any callback is registered for `(T, key)`.
    pub fn is_subscribed<T: Value>(&self, key: &str) -> bool {
        self.lock()
            .get::<T>()
            .is_ok_and(|store| store.is_subscribed(key))
    }

    /// Removes every callback registered for `(T, key)`.
    ///
    /// Fails with [`Error::TypeNotRegistered`] if `T` has no store.
    pub fn unsubscribe<T: Value>(&self, key: &str) -> Result<()> {
        let mut stores = self.lock();
        stores.get_mut::<T>()?.remove_callbacks(key);
        trace!(
            "{}: unsubscribed '{key}' as '{}'",
            self.config.label,
            std::any::type_name::<T>()
        );
        Ok(())
    }

    /// Removes every callback registered for `key` across every type.
    pub fn unsubscribe_all(&self, key: &str) {
        let mut stores = self.lock();
        for store in stores.stores.values_mut() {
            store.unsubscribe(key);
        }
        trace!("{}: unsubscribed '{key}' from all types", self.config.label);
    }

    // ==================== Introspection ====================

    /// Returns `true` if a store exists for `T`.
    pub fn is_registered<T: Value>(&self) -> bool {
        self.lock().get::<T>().is_ok()
    }

    /// Number of typed stores. Never decreases.
    pub fn type_count(&self) -> usize {
        self.lock().stores.len()
    }

    /// Total number of values across all types.
    pub fn len(&self) -> usize {
        self.lock()
            .stores
            .values()
            .map(|store| store.value_count())
            .sum()
    }

    /// Returns `true` if no values are stored, regardless of registered types or callbacks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blackboard")
            .field("label", &self.config.label)
            .field("types", &self.type_count())
            .field("values", &self.len())
            .finish()
    }
}
