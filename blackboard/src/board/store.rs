//! Per-type value storage.
//!
//! A [`TypedStore<T>`] owns every value of type `T` on a blackboard, keyed by string,
//! along with the [`Subscription`]s watching those keys. The blackboard keeps one store
//! per value type behind the [`ErasedStore`] trait and downcasts back to the concrete
//! `TypedStore<T>` when a typed operation needs it.
//!
//! Stores are not synchronized themselves. Every method is called with the owning
//! blackboard's lock held.

use std::{any::Any, collections::HashMap};

use crate::board::{
    Value,
    callback::{Callback, Subscription},
    error::{Error, Result},
};

/// Values and subscriptions for a single value type.
pub struct TypedStore<T: Value> {
    /// Current value for each key.
    values: HashMap<String, T>,

    /// Callbacks for each key, at most one per shape.
    subscriptions: HashMap<String, Subscription<T>>,
}

impl<T: Value> TypedStore<T> {
    /// Creates an empty store.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty store with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
            subscriptions: HashMap::new(),
        }
    }

    /// Inserts or overwrites the value at `key`, returning `true` if a value was replaced.
    pub fn set(&mut self, key: impl Into<String>, value: T) -> bool {
        self.values.insert(key.into(), value).is_some()
    }

    /// Returns the current value at `key`.
    pub fn get(&self, key: &str) -> Result<&T> {
        self.values
            .get(key)
            .ok_or_else(|| Error::key_not_found::<T>(key))
    }

    /// Returns `true` if `key` holds a value.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Erases the value at `key`. Absent keys are not an error.
    pub fn remove_key(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Erases every value. Subscriptions are untouched.
    pub fn clear_values(&mut self) {
        self.values.clear();
    }

    /// Number of keys holding a value.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys holding a value, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Registers `callback` for `key`, replacing any callback of the same shape.
    ///
    /// Returns `true` if a callback was replaced.
    pub fn set_callback(&mut self, key: impl Into<String>, callback: Callback<T>) -> bool {
        self.subscriptions
            .entry(key.into())
            .or_default()
            .set(callback)
    }

    /// Returns `true` if any callback is registered for `key`.
    pub fn is_subscribed(&self, key: &str) -> bool {
        self.subscriptions
            .get(key)
            .is_some_and(|sub| !sub.is_empty())
    }

    /// Removes every callback registered for `key`.
    pub fn remove_callbacks(&mut self, key: &str) -> bool {
        self.subscriptions.remove(key).is_some()
    }

    /// Removes every callback for every key.
    pub fn clear_callbacks(&mut self) {
        self.subscriptions.clear();
    }

    /// Invokes the callbacks registered for `key` with its current value.
    ///
    /// Does nothing when the key has no value or no callbacks.
    pub fn notify(&mut self, key: &str) {
        if let (Some(value), Some(sub)) = (self.values.get(key), self.subscriptions.get_mut(key)) {
            sub.notify(key, value);
        }
    }
}

impl<T: Value> Default for TypedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased interface over [`TypedStore`].
///
/// The blackboard stores `Box<dyn ErasedStore>` and uses [`as_any()`](Self::as_any)
/// and [`as_any_mut()`](Self::as_any_mut) to downcast back to the concrete
/// `TypedStore<T>` when type-specific access is needed. Operations that span every
/// type go through the remaining methods.
pub(crate) trait ErasedStore: Send {
    /// Erases the value at `key`, if any.
    fn wipe_key(&mut self, key: &str) -> bool;

    /// Erases every value.
    fn wipe_all(&mut self);

    /// Removes every callback registered for `key`.
    fn unsubscribe(&mut self, key: &str) -> bool;

    /// Removes every callback for every key.
    fn clear_callbacks(&mut self);

    /// Number of keys holding a value.
    fn value_count(&self) -> usize;

    /// Returns a reference to self as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `&mut dyn Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Value> ErasedStore for TypedStore<T> {
    fn wipe_key(&mut self, key: &str) -> bool {
        self.remove_key(key)
    }

    fn wipe_all(&mut self) {
        self.clear_values();
    }

    fn unsubscribe(&mut self, key: &str) -> bool {
        self.remove_callbacks(key)
    }

    fn clear_callbacks(&mut self) {
        TypedStore::clear_callbacks(self);
    }

    fn value_count(&self) -> usize {
        self.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
