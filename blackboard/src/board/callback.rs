//! Change callbacks attached to a (type, key) pair.
//!
//! A callback comes in one of three shapes, distinguished by what it receives when the
//! key it watches is written:
//!
//! | Shape   | Signature               |
//! |---------|-------------------------|
//! | `Key`   | `FnMut(&str)`           |
//! | `Value` | `FnMut(&T)`             |
//! | `Pair`  | `FnMut(&str, &T)`       |
//!
//! A [`Subscription`] holds at most one callback of each shape. Registering a second
//! callback of the same shape replaces the first.
//!
//! # Reentrancy
//!
//! Callbacks run synchronously inside [`Blackboard::write`](crate::Blackboard::write)
//! while the board's lock is held. A callback must not call back into the same
//! blackboard: doing so deadlocks.

use std::fmt;

/// Callback receiving the key that was written.
pub type KeyCallback = Box<dyn FnMut(&str) + Send>;

/// Callback receiving the value that was written.
pub type ValueCallback<T> = Box<dyn FnMut(&T) + Send>;

/// Callback receiving both the key and the value that was written.
pub type PairCallback<T> = Box<dyn FnMut(&str, &T) + Send>;

/// The shape of a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Key,
    Value,
    Pair,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Key => write!(f, "key"),
            Shape::Value => write!(f, "value"),
            Shape::Pair => write!(f, "pair"),
        }
    }
}

/// A change callback of any of the three shapes.
pub enum Callback<T> {
    Key(KeyCallback),
    Value(ValueCallback<T>),
    Pair(PairCallback<T>),
}

impl<T> Callback<T> {
    /// Wrap a closure receiving the written key.
    pub fn key(f: impl FnMut(&str) + Send + 'static) -> Self {
        Callback::Key(Box::new(f))
    }

    /// Wrap a closure receiving the written value.
    pub fn value(f: impl FnMut(&T) + Send + 'static) -> Self {
        Callback::Value(Box::new(f))
    }

    /// Wrap a closure receiving the written key and value.
    pub fn pair(f: impl FnMut(&str, &T) + Send + 'static) -> Self {
        Callback::Pair(Box::new(f))
    }

    /// The shape of this callback.
    #[inline]
    pub fn shape(&self) -> Shape {
        match self {
            Callback::Key(_) => Shape::Key,
            Callback::Value(_) => Shape::Value,
            Callback::Pair(_) => Shape::Pair,
        }
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.shape()).finish()
    }
}

/// The callbacks registered for a single key, at most one per [`Shape`].
pub struct Subscription<T> {
    key: Option<KeyCallback>,
    value: Option<ValueCallback<T>>,
    pair: Option<PairCallback<T>>,
}

impl<T> Default for Subscription<T> {
    fn default() -> Self {
        Self {
            key: None,
            value: None,
            pair: None,
        }
    }
}

impl<T> Subscription<T> {
    /// Creates a subscription with no callbacks.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `callback` in the slot for its shape, returning `true` if it replaced one.
    pub fn set(&mut self, callback: Callback<T>) -> bool {
        match callback {
            Callback::Key(f) => self.key.replace(f).is_some(),
            Callback::Value(f) => self.value.replace(f).is_some(),
            Callback::Pair(f) => self.pair.replace(f).is_some(),
        }
    }

    /// Returns `true` if a callback of `shape` is registered.
    #[inline]
    pub fn has(&self, shape: Shape) -> bool {
        match shape {
            Shape::Key => self.key.is_some(),
            Shape::Value => self.value.is_some(),
            Shape::Pair => self.pair.is_some(),
        }
    }

    /// Returns `true` if no callback of any shape is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.value.is_none() && self.pair.is_none()
    }

    /// Invokes the registered callbacks in key, value, pair order.
    ///
    /// Panics raised by a callback are not caught; the remaining callbacks are skipped.
    pub fn notify(&mut self, key: &str, value: &T) {
        if let Some(f) = self.key.as_mut() {
            f(key);
        }
        if let Some(f) = self.value.as_mut() {
            f(value);
        }
        if let Some(f) = self.pair.as_mut() {
            f(key, value);
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key.is_some())
            .field("value", &self.value.is_some())
            .field("pair", &self.pair.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    // ==================== Shape ====================

    #[test]
    fn callback_reports_its_shape() {
        assert_eq!(Callback::<i32>::key(|_| {}).shape(), Shape::Key);
        assert_eq!(Callback::<i32>::value(|_| {}).shape(), Shape::Value);
        assert_eq!(Callback::<i32>::pair(|_, _| {}).shape(), Shape::Pair);
    }

    #[test]
    fn shape_display() {
        assert_eq!(Shape::Key.to_string(), "key");
        assert_eq!(Shape::Value.to_string(), "value");
        assert_eq!(Shape::Pair.to_string(), "pair");
    }

    // ==================== Slots ====================

    #[test]
    fn new_subscription_is_empty() {
        let sub = Subscription::<i32>::new();

        assert!(sub.is_empty());
        assert!(!sub.has(Shape::Key));
    }

    #[test]
    fn set_fills_only_matching_slot() {
        let mut sub = Subscription::<i32>::new();

        let replaced = sub.set(Callback::value(|_| {}));

        assert!(!replaced);
        assert!(sub.has(Shape::Value));
        assert!(!sub.has(Shape::Key));
        assert!(!sub.has(Shape::Pair));
    }

    #[test]
    fn set_replaces_same_shape() {
        let log = Log::default();
        let (first, sink) = (Arc::clone(&log), Arc::clone(&log));
        let mut sub = Subscription::<i32>::new();
        sub.set(Callback::value(move |v| {
            first.lock().unwrap().push(format!("first {v}"))
        }));

        let replaced = sub.set(Callback::value(move |v| {
            sink.lock().unwrap().push(format!("second {v}"))
        }));
        sub.notify("k", &3);

        assert!(replaced);
        assert_eq!(*log.lock().unwrap(), vec!["second 3"]);
    }

    // ==================== Notify ====================

    #[test]
    fn notify_runs_key_then_value_then_pair() {
        let log = Log::default();
        let (a, b, c) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
        let mut sub = Subscription::<i32>::new();
        // Registered out of order on purpose
        sub.set(Callback::pair(move |k, v| {
            c.lock().unwrap().push(format!("pair {k} {v}"))
        }));
        sub.set(Callback::key(move |k| a.lock().unwrap().push(format!("key {k}"))));
        sub.set(Callback::value(move |v| {
            b.lock().unwrap().push(format!("value {v}"))
        }));

        sub.notify("hp", &42);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["key hp", "value 42", "pair hp 42"]
        );
    }

    #[test]
    fn notify_on_empty_subscription_is_noop() {
        let mut sub = Subscription::<i32>::new();

        sub.notify("k", &1); // Should not panic
    }

    #[test]
    fn debug_lists_occupied_slots() {
        let mut sub = Subscription::<i32>::new();
        sub.set(Callback::key(|_| {}));

        assert_eq!(
            format!("{sub:?}"),
            "Subscription { key: true, value: false, pair: false }"
        );
    }
}
