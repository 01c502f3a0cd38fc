//! A process-local, thread-safe, type-heterogeneous key-value store with change callbacks.
//!
//! Independent modules exchange typed values through a shared [`Blackboard`] by string
//! key, and observers register callbacks that fire when a key's value is written.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use blackboard::Blackboard;
//!
//! let board = Blackboard::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! board.subscribe_pair::<i32>("key", move |key, value| {
//!     sink.lock().unwrap().push(format!("{key} changed to {value}"));
//! });
//! board.write("key", 5_i32);
//!
//! assert_eq!(board.read::<i32>("key").unwrap(), 5);
//! assert_eq!(*seen.lock().unwrap(), vec!["key changed to 5"]);
//! ```

pub mod board;
pub mod logging;

pub use board::{Blackboard, Callback, Config, Error, Result, Shape, Value};
