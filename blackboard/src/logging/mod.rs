//! Log capture for embedders and tests.
//!
//! The library itself only emits records through the `log` facade. [`ChannelLogger`]
//! is an optional sink that forwards those records over a channel, so a host can drain
//! them on its own thread or a test can assert on them.

pub mod channel;

pub use channel::{ChannelLogger, LogMessage};
