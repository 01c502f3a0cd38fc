//! Heap footprint of a blackboard, measured with dhat.
//!
//! [`measure_footprint`] builds a board in three phases and records what each one
//! allocates: the first write of each value type (which creates its typed store), one
//! value under each of `key_count` fresh keys, and one key callback on each of those
//! keys. Dividing a phase by its unit count gives the cost of a single store, key or
//! callback.
//!
//! Counting needs the dhat allocator, which is only installed with the feature on:
//!
//! ```bash
//! cargo bench -p blackboard_bench --features memory_profiling
//! ```
//!
//! Without it every figure is zero. With it the full heap profile is also written to
//! `dhat-heap.json`, viewable at <https://nnethercote.github.io/dh_view/dh_view.html>.

use std::fmt;

use blackboard::Blackboard;

use crate::values::{Health, Position, Status, Velocity, key};

/// Number of value types written in the store phase.
pub const STORE_TYPES: usize = 4;

const SEED_KEY: &str = "seed";

/// Bytes and blocks allocated over some span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Allocated {
    pub bytes: u64,
    pub blocks: u64,
}

impl Allocated {
    /// Running totals since the profiler started. Zero without `memory_profiling`.
    fn so_far() -> Self {
        #[cfg(feature = "memory_profiling")]
        {
            let stats = dhat::HeapStats::get();
            Self {
                bytes: stats.total_bytes as u64,
                blocks: stats.total_blocks as u64,
            }
        }
        #[cfg(not(feature = "memory_profiling"))]
        {
            Self::default()
        }
    }

    fn since(self, start: Self) -> Self {
        Self {
            bytes: self.bytes.saturating_sub(start.bytes),
            blocks: self.blocks.saturating_sub(start.blocks),
        }
    }

    /// Average bytes per unit, or zero when there are no units.
    pub fn bytes_per(&self, units: usize) -> f64 {
        if units == 0 {
            0.0
        } else {
            self.bytes as f64 / units as f64
        }
    }
}

/// Allocation cost of each part of a board.
#[derive(Debug, Clone, Default)]
pub struct Footprint {
    pub key_count: usize,

    /// First write of each of [`STORE_TYPES`] types.
    pub stores: Allocated,

    /// One `Position` under each of `key_count` keys.
    pub values: Allocated,

    /// One key callback on each of `key_count` keys.
    pub callbacks: Allocated,

    /// Peak live heap over the whole measurement.
    pub peak_bytes: u64,
}

impl Footprint {
    pub fn bytes_per_store(&self) -> f64 {
        self.stores.bytes_per(STORE_TYPES)
    }

    pub fn bytes_per_key(&self) -> f64 {
        self.values.bytes_per(self.key_count)
    }

    pub fn bytes_per_callback(&self) -> f64 {
        self.callbacks.bytes_per(self.key_count)
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} B/store, {:.1} B/key, {:.1} B/callback over {} keys (peak {} B)",
            self.bytes_per_store(),
            self.bytes_per_key(),
            self.bytes_per_callback(),
            self.key_count,
            self.peak_bytes
        )
    }
}

/// Builds a board with `key_count` observed `Position` keys and measures each phase.
///
/// Returns the populated board alongside its footprint. Only one measurement may run at
/// a time when `memory_profiling` is enabled.
pub fn measure_footprint(key_count: usize) -> (Blackboard, Footprint) {
    // Key strings are formatted up front so only the board's own copies are counted
    let keys: Vec<String> = (0..key_count).map(key).collect();

    #[cfg(feature = "memory_profiling")]
    let _profiler = dhat::Profiler::new_heap();

    let board = Blackboard::new();

    let start = Allocated::so_far();
    board.write(SEED_KEY, Position::default());
    board.write(SEED_KEY, Velocity::default());
    board.write(SEED_KEY, Health::default());
    board.write(SEED_KEY, Status::default());
    let stored = Allocated::so_far();

    for k in &keys {
        board.write(k.as_str(), Position::default());
    }
    let valued = Allocated::so_far();

    for k in &keys {
        board.subscribe_key::<Position>(k.as_str(), |_| {});
    }
    let observed = Allocated::so_far();

    #[cfg(feature = "memory_profiling")]
    let peak_bytes = dhat::HeapStats::get().max_bytes as u64;
    #[cfg(not(feature = "memory_profiling"))]
    let peak_bytes = 0;

    let footprint = Footprint {
        key_count,
        stores: stored.since(start),
        values: valued.since(stored),
        callbacks: observed.since(valued),
        peak_bytes,
    };
    (board, footprint)
}
