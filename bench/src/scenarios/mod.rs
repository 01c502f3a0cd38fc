//! Realistic blackboard workloads.
//!
//! # Scenarios
//!
//! - **Sensors**: Mixed value types, random writes and reads, a share of keys observed
//! - **Contention**: Several threads hammering one board through the single lock

pub mod contention;
pub mod sensors;

pub use contention::{ContentionConfig, ContentionScenario};
pub use sensors::{SensorConfig, SensorScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of keys in this scenario.
    fn key_count(&self) -> usize;

    /// Set up the scenario (populate the board, register callbacks).
    fn setup(&mut self);

    /// Run one "frame" of the scenario.
    fn update(&mut self);

    /// Clean up the scenario.
    fn teardown(&mut self);
}
