//! Benchmark utilities for the blackboard.
//!
//! This crate provides benchmarking infrastructure for the blackboard, including:
//!
//! - **Microbenchmarks**: Individual operation cost (write, read, notify, wipe)
//! - **Scenario benchmarks**: Realistic workloads (sensor fusion, thread contention)
//! - **Memory tracking**: Heap allocation profiling via dhat
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p blackboard_bench
//!
//! # Run specific benchmark group
//! cargo bench -p blackboard_bench -- write
//!
//! # Run with memory profiling (slower)
//! cargo bench -p blackboard_bench --features memory_profiling
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod memory;
pub mod scenarios;
pub mod values;
