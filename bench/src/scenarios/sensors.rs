//! Sensor fusion scenario.
//!
//! Simulates modules publishing sensor readings onto a shared board:
//! - Each key carries a `Position`, a `Velocity` and a `Health`
//! - A fraction of keys have a pair callback attached
//! - Each frame writes a random subset of keys and reads back another subset
//!
//! This scenario tests:
//! - Typed store lookup cost across several value types
//! - Callback dispatch overhead on the write path
//! - Read cost for keys that always hold a value

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use blackboard::Blackboard;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::scenarios::Scenario;
use crate::values::{Health, Position, Velocity, key};

/// Configuration for the sensor benchmark.
#[derive(Clone, Debug)]
pub struct SensorConfig {
    /// Number of sensor keys.
    pub key_count: usize,
    /// Writes performed per frame.
    pub writes_per_frame: usize,
    /// Reads performed per frame.
    pub reads_per_frame: usize,
    /// Fraction of keys (0.0 - 1.0) with a callback attached.
    pub observed_ratio: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            key_count: 1_000,
            writes_per_frame: 500,
            reads_per_frame: 500,
            observed_ratio: 0.1,
            seed: 12345,
        }
    }
}

pub struct SensorScenario {
    config: SensorConfig,
    board: Blackboard,
    keys: Vec<String>,
    rng: ChaCha8Rng,
    notifications: Arc<AtomicUsize>,
}

impl SensorScenario {
    pub fn new() -> Self {
        Self::with_config(SensorConfig::default())
    }

    pub fn with_config(config: SensorConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            keys: (0..config.key_count).map(key).collect(),
            config,
            board: Blackboard::new(),
            rng,
            notifications: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Callbacks raised since setup.
    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::Relaxed)
    }

    pub fn board(&self) -> &Blackboard {
        &self.board
    }

    fn random_position(rng: &mut ChaCha8Rng) -> Position {
        Position {
            x: rng.gen_range(-100.0..100.0),
            y: rng.gen_range(-100.0..100.0),
            z: rng.gen_range(-100.0..100.0),
        }
    }

    fn random_velocity(rng: &mut ChaCha8Rng) -> Velocity {
        Velocity {
            x: rng.gen_range(-10.0..10.0),
            y: rng.gen_range(-10.0..10.0),
            z: rng.gen_range(-10.0..10.0),
        }
    }
}

impl Default for SensorScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for SensorScenario {
    fn name(&self) -> &'static str {
        "sensors"
    }

    fn description(&self) -> &'static str {
        "mixed-type writes and reads with a share of observed keys"
    }

    fn key_count(&self) -> usize {
        self.config.key_count
    }

    fn setup(&mut self) {
        for key in &self.keys {
            let position = Self::random_position(&mut self.rng);
            let velocity = Self::random_velocity(&mut self.rng);
            self.board.write_with(key.as_str(), position, false);
            self.board.write_with(key.as_str(), velocity, false);
            self.board.write_with(
                key.as_str(),
                Health {
                    current: 100.0,
                    max: 100.0,
                },
                false,
            );

            if self.rng.gen_bool(self.config.observed_ratio) {
                let notifications = Arc::clone(&self.notifications);
                self.board
                    .subscribe_pair::<Position>(key.as_str(), move |_, _| {
                        notifications.fetch_add(1, Ordering::Relaxed);
                    });
            }
        }
    }

    fn update(&mut self) {
        let n = self.keys.len();
        if n == 0 {
            return;
        }
        for _ in 0..self.config.writes_per_frame {
            let key = &self.keys[self.rng.gen_range(0..n)];
            if self.rng.gen_bool(0.5) {
                self.board
                    .write(key.as_str(), Self::random_position(&mut self.rng));
            } else {
                self.board
                    .write(key.as_str(), Self::random_velocity(&mut self.rng));
            }
        }
        for _ in 0..self.config.reads_per_frame {
            let key = &self.keys[self.rng.gen_range(0..n)];
            let _ = std::hint::black_box(self.board.read::<Health>(key));
        }
    }

    fn teardown(&mut self) {
        self.board.wipe_board(true);
    }
}
