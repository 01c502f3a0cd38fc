//! Thread contention scenario.
//!
//! Several threads share one board and write their own keys as fast as they can,
//! with one key-callback per thread. Every operation funnels through the board's
//! single lock, so this measures the cost of that serialization as threads are added.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use blackboard::Blackboard;

use crate::scenarios::Scenario;
use crate::values::key;

/// Configuration for the contention benchmark.
#[derive(Clone, Debug)]
pub struct ContentionConfig {
    /// Number of writer threads.
    pub threads: usize,
    /// Writes each thread performs per frame.
    pub writes_per_thread: usize,
}

impl Default for ContentionConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            writes_per_thread: 1_000,
        }
    }
}

pub struct ContentionScenario {
    config: ContentionConfig,
    board: Arc<Blackboard>,
    notifications: Arc<AtomicUsize>,
}

impl ContentionScenario {
    pub fn new() -> Self {
        Self::with_config(ContentionConfig::default())
    }

    pub fn with_config(config: ContentionConfig) -> Self {
        Self {
            config,
            board: Arc::new(Blackboard::new()),
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
}

impl Default for ContentionScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ContentionScenario {
    fn name(&self) -> &'static str {
        "contention"
    }

    fn description(&self) -> &'static str {
        "concurrent writers serialized by the board lock"
    }

    fn key_count(&self) -> usize {
        self.config.threads
    }

    fn setup(&mut self) {
        for t in 0..self.config.threads {
            let notifications = Arc::clone(&self.notifications);
            self.board.subscribe_key::<u64>(key(t), move |_| {
                notifications.fetch_add(1, Ordering::Relaxed);
            });
        }
    }

    fn update(&mut self) {
        let writes = self.config.writes_per_thread;
        thread::scope(|scope| {
            for t in 0..self.config.threads {
                let board = &self.board;
                scope.spawn(move || {
                    let key = key(t);
                    for i in 0..writes {
                        board.write(key.as_str(), i as u64);
                    }
                });
            }
        });
    }

    fn teardown(&mut self) {
        self.board.wipe_board(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_writes_last_value_per_thread() {
        let mut scenario = ContentionScenario::with_config(ContentionConfig {
            threads: 3,
            writes_per_thread: 100,
        });
        scenario.setup();

        scenario.update();

        assert_eq!(scenario.notifications(), 300);
        for t in 0..3 {
            assert_eq!(scenario.board().read::<u64>(&key(t)).unwrap(), 99);
        }
    }
}
