//! Value types used across benchmarks.
//!
//! Sized to be representative of what modules typically share through a board.

use blackboard::Blackboard;

/// 3D position (12 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3D velocity (12 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Health pool (8 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Heap-backed status text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Status(pub String);

/// Key for the `i`-th slot in a benchmark key space.
pub fn key(i: usize) -> String {
    format!("slot-{i}")
}

/// Writes `k` under exactly `types` distinct value types, for `types` in `1..=16`.
pub fn populate_types(board: &Blackboard, k: &str, types: usize) {
    // Each array length is its own value type; Velocity makes up the last one
    macro_rules! write_n {
        ($($n:literal),*) => {
            $(if $n + 1 < types { board.write(k, [0_u8; $n]); })*
        };
    }
    write_n!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14);
    board.write(k, Velocity::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_types_writes_requested_type_count() {
        for types in [1, 4, 16] {
            let board = Blackboard::new();

            populate_types(&board, "k", types);

            assert_eq!(board.type_count(), types);
            assert_eq!(board.len(), types);
        }
    }
}
