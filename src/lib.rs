//! Slide Descent - a grid sliding puzzle with a chasing avalanche
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, sliding, score/feet ledger, avalanche)
//! - `settings`: Data-driven tunables loaded from JSON
//! - `levels`: Built-in level maps
//! - `error`: Crate error type

pub mod error;
pub mod levels;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Entity code for a walkable empty cell
    pub const ENTITY_EMPTY: i32 = 0;
    /// Entity code for an impassable wall
    pub const ENTITY_WALL: i32 = 1;
    /// Entity code for the level goal
    pub const ENTITY_GOAL: i32 = 3;
    /// Entity code for a collectible coin
    pub const ENTITY_COIN: i32 = 4;

    /// Reward credited for each coin
    pub const COIN_VALUE: u64 = 150;

    /// Feet remaining when the player stands on the first walkable row
    pub const MAX_FEET: f64 = 10_000.0;

    /// Player spawn cell (inside the outer wall)
    pub const START_X: i32 = 1;
    pub const START_Y: i32 = 1;

    /// Delay before the avalanche starts, drawn uniformly from this range (ms)
    pub const AVALANCHE_DELAY_MIN_MS: u64 = 15_000;
    pub const AVALANCHE_DELAY_MAX_MS: u64 = 20_000;

    /// Collapse step interval: starts here and shrinks every step (ms)
    pub const COLLAPSE_INTERVAL_START_MS: u64 = 1_500;
    pub const COLLAPSE_INTERVAL_STEP_MS: u64 = 50;
    pub const COLLAPSE_INTERVAL_FLOOR_MS: u64 = 250;
    pub const COLLAPSE_INTERVAL_CEILING_MS: u64 = 1_000;

    /// Undrained session events kept before the oldest are dropped
    pub const EVENT_QUEUE_CAP: usize = 256;

    /// Default run seed
    pub const DEFAULT_SEED: u64 = 0x5eed_d35c;
}

/// True if `dir` is one of the four unit directions or the zero vector
#[inline]
pub fn is_cardinal_or_zero(dir: IVec2) -> bool {
    dir.x.abs() + dir.y.abs() <= 1
}

/// Row-major flat index of `pos` in a grid of the given width and height
#[inline]
pub fn row_major_index(pos: IVec2, width: usize, height: usize) -> Option<usize> {
    if pos.x < 0 || pos.y < 0 {
        return None;
    }
    let (x, y) = (pos.x as usize, pos.y as usize);
    if x >= width || y >= height {
        return None;
    }
    Some(y * width + x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_directions() {
        assert!(is_cardinal_or_zero(IVec2::ZERO));
        assert!(is_cardinal_or_zero(IVec2::X));
        assert!(is_cardinal_or_zero(IVec2::NEG_Y));
        assert!(!is_cardinal_or_zero(IVec2::new(1, 1)));
        assert!(!is_cardinal_or_zero(IVec2::new(2, 0)));
        assert!(!is_cardinal_or_zero(IVec2::new(0, -3)));
    }

    #[test]
    fn test_row_major_index() {
        assert_eq!(row_major_index(IVec2::new(0, 0), 4, 3), Some(0));
        assert_eq!(row_major_index(IVec2::new(3, 0), 4, 3), Some(3));
        assert_eq!(row_major_index(IVec2::new(0, 1), 4, 3), Some(4));
        assert_eq!(row_major_index(IVec2::new(3, 2), 4, 3), Some(11));
        assert_eq!(row_major_index(IVec2::new(-1, 0), 4, 3), None);
        assert_eq!(row_major_index(IVec2::new(4, 0), 4, 3), None);
        assert_eq!(row_major_index(IVec2::new(0, 3), 4, 3), None);
    }
}
