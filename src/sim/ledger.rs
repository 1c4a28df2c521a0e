//! Score and feet bookkeeping
//!
//! Each quantity has a buffer, updated the moment something happens, and a
//! committed value, which is what the HUD currently shows. The presentation
//! layer animates from committed toward buffer and calls `commit_*` once the
//! animation settles. The ledger holds no timers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedger {
    score: u64,
    score_buffer: u64,
    feet: f64,
    feet_buffer: f64,
    max_feet: f64,
    feet_per_square: f64,
}

impl ScoreLedger {
    /// Ledger for a grid with `grid_length` rows. The outer wall rows don't
    /// count toward the descent, so feet are spread over `grid_length - 2`.
    pub fn new(max_feet: f64, grid_length: usize) -> Self {
        let squares = grid_length.saturating_sub(2).max(1);
        Self {
            score: 0,
            score_buffer: 0,
            feet: max_feet,
            feet_buffer: max_feet,
            max_feet,
            feet_per_square: max_feet / squares as f64,
        }
    }

    pub fn credit_score(&mut self, amount: u64) {
        self.score_buffer = self.score_buffer.saturating_add(amount);
    }

    /// Recompute remaining feet for a player standing on row `y`
    pub fn set_feet_buffer_from_row(&mut self, y: i32) {
        self.feet_buffer = self.max_feet - f64::from(y - 1) * self.feet_per_square;
    }

    pub fn commit_score(&mut self) {
        self.score = self.score_buffer;
    }

    pub fn commit_feet(&mut self) {
        self.feet = self.feet_buffer;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn score_buffer(&self) -> u64 {
        self.score_buffer
    }

    pub fn feet(&self) -> f64 {
        self.feet
    }

    pub fn feet_buffer(&self) -> f64 {
        self.feet_buffer
    }

    pub fn max_feet(&self) -> f64 {
        self.max_feet
    }

    pub fn feet_per_square(&self) -> f64 {
        self.feet_per_square
    }

    /// Committed score, e.g. `$450`
    pub fn format_score(&self) -> String {
        format!("${}", self.score)
    }

    /// Committed feet, e.g. `8750ft`
    pub fn format_feet(&self) -> String {
        // Float error can leave the bottom row a hair below zero
        format!("{}ft", self.feet.round().max(0.0) as i64)
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.score_buffer = 0;
        self.feet = self.max_feet;
        self.feet_buffer = self.max_feet;
    }
}
