//! Slide resolution
//!
//! A move slides the player cell by cell in one direction until something
//! stops it:
//! - off the grid, a wall, or any unrecognized tile: stop on the last open cell
//! - empty space or a spent coin: keep going
//! - a live coin: collect it and keep going
//! - the goal: stop on the goal
//!
//! Resolution is split in two. `plan` walks the grid without touching it;
//! `SlidePlan::commit` then spends coins and credits the ledger. Nothing can
//! fail once the first coin is spent, so a move is all-or-nothing.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Tile};
use super::ledger::ScoreLedger;
use crate::{Error, Result};

/// A resolved but not yet applied slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePlan {
    destination: usize,
    /// Live coins on the path, in the order they are crossed
    coins: Vec<usize>,
    /// Cells travelled
    distance: usize,
}

/// Outcome of an applied slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub destination: Tile,
    /// Coins collected by this slide
    pub consumed: Vec<Tile>,
    pub distance: usize,
}

/// Walk from `start` in `dir` without mutating anything.
///
/// `start` must be on the grid; a miss means the caller lost track of the
/// player and is reported as an invariant violation.
pub fn plan(grid: &Grid, start: IVec2, dir: IVec2) -> Result<SlidePlan> {
    let mut current = grid.index(start).ok_or_else(|| {
        Error::InvariantViolation(format!(
            "slide start ({}, {}) is not on the grid",
            start.x, start.y
        ))
    })?;

    let mut coins = Vec::new();
    let mut distance = 0usize;

    if dir == IVec2::ZERO {
        return Ok(SlidePlan {
            destination: current,
            coins,
            distance,
        });
    }

    // A straight line can't cross more cells than the grid holds
    let max_steps = grid.tiles().len();
    let mut pos = start;

    loop {
        if distance > max_steps {
            return Err(Error::UnboundedSlide { steps: distance });
        }

        let next_pos = pos + dir;
        let Some(next_idx) = grid.index(next_pos) else {
            break;
        };
        let next = &grid.tiles()[next_idx];

        if next.is_goal() {
            current = next_idx;
            distance += 1;
            break;
        }

        if next.is_live_coin() {
            coins.push(next_idx);
        } else if !next.is_open() {
            break;
        }

        current = next_idx;
        pos = next_pos;
        distance += 1;
    }

    Ok(SlidePlan {
        destination: current,
        coins,
        distance,
    })
}

impl SlidePlan {
    /// Where the slide ends
    pub fn destination<'g>(&self, grid: &'g Grid) -> &'g Tile {
        &grid.tiles()[self.destination]
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Spend every coin on the path and credit it to the score buffer
    pub fn commit(self, grid: &mut Grid, ledger: &mut ScoreLedger) -> Slide {
        let mut consumed = Vec::with_capacity(self.coins.len());
        for idx in self.coins {
            let tile = grid.spend(idx);
            ledger.credit_score(tile.value);
            log::debug!("Coin at ({}, {}) +{}", tile.pos.x, tile.pos.y, tile.value);
            consumed.push(tile);
        }

        Slide {
            destination: grid.tiles()[self.destination],
            consumed,
            distance: self.distance,
        }
    }
}

/// Where a slide from `start` in `dir` would end, without collecting anything
pub fn destination(grid: &Grid, start: IVec2, dir: IVec2) -> Result<Tile> {
    let plan = plan(grid, start, dir)?;
    Ok(*plan.destination(grid))
}

/// Plan and apply a slide in one go
pub fn resolve(
    grid: &mut Grid,
    ledger: &mut ScoreLedger,
    start: IVec2,
    dir: IVec2,
) -> Result<Slide> {
    let plan = plan(grid, start, dir)?;
    Ok(plan.commit(grid, ledger))
}
