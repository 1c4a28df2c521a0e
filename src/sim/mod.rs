//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical clock only (time advances through `tick`)
//! - Seeded RNG only
//! - Row-major iteration order
//! - No rendering, input or platform dependencies

pub mod avalanche;
pub mod clock;
pub mod grid;
pub mod ledger;
pub mod session;
pub mod slide;
pub mod state;
pub mod tick;

pub use avalanche::{AvalancheController, AvalancheEvent, AvalancheState, AvalancheTuning};
pub use clock::Timeline;
pub use grid::{Entity, Grid, Tile};
pub use ledger::ScoreLedger;
pub use session::{GameSession, MoveResult, SessionSnapshot};
pub use slide::{Slide, SlidePlan};
pub use state::{Direction, GameEvent, GamePhase, RngState};
pub use tick::tick;
