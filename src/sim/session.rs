//! One play-through of a level
//!
//! `GameSession` ties the grid, slide resolver, ledger and avalanche
//! together and is the only thing the presentation layer talks to. It owns
//! all of its state; two sessions never share anything.

use std::collections::VecDeque;

use glam::IVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::avalanche::{AvalancheController, AvalancheState, AvalancheTuning};
use super::grid::{Grid, Tile};
use super::ledger::ScoreLedger;
use super::slide;
use super::state::{GameEvent, GamePhase, RngState};
use crate::consts::EVENT_QUEUE_CAP;
use crate::{Error, Result, Settings, is_cardinal_or_zero};

/// Result of a single move, for the presentation layer to animate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub from: IVec2,
    pub destination: Tile,
    /// Coins collected by this move (also queued for `drain_consumed_coins`)
    pub consumed: Vec<Tile>,
    pub distance: usize,
    pub reached_goal: bool,
}

impl MoveResult {
    pub fn moved(&self) -> bool {
        self.distance > 0
    }
}

/// Serializable view of everything a HUD needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub position: IVec2,
    pub phase: GamePhase,
    pub score: String,
    pub feet: String,
    pub score_buffer: u64,
    pub feet_buffer: f64,
    pub avalanche: AvalancheState,
    pub avalanche_progress: usize,
    pub coins_remaining: usize,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    settings: Settings,
    start: IVec2,
    position: IVec2,
    pub(crate) phase: GamePhase,
    ledger: ScoreLedger,
    pub(crate) avalanche: AvalancheController,
    rng_state: RngState,
    rng: Pcg32,
    /// Coins collected since the last drain
    consumed: Vec<Tile>,
    /// Undrained events, oldest first. Bounded by `EVENT_QUEUE_CAP`.
    events: VecDeque<GameEvent>,
}

impl GameSession {
    /// Start a session on an already parsed grid
    pub fn new(grid: Grid, settings: Settings) -> Result<Self> {
        settings.validate()?;

        let start = IVec2::new(settings.start.0, settings.start.1);
        if !grid.lookup(start).is_some_and(|tile| tile.is_open()) {
            return Err(Error::InvalidStart {
                x: start.x,
                y: start.y,
            });
        }

        let ledger = ScoreLedger::new(settings.max_feet, grid.length());
        let avalanche = AvalancheController::new(AvalancheTuning::from(&settings), grid.length());
        let rng_state = RngState::new(settings.seed);
        let rng = rng_state.to_rng();

        log::info!(
            "New session: {}x{} grid, start ({}, {}), seed {}",
            grid.width(),
            grid.length(),
            start.x,
            start.y,
            settings.seed
        );

        Ok(Self {
            grid,
            settings,
            start,
            position: start,
            phase: GamePhase::Ready,
            ledger,
            avalanche,
            rng_state,
            rng,
            consumed: Vec::new(),
            events: VecDeque::new(),
        })
    }

    /// Parse `map` with the settings' coin value and start a session on it
    pub fn from_map(map: &str, settings: Settings) -> Result<Self> {
        let grid = Grid::parse_with_coin_value(map, settings.coin_value)?;
        Self::new(grid, settings)
    }

    /// Slide the player in `direction`.
    ///
    /// Errors leave the session exactly as it was.
    pub fn apply_move(&mut self, direction: impl Into<IVec2>) -> Result<MoveResult> {
        let direction = direction.into();
        if !is_cardinal_or_zero(direction) {
            log::warn!("Rejected move ({}, {})", direction.x, direction.y);
            return Err(Error::InvalidDirection {
                dx: direction.x,
                dy: direction.y,
            });
        }
        if self.phase.is_over() {
            log::warn!("Rejected move after session ended ({:?})", self.phase);
            return Err(Error::SessionOver);
        }

        let plan = slide::plan(&self.grid, self.position, direction)?;
        let slide = plan.commit(&mut self.grid, &mut self.ledger);

        let from = self.position;
        self.position = slide.destination.pos;
        self.ledger.set_feet_buffer_from_row(self.position.y);

        for tile in &slide.consumed {
            self.push_event(GameEvent::CoinCollected { tile: *tile });
        }
        self.consumed.extend_from_slice(&slide.consumed);

        if slide.distance > 0 {
            self.push_event(GameEvent::Moved {
                from,
                to: self.position,
            });
            if self.phase == GamePhase::Ready {
                self.phase = GamePhase::Playing;
            }
            if let Some(delay_ms) = self.avalanche.arm(&mut self.rng) {
                self.push_event(GameEvent::AvalancheArmed { delay_ms });
            }
        }

        let reached_goal = slide.destination.is_goal();
        if reached_goal {
            self.phase = GamePhase::Won;
            self.push_event(GameEvent::GoalReached { pos: self.position });
            log::info!("Goal reached at ({}, {})", self.position.x, self.position.y);
        }

        log::debug!(
            "Move ({}, {}): ({}, {}) -> ({}, {}), {} coin(s)",
            direction.x,
            direction.y,
            from.x,
            from.y,
            self.position.x,
            self.position.y,
            slide.consumed.len()
        );

        Ok(MoveResult {
            from,
            destination: slide.destination,
            consumed: slide.consumed,
            distance: slide.distance,
            reached_goal,
        })
    }

    /// Advance the avalanche clock by `elapsed_ms`
    pub fn tick(&mut self, elapsed_ms: u64) {
        super::tick::tick(self, elapsed_ms);
    }

    /// Coins collected since the last call
    pub fn drain_consumed_coins(&mut self) -> Vec<Tile> {
        std::mem::take(&mut self.consumed)
    }

    /// Events raised since the last call. Hosts that never drain only
    /// lose the oldest entries once `EVENT_QUEUE_CAP` is reached.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= EVENT_QUEUE_CAP {
            let dropped = self.events.pop_front();
            log::trace!("Event queue full, dropped {:?}", dropped);
        }
        self.events.push_back(event);
    }

    /// Start a fresh play-through of the same level. The RNG is not
    /// reseeded, so the next avalanche delay differs from the last one.
    pub fn reset(&mut self) {
        self.grid.reset_spent();
        self.ledger.reset();
        self.avalanche.reset();
        self.consumed.clear();
        self.events.clear();
        self.position = self.start;
        self.phase = GamePhase::Ready;
        self.push_event(GameEvent::Reset);
        log::info!("Session reset");
    }

    /// Reset and reseed the RNG
    pub fn restart_with_seed(&mut self, seed: u64) {
        self.rng_state = RngState::new(seed);
        self.rng = self.rng_state.to_rng();
        self.settings.seed = seed;
        self.reset();
    }

    /// Row the avalanche has to reach, or `None` once the player escaped
    pub(crate) fn avalanche_target_row(&self) -> Option<i32> {
        match self.phase {
            GamePhase::Won => None,
            _ => Some(self.position.y),
        }
    }

    // === Queries ===

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn player_row(&self) -> i32 {
        self.position.y
    }

    pub fn start(&self) -> IVec2 {
        self.start
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn avalanche(&self) -> &AvalancheController {
        &self.avalanche
    }

    pub fn avalanche_active(&self) -> bool {
        self.avalanche.is_active()
    }

    pub fn avalanche_caught_player(&self) -> bool {
        self.avalanche.caught_player()
    }

    // === Ledger passthroughs ===

    pub fn commit_score(&mut self) {
        self.ledger.commit_score();
    }

    pub fn commit_feet(&mut self) {
        self.ledger.commit_feet();
    }

    pub fn format_score(&self) -> String {
        self.ledger.format_score()
    }

    pub fn format_feet(&self) -> String {
        self.ledger.format_feet()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            position: self.position,
            phase: self.phase,
            score: self.ledger.format_score(),
            feet: self.ledger.format_feet(),
            score_buffer: self.ledger.score_buffer(),
            feet_buffer: self.ledger.feet_buffer(),
            avalanche: self.avalanche.state(),
            avalanche_progress: self.avalanche.progress(),
            coins_remaining: self.grid.coins_remaining(),
        }
    }
}
