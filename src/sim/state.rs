//! Session-level state types shared with the presentation layer

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::avalanche::AvalancheEvent;
use super::grid::Tile;

/// The four move directions an input layer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector; y grows downward
    pub fn to_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "u" | "up" => Some(Direction::Up),
            "d" | "down" => Some(Direction::Down),
            "l" | "left" => Some(Direction::Left),
            "r" | "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        dir.to_ivec2()
    }
}

/// Current phase of a play-through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No move made yet
    #[default]
    Ready,
    /// Player has moved; avalanche is armed or running
    Playing,
    /// Reached the goal
    Won,
    /// Caught by the avalanche
    Lost,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Moved { from: IVec2, to: IVec2 },
    CoinCollected { tile: Tile },
    GoalReached { pos: IVec2 },
    AvalancheArmed { delay_ms: u64 },
    AvalancheStarted,
    AvalancheAdvanced { progress: usize },
    PlayerCaught { progress: usize },
    AvalancheStopped { progress: usize },
    Reset,
}

impl From<AvalancheEvent> for GameEvent {
    fn from(event: AvalancheEvent) -> Self {
        match event {
            AvalancheEvent::Started => GameEvent::AvalancheStarted,
            AvalancheEvent::Advanced { progress } => GameEvent::AvalancheAdvanced { progress },
            AvalancheEvent::PlayerCaught { progress } => GameEvent::PlayerCaught { progress },
            AvalancheEvent::Stopped { progress } => GameEvent::AvalancheStopped { progress },
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
