//! Avalanche: a timed, row-by-row collapse that chases the player
//!
//! ```text
//! Idle --arm--> Armed --delay--> Collapsing --step--> ... --> PlayerCaught
//!                                                        \--> Stopped
//! ```
//!
//! Arming schedules a one-shot start after a random delay. Once collapsing,
//! every step swallows one more row and the next step comes a little sooner.
//! The controller owns its own logical clock, so `reset` drops every pending
//! timer along with the state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::Timeline;
use crate::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AvalancheState {
    /// Waiting for the player's first move
    #[default]
    Idle,
    /// Start timer running
    Armed,
    /// Rows are collapsing
    Collapsing,
    /// Swallowed the whole level without catching anyone
    Stopped,
    /// Overtook the player's row
    PlayerCaught,
}

impl AvalancheState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AvalancheState::Stopped | AvalancheState::PlayerCaught)
    }
}

/// What happened during an `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvalancheEvent {
    Started,
    Advanced { progress: usize },
    PlayerCaught { progress: usize },
    Stopped { progress: usize },
}

/// Timer payloads, tagged with the epoch they were scheduled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Start { epoch: u32 },
    Step { epoch: u32 },
}

/// Avalanche timing tunables (ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvalancheTuning {
    pub delay_min: u64,
    pub delay_max: u64,
    pub interval_start: u64,
    pub interval_step: u64,
    pub interval_floor: u64,
    pub interval_ceiling: u64,
}

impl From<&Settings> for AvalancheTuning {
    fn from(settings: &Settings) -> Self {
        Self {
            delay_min: settings.avalanche_delay_min_ms,
            delay_max: settings.avalanche_delay_max_ms,
            interval_start: settings.collapse_interval_start_ms,
            interval_step: settings.collapse_interval_step_ms,
            interval_floor: settings.collapse_interval_floor_ms,
            interval_ceiling: settings.collapse_interval_ceiling_ms,
        }
    }
}

impl Default for AvalancheTuning {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

#[derive(Debug, Clone)]
pub struct AvalancheController {
    tuning: AvalancheTuning,
    grid_length: usize,
    state: AvalancheState,
    /// Rows collapsed so far
    progress: usize,
    /// Nominal step interval; shrinks every step down to the floor
    interval: u64,
    timeline: Timeline<Timer>,
    epoch: u32,
}

impl AvalancheController {
    pub fn new(tuning: AvalancheTuning, grid_length: usize) -> Self {
        Self {
            tuning,
            grid_length,
            state: AvalancheState::Idle,
            progress: 0,
            interval: tuning.interval_start,
            timeline: Timeline::new(),
            epoch: 0,
        }
    }

    pub fn state(&self) -> AvalancheState {
        self.state
    }

    /// True while rows are collapsing (drives shake effects)
    pub fn is_active(&self) -> bool {
        self.state == AvalancheState::Collapsing
    }

    pub fn caught_player(&self) -> bool {
        self.state == AvalancheState::PlayerCaught
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Nominal interval before the next step
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Delay actually used to schedule the next step
    pub fn step_delay(&self) -> u64 {
        self.interval
            .clamp(self.tuning.interval_floor, self.tuning.interval_ceiling)
    }

    pub fn grid_length(&self) -> usize {
        self.grid_length
    }

    /// Logical time on the controller's clock (ms since reset)
    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    /// Time left until the next scheduled timer fires
    pub fn time_to_next(&self) -> Option<u64> {
        self.timeline
            .next_due()
            .map(|due| due.saturating_sub(self.timeline.now()))
    }

    /// Start the countdown. Only does anything from `Idle`; returns the
    /// chosen delay.
    pub fn arm<R: Rng>(&mut self, rng: &mut R) -> Option<u64> {
        if self.state != AvalancheState::Idle {
            return None;
        }
        let delay = rng.random_range(self.tuning.delay_min..=self.tuning.delay_max);
        self.timeline.schedule(delay, Timer::Start { epoch: self.epoch });
        self.state = AvalancheState::Armed;
        log::debug!("Avalanche armed, starts in {}ms", delay);
        Some(delay)
    }

    /// Advance the clock by `elapsed` ms, firing every timer that comes due.
    ///
    /// `player_row` is the row the player stands on, or `None` once they
    /// have escaped (reached the goal) and can no longer be caught.
    pub fn advance(&mut self, elapsed: u64, player_row: Option<i32>) -> Vec<AvalancheEvent> {
        let until = self.timeline.now().saturating_add(elapsed);
        let mut events = Vec::new();

        while let Some(timer) = self.timeline.pop_due(until) {
            match timer {
                Timer::Start { epoch } if epoch == self.epoch => {
                    if self.state == AvalancheState::Armed {
                        self.start_collapse();
                        events.push(AvalancheEvent::Started);
                    }
                }
                Timer::Step { epoch } if epoch == self.epoch => {
                    if self.state == AvalancheState::Collapsing {
                        events.push(self.step(player_row));
                    }
                }
                stale => log::trace!("Dropping stale avalanche timer {:?}", stale),
            }
        }

        self.timeline.settle(until);
        events
    }

    fn start_collapse(&mut self) {
        self.state = AvalancheState::Collapsing;
        self.interval = self.tuning.interval_start;
        log::info!("Avalanche started");
        self.schedule_step();
    }

    fn schedule_step(&mut self) {
        let delay = self.step_delay();
        self.timeline.schedule(delay, Timer::Step { epoch: self.epoch });
    }

    /// Swallow one row and decide whether the collapse goes on
    pub(crate) fn step(&mut self, player_row: Option<i32>) -> AvalancheEvent {
        self.progress += 1;
        self.interval = self
            .interval
            .saturating_sub(self.tuning.interval_step)
            .max(self.tuning.interval_floor);

        if let Some(row) = player_row {
            if self.progress as i64 >= i64::from(row) {
                self.state = AvalancheState::PlayerCaught;
                log::info!("Avalanche caught the player at row {}", row);
                return AvalancheEvent::PlayerCaught {
                    progress: self.progress,
                };
            }
        }

        if self.progress >= self.grid_length {
            self.state = AvalancheState::Stopped;
            log::info!("Avalanche stopped after {} rows", self.progress);
            return AvalancheEvent::Stopped {
                progress: self.progress,
            };
        }

        log::debug!(
            "Avalanche row {} (next in {}ms)",
            self.progress,
            self.step_delay()
        );
        self.schedule_step();
        AvalancheEvent::Advanced {
            progress: self.progress,
        }
    }

    /// Back to `Idle`. Pending timers are dropped, and any that somehow
    /// survive carry an old epoch and are ignored.
    pub fn reset(&mut self) {
        self.timeline.reset();
        self.epoch = self.epoch.wrapping_add(1);
        self.state = AvalancheState::Idle;
        self.progress = 0;
        self.interval = self.tuning.interval_start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn controller(grid_length: usize) -> AvalancheController {
        AvalancheController::new(AvalancheTuning::default(), grid_length)
    }

    fn collapsing(grid_length: usize) -> AvalancheController {
        let mut avalanche = controller(grid_length);
        let mut rng = Pcg32::seed_from_u64(1);
        let delay = avalanche.arm(&mut rng).unwrap();
        let events = avalanche.advance(delay, Some(100));
        assert_eq!(events, vec![AvalancheEvent::Started]);
        avalanche
    }

    #[test]
    fn test_starts_idle() {
        let avalanche = controller(10);
        assert_eq!(avalanche.state(), AvalancheState::Idle);
        assert!(!avalanche.is_active());
        assert_eq!(avalanche.time_to_next(), None);
    }

    #[test]
    fn test_arm_once_with_delay_in_range() {
        let mut avalanche = controller(10);
        let mut rng = Pcg32::seed_from_u64(7);
        let delay = avalanche.arm(&mut rng).unwrap();
        assert!((15_000..=20_000).contains(&delay));
        assert_eq!(avalanche.state(), AvalancheState::Armed);
        assert_eq!(avalanche.time_to_next(), Some(delay));

        // Second arm is ignored
        assert_eq!(avalanche.arm(&mut rng), None);
        assert_eq!(avalanche.time_to_next(), Some(delay));
    }

    #[test]
    fn test_start_never_early() {
        let mut avalanche = controller(10);
        let mut rng = Pcg32::seed_from_u64(7);
        let delay = avalanche.arm(&mut rng).unwrap();

        assert!(avalanche.advance(delay - 1, Some(5)).is_empty());
        assert_eq!(avalanche.state(), AvalancheState::Armed);
        assert_eq!(avalanche.advance(1, Some(5)), vec![AvalancheEvent::Started]);
        assert!(avalanche.is_active());
    }

    #[test]
    fn test_step_timing_uses_clamped_interval() {
        let mut avalanche = collapsing(50);
        assert_eq!(avalanche.interval(), 1_500);
        // Ceiling applies to the scheduled delay
        assert_eq!(avalanche.step_delay(), 1_000);
        assert!(avalanche.advance(999, Some(40)).is_empty());
        assert_eq!(
            avalanche.advance(1, Some(40)),
            vec![AvalancheEvent::Advanced { progress: 1 }]
        );
        assert_eq!(avalanche.interval(), 1_450);
    }

    #[test]
    fn test_interval_shrinks_to_floor() {
        let mut avalanche = collapsing(1_000);
        let mut previous = avalanche.interval();
        for _ in 0..40 {
            avalanche.step(Some(10_000));
            let current = avalanche.interval();
            if previous > 250 {
                assert_eq!(current, previous - 50);
            } else {
                assert_eq!(current, 250);
            }
            previous = current;
        }
        assert_eq!(avalanche.interval(), 250);
        assert_eq!(avalanche.step_delay(), 250);
    }

    #[test]
    fn test_catches_player() {
        let mut avalanche = collapsing(10);
        let mut events = Vec::new();
        for _ in 0..20 {
            events.extend(avalanche.advance(1_000, Some(3)));
        }
        assert_eq!(
            events,
            vec![
                AvalancheEvent::Advanced { progress: 1 },
                AvalancheEvent::Advanced { progress: 2 },
                AvalancheEvent::PlayerCaught { progress: 3 },
            ]
        );
        assert!(avalanche.caught_player());
        assert!(!avalanche.is_active());
        assert_eq!(avalanche.time_to_next(), None);
    }

    #[test]
    fn test_stops_when_player_escaped() {
        let mut avalanche = collapsing(4);
        let events = avalanche.advance(60_000, None);
        assert_eq!(events.len(), 4);
        assert_eq!(events[3], AvalancheEvent::Stopped { progress: 4 });
        assert_eq!(avalanche.state(), AvalancheState::Stopped);
        assert!(!avalanche.is_active());
    }

    #[test]
    fn test_single_advance_fires_chained_steps() {
        let mut avalanche = controller(6);
        let mut rng = Pcg32::seed_from_u64(3);
        avalanche.arm(&mut rng).unwrap();
        // Start plus every step, all inside one long tick
        let events = avalanche.advance(100_000, Some(4));
        assert_eq!(events.first(), Some(&AvalancheEvent::Started));
        assert_eq!(
            events.last(),
            Some(&AvalancheEvent::PlayerCaught { progress: 4 })
        );
    }

    #[test]
    fn test_reset_cancels_pending_timers() {
        let mut avalanche = collapsing(10);
        avalanche.advance(1_000, Some(8));
        assert_eq!(avalanche.progress(), 1);

        avalanche.reset();
        assert_eq!(avalanche.state(), AvalancheState::Idle);
        assert_eq!(avalanche.progress(), 0);
        assert_eq!(avalanche.interval(), 1_500);
        assert_eq!(avalanche.time_to_next(), None);

        // Nothing left over from the previous run
        assert!(avalanche.advance(100_000, Some(1)).is_empty());
        assert_eq!(avalanche.state(), AvalancheState::Idle);
    }

    #[test]
    fn test_same_seed_same_delay() {
        let mut a = controller(10);
        let mut b = controller(10);
        let da = a.arm(&mut Pcg32::seed_from_u64(99)).unwrap();
        let db = b.arm(&mut Pcg32::seed_from_u64(99)).unwrap();
        assert_eq!(da, db);
    }

    proptest! {
        #[test]
        fn collapse_terminates_within_grid_length(
            grid_length in 1usize..60,
            player_row in proptest::option::of(0i32..80),
            seed in 0u64..1_000,
        ) {
            let mut avalanche = controller(grid_length);
            avalanche.arm(&mut Pcg32::seed_from_u64(seed)).unwrap();

            let mut last_progress = 0;
            let mut steps = 0;
            for _ in 0..10_000 {
                for event in avalanche.advance(250, player_row) {
                    match event {
                        AvalancheEvent::Started => {}
                        AvalancheEvent::Advanced { progress }
                        | AvalancheEvent::PlayerCaught { progress }
                        | AvalancheEvent::Stopped { progress } => {
                            prop_assert_eq!(progress, last_progress + 1);
                            last_progress = progress;
                            steps += 1;
                        }
                    }
                }
                if avalanche.state().is_terminal() {
                    break;
                }
            }

            prop_assert!(avalanche.state().is_terminal());
            prop_assert!(steps <= grid_length);
            prop_assert!(!avalanche.is_active());
        }
    }
}
