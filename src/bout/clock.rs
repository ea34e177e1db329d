//! Round timer
//!
//! The clock only moves when the host advances it. Whole seconds are
//! carved out of accumulated milliseconds, so frame rate never changes how
//! many seconds a round lasts.

use serde::{Deserialize, Serialize};

use crate::bout::constants::MS_PER_SECOND;
use crate::core::types::{Millis, Second};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchClock {
    round_seconds: u32,
    remaining_seconds: u32,
    round: u32,
    running: bool,
    paused: bool,
    /// Milliseconds not yet converted into a whole second
    carry_ms: Millis,
    /// Seconds elapsed over the whole bout
    elapsed_seconds: Second,
}

impl MatchClock {
    pub fn new(round_seconds: u32) -> Self {
        Self {
            round_seconds,
            remaining_seconds: round_seconds,
            round: 1,
            running: false,
            paused: false,
            carry_ms: 0.0,
            elapsed_seconds: 0,
        }
    }

    pub fn start_round(&mut self, round: u32) {
        self.round = round;
        self.remaining_seconds = self.round_seconds;
        self.carry_ms = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance by `dt` and return how many whole seconds elapsed
    ///
    /// Stops at zero remaining. A stopped or paused clock ignores `dt`.
    pub fn advance(&mut self, dt: Millis) -> u32 {
        if !self.running || self.paused || !(dt > 0.0) {
            return 0;
        }

        self.carry_ms += dt;
        let mut ticks = 0;
        while self.carry_ms >= MS_PER_SECOND && self.remaining_seconds > 0 {
            self.carry_ms -= MS_PER_SECOND;
            self.remaining_seconds -= 1;
            self.elapsed_seconds += 1;
            ticks += 1;
        }

        if self.remaining_seconds == 0 {
            self.running = false;
            self.carry_ms = 0.0;
        }
        ticks
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Seconds elapsed in the current round
    pub fn round_elapsed_seconds(&self) -> u32 {
        self.round_seconds - self.remaining_seconds
    }

    /// Bout-wide second that controllers and the rule engine key on
    pub fn current_second(&self) -> Second {
        self.elapsed_seconds
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rate_independent() {
        let mut coarse = MatchClock::new(10);
        let mut fine = MatchClock::new(10);
        coarse.start_round(1);
        fine.start_round(1);

        let coarse_ticks: u32 = (0..10).map(|_| coarse.advance(250.0)).sum();
        let fine_ticks: u32 = (0..250).map(|_| fine.advance(10.0)).sum();

        assert_eq!(coarse_ticks, 2);
        assert_eq!(fine_ticks, 2);
        assert_eq!(coarse.remaining_seconds(), fine.remaining_seconds());
    }

    #[test]
    fn test_stops_at_zero() {
        let mut clock = MatchClock::new(3);
        clock.start_round(1);

        assert_eq!(clock.advance(10_000.0), 3);
        assert!(clock.is_expired());
        assert_eq!(clock.advance(5_000.0), 0);
        assert_eq!(clock.current_second(), 3);
    }

    #[test]
    fn test_paused_clock_does_not_bank_time() {
        let mut clock = MatchClock::new(180);
        clock.start_round(1);
        clock.advance(600.0);

        clock.pause();
        assert_eq!(clock.advance(5_000.0), 0);
        clock.resume();

        assert_eq!(clock.advance(300.0), 0);
        assert_eq!(clock.advance(100.0), 1);
        assert_eq!(clock.remaining_seconds(), 179);
    }

    #[test]
    fn test_elapsed_carries_across_rounds() {
        let mut clock = MatchClock::new(2);
        clock.start_round(1);
        clock.advance(2_000.0);
        clock.start_round(2);
        clock.advance(1_000.0);

        assert_eq!(clock.round(), 2);
        assert_eq!(clock.current_second(), 3);
        assert_eq!(clock.round_elapsed_seconds(), 1);
    }
}
