//! Bout execution loop
//!
//! Each tick: clock -> rule engine -> controllers -> fighters -> combat ->
//! clinch -> round end

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bout::actions::ActionSet;
use crate::bout::ai::{MetaAi, RuleEngine};
use crate::bout::clock::MatchClock;
use crate::bout::constants::MS_PER_SECOND;
use crate::bout::controller::{Controller, ScriptedController};
use crate::bout::events::{BoutEvent, BoutEventLog, EventBus, SubscriptionId, WinMethod};
use crate::bout::fighter::{Fighter, FighterStats, Frame};
use crate::bout::playbook::PlaybookSet;
use crate::bout::resolution::resolve_hit;
use crate::core::config::{BoutConfig, RingConfig};
use crate::core::error::Result;
use crate::core::types::{Corner, Level, Millis, Second};

/// Bout phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoutPhase {
    #[default]
    Pending, // Fighters in the ring, bell not rung
    RoundActive,
    RoundEnded, // Between rounds until the next tick
    MatchOver,
}

/// How the bout finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoutOutcome {
    /// None for a draw
    pub winner: Option<Corner>,
    pub winner_name: Option<String>,
    pub method: WinMethod,
    pub round: u32,
    /// Seconds into the deciding round
    pub elapsed_seconds: u32,
}

/// Starting position and facing for a corner
pub fn starting_mark(ring: &RingConfig, corner: Corner) -> (f64, bool) {
    match corner {
        Corner::Red => (ring.red_start, true),
        Corner::Blue => (ring.blue_start, false),
    }
}

/// A fighter and whatever drives it
pub struct Contender {
    pub fighter: Fighter,
    pub controller: Box<dyn Controller>,
}

impl Contender {
    pub fn new(fighter: Fighter, controller: Box<dyn Controller>) -> Self {
        Self { fighter, controller }
    }

    /// Fighter placed on its corner's starting mark
    pub fn at_mark(
        corner: Corner,
        stats: &FighterStats,
        controller: Box<dyn Controller>,
        ring: &RingConfig,
    ) -> Self {
        let (position, facing_right) = starting_mark(ring, corner);
        Self::new(Fighter::new(corner, stats, position, facing_right), controller)
    }
}

impl fmt::Debug for Contender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contender")
            .field("fighter", &self.fighter)
            .field("controller", &self.controller.name())
            .field("level", &self.controller.level())
            .finish()
    }
}

/// Complete bout state
pub struct BoutState {
    config: BoutConfig,
    clock: MatchClock,
    contenders: [Contender; 2],
    meta_ai: Option<Box<dyn MetaAi>>,

    phase: BoutPhase,
    outcome: Option<BoutOutcome>,

    // Clinch tracking
    clinch_ms: Millis,
    break_remaining_ms: Option<Millis>,

    last_meta_second: Option<Second>,
    bus: EventBus,
}

impl BoutState {
    /// Bout between two contenders; fails on an invalid config
    pub fn new(config: BoutConfig, red: Contender, blue: Contender) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            clock: MatchClock::new(config.rounds.round_seconds),
            config,
            contenders: [red, blue],
            meta_ai: None,
            phase: BoutPhase::Pending,
            outcome: None,
            clinch_ms: 0.0,
            break_remaining_ms: None,
            last_meta_second: None,
            bus: EventBus::new(),
        })
    }

    /// Two scripted fighters with seeded playbooks and the configured rule engine
    ///
    /// Red's playbooks are seeded with `seed`, Blue's with `seed + 1`.
    pub fn ai_vs_ai(
        config: BoutConfig,
        red: &FighterStats,
        blue: &FighterStats,
        red_level: Level,
        blue_level: Level,
        seed: u64,
    ) -> Result<Self> {
        let red_controller = ScriptedController::new(PlaybookSet::seeded(seed), red_level);
        let blue_controller =
            ScriptedController::new(PlaybookSet::seeded(seed.wrapping_add(1)), blue_level);

        let red = Contender::at_mark(Corner::Red, red, Box::new(red_controller), &config.ring);
        let blue = Contender::at_mark(Corner::Blue, blue, Box::new(blue_controller), &config.ring);
        let engine = RuleEngine::new(config.meta_ai.clone());

        let mut state = Self::new(config, red, blue)?;
        state.set_meta_ai(Box::new(engine));
        Ok(state)
    }

    pub fn set_meta_ai(&mut self, meta_ai: Box<dyn MetaAi>) {
        self.meta_ai = Some(meta_ai);
    }

    pub fn meta_ai(&self) -> Option<&dyn MetaAi> {
        self.meta_ai.as_deref()
    }

    pub fn config(&self) -> &BoutConfig {
        &self.config
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn phase(&self) -> BoutPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&BoutOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BoutPhase::MatchOver
    }

    pub fn is_in_break(&self) -> bool {
        self.break_remaining_ms.is_some()
    }

    pub fn contender(&self, corner: Corner) -> &Contender {
        &self.contenders[corner.index()]
    }

    pub fn contender_mut(&mut self, corner: Corner) -> &mut Contender {
        &mut self.contenders[corner.index()]
    }

    pub fn fighter(&self, corner: Corner) -> &Fighter {
        &self.contenders[corner.index()].fighter
    }

    /// Clean hits landed (red, blue)
    pub fn hit_counts(&self) -> (u32, u32) {
        (
            self.contenders[0].fighter.hits_landed,
            self.contenders[1].fighter.hits_landed,
        )
    }

    // ===== Subscriptions =====

    pub fn subscribe(&mut self, handler: impl FnMut(&BoutEvent) + 'static) -> Option<SubscriptionId> {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// End the bout scene; every subscription is dropped
    pub fn teardown(mut self) {
        tracing::debug!(
            "Tearing down bout, dropping {} subscribers",
            self.bus.subscriber_count()
        );
        self.bus.close();
    }

    // ===== Lifecycle =====

    /// Ring the bell for round one
    pub fn start(&mut self) -> BoutEventLog {
        let mut events = BoutEventLog::new();
        if self.phase != BoutPhase::Pending {
            return events;
        }
        self.begin_round(1, &mut events);
        self.bus.publish_all(&events);
        events
    }

    /// Freeze the clock and every fighter until `resume`
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Advance the bout by `dt` milliseconds
    pub fn tick(&mut self, dt: Millis) -> BoutEventLog {
        let mut events = BoutEventLog::new();

        if self.clock.is_paused() || !(dt > 0.0) || !dt.is_finite() {
            return events;
        }

        match self.phase {
            BoutPhase::Pending | BoutPhase::MatchOver => return events,
            BoutPhase::RoundEnded => {
                let next = self.clock.round() + 1;
                self.begin_round(next, &mut events);
            }
            BoutPhase::RoundActive => {}
        }

        // ===== PHASE 1: CLOCK =====
        let second = self.phase_clock(dt, &mut events);

        if self.is_in_break() {
            self.phase_break(dt, &mut events);
        } else {
            // ===== PHASE 2: RULE ENGINE =====
            self.phase_meta_ai(second, &mut events);

            // ===== PHASE 3: CONTROLLERS =====
            let commands = self.phase_decisions(second);

            // ===== PHASE 4: FIGHTERS =====
            self.phase_fighters(&commands, dt, &mut events);

            // ===== PHASE 5: COMBAT =====
            self.phase_combat(&mut events);

            // ===== PHASE 6: CLINCH =====
            if !self.is_finished() {
                self.phase_clinch(dt, &mut events);
            }
        }

        // ===== PHASE 7: ROUND END =====
        if !self.is_finished() {
            self.phase_round_end(&mut events);
        }

        self.bus.publish_all(&events);
        events
    }

    fn begin_round(&mut self, round: u32, events: &mut BoutEventLog) {
        self.clock.start_round(round);
        self.phase = BoutPhase::RoundActive;
        events.push(BoutEvent::RoundStarted { round });
        tracing::info!("Round {} started", round);
    }

    /// Returns the bout-wide second after advancing
    fn phase_clock(&mut self, dt: Millis, events: &mut BoutEventLog) -> Second {
        let remaining_before = self.clock.remaining_seconds();
        let crossed = self.clock.advance(dt);
        for n in 1..=crossed {
            events.push(BoutEvent::TimerTick {
                seconds_remaining: remaining_before - n,
            });
        }
        self.clock.current_second()
    }

    fn phase_break(&mut self, dt: Millis, events: &mut BoutEventLog) {
        let Some(remaining) = self.break_remaining_ms else {
            return;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.break_remaining_ms = Some(remaining);
        } else {
            self.end_break(events);
        }
    }

    fn end_break(&mut self, events: &mut BoutEventLog) {
        self.break_remaining_ms = None;
        events.push(BoutEvent::BreakEnded);
        tracing::info!("Break over, fighting resumes");
    }

    fn phase_meta_ai(&mut self, second: Second, events: &mut BoutEventLog) {
        if self.last_meta_second == Some(second) {
            return;
        }
        self.last_meta_second = Some(second);

        let Some(meta_ai) = self.meta_ai.as_mut() else {
            return;
        };

        if let Err(err) = meta_ai.evaluate(second, &mut self.contenders, events) {
            let until = second + self.config.meta_ai.error_cooldown_seconds;
            tracing::warn!(
                "Rule engine failed at {}s: {}. Suspended until {}s",
                second,
                err,
                until
            );
            meta_ai.suppress_until(until);
        }
    }

    fn phase_decisions(&mut self, second: Second) -> [ActionSet; 2] {
        let positions = [
            self.contenders[0].fighter.position,
            self.contenders[1].fighter.position,
        ];

        let mut commands = [ActionSet::none(); 2];
        for corner in Corner::ALL {
            let own = positions[corner.index()];
            let opponent = positions[corner.opponent().index()];
            let contender = &mut self.contenders[corner.index()];

            let mut set = contender.controller.actions(own, opponent, second);
            if opponent > own && !contender.fighter.facing_right {
                set.turn_right = true;
            } else if opponent < own && contender.fighter.facing_right {
                set.turn_left = true;
            }
            commands[corner.index()] = set;
        }
        commands
    }

    fn phase_fighters(&mut self, commands: &[ActionSet; 2], dt: Millis, events: &mut BoutEventLog) {
        for corner in Corner::ALL {
            let opponent_position = self.contenders[corner.opponent().index()].fighter.position;
            let frame = Frame {
                config: &self.config,
                dt,
                opponent_position,
            };
            self.contenders[corner.index()]
                .fighter
                .update(&commands[corner.index()], &frame, events);
        }

        // Fatigue-driven level coupling
        let tired = [
            self.contenders[0].fighter.low_stamina_mode,
            self.contenders[1].fighter.low_stamina_mode,
        ];
        for corner in Corner::ALL {
            let contender = &mut self.contenders[corner.index()];
            let delta = contender.fighter.observe_fatigue(tired[corner.opponent().index()]);
            if delta == 0 {
                continue;
            }
            contender.controller.shift_level(delta);
            if let Some(level) = contender.controller.level() {
                tracing::debug!("{} adapts to fatigue, now level {}", corner, level);
                events.push(BoutEvent::LevelShifted { corner, level });
            }
        }
    }

    fn phase_combat(&mut self, events: &mut BoutEventLog) {
        for attacker_corner in Corner::ALL {
            let [red, blue] = &mut self.contenders;
            let (attacker, defender) = match attacker_corner {
                Corner::Red => (red, blue),
                Corner::Blue => (blue, red),
            };

            let Some(hit) = resolve_hit(&mut attacker.fighter, &mut defender.fighter, &self.config, events)
            else {
                continue;
            };
            let knocked_out = defender.fighter.health <= 0.0;

            if !hit.blocked {
                let (red_hits, blue_hits) = self.hit_counts();
                events.push(BoutEvent::HitUpdate {
                    red_hits,
                    blue_hits,
                });
            }

            if knocked_out {
                self.finish_by_ko(attacker_corner, events);
                return;
            }
        }
    }

    fn finish_by_ko(&mut self, winner: Corner, events: &mut BoutEventLog) {
        let loser = winner.opponent();

        for (corner, command) in [(loser, ActionSet::ko_command()), (winner, ActionSet::win_command())] {
            let opponent_position = self.contenders[corner.opponent().index()].fighter.position;
            let frame = Frame {
                config: &self.config,
                dt: 0.0,
                opponent_position,
            };
            self.contenders[corner.index()]
                .fighter
                .update(&command, &frame, events);
        }

        self.clock.stop();
        tracing::info!(
            "{} ({}) is knocked out in round {}",
            self.fighter(loser).name,
            loser,
            self.clock.round()
        );
        self.conclude(Some(winner), WinMethod::Ko, events);
    }

    fn phase_clinch(&mut self, dt: Millis, events: &mut BoutEventLog) {
        let rounds = &self.config.rounds;
        if !rounds.clinch_enabled {
            return;
        }

        let distance = (self.contenders[0].fighter.position - self.contenders[1].fighter.position).abs();
        if distance < rounds.clinch_distance {
            self.clinch_ms += dt;
        } else {
            self.clinch_ms = 0.0;
        }

        if self.clinch_ms >= rounds.clinch_seconds as f64 * MS_PER_SECOND {
            self.clinch_ms = 0.0;
            self.break_remaining_ms = Some(rounds.break_seconds as f64 * MS_PER_SECOND);
            self.reset_marks();
            events.push(BoutEvent::BreakStarted);
            tracing::info!("Referee breaks the clinch");
        }
    }

    fn phase_round_end(&mut self, events: &mut BoutEventLog) {
        if self.phase != BoutPhase::RoundActive || !self.clock.is_expired() {
            return;
        }

        let round = self.clock.round();
        if self.is_in_break() {
            self.end_break(events);
        }
        self.clinch_ms = 0.0;
        events.push(BoutEvent::RoundEnded { round });
        tracing::info!("Round {} over", round);
        self.reset_marks();

        if round >= self.config.rounds.rounds {
            self.decide_on_points(events);
        } else {
            self.phase = BoutPhase::RoundEnded;
        }
    }

    fn decide_on_points(&mut self, events: &mut BoutEventLog) {
        let (red_hits, blue_hits) = self.hit_counts();
        let (winner, method) = if red_hits > blue_hits {
            (Some(Corner::Red), WinMethod::Decision)
        } else if blue_hits > red_hits {
            (Some(Corner::Blue), WinMethod::Decision)
        } else {
            (None, WinMethod::Draw)
        };
        tracing::info!("Scorecards: red {} - blue {}", red_hits, blue_hits);
        self.conclude(winner, method, events);
    }

    fn conclude(&mut self, winner: Option<Corner>, method: WinMethod, events: &mut BoutEventLog) {
        let winner_name = winner.map(|corner| self.fighter(corner).name.clone());
        let round = self.clock.round();
        let elapsed_seconds = self.clock.round_elapsed_seconds();

        match &winner_name {
            Some(name) => tracing::info!("{} wins by {:?} in round {}", name, method, round),
            None => tracing::info!("Bout scored a draw after round {}", round),
        }

        events.push(BoutEvent::MatchWinner {
            winner,
            winner_name: winner_name.clone(),
            method,
            round,
            elapsed_seconds,
        });
        self.outcome = Some(BoutOutcome {
            winner,
            winner_name,
            method,
            round,
            elapsed_seconds,
        });
        self.phase = BoutPhase::MatchOver;
    }

    fn reset_marks(&mut self) {
        for corner in Corner::ALL {
            let (position, facing_right) = starting_mark(&self.config.ring, corner);
            self.contenders[corner.index()]
                .fighter
                .reset_to_mark(position, facing_right);
        }
    }
}

impl fmt::Debug for BoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoutState")
            .field("phase", &self.phase)
            .field("clock", &self.clock)
            .field("contenders", &self.contenders)
            .field("outcome", &self.outcome)
            .field("bus", &self.bus)
            .finish()
    }
}
