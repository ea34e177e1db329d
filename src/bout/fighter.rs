//! Fighter entity
//!
//! Owns a boxer's resources, position and animation state, and applies one
//! tick of commands. Command handling follows a strict priority: a knocked
//! out fighter ignores everything; a winner only celebrates and drifts; ko and
//! win commands lock the fighter; hurt, dizzy and idle commands play at once;
//! otherwise a neutral fighter resolves a single action and a fighter mid
//! attack or mid reaction only moves.

use serde::{Deserialize, Serialize};

use crate::bout::actions::{Action, ActionSet, Attack};
use crate::bout::constants::HEALTH_EPSILON;
use crate::bout::events::{BoutEvent, BoutEventLog};
use crate::core::config::{BoutConfig, CombatConfig, StaminaConfig};
use crate::core::types::{Corner, Millis, ResourceKind};

fn neutral_multiplier() -> f64 {
    1.0
}

fn default_name() -> String {
    "Boxer".to_string()
}

/// Stat snapshot a fighter is created from
///
/// Missing fields fall back to a neutral 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "neutral_multiplier")]
    pub health: f64,
    #[serde(default = "neutral_multiplier")]
    pub stamina: f64,
    #[serde(default = "neutral_multiplier")]
    pub power: f64,
    #[serde(default = "neutral_multiplier")]
    pub speed: f64,
}

impl FighterStats {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Default for FighterStats {
    fn default() -> Self {
        Self {
            name: default_name(),
            health: 1.0,
            stamina: 1.0,
            power: 1.0,
            speed: 1.0,
        }
    }
}

/// Non-positive or non-finite stats count as missing
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        neutral_multiplier()
    }
}

/// Coarse animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FighterState {
    #[default]
    Neutral,
    /// Punch animation in flight
    Attack,
    /// Hurt or dizzy animation in flight
    Injured,
    /// Knocked out or celebrating; terminal for the bout
    Locked,
}

/// What a fighter needs to know about the current tick
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub config: &'a BoutConfig,
    pub dt: Millis,
    pub opponent_position: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub name: String,
    pub corner: Corner,

    // Resources, each within [0, max]
    pub health: f64,
    pub max_health: f64,
    pub stamina: f64,
    pub max_stamina: f64,
    pub power: f64,
    pub max_power: f64,

    pub position: f64,
    pub facing_right: bool,
    pub speed: f64,

    pub state: FighterState,
    pub last_action: Action,
    pub current_attack: Option<Attack>,
    /// Power at wind-up of the current punch
    pub attack_power: f64,
    /// Current punch already connected
    pub has_hit: bool,
    /// Clean (unblocked) punches landed this bout
    pub hits_landed: u32,

    pub is_ko: bool,
    pub is_winner: bool,
    pub is_blocking: bool,
    pub is_retreating: bool,
    pub low_stamina_mode: bool,
    pub block_hold_time: Millis,
    pub recovery_timer: Millis,

    animation_timer: Millis,
    attack_cooldown: Millis,
    was_tired: bool,
    opponent_was_tired: bool,
}

impl Fighter {
    pub fn new(corner: Corner, stats: &FighterStats, position: f64, facing_right: bool) -> Self {
        let max_health = sanitize(stats.health);
        let max_stamina = sanitize(stats.stamina);
        let max_power = sanitize(stats.power);
        Self {
            name: stats.name.clone(),
            corner,
            health: max_health,
            max_health,
            stamina: max_stamina,
            max_stamina,
            power: max_power,
            max_power,
            position,
            facing_right,
            speed: sanitize(stats.speed),
            state: FighterState::Neutral,
            last_action: Action::Idle,
            current_attack: None,
            attack_power: 0.0,
            has_hit: false,
            hits_landed: 0,
            is_ko: false,
            is_winner: false,
            is_blocking: false,
            is_retreating: false,
            low_stamina_mode: false,
            block_hold_time: 0.0,
            recovery_timer: 0.0,
            animation_timer: 0.0,
            attack_cooldown: 0.0,
            was_tired: false,
            opponent_was_tired: false,
        }
    }

    // ===== Resources =====

    pub fn value(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Health => self.health,
            ResourceKind::Stamina => self.stamina,
            ResourceKind::Power => self.power,
        }
    }

    pub fn max(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Health => self.max_health,
            ResourceKind::Stamina => self.max_stamina,
            ResourceKind::Power => self.max_power,
        }
    }

    /// Current value over maximum; NaN when the maximum is zero
    pub fn fraction(&self, kind: ResourceKind) -> f64 {
        self.value(kind) / self.max(kind)
    }

    pub fn health_fraction(&self) -> f64 {
        self.fraction(ResourceKind::Health)
    }

    pub fn stamina_fraction(&self) -> f64 {
        self.fraction(ResourceKind::Stamina)
    }

    pub fn adjust_health(&mut self, delta: f64, events: &mut BoutEventLog) {
        self.adjust(ResourceKind::Health, delta, events);
    }

    pub fn adjust_stamina(&mut self, delta: f64, events: &mut BoutEventLog) {
        self.adjust(ResourceKind::Stamina, delta, events);
    }

    pub fn adjust_power(&mut self, delta: f64, events: &mut BoutEventLog) {
        self.adjust(ResourceKind::Power, delta, events);
    }

    /// Add `delta` clamped to [0, max] and report the new fraction
    fn adjust(&mut self, kind: ResourceKind, delta: f64, events: &mut BoutEventLog) {
        if self.is_ko || !delta.is_finite() {
            return;
        }

        let max = self.max(kind).max(0.0);
        let slot = match kind {
            ResourceKind::Health => &mut self.health,
            ResourceKind::Stamina => &mut self.stamina,
            ResourceKind::Power => &mut self.power,
        };

        let mut next = (*slot + delta).min(max).max(0.0);
        if kind == ResourceKind::Health && next <= HEALTH_EPSILON {
            next = 0.0;
        }
        if next == *slot {
            return;
        }
        *slot = next;

        let fraction = if max > 0.0 { next / max } else { 0.0 };
        events.push(BoutEvent::ResourceChanged {
            corner: self.corner,
            kind,
            fraction,
        });
    }

    // ===== Geometry =====

    /// Whether `target` lies on the side this fighter faces
    pub fn is_facing(&self, target: f64) -> bool {
        if target > self.position {
            self.facing_right
        } else if target < self.position {
            !self.facing_right
        } else {
            true
        }
    }

    /// Body span along the ring axis
    pub fn extent(&self, half_width: f64) -> (f64, f64) {
        (self.position - half_width, self.position + half_width)
    }

    /// Direction that increases distance to the opponent; ties back away
    /// from the way the fighter is facing
    fn away_is_right(&self, opponent_position: f64) -> bool {
        if self.position > opponent_position {
            true
        } else if self.position < opponent_position {
            false
        } else {
            !self.facing_right
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.state == FighterState::Attack
    }

    // ===== Per-tick update =====

    pub fn update(&mut self, commands: &ActionSet, frame: &Frame, events: &mut BoutEventLog) {
        if self.is_ko {
            return;
        }

        let config = frame.config;
        self.advance_timers(frame.dt);
        self.tick_recovery(frame.dt, &config.stamina, events);
        self.update_stamina_mode(&config.stamina);

        let commands = self.effective_commands(commands, frame.opponent_position);

        if commands.turn_left {
            self.facing_right = false;
        } else if commands.turn_right {
            self.facing_right = true;
        }

        if self.is_winner {
            self.last_action = Action::Win;
            self.apply_movement(&commands, frame, events);
            return;
        }

        if commands.ko {
            self.enter_ko(events);
            return;
        }

        if commands.win {
            self.enter_win();
            return;
        }

        if let Some(action) = commands.passive_action() {
            self.play(action, &config.combat);
            self.apply_movement(&commands, frame, events);
            return;
        }

        match self.state {
            FighterState::Locked => self.apply_movement(&commands, frame, events),
            FighterState::Neutral => self.resolve_neutral(&commands, frame, events),
            FighterState::Attack | FighterState::Injured => {
                self.apply_movement(&commands, frame, events)
            }
        }
    }

    fn advance_timers(&mut self, dt: Millis) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.block_hold_time = (self.block_hold_time - dt).max(0.0);

        if matches!(self.state, FighterState::Attack | FighterState::Injured) {
            self.animation_timer -= dt;
            if self.animation_timer <= 0.0 {
                self.finish_animation();
            }
        }
    }

    fn finish_animation(&mut self) {
        self.state = FighterState::Neutral;
        self.animation_timer = 0.0;
        self.current_attack = None;
    }

    fn tick_recovery(&mut self, dt: Millis, config: &StaminaConfig, events: &mut BoutEventLog) {
        self.recovery_timer += dt;
        let interval = config.recovery_interval_ms;
        if self.recovery_timer < interval {
            return;
        }
        let due = (self.recovery_timer / interval).floor();
        self.recovery_timer -= due * interval;

        for _ in 0..due.min(u32::MAX as f64) as u32 {
            let before = (self.stamina, self.health, self.power);

            if self.is_blocking || self.is_retreating {
                self.adjust_stamina(config.guard_stamina_recovery, events);
                self.adjust_health(config.guard_health_recovery, events);
            }

            let regen = config.power_regen * self.stamina_fraction();
            self.adjust_power(regen, events);

            // Later ticks would repeat a no-op
            if (self.stamina, self.health, self.power) == before {
                break;
            }
        }
    }

    fn update_stamina_mode(&mut self, config: &StaminaConfig) {
        let fraction = self.stamina_fraction();
        if !self.low_stamina_mode && fraction < config.low_enter_ratio {
            self.low_stamina_mode = true;
            self.block_hold_time = config.block_hold_ms;
            tracing::debug!("{} ({}) is gassed, covering up", self.name, self.corner);
        } else if self.low_stamina_mode && fraction >= config.low_exit_ratio {
            self.low_stamina_mode = false;
            self.block_hold_time = 0.0;
            tracing::debug!("{} ({}) got a second wind", self.name, self.corner);
        }
    }

    /// Replace scripted intents while retreating after a hit or gassed
    fn effective_commands(&self, commands: &ActionSet, opponent_position: f64) -> ActionSet {
        let mut out = *commands;
        if out.ko || out.win || self.is_winner {
            return out;
        }

        if self.is_retreating {
            out.clear_scripted();
            out.block = self.low_stamina_mode;
            self.retreat_into(&mut out, opponent_position);
        } else if self.low_stamina_mode {
            out.clear_scripted();
            out.block = true;
            if self.block_hold_time <= 0.0 {
                self.retreat_into(&mut out, opponent_position);
            }
        }
        out
    }

    fn retreat_into(&self, commands: &mut ActionSet, opponent_position: f64) {
        if self.away_is_right(opponent_position) {
            commands.move_right = true;
        } else {
            commands.move_left = true;
        }
    }

    /// Pick one action: block, right jab, left jab, uppercut, movement, idle
    fn resolve_neutral(&mut self, commands: &ActionSet, frame: &Frame, events: &mut BoutEventLog) {
        if commands.block {
            self.is_blocking = true;
            self.last_action = Action::Block;
            // Gassed fighters keep their guard up while backing off
            if self.low_stamina_mode && (self.is_retreating || self.block_hold_time <= 0.0) {
                self.apply_movement(commands, frame, events);
            }
            return;
        }
        self.is_blocking = false;

        if let Some(attack) = commands.attack() {
            if self.attack_cooldown <= 0.0 {
                self.start_attack(attack, &frame.config.combat, events);
                return;
            }
        }

        if commands.has_movement() {
            self.last_action = if commands.move_left {
                Action::MoveLeft
            } else {
                Action::MoveRight
            };
            self.apply_movement(commands, frame, events);
            return;
        }

        self.last_action = Action::Idle;
    }

    fn start_attack(&mut self, attack: Attack, config: &CombatConfig, events: &mut BoutEventLog) {
        let (power_cost, stamina_cost, duration) = match attack {
            Attack::JabLeft | Attack::JabRight => {
                (config.jab_power_cost, config.jab_stamina_cost, config.jab_duration_ms)
            }
            Attack::Uppercut => (
                config.uppercut_power_cost,
                config.uppercut_stamina_cost,
                config.uppercut_duration_ms,
            ),
        };

        self.attack_power = self.power;
        self.adjust_power(-power_cost, events);
        self.adjust_stamina(-stamina_cost, events);

        self.state = FighterState::Attack;
        self.current_attack = Some(attack);
        self.has_hit = false;
        self.animation_timer = duration;
        self.attack_cooldown = config.attack_cooldown_ms;
        self.last_action = attack.action();
    }

    /// Start a non-offensive animation
    fn play(&mut self, action: Action, config: &CombatConfig) {
        self.last_action = action;
        self.is_blocking = false;
        self.current_attack = None;
        match action {
            Action::Hurt1 | Action::Hurt2 => {
                self.state = FighterState::Injured;
                self.animation_timer = config.hurt_duration_ms;
            }
            Action::Dizzy => {
                self.state = FighterState::Injured;
                self.animation_timer = config.dizzy_duration_ms;
            }
            _ => {
                self.state = FighterState::Neutral;
                self.animation_timer = 0.0;
            }
        }
    }

    fn apply_movement(&mut self, commands: &ActionSet, frame: &Frame, events: &mut BoutEventLog) {
        let ring = &frame.config.ring;
        let step = ring.move_speed * self.speed * frame.dt;

        let mut delta = 0.0;
        if commands.move_left {
            delta -= step;
        }
        if commands.move_right {
            delta += step;
        }

        if delta != 0.0 && frame.opponent_position != self.position {
            let toward = (delta > 0.0) == (frame.opponent_position > self.position);
            if toward {
                let cost = frame.config.stamina.forward_cost_per_ms * frame.dt;
                self.adjust_stamina(-cost, events);
            }
        }

        self.position = (self.position + delta).clamp(ring.left, ring.right);

        let on_ropes = (delta < 0.0 && self.position <= ring.left)
            || (delta > 0.0 && self.position >= ring.right);
        if self.is_retreating && on_ropes {
            self.is_retreating = false;
        }
    }

    fn enter_ko(&mut self, events: &mut BoutEventLog) {
        self.is_ko = true;
        self.state = FighterState::Locked;
        self.last_action = Action::Ko;
        self.is_blocking = false;
        self.is_retreating = false;
        self.current_attack = None;
        self.animation_timer = 0.0;
        events.push(BoutEvent::BoxerKo {
            corner: self.corner,
        });
    }

    fn enter_win(&mut self) {
        self.is_winner = true;
        self.state = FighterState::Locked;
        self.last_action = Action::Win;
        self.is_blocking = false;
        self.is_retreating = false;
        self.current_attack = None;
        self.animation_timer = 0.0;
    }

    // ===== Interaction with the rest of the bout =====

    /// Absorb a punch; blocked punches still push the fighter back
    pub fn receive_hit(
        &mut self,
        attack: Attack,
        damage: f64,
        blocked: bool,
        config: &CombatConfig,
        events: &mut BoutEventLog,
    ) {
        if self.is_ko {
            return;
        }
        self.adjust_health(-damage, events);
        self.is_retreating = true;
        if !blocked {
            self.play(attack.reaction(), config);
        }
    }

    /// Level change this fighter's controller should make after a
    /// tired/untired transition on either side
    ///
    /// Recovering from low stamina throttles back by one; seeing a fresh
    /// opponent become tired presses by one. Each fires once per transition.
    pub fn observe_fatigue(&mut self, opponent_tired: bool) -> i32 {
        let tired = self.low_stamina_mode;
        let mut delta = 0;

        if self.was_tired && !tired {
            delta -= 1;
        }
        if opponent_tired && !self.opponent_was_tired && !tired {
            delta += 1;
        }

        self.was_tired = tired;
        self.opponent_was_tired = opponent_tired;
        delta
    }

    /// Walk back to a starting mark, dropping any animation in flight
    pub fn reset_to_mark(&mut self, position: f64, facing_right: bool) {
        self.position = position;
        self.facing_right = facing_right;
        self.is_retreating = false;
        self.is_blocking = false;
        if self.state != FighterState::Locked {
            self.finish_animation();
        }
    }
}
