//! Bout configuration with documented constants
//!
//! Every tunable number of the simulation lives here, grouped by the
//! subsystem that reads it. The defaults define game balance; the
//! probability tables of the playbook generator are not configurable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, SimError};

/// Ring geometry and movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Left rope (smallest legal position)
    pub left: f64,
    /// Right rope (largest legal position)
    pub right: f64,
    /// Starting mark for the red corner, facing right
    pub red_start: f64,
    /// Starting mark for the blue corner, facing left
    pub blue_start: f64,
    /// Half of a fighter's body extent along the ring axis
    pub body_half_width: f64,
    /// Units moved per millisecond at speed 1.0
    pub move_speed: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            left: 100.0,
            right: 1180.0,
            red_start: 400.0,
            blue_start: 880.0,
            body_half_width: 150.0,
            move_speed: 0.25,
        }
    }
}

/// Hit detection, damage and attack costs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Maximum distance at which any punch can land
    pub hit_limit: f64,
    /// Fraction of `hit_limit` a left jab can reach
    pub left_jab_reach: f64,
    /// Distance at and beyond which damage is halved
    ///
    /// 265 for the full game, 200 for the simplified variant.
    pub falloff_distance: f64,
    /// Damage floor for a punch thrown with no power
    pub min_damage: f64,
    /// Damage per unit of attacker power
    pub damage_per_power: f64,
    pub uppercut_multiplier: f64,
    pub left_jab_multiplier: f64,
    pub jab_power_cost: f64,
    pub jab_stamina_cost: f64,
    pub uppercut_power_cost: f64,
    pub uppercut_stamina_cost: f64,
    /// Power and stamina an attacker loses when a jab is blocked
    pub block_penalty: f64,
    /// Power and stamina an attacker loses when an uppercut is blocked
    pub uppercut_block_penalty: f64,
    pub jab_duration_ms: f64,
    pub uppercut_duration_ms: f64,
    pub hurt_duration_ms: f64,
    pub dizzy_duration_ms: f64,
    /// Minimum time between two attack wind-ups
    ///
    /// Matches the one-decision-per-second cadence of scripted controllers,
    /// so a held attack intent throws one punch per decision.
    pub attack_cooldown_ms: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            hit_limit: 280.0,
            left_jab_reach: 0.75,
            falloff_distance: 265.0,
            min_damage: 0.009,
            damage_per_power: 0.05,
            uppercut_multiplier: 2.0,
            left_jab_multiplier: 1.5,
            jab_power_cost: 0.03,
            jab_stamina_cost: 0.015,
            uppercut_power_cost: 0.06,
            uppercut_stamina_cost: 0.03,
            block_penalty: 0.06,
            uppercut_block_penalty: 0.12,
            jab_duration_ms: 300.0,
            uppercut_duration_ms: 500.0,
            hurt_duration_ms: 400.0,
            dizzy_duration_ms: 700.0,
            attack_cooldown_ms: 1000.0,
        }
    }
}

/// Fatigue, recovery and the low-stamina override
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    /// Interval of the fighter's own recovery tick
    pub recovery_interval_ms: f64,
    /// Stamina regained per recovery tick while blocking or retreating
    pub guard_stamina_recovery: f64,
    /// Health regained per recovery tick while blocking or retreating
    pub guard_health_recovery: f64,
    /// Power regained per recovery tick, scaled by the stamina fraction
    pub power_regen: f64,
    /// Stamina spent per millisecond of forward movement
    pub forward_cost_per_ms: f64,
    /// Stamina fraction below which low-stamina mode starts
    pub low_enter_ratio: f64,
    /// Stamina fraction at which low-stamina mode ends
    pub low_exit_ratio: f64,
    /// How long a low-stamina block is held before retreating resumes
    pub block_hold_ms: f64,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            recovery_interval_ms: 1000.0,
            guard_stamina_recovery: 0.05,
            guard_health_recovery: 0.02,
            power_regen: 0.15,
            forward_cost_per_ms: 0.0006,
            low_enter_ratio: 1.0 / 3.0,
            low_exit_ratio: 0.5,
            block_hold_ms: 1000.0,
        }
    }
}

/// Round lifecycle and the clinch/break rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Scheduled rounds before the bout goes to a decision
    pub rounds: u32,
    pub round_seconds: u32,
    pub clinch_enabled: bool,
    /// Separation under which fighters count as clinched
    pub clinch_distance: f64,
    /// Continuous clinch time before the referee breaks it up
    pub clinch_seconds: u32,
    pub break_seconds: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            round_seconds: 180,
            clinch_enabled: true,
            clinch_distance: 50.0,
            clinch_seconds: 5,
            break_seconds: 5,
        }
    }
}

/// Thresholds of the adaptive rule engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaAiConfig {
    /// Distance under which the "too close" rule fires
    pub close_distance: f64,
    /// Distance over which the "too far" rule fires
    pub far_distance: f64,
    /// Stamina fraction under which a fighter counts as tired
    pub tired_ratio: f64,
    /// Length of every override window, in seconds
    pub override_seconds: u32,
    /// Stamina granted to both fighters on each evaluation
    pub passive_stamina: f64,
    /// Health granted to both fighters on each evaluation
    pub passive_health: f64,
    /// Suppression window after an evaluation fails
    pub error_cooldown_seconds: u32,
}

impl MetaAiConfig {
    /// Symmetric engine thresholds (the live default)
    pub fn standard() -> Self {
        Self {
            close_distance: 50.0,
            far_distance: 450.0,
            tired_ratio: 0.3,
            override_seconds: 3,
            passive_stamina: 0.01,
            passive_health: 0.005,
            error_cooldown_seconds: 2,
        }
    }

    /// Wider "too close" band used by the per-fighter tactical variant
    pub fn tactical() -> Self {
        Self {
            close_distance: 152.0,
            ..Self::standard()
        }
    }
}

impl Default for MetaAiConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Complete bout configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoutConfig {
    #[serde(default)]
    pub ring: RingConfig,
    #[serde(default)]
    pub combat: CombatConfig,
    #[serde(default)]
    pub stamina: StaminaConfig,
    #[serde(default)]
    pub rounds: RoundConfig,
    #[serde(default)]
    pub meta_ai: MetaAiConfig,
}

impl BoutConfig {
    /// Parse a TOML document; missing sections and fields keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: BoutConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let ring = &self.ring;
        if !(ring.left < ring.red_start && ring.red_start < ring.blue_start && ring.blue_start < ring.right) {
            return Err(SimError::InvalidConfig(format!(
                "ring marks must satisfy left < red_start < blue_start < right (got {} < {} < {} < {})",
                ring.left, ring.red_start, ring.blue_start, ring.right
            )));
        }
        if ring.move_speed <= 0.0 || ring.body_half_width <= 0.0 {
            return Err(SimError::InvalidConfig(
                "move_speed and body_half_width must be positive".into(),
            ));
        }

        let combat = &self.combat;
        if combat.hit_limit <= 0.0 {
            return Err(SimError::InvalidConfig("hit_limit must be positive".into()));
        }
        if combat.left_jab_reach <= 0.0 || combat.left_jab_reach > 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "left_jab_reach ({}) must be in (0, 1]",
                combat.left_jab_reach
            )));
        }
        if combat.jab_duration_ms <= 0.0 || combat.uppercut_duration_ms <= 0.0 {
            return Err(SimError::InvalidConfig("attack durations must be positive".into()));
        }

        let stamina = &self.stamina;
        if stamina.recovery_interval_ms <= 0.0 {
            return Err(SimError::InvalidConfig("recovery_interval_ms must be positive".into()));
        }
        if !(stamina.low_enter_ratio < stamina.low_exit_ratio && stamina.low_exit_ratio <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "low_enter_ratio ({}) should be < low_exit_ratio ({}) <= 1",
                stamina.low_enter_ratio, stamina.low_exit_ratio
            )));
        }

        if self.rounds.rounds == 0 || self.rounds.round_seconds == 0 {
            return Err(SimError::InvalidConfig(
                "a bout needs at least one round of at least one second".into(),
            ));
        }

        if self.meta_ai.close_distance >= self.meta_ai.far_distance {
            return Err(SimError::InvalidConfig(format!(
                "close_distance ({}) should be < far_distance ({})",
                self.meta_ai.close_distance, self.meta_ai.far_distance
            )));
        }

        Ok(())
    }
}

/// Load and validate a bout configuration from a TOML file
pub fn load_config(path: &Path) -> Result<BoutConfig> {
    let contents = fs::read_to_string(path)?;
    BoutConfig::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_tactical_preset_only_widens_close_band() {
        let standard = MetaAiConfig::standard();
        let tactical = MetaAiConfig::tactical();
        assert_eq!(tactical.close_distance, 152.0);
        assert_eq!(tactical.far_distance, standard.far_distance);
        assert_eq!(tactical.override_seconds, standard.override_seconds);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BoutConfig::from_toml_str(
            r#"
            [rounds]
            rounds = 12

            [combat]
            falloff_distance = 200.0
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.rounds.rounds, 12);
        assert_eq!(config.rounds.round_seconds, 180);
        assert_eq!(config.combat.falloff_distance, 200.0);
        assert_eq!(config.combat.hit_limit, 280.0);
    }

    #[test]
    fn test_rejects_inverted_stamina_thresholds() {
        let mut config = BoutConfig::default();
        config.stamina.low_enter_ratio = 0.6;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_rounds() {
        let result = BoutConfig::from_toml_str("[rounds]\nrounds = 0\n");
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = BoutConfig::from_toml_str("[ring\nleft = 1");
        assert!(matches!(result, Err(SimError::TomlError(_))));
    }

    #[test]
    fn test_load_shipped_config() {
        let config = load_config(Path::new("data/bout.toml")).expect("Should load data/bout.toml");
        assert!(config.validate().is_ok());
    }
}
