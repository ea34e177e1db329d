//! Combat resolution
//!
//! Called once per ordered pair of fighters per tick. Range, facing and
//! collision checks are plain gates: failing any of them means no hit this
//! tick, never an error.

use crate::bout::actions::Attack;
use crate::bout::events::BoutEventLog;
use crate::bout::fighter::Fighter;
use crate::core::config::{BoutConfig, CombatConfig};

/// A punch that connected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    pub attack: Attack,
    pub damage: f64,
    pub blocked: bool,
    pub distance: f64,
}

/// Damage for a punch thrown with `power` from `distance`
pub fn hit_damage(attack: Attack, power: f64, distance: f64, blocked: bool, config: &CombatConfig) -> f64 {
    let mut damage = (config.damage_per_power * power).max(config.min_damage);

    match attack {
        Attack::Uppercut => damage *= config.uppercut_multiplier,
        Attack::JabLeft => damage *= config.left_jab_multiplier,
        Attack::JabRight => {}
    }

    if distance >= config.falloff_distance {
        damage *= 0.5;
    }
    if blocked {
        damage *= 0.5;
    }
    damage
}

/// The attack that would connect this tick, if any
pub fn connecting_attack(attacker: &Fighter, defender: &Fighter, config: &BoutConfig) -> Option<Attack> {
    if attacker.is_ko || defender.is_ko || !attacker.is_attacking() || attacker.has_hit {
        return None;
    }
    let attack = attacker.current_attack?;

    if !attacker.is_facing(defender.position) {
        return None;
    }

    let distance = (attacker.position - defender.position).abs();
    let combat = &config.combat;
    if distance > combat.hit_limit {
        return None;
    }

    let half = config.ring.body_half_width;
    let (a_min, a_max) = attacker.extent(half);
    let (d_min, d_max) = defender.extent(half);
    if a_max < d_min || d_max < a_min {
        return None;
    }

    if attack == Attack::JabLeft && distance > combat.left_jab_reach * combat.hit_limit {
        return None;
    }

    Some(attack)
}

/// Land `attacker`'s punch on `defender` if every gate passes
///
/// A blocked punch does half damage and costs the attacker power and
/// stamina; only clean punches count toward the hit tally.
pub fn resolve_hit(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    config: &BoutConfig,
    events: &mut BoutEventLog,
) -> Option<HitOutcome> {
    let attack = connecting_attack(attacker, defender, config)?;
    let combat = &config.combat;

    let distance = (attacker.position - defender.position).abs();
    let blocked = defender.is_blocking;
    let damage = hit_damage(attack, attacker.attack_power, distance, blocked, combat);

    attacker.has_hit = true;
    defender.receive_hit(attack, damage, blocked, combat, events);

    if blocked {
        let penalty = match attack {
            Attack::Uppercut => combat.uppercut_block_penalty,
            Attack::JabLeft | Attack::JabRight => combat.block_penalty,
        };
        attacker.adjust_power(-penalty, events);
        attacker.adjust_stamina(-penalty, events);
    } else {
        attacker.hits_landed += 1;
    }

    tracing::trace!(
        "{} {:?} on {} for {:.4}{}",
        attacker.corner,
        attack,
        defender.corner,
        damage,
        if blocked { " (blocked)" } else { "" }
    );

    Some(HitOutcome {
        attack,
        damage,
        blocked,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bout::actions::ActionSet;
    use crate::bout::fighter::{FighterStats, Frame};
    use crate::core::types::Corner;

    fn pair(red_position: f64, blue_position: f64) -> (Fighter, Fighter) {
        let stats = FighterStats::default();
        (
            Fighter::new(Corner::Red, &stats, red_position, true),
            Fighter::new(Corner::Blue, &stats, blue_position, false),
        )
    }

    fn throw(fighter: &mut Fighter, attack: Attack, opponent_position: f64, config: &BoutConfig) {
        let mut commands = ActionSet::none();
        match attack {
            Attack::JabLeft => commands.jab_left = true,
            Attack::JabRight => commands.jab_right = true,
            Attack::Uppercut => commands.uppercut = true,
        }
        let frame = Frame {
            config,
            dt: 16.0,
            opponent_position,
        };
        fighter.update(&commands, &frame, &mut BoutEventLog::new());
    }

    #[test]
    fn test_damage_formula() {
        let config = CombatConfig::default();
        assert!((hit_damage(Attack::JabRight, 1.0, 0.0, false, &config) - 0.05).abs() < 1e-12);
        assert!((hit_damage(Attack::Uppercut, 1.0, 0.0, false, &config) - 0.1).abs() < 1e-12);
        assert!((hit_damage(Attack::JabLeft, 1.0, 0.0, false, &config) - 0.075).abs() < 1e-12);
        assert!((hit_damage(Attack::JabRight, 0.0, 0.0, false, &config) - 0.009).abs() < 1e-12);
        assert!((hit_damage(Attack::JabRight, 1.0, 270.0, false, &config) - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_blocked_hit_is_exactly_half() {
        let config = CombatConfig::default();
        for attack in [Attack::JabLeft, Attack::JabRight, Attack::Uppercut] {
            let clean = hit_damage(attack, 0.8, 120.0, false, &config);
            let blocked = hit_damage(attack, 0.8, 120.0, true, &config);
            assert_eq!(blocked * 2.0, clean);
        }
    }

    #[test]
    fn test_clean_hit_lands_once() {
        let config = BoutConfig::default();
        let mut events = BoutEventLog::new();
        let (mut red, mut blue) = pair(500.0, 600.0);
        throw(&mut red, Attack::JabRight, blue.position, &config);

        let outcome = resolve_hit(&mut red, &mut blue, &config, &mut events).unwrap();
        assert!(!outcome.blocked);
        assert!((blue.health - 0.95).abs() < 1e-12);
        assert_eq!(red.hits_landed, 1);
        assert!(blue.is_retreating);

        assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_none());
        assert!((blue.health - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_blocked_hit_penalizes_attacker() {
        let config = BoutConfig::default();
        let mut events = BoutEventLog::new();
        let (mut red, mut blue) = pair(500.0, 600.0);
        blue.is_blocking = true;
        throw(&mut red, Attack::Uppercut, blue.position, &config);
        let power_after_windup = red.power;
        let stamina_after_windup = red.stamina;

        let outcome = resolve_hit(&mut red, &mut blue, &config, &mut events).unwrap();
        assert!(outcome.blocked);
        assert!((outcome.damage - 0.05).abs() < 1e-12);
        assert_eq!(red.hits_landed, 0);
        assert!((red.power - (power_after_windup - 0.12)).abs() < 1e-12);
        assert!((red.stamina - (stamina_after_windup - 0.12)).abs() < 1e-12);
        assert!(blue.is_retreating);
        assert_eq!(blue.last_action, crate::bout::actions::Action::Idle);
    }

    #[test]
    fn test_left_jab_has_shorter_reach() {
        let config = BoutConfig::default();
        let mut events = BoutEventLog::new();

        let (mut red, mut blue) = pair(500.0, 720.0);
        throw(&mut red, Attack::JabLeft, blue.position, &config);
        assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_none());

        let (mut red, mut blue) = pair(500.0, 720.0);
        throw(&mut red, Attack::JabRight, blue.position, &config);
        assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_some());

        let (mut red, mut blue) = pair(500.0, 700.0);
        throw(&mut red, Attack::JabLeft, blue.position, &config);
        assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_some());
    }

    #[test]
    fn test_out_of_range_misses() {
        let config = BoutConfig::default();
        let mut events = BoutEventLog::new();
        let (mut red, mut blue) = pair(500.0, 790.0);
        throw(&mut red, Attack::Uppercut, blue.position, &config);
        assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_none());
        assert_eq!(blue.health, 1.0);
    }

    #[test]
    fn test_must_face_defender() {
        let config = BoutConfig::default();
        let mut events = BoutEventLog::new();
        let (mut red, mut blue) = pair(500.0, 600.0);
        red.facing_right = false;
        throw(&mut red, Attack::JabRight, blue.position, &config);
        assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_none());
    }

    #[test]
    fn test_idle_attacker_never_hits() {
        let config = BoutConfig::default();
        let mut events = BoutEventLog::new();
        let (mut red, mut blue) = pair(500.0, 520.0);
        assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_none());
    }

    #[test]
    fn test_damage_uses_windup_power() {
        let config = BoutConfig::default();
        let mut events = BoutEventLog::new();
        let (mut red, mut blue) = pair(500.0, 500.0);
        throw(&mut red, Attack::Uppercut, blue.position, &config);
        assert!(red.power < 1.0);

        let outcome = resolve_hit(&mut red, &mut blue, &config, &mut events).unwrap();
        assert!((outcome.damage - 0.1).abs() < 1e-12);
    }
}
