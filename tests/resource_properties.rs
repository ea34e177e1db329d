//! Property tests for resource clamping, level odds and playbook shape

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ringside::bout::*;
use ringside::core::{BoutConfig, Corner, Level};

proptest! {
    #[test]
    fn resources_stay_within_bounds(
        max in 0.1f64..3.0,
        deltas in prop::collection::vec(-5.0f64..5.0, 0..64),
    ) {
        let stats = FighterStats { health: max, stamina: max, power: max, ..FighterStats::default() };
        let mut fighter = Fighter::new(Corner::Red, &stats, 400.0, true);
        let mut events = BoutEventLog::new();

        for delta in deltas {
            fighter.adjust_health(delta, &mut events);
            fighter.adjust_stamina(delta, &mut events);
            fighter.adjust_power(-delta, &mut events);

            prop_assert!(fighter.health >= 0.0 && fighter.health <= fighter.max_health);
            prop_assert!(fighter.stamina >= 0.0 && fighter.stamina <= fighter.max_stamina);
            prop_assert!(fighter.power >= 0.0 && fighter.power <= fighter.max_power);
        }

        for event in events.iter() {
            if let BoutEvent::ResourceChanged { fraction, .. } = event {
                prop_assert!((0.0..=1.0).contains(fraction));
            }
        }
    }

    #[test]
    fn levels_always_clamp(raw in any::<i32>()) {
        let level = Level::new(raw);
        prop_assert!(level >= Level::MIN && level <= Level::MAX);
    }

    #[test]
    fn level_odds_stay_in_band(raw in -20i32..40) {
        let odds = LevelOdds::for_level(Level::new(raw));
        prop_assert!((0.05..=0.8).contains(&odds.forward));
        prop_assert!((0.1..=0.7).contains(&odds.block));
        prop_assert!((0.0..=0.5).contains(&odds.jab));
        prop_assert!((0.0..=0.25).contains(&odds.uppercut));
        prop_assert!((0.05..=0.6).contains(&odds.none));
    }

    #[test]
    fn generated_playbooks_are_well_formed(seed in any::<u64>(), raw in 1i32..=10) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let playbook = Playbook::generate(Level::new(raw), &mut rng);

        prop_assert_eq!(playbook.len(), PLAYBOOK_LENGTH);
        for entry in playbook.entries() {
            if let Some(intent) = entry.intent() {
                prop_assert!(!(intent.forward && intent.back));
            }
        }
    }

    #[test]
    fn blocking_halves_damage(
        power in 0.0f64..2.0,
        distance in 0.0f64..280.0,
        pick in 0usize..3,
    ) {
        let attack = [Attack::JabLeft, Attack::JabRight, Attack::Uppercut][pick];
        let config = BoutConfig::default();
        let clean = hit_damage(attack, power, distance, false, &config.combat);
        let blocked = hit_damage(attack, power, distance, true, &config.combat);
        prop_assert!(clean > 0.0);
        prop_assert_eq!(blocked * 2.0, clean);
    }

    #[test]
    fn long_left_jab_never_lands(gap in 210.5f64..400.0) {
        let config = BoutConfig::default();
        let stats = FighterStats::default();
        let mut red = Fighter::new(Corner::Red, &stats, 300.0, true);
        let mut blue = Fighter::new(Corner::Blue, &stats, 300.0 + gap, false);
        let mut events = BoutEventLog::new();

        let commands = ActionSet { jab_left: true, ..ActionSet::default() };
        let frame = Frame { config: &config, dt: 16.0, opponent_position: blue.position };
        red.update(&commands, &frame, &mut events);

        prop_assert!(resolve_hit(&mut red, &mut blue, &config, &mut events).is_none());
        prop_assert_eq!(blue.health, 1.0);
    }
}
