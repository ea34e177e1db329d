//! Fighter controllers
//!
//! A controller turns simulated time into the `ActionSet` a fighter acts on.
//! Scripted controllers read their level's playbook once per simulated
//! second; a human controller replays whatever input the host decoded.

use std::collections::BTreeMap;

use crate::bout::actions::{ActionSet, PlaybookEntry};
use crate::bout::playbook::PlaybookSet;
use crate::core::types::{Level, Second};

/// Source of a fighter's commands
pub trait Controller {
    /// Commands for the current tick
    fn actions(&mut self, own_position: f64, opponent_position: f64, second: Second) -> ActionSet;

    /// Difficulty level, if this controller has one
    fn level(&self) -> Option<Level> {
        None
    }

    /// Set the level (clamped to 1..=10); ignored by controllers without one
    fn set_level(&mut self, _level: i32) {}

    fn shift_level(&mut self, delta: i32) {
        if let Some(level) = self.level() {
            self.set_level(level.shifted(delta).get() as i32);
        }
    }

    /// Replace the script for one future second; ignored by controllers without a script
    fn schedule_override(&mut self, _second: Second, _entry: PlaybookEntry) {}

    fn name(&self) -> &str;
}

/// Turn a relative playbook entry into concrete commands
///
/// Forward means toward the opponent; a fighter not strictly left of its
/// opponent treats forward as moving left.
pub fn to_action_set(entry: &PlaybookEntry, own_position: f64, opponent_position: f64) -> ActionSet {
    let Some(intent) = entry.intent() else {
        return ActionSet::none();
    };

    let left_of_opponent = own_position < opponent_position;
    let mut actions = ActionSet {
        block: intent.block,
        jab_left: intent.jab_left,
        jab_right: intent.jab_right,
        uppercut: intent.uppercut,
        ..ActionSet::default()
    };

    if intent.forward {
        actions.move_right = left_of_opponent;
        actions.move_left = !left_of_opponent;
    } else if intent.back {
        actions.move_right = !left_of_opponent;
        actions.move_left = left_of_opponent;
    }

    actions
}

/// AI controller driven by a playbook set and an override queue
#[derive(Debug, Clone)]
pub struct ScriptedController {
    playbooks: PlaybookSet,
    level: Level,
    /// Cursor into the active playbook; survives level changes
    index: usize,
    last_decision_second: Option<Second>,
    cached: ActionSet,
    /// Seconds whose script the rule engine has replaced
    overrides: BTreeMap<Second, PlaybookEntry>,
}

impl ScriptedController {
    pub fn new(playbooks: PlaybookSet, level: Level) -> Self {
        Self {
            playbooks,
            level,
            index: 0,
            last_decision_second: None,
            cached: ActionSet::none(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pending_overrides(&self) -> usize {
        self.overrides.len()
    }

    pub fn override_for(&self, second: Second) -> Option<&PlaybookEntry> {
        self.overrides.get(&second)
    }

    /// Pick this second's entry and advance the cursor
    fn decide(&mut self, second: Second) -> PlaybookEntry {
        self.overrides = self.overrides.split_off(&second);

        let playbook = self.playbooks.for_level(self.level);
        let scripted = playbook.entry(self.index);
        self.index = (self.index + 1) % playbook.len();

        self.overrides.remove(&second).unwrap_or(scripted)
    }
}

impl Controller for ScriptedController {
    fn actions(&mut self, own_position: f64, opponent_position: f64, second: Second) -> ActionSet {
        if self.last_decision_second == Some(second) {
            return self.cached;
        }

        let entry = self.decide(second);
        self.cached = to_action_set(&entry, own_position, opponent_position);
        self.last_decision_second = Some(second);

        tracing::debug!(
            "Level {} decision at {}s: {:?}",
            self.level,
            second,
            entry
        );
        self.cached
    }

    fn level(&self) -> Option<Level> {
        Some(self.level)
    }

    fn set_level(&mut self, level: i32) {
        self.level = Level::new(level);
    }

    fn schedule_override(&mut self, second: Second, entry: PlaybookEntry) {
        self.overrides.insert(second, entry);
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Controller fed by pre-decoded player input
#[derive(Debug, Clone, Default)]
pub struct HumanController {
    input: ActionSet,
}

impl HumanController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest decoded input; applies until replaced
    pub fn set_input(&mut self, input: ActionSet) {
        self.input = input;
    }
}

impl Controller for HumanController {
    fn actions(&mut self, _own_position: f64, _opponent_position: f64, _second: Second) -> ActionSet {
        self.input
    }

    fn name(&self) -> &str {
        "human"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bout::actions::Intent;
    use crate::bout::playbook::Playbook;

    fn intent_entry(intent: Intent) -> PlaybookEntry {
        PlaybookEntry::Act(intent)
    }

    fn forward() -> PlaybookEntry {
        intent_entry(Intent {
            forward: true,
            ..Intent::IDLE
        })
    }

    fn back() -> PlaybookEntry {
        intent_entry(Intent {
            back: true,
            ..Intent::IDLE
        })
    }

    fn jab() -> PlaybookEntry {
        intent_entry(Intent {
            jab_right: true,
            ..Intent::IDLE
        })
    }

    /// Level n's playbook repeats a marker the test can recognise
    fn marked_set() -> PlaybookSet {
        let playbooks = Level::all()
            .map(|level| {
                let entries = (0..180)
                    .map(|slot| {
                        intent_entry(Intent {
                            forward: slot % 2 == 0,
                            jab_left: level.get() >= 5,
                            ..Intent::IDLE
                        })
                    })
                    .collect();
                Playbook::from_entries(entries).unwrap()
            })
            .collect();
        PlaybookSet::from_playbooks(playbooks).unwrap()
    }

    #[test]
    fn test_conversion_relative_to_opponent() {
        let left_side = to_action_set(&forward(), 100.0, 500.0);
        assert!(left_side.move_right && !left_side.move_left);

        let right_side = to_action_set(&forward(), 500.0, 100.0);
        assert!(right_side.move_left && !right_side.move_right);

        let retreat = to_action_set(&back(), 100.0, 500.0);
        assert!(retreat.move_left && !retreat.move_right);

        assert!(to_action_set(&PlaybookEntry::Rest, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_conversion_copies_punches_and_block() {
        let entry = intent_entry(Intent {
            block: true,
            jab_left: true,
            uppercut: true,
            ..Intent::IDLE
        });
        let actions = to_action_set(&entry, 0.0, 10.0);
        assert!(actions.block && actions.jab_left && actions.uppercut);
        assert!(!actions.jab_right && !actions.has_movement());
    }

    #[test]
    fn test_one_decision_per_second() {
        let playbook = Playbook::from_entries(vec![jab(), PlaybookEntry::Rest]).unwrap();
        let mut controller = ScriptedController::new(PlaybookSet::uniform(playbook), Level::new(3));

        let first = controller.actions(0.0, 100.0, 0);
        for _ in 0..30 {
            assert_eq!(controller.actions(0.0, 100.0, 0), first);
        }
        assert_eq!(controller.index(), 1);

        let second = controller.actions(0.0, 100.0, 1);
        assert!(second.is_empty());
        assert_eq!(controller.index(), 0);
    }

    #[test]
    fn test_level_is_clamped() {
        let mut controller = ScriptedController::new(PlaybookSet::seeded(1), Level::new(5));
        controller.set_level(25);
        assert_eq!(controller.level(), Some(Level::MAX));
        controller.shift_level(-30);
        assert_eq!(controller.level(), Some(Level::MIN));
        controller.shift_level(2);
        assert_eq!(controller.level(), Some(Level::new(3)));
    }

    #[test]
    fn test_level_switch_keeps_cursor() {
        let mut controller = ScriptedController::new(marked_set(), Level::new(2));

        for second in 0..7 {
            let actions = controller.actions(0.0, 100.0, second);
            assert!(!actions.jab_left);
        }
        assert_eq!(controller.index(), 7);

        controller.shift_level(4);
        assert_eq!(controller.index(), 7);

        // Slot 7 of the level-6 script: odd slot (no step), level >= 5 (left jab)
        let actions = controller.actions(0.0, 100.0, 7);
        assert!(actions.jab_left);
        assert!(!actions.move_right);
        assert_eq!(controller.index(), 8);
    }

    #[test]
    fn test_override_takes_precedence_and_advances_cursor() {
        let playbook = Playbook::repeating(jab()).unwrap();
        let mut controller = ScriptedController::new(PlaybookSet::uniform(playbook), Level::new(5));

        controller.schedule_override(2, back());
        controller.schedule_override(2, forward());

        assert!(controller.actions(0.0, 100.0, 0).jab_right);
        assert!(controller.actions(0.0, 100.0, 1).jab_right);

        let overridden = controller.actions(0.0, 100.0, 2);
        assert!(overridden.move_right);
        assert!(!overridden.jab_right);
        assert_eq!(controller.index(), 3);
        assert_eq!(controller.pending_overrides(), 0);
    }

    #[test]
    fn test_stale_overrides_are_pruned() {
        let playbook = Playbook::repeating(PlaybookEntry::Rest).unwrap();
        let mut controller = ScriptedController::new(PlaybookSet::uniform(playbook), Level::new(5));

        controller.schedule_override(1, forward());
        controller.schedule_override(9, back());

        controller.actions(0.0, 100.0, 5);
        assert_eq!(controller.pending_overrides(), 1);
        assert_eq!(controller.override_for(9), Some(&back()));
    }

    #[test]
    fn test_human_controller_replays_input() {
        let mut human = HumanController::new();
        assert!(human.actions(0.0, 0.0, 0).is_empty());

        human.set_input(ActionSet {
            uppercut: true,
            ..ActionSet::default()
        });
        human.shift_level(3);
        human.schedule_override(1, forward());

        assert_eq!(human.level(), None);
        assert!(human.actions(0.0, 0.0, 1).uppercut);
        assert!(human.actions(0.0, 0.0, 1).uppercut);
    }
}
