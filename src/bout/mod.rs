//! Bout simulation - two boxers, a clock and a referee
//!
//! The host drives everything by calling `BoutState::tick` with a
//! delta-time. Nothing here owns a thread, a timer or a renderer.
//!
//! Layering:
//! - Controllers decide once per simulated second (scripted or human)
//! - The rule engine overrides scripts from live distance and fatigue
//! - Fighters apply commands under a strict priority order
//! - The resolver lands punches; the bout runs rounds, breaks and KOs

pub mod actions;
pub mod ai;
pub mod clock;
pub mod constants;
pub mod controller;
pub mod events;
pub mod execution;
pub mod fighter;
pub mod playbook;
pub mod resolution;

// Re-exports for convenient access
pub use actions::{Action, ActionSet, Attack, Intent, PlaybookEntry};
pub use ai::{MetaAi, RuleEngine, RuleKind};
pub use clock::MatchClock;
pub use constants::*;
pub use controller::{to_action_set, Controller, HumanController, ScriptedController};
pub use events::{BoutEvent, BoutEventLog, EventBus, SubscriptionId, WinMethod};
pub use execution::{starting_mark, BoutOutcome, BoutPhase, BoutState, Contender};
pub use fighter::{Fighter, FighterState, FighterStats, Frame};
pub use playbook::{LevelOdds, Playbook, PlaybookSet};
pub use resolution::{connecting_attack, hit_damage, resolve_hit, HitOutcome};
