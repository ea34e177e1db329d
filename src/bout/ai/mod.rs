//! Adaptive rule engine for scripted fighters
//!
//! Architecture: trait + data
//! - MetaAi trait is the seam the bout drives once per simulated second
//! - RuleEngine is the shipped implementation; its thresholds come from
//!   `MetaAiConfig` (standard or tactical preset)
//! - Overrides reach fighters only through `Controller::schedule_override`
//!   and `Controller::shift_level`

mod rules;

pub use rules::RuleEngine;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bout::events::BoutEventLog;
use crate::bout::execution::Contender;
use crate::core::error::Result;
use crate::core::types::Second;

/// Match condition an override was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    TooClose,
    TooFar,
    BothTired,
    OneTired,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::TooClose => "too close",
            RuleKind::TooFar => "too far",
            RuleKind::BothTired => "both tired",
            RuleKind::OneTired => "one tired",
        };
        f.write_str(name)
    }
}

/// Trait for bout-level AI layered over the controllers
pub trait MetaAi {
    /// Look at both corners and issue overrides; called once per simulated
    /// second. Returns the rule that fired, if any.
    ///
    /// An `Err` is never fatal to the bout; the caller suppresses the engine
    /// for a short cooldown and carries on.
    fn evaluate(
        &mut self,
        second: Second,
        contenders: &mut [Contender; 2],
        events: &mut BoutEventLog,
    ) -> Result<Option<RuleKind>>;

    /// Rule whose window is open or most recently fired
    fn active_rule(&self) -> Option<RuleKind>;

    /// First second at which evaluation resumes
    fn active_until(&self) -> Second;

    /// Skip evaluation before `second`
    fn suppress_until(&mut self, second: Second);
}
