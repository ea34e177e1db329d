//! Distance and fatigue rules
//!
//! Rules are checked in a fixed order (too close, too far, both tired, one
//! tired) and the first match wins. A fired rule opens a window of
//! `override_seconds` during which evaluation is a no-op.

use crate::bout::actions::{Intent, PlaybookEntry};
use crate::bout::ai::{MetaAi, RuleKind};
use crate::bout::events::{BoutEvent, BoutEventLog};
use crate::bout::execution::Contender;
use crate::bout::fighter::Fighter;
use crate::core::config::MetaAiConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::Second;

const FORWARD: Intent = Intent {
    forward: true,
    ..Intent::IDLE
};
const BACK: Intent = Intent {
    back: true,
    ..Intent::IDLE
};
const BLOCK: Intent = Intent {
    block: true,
    ..Intent::IDLE
};
const BACK_BLOCK: Intent = Intent {
    back: true,
    block: true,
    ..Intent::IDLE
};
const FORWARD_BLOCK: Intent = Intent {
    forward: true,
    block: true,
    ..Intent::IDLE
};
const JAB_RIGHT: Intent = Intent {
    jab_right: true,
    ..Intent::IDLE
};
const FORWARD_JAB_LEFT: Intent = Intent {
    forward: true,
    jab_left: true,
    ..Intent::IDLE
};
const FORWARD_JAB_RIGHT: Intent = Intent {
    forward: true,
    jab_right: true,
    ..Intent::IDLE
};
const UPPERCUT: Intent = Intent {
    uppercut: true,
    ..Intent::IDLE
};
const FORWARD_UPPERCUT: Intent = Intent {
    forward: true,
    uppercut: true,
    ..Intent::IDLE
};

// Scripted exchanges, one entry per second of the override window
const LEADER_PRESSES: [Intent; 3] = [JAB_RIGHT, FORWARD_JAB_LEFT, UPPERCUT];
const TRAILER_COVERS: [Intent; 3] = [BACK_BLOCK, BACK_BLOCK, BLOCK];
const LEADER_CLOSES: [Intent; 3] = [FORWARD, FORWARD, FORWARD_JAB_RIGHT];
const TRAILER_CLOSES: [Intent; 3] = [FORWARD_BLOCK, FORWARD_BLOCK, BLOCK];
const DISENGAGE: [Intent; 3] = [BACK, BACK, BACK];
const TIRED_RETREATS: [Intent; 3] = [BACK_BLOCK, BACK_BLOCK, BACK_BLOCK];
const FRESH_ATTACKS: [Intent; 3] = [FORWARD, FORWARD_UPPERCUT, UPPERCUT];

#[derive(Debug, Clone)]
pub struct RuleEngine {
    config: MetaAiConfig,
    active_rule: Option<RuleKind>,
    active_until: Second,
}

impl RuleEngine {
    pub fn new(config: MetaAiConfig) -> Self {
        Self {
            config,
            active_rule: None,
            active_until: 0,
        }
    }

    pub fn standard() -> Self {
        Self::new(MetaAiConfig::standard())
    }

    pub fn tactical() -> Self {
        Self::new(MetaAiConfig::tactical())
    }

    pub fn config(&self) -> &MetaAiConfig {
        &self.config
    }

    fn is_tired(&self, fighter: &Fighter) -> bool {
        fighter.stamina_fraction() < self.config.tired_ratio
    }

    /// First matching rule for the current positions and stamina
    pub fn classify(&self, red: &Fighter, blue: &Fighter) -> Option<RuleKind> {
        let distance = (red.position - blue.position).abs();
        let red_tired = self.is_tired(red);
        let blue_tired = self.is_tired(blue);

        if distance < self.config.close_distance {
            Some(RuleKind::TooClose)
        } else if distance > self.config.far_distance {
            Some(RuleKind::TooFar)
        } else if red_tired && blue_tired {
            Some(RuleKind::BothTired)
        } else if red_tired != blue_tired {
            Some(RuleKind::OneTired)
        } else {
            None
        }
    }

    /// Queue `script` into `[start, start + override_seconds)`, holding the last entry
    fn schedule(&self, contender: &mut Contender, start: Second, script: &[Intent]) {
        let Some(last) = script.last() else {
            return;
        };
        for offset in 0..self.config.override_seconds {
            let intent = script.get(offset as usize).unwrap_or(last);
            contender
                .controller
                .schedule_override(start + offset, PlaybookEntry::Act(*intent));
        }
    }

    fn shift(contender: &mut Contender, delta: i32, events: &mut BoutEventLog) {
        contender.controller.shift_level(delta);
        if let Some(level) = contender.controller.level() {
            tracing::debug!("{} level shifted to {}", contender.fighter.corner, level);
            events.push(BoutEvent::LevelShifted {
                corner: contender.fighter.corner,
                level,
            });
        }
    }
}

fn check_finite(fighter: &Fighter) -> Result<()> {
    let stamina = fighter.stamina_fraction();
    let health = fighter.health_fraction();
    if !stamina.is_finite() || !health.is_finite() || !fighter.position.is_finite() {
        return Err(SimError::NonFiniteState(format!(
            "{} fighter: stamina fraction {}, health fraction {}, position {}",
            fighter.corner, stamina, health, fighter.position
        )));
    }
    Ok(())
}

impl MetaAi for RuleEngine {
    fn evaluate(
        &mut self,
        second: Second,
        contenders: &mut [Contender; 2],
        events: &mut BoutEventLog,
    ) -> Result<Option<RuleKind>> {
        if second < self.active_until {
            return Ok(None);
        }

        let [red, blue] = contenders;
        check_finite(&red.fighter)?;
        check_finite(&blue.fighter)?;

        for contender in [&mut *red, &mut *blue] {
            contender.fighter.adjust_stamina(self.config.passive_stamina, events);
            contender.fighter.adjust_health(self.config.passive_health, events);
        }

        let Some(rule) = self.classify(&red.fighter, &blue.fighter) else {
            self.active_rule = None;
            return Ok(None);
        };

        let red_leads = red.fighter.health_fraction() >= blue.fighter.health_fraction();
        match rule {
            RuleKind::TooClose | RuleKind::TooFar => {
                let (leader, trailer) = if red_leads { (red, blue) } else { (blue, red) };
                let (lead_script, trail_script) = if rule == RuleKind::TooClose {
                    (&LEADER_PRESSES, &TRAILER_COVERS)
                } else {
                    (&LEADER_CLOSES, &TRAILER_CLOSES)
                };
                self.schedule(leader, second, lead_script);
                self.schedule(trailer, second, trail_script);
            }
            RuleKind::BothTired => {
                self.schedule(red, second, &DISENGAGE);
                self.schedule(blue, second, &DISENGAGE);
            }
            RuleKind::OneTired => {
                let (tired, fresh) = if self.is_tired(&red.fighter) {
                    (red, blue)
                } else {
                    (blue, red)
                };
                Self::shift(tired, -1, events);
                Self::shift(fresh, 1, events);
                self.schedule(tired, second, &TIRED_RETREATS);
                self.schedule(fresh, second, &FRESH_ATTACKS);
            }
        }

        self.active_rule = Some(rule);
        self.active_until = second + self.config.override_seconds;
        events.push(BoutEvent::RuleActivated {
            rule,
            until: self.active_until,
        });
        tracing::debug!("Rule '{}' fired at {}s, quiet until {}s", rule, second, self.active_until);

        Ok(Some(rule))
    }

    fn active_rule(&self) -> Option<RuleKind> {
        self.active_rule
    }

    fn active_until(&self) -> Second {
        self.active_until
    }

    fn suppress_until(&mut self, second: Second) {
        self.active_until = self.active_until.max(second);
    }
}
