//! Action vocabulary
//!
//! `ActionSet` is what a fighter is commanded to do on one tick. `PlaybookEntry`
//! is the sparse, position-independent intent scripts are written in; the
//! controller turns one into the other.

use serde::{Deserialize, Serialize};

/// Every intent a fighter can receive on a single tick
///
/// Vertical movement is part of the vocabulary shared with the input layer;
/// the ring is one-dimensional so fighters ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub block: bool,
    pub jab_left: bool,
    pub jab_right: bool,
    pub uppercut: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub hurt1: bool,
    pub hurt2: bool,
    pub dizzy: bool,
    pub idle: bool,
    pub ko: bool,
    pub win: bool,
}

impl ActionSet {
    /// All intents false
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ko_command() -> Self {
        Self {
            ko: true,
            ..Self::default()
        }
    }

    pub fn win_command() -> Self {
        Self {
            win: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn has_attack(&self) -> bool {
        self.jab_left || self.jab_right || self.uppercut
    }

    pub fn has_movement(&self) -> bool {
        self.move_left || self.move_right
    }

    /// Drop everything a script or player asked for, keeping the
    /// state-machine commands (ko, win, hurt, dizzy, idle) and facing
    pub fn clear_scripted(&mut self) {
        self.move_left = false;
        self.move_right = false;
        self.move_up = false;
        self.move_down = false;
        self.block = false;
        self.jab_left = false;
        self.jab_right = false;
        self.uppercut = false;
    }

    /// Command that plays a non-offensive animation, if any
    pub fn passive_action(&self) -> Option<Action> {
        if self.hurt1 {
            Some(Action::Hurt1)
        } else if self.hurt2 {
            Some(Action::Hurt2)
        } else if self.dizzy {
            Some(Action::Dizzy)
        } else if self.idle {
            Some(Action::Idle)
        } else {
            None
        }
    }

    /// Attack chosen from the set by priority: right jab, left jab, uppercut
    pub fn attack(&self) -> Option<Attack> {
        if self.jab_right {
            Some(Attack::JabRight)
        } else if self.jab_left {
            Some(Attack::JabLeft)
        } else if self.uppercut {
            Some(Attack::Uppercut)
        } else {
            None
        }
    }
}

/// The action a fighter last played, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Block,
    JabLeft,
    JabRight,
    Uppercut,
    MoveLeft,
    MoveRight,
    Hurt1,
    Hurt2,
    Dizzy,
    Ko,
    Win,
}

/// Punch types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attack {
    JabLeft,
    JabRight,
    Uppercut,
}

impl Attack {
    pub fn action(self) -> Action {
        match self {
            Attack::JabLeft => Action::JabLeft,
            Attack::JabRight => Action::JabRight,
            Attack::Uppercut => Action::Uppercut,
        }
    }

    /// Animation the defender plays when this punch lands clean
    pub fn reaction(self) -> Action {
        match self {
            Attack::JabRight => Action::Hurt1,
            Attack::JabLeft => Action::Hurt2,
            Attack::Uppercut => Action::Dizzy,
        }
    }
}

/// Relative intents of a non-empty playbook entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub forward: bool,
    pub back: bool,
    pub block: bool,
    pub jab_left: bool,
    pub jab_right: bool,
    pub uppercut: bool,
}

impl Intent {
    pub const IDLE: Intent = Intent {
        forward: false,
        back: false,
        block: false,
        jab_left: false,
        jab_right: false,
        uppercut: false,
    };
}

/// One scripted second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybookEntry {
    /// Nothing scheduled
    Rest,
    Act(Intent),
}

impl PlaybookEntry {
    pub fn intent(&self) -> Option<&Intent> {
        match self {
            PlaybookEntry::Rest => None,
            PlaybookEntry::Act(intent) => Some(intent),
        }
    }
}

impl From<Intent> for PlaybookEntry {
    fn from(intent: Intent) -> Self {
        PlaybookEntry::Act(intent)
    }
}
