//! Playbook generation
//!
//! A playbook is 180 scripted seconds for one difficulty level. Each fighter
//! slot owns its own set of ten playbooks, generated independently, so two
//! fighters at the same level do not follow the same script.
//!
//! Higher levels idle less, advance more, block less and punch more. The
//! odds below define game balance and must stay monotonic in the level.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bout::actions::{Intent, PlaybookEntry};
use crate::bout::constants::{LEVEL_COUNT, PLAYBOOK_LENGTH};
use crate::core::error::{Result, SimError};
use crate::core::types::Level;

/// Per-slot probabilities for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelOdds {
    /// Chance the whole slot is empty
    pub none: f64,
    pub forward: f64,
    /// Chance of stepping back, rolled only when forward was not chosen
    pub back: f64,
    pub block: f64,
    pub jab: f64,
    pub uppercut: f64,
}

impl LevelOdds {
    pub fn for_level(level: Level) -> Self {
        let l = level.get() as f64;
        Self {
            none: (0.6 - 0.05 * l).max(0.05),
            forward: (0.1 + 0.05 * l).min(0.8),
            back: (0.6 - 0.05 * l).max(0.05),
            block: (0.7 - 0.05 * l).max(0.1),
            jab: (0.05 * l).min(0.5),
            uppercut: (0.02 * l).min(0.25),
        }
    }

    /// Roll one playbook slot
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> PlaybookEntry {
        if rng.gen_bool(self.none) {
            return PlaybookEntry::Rest;
        }

        let mut intent = Intent::IDLE;
        if rng.gen_bool(self.forward) {
            intent.forward = true;
        } else if rng.gen_bool(self.back) {
            intent.back = true;
        }

        intent.block = rng.gen_bool(self.block);

        if rng.gen_bool(self.jab) {
            if rng.gen_bool(0.5) {
                intent.jab_left = true;
            } else {
                intent.jab_right = true;
            }
        }

        intent.uppercut = rng.gen_bool(self.uppercut);

        PlaybookEntry::Act(intent)
    }
}

/// Scripted seconds for one level; reads wrap around the end
#[derive(Debug, Clone, PartialEq)]
pub struct Playbook {
    entries: Vec<PlaybookEntry>,
}

impl Playbook {
    /// Build from explicit entries
    ///
    /// Fails on an empty list or an entry that moves both ways.
    pub fn from_entries(entries: Vec<PlaybookEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(SimError::EmptyPlaybook);
        }
        if let Some(index) = entries
            .iter()
            .position(|e| matches!(e, PlaybookEntry::Act(i) if i.forward && i.back))
        {
            return Err(SimError::ConflictingMovement { index });
        }
        Ok(Self { entries })
    }

    /// Playbook that repeats a single entry
    pub fn repeating(entry: PlaybookEntry) -> Result<Self> {
        Self::from_entries(vec![entry; PLAYBOOK_LENGTH])
    }

    pub fn generate<R: Rng + ?Sized>(level: Level, rng: &mut R) -> Self {
        let odds = LevelOdds::for_level(level);
        let entries = (0..PLAYBOOK_LENGTH).map(|_| odds.roll(rng)).collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, wrapping modulo the playbook length
    pub fn entry(&self, index: usize) -> PlaybookEntry {
        self.entries[index % self.entries.len()]
    }

    pub fn entries(&self) -> &[PlaybookEntry] {
        &self.entries
    }
}

/// One playbook per level for a single fighter slot
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybookSet {
    by_level: Vec<Playbook>,
}

impl PlaybookSet {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let by_level = Level::all().map(|level| Playbook::generate(level, rng)).collect();
        Self { by_level }
    }

    /// Deterministic set for a seed
    pub fn seeded(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::generate(&mut rng)
    }

    /// Set built from ten playbooks, lowest level first
    pub fn from_playbooks(by_level: Vec<Playbook>) -> Result<Self> {
        if by_level.len() != LEVEL_COUNT {
            return Err(SimError::PlaybookSetSize {
                expected: LEVEL_COUNT,
                found: by_level.len(),
            });
        }
        Ok(Self { by_level })
    }

    /// The same script at every level
    pub fn uniform(playbook: Playbook) -> Self {
        Self {
            by_level: vec![playbook; LEVEL_COUNT],
        }
    }

    pub fn for_level(&self, level: Level) -> &Playbook {
        &self.by_level[level.index()]
    }
}
