//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole simulated seconds since the bout started
pub type Second = u32;

/// Simulated milliseconds (the host loop's delta-time unit)
pub type Millis = f64;

/// Ring corner a fighter is assigned to. Red is player one, Blue is player two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    Red,
    Blue,
}

impl Corner {
    pub const ALL: [Corner; 2] = [Corner::Red, Corner::Blue];

    pub fn opponent(self) -> Self {
        match self {
            Corner::Red => Corner::Blue,
            Corner::Blue => Corner::Red,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Corner::Red => 0,
            Corner::Blue => 1,
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::Red => write!(f, "red"),
            Corner::Blue => write!(f, "blue"),
        }
    }
}

/// Difficulty level of a scripted fighter
///
/// Always within `1..=10`. Out-of-range inputs are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(10);

    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Level moved by `delta`, clamped to the valid range
    pub fn shifted(self, delta: i32) -> Self {
        Self::new(self.0 as i32 + delta)
    }

    /// Zero-based position of this level in a playbook set
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN.0..=Self::MAX.0).map(Level)
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fighter resource reported to HUD observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Health,
    Stamina,
    Power,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_clamps_out_of_range() {
        assert_eq!(Level::new(0), Level::MIN);
        assert_eq!(Level::new(-7), Level::MIN);
        assert_eq!(Level::new(11), Level::MAX);
        assert_eq!(Level::new(4).get(), 4);
    }

    #[test]
    fn test_level_shift_saturates() {
        assert_eq!(Level::new(9).shifted(3), Level::MAX);
        assert_eq!(Level::new(2).shifted(-5), Level::MIN);
        assert_eq!(Level::new(5).shifted(1).get(), 6);
    }

    #[test]
    fn test_level_deserializes_with_clamp() {
        let level: Level = serde_json::from_str("42").unwrap();
        assert_eq!(level, Level::MAX);
        assert_eq!(serde_json::to_string(&Level::new(3)).unwrap(), "3");
    }

    #[test]
    fn test_all_levels_in_order() {
        let levels: Vec<u8> = Level::all().map(Level::get).collect();
        assert_eq!(levels, (1..=10).collect::<Vec<u8>>());
        assert_eq!(Level::MAX.index(), 9);
    }

    #[test]
    fn test_corner_opponent() {
        assert_eq!(Corner::Red.opponent(), Corner::Blue);
        assert_eq!(Corner::Blue.opponent(), Corner::Red);
        assert_eq!(Corner::Blue.index(), 1);
    }
}
