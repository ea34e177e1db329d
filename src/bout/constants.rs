//! Fixed bout constants. Tunable values live in `core::config`.

/// Entries in every generated playbook, one per simulated round-second
pub const PLAYBOOK_LENGTH: usize = 180;

/// Levels in a playbook set (one playbook per level)
pub const LEVEL_COUNT: usize = 10;

/// Milliseconds per simulated second
pub const MS_PER_SECOND: f64 = 1000.0;

/// Frame length the per-frame movement costs are expressed in
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Health at or below this counts as zero
pub const HEALTH_EPSILON: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playbook_covers_one_round() {
        assert_eq!(PLAYBOOK_LENGTH, 180);
        assert_eq!(LEVEL_COUNT, 10);
    }

    #[test]
    fn test_epsilon_is_tiny() {
        assert!(HEALTH_EPSILON > 0.0 && HEALTH_EPSILON < 1e-6);
    }
}
