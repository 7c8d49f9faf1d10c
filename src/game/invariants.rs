//! Session invariants - sanity checks that detect bugs.
//!
//! Every operation on a [`Session`] keeps these true. A violation means a
//! bug in the motion controller, the ledger or the session mode machine,
//! never a gameplay outcome.

use crate::game::{Modifier, Session, ANIMATION_FRAMES, STAT_MAX, STAT_MIN};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(session: &Session) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let stats = session.stats();
    let tile_size = session.tuning().tile_size;

    // Resource bounds
    for (name, value) in [
        ("energy", stats.energy()),
        ("corruption", stats.corruption()),
        ("sync", stats.sync()),
        ("sweetness", stats.sweetness()),
    ] {
        if !(STAT_MIN..=STAT_MAX).contains(&value) {
            violations.push(violation(format!(
                "{name} {value} outside {STAT_MIN}..={STAT_MAX}"
            )));
        }
    }

    if stats.modifier() != Modifier::for_sweetness(stats.sweetness()) {
        violations.push(violation(format!(
            "modifier {:?} inconsistent with sweetness {}",
            stats.modifier(),
            stats.sweetness()
        )));
    }

    let player = session.player();
    let map = session.map();

    match player.pos().tile(tile_size) {
        Some(tile) if map.in_bounds(tile) => {}
        _ => violations.push(violation(format!(
            "player at {:?} is outside the {}x{} map",
            player.pos(),
            map.width(),
            map.height()
        ))),
    }

    if player.in_transit() == (player.pos() == player.target()) {
        violations.push(violation(format!(
            "in_transit is {} with position {:?} and target {:?}",
            player.in_transit(),
            player.pos(),
            player.target()
        )));
    }

    match player.target().tile(tile_size) {
        Some(tile) if map.is_walkable(tile) => {}
        _ => violations.push(violation(format!(
            "target {:?} is not a walkable tile",
            player.target()
        ))),
    }

    if !(1..=ANIMATION_FRAMES).contains(&player.frame()) {
        violations.push(violation(format!(
            "animation frame {} outside 1..={ANIMATION_FRAMES}",
            player.frame()
        )));
    }

    let pos = player.pos();
    if !player.in_transit() && (pos.x % tile_size != 0 || pos.y % tile_size != 0) {
        violations.push(violation(format!(
            "idle player at {pos:?} is not aligned to a {tile_size}px tile"
        )));
    }

    violations
}

/// Assert all session invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(session: &Session) {
    let violations = check_invariants(session);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Session invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_session: &Session) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Tuning};
    use crate::game::{Coord, Direction, GridMap, PixelPos, StatLedger};

    fn session() -> Session {
        Session::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_fresh_session_passes() {
        let violations = check_invariants(&session());
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_mid_move_passes() {
        let mut session = session();
        session.press(Direction::Down);
        for _ in 0..7 {
            session.tick();
        }
        assert!(session.player().in_transit());
        let violations = check_invariants(&session);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_misaligned_idle_player_detected() {
        let mut session = session();
        session
            .player_mut()
            .force_state(PixelPos::new(70, 64), PixelPos::new(70, 64), false, 1);

        let violations = check_invariants(&session);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert!(violations[0].message.contains("aligned"));
    }

    #[test]
    fn test_transit_flag_mismatch_detected() {
        let mut session = session();
        session
            .player_mut()
            .force_state(PixelPos::new(64, 64), PixelPos::new(64, 64), true, 1);

        let violations = check_invariants(&session);
        assert!(violations.iter().any(|v| v.message.contains("in_transit")));
    }

    #[test]
    fn test_target_in_wall_detected() {
        let mut session = session();
        session
            .player_mut()
            .force_state(PixelPos::new(64, 64), PixelPos::new(64, 0), true, 1);

        let violations = check_invariants(&session);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert!(violations[0].message.contains("walkable"));
    }

    #[test]
    fn test_bad_frame_detected() {
        let mut session = session();
        session
            .player_mut()
            .force_state(PixelPos::new(64, 64), PixelPos::new(64, 64), false, 0);

        let violations = check_invariants(&session);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert!(violations[0].message.contains("frame"));
    }

    #[test]
    fn test_player_off_map_detected() {
        let map = GridMap::new(2, 2).unwrap();
        let mut session =
            Session::from_map(map, Coord::new(0, 0), Tuning::default(), StatLedger::default())
                .unwrap();
        session
            .player_mut()
            .force_state(PixelPos::new(640, 0), PixelPos::new(640, 0), false, 1);

        let violations = check_invariants(&session);
        assert!(violations.iter().any(|v| v.message.contains("outside")));
        assert!(violations.iter().any(|v| v.message.contains("walkable")));
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut session = session();
        session
            .player_mut()
            .force_state(PixelPos::new(65, 64), PixelPos::new(65, 64), true, 9);

        let violations = check_invariants(&session);
        assert!(violations.len() >= 2, "{violations:?}");
        assert!(violations.iter().any(|v| v.message.contains("frame")));
        assert!(violations.iter().any(|v| v.message.contains("in_transit")));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Session invariant violations")]
    fn test_assert_panics_in_debug() {
        let mut session = session();
        session
            .player_mut()
            .force_state(PixelPos::new(1, 1), PixelPos::new(1, 1), false, 1);
        assert_invariants(&session);
    }
}
