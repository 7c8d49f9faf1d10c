//! Game layer for Candybug.
//!
//! Implements the minigame rules:
//! - Grid map with walls and one-shot trigger tiles
//! - Tile-to-tile player motion with interpolated pixel positions
//! - Stat ledger (energy, corruption, sync, sweetness)
//! - Trigger events, dialogues and endings
//! - Session lifecycle (pause menu, restart, abort)

mod dialogue;
mod ending;
mod events;
mod invariants;
mod map;
mod motion;
mod session;
mod stats;
mod view;

pub use dialogue::{Choice, ChoiceAction, Dialogue};
pub use ending::{evaluate, Accent, Ending, EndingKind};
pub use events::on_arrival;
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use map::{Coord, GridMap, TileKind, DEFAULT_LAYOUT};
pub use motion::{
    speed_for, Direction, DirectionalInput, PixelPos, Player, Step, ANIMATION_FRAMES, IDLE_FRAME,
    SLOW_SWEETNESS_BELOW,
};
pub use session::{Mode, Session, SessionSummary, TickEvent};
pub use stats::{trigger_effect, Modifier, StatLedger, TriggerEffect, STAT_MAX, STAT_MIN};
pub use view::{fog_opacity, Snapshot, TileView, TRAP_REVEAL_OPACITY};
