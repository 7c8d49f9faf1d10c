// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Candybug: a grid-walking narrative minigame.
//!
//! The player wanders a fog-covered maze, picking up memory fragments,
//! tripping firewall traps and raiding sugar caches while balancing four
//! resources. Reaching the Philosopher's Stone with enough sync lets the
//! player pick one of three endings; letting corruption or energy run to
//! their limits forces one of two others.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  CLI: play (TUI) / run / check      │
//! ├─────────────────────────────────────┤
//! │  Session (mode machine, tick loop)  │
//! ├──────────┬──────────┬───────────────┤
//! │  Motion  │  Events  │  Endings      │
//! ├──────────┴──────────┴───────────────┤
//! │  Map  ·  Stat ledger  ·  Dialogue   │
//! └─────────────────────────────────────┘
//! ```
//!
//! The simulation is deterministic and single-threaded. It never performs
//! I/O; configuration and input scripts are loaded at the edges.

pub mod config;
pub mod error;
pub mod game;
pub mod script;

pub use config::{Config, Tuning};
pub use error::{ConfigError, LayoutError, ScriptError};

// Re-export key game types at crate root for convenience
pub use game::{
    Coord, Dialogue, Direction, Ending, EndingKind, GridMap, Mode, Session, Snapshot, StatLedger,
    TickEvent, TileKind,
};
pub use script::{run_script, InputScript, ScriptReport, ScriptStep};
