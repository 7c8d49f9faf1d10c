//! Headless input scripts.
//!
//! A script is a JSON document listing input steps. Running it against a
//! [`Session`] replays the steps tick by tick and produces a report with the
//! final snapshot, which is how the game is exercised without a terminal.
//!
//! ```json
//! { "steps": [
//!     { "op": "walk", "dir": "down", "tiles": 4 },
//!     { "op": "choose", "index": 0 },
//!     { "op": "sweetness", "value": 30 }
//! ] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScriptError;
use crate::game::{
    Coord, Direction, DirectionalInput, EndingKind, Session, Snapshot, TickEvent, TileKind,
};

const fn one() -> u32 {
    1
}

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Hold `dir` for exactly `ticks` ticks, then release it.
    Hold {
        /// Direction to hold.
        dir: Direction,
        /// Number of ticks.
        ticks: u32,
    },
    /// Tick with no direction held.
    Idle {
        /// Number of ticks.
        ticks: u32,
    },
    /// Hold `dir` until `tiles` arrivals have happened.
    Walk {
        /// Direction to walk.
        dir: Direction,
        /// Number of tiles.
        #[serde(default = "one")]
        tiles: u32,
    },
    /// Move the sweetness lever.
    Sweetness {
        /// New lever value.
        value: f64,
    },
    /// Perform the manual cache action.
    ConsumeCache,
    /// Pick a choice in the open dialogue.
    Choose {
        /// Zero-based choice index.
        index: usize,
    },
    /// Toggle the pause menu.
    Menu,
    /// Restart the session.
    Restart,
}

/// A list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    /// Read a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a script from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid script document.
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// An arrival observed while running a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Arrival {
    /// Tick (counted from the start of the script) of the arrival.
    pub tick: u64,
    /// Destination tile.
    pub at: Coord,
    /// Trigger kind that fired, if any.
    pub triggered: Option<TileKind>,
}

/// Outcome of [`run_script`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptReport {
    /// Number of ticks run.
    pub ticks: u64,
    /// Number of steps executed.
    pub steps: usize,
    /// Every arrival, in order.
    pub arrivals: Vec<Arrival>,
    /// Ending reached, if any.
    pub ending: Option<EndingKind>,
    /// State after the last step.
    pub snapshot: Snapshot,
}

struct Runner<'a> {
    session: &'a mut Session,
    ticks: u64,
    arrivals: Vec<Arrival>,
}

impl Runner<'_> {
    fn tick(&mut self) -> TickEvent {
        let event = self.session.tick();
        self.ticks += 1;
        if let TickEvent::Arrived { at, triggered } = event {
            self.arrivals.push(Arrival {
                tick: self.ticks,
                at,
                triggered,
            });
        }
        event
    }

    fn step(&mut self, index: usize, step: ScriptStep) -> Result<(), ScriptError> {
        debug!(step = index, ?step, "script step");
        match step {
            ScriptStep::Hold { dir, ticks } => {
                self.session.press(dir);
                for _ in 0..ticks {
                    self.tick();
                }
                self.session.release(dir);
            }
            ScriptStep::Idle { ticks } => {
                self.session.set_input(DirectionalInput::default());
                for _ in 0..ticks {
                    self.tick();
                }
            }
            ScriptStep::Walk { dir, tiles } => {
                self.session.press(dir);
                let result = self.walk(index, tiles);
                self.session.release(dir);
                result?;
            }
            ScriptStep::Sweetness { value } => {
                if !self.session.set_sweetness(value) {
                    warn!(step = index, "sweetness ignored after ending");
                }
            }
            ScriptStep::ConsumeCache => {
                if !self.session.consume_cache() {
                    warn!(step = index, "cache action ignored after ending");
                }
            }
            ScriptStep::Choose { index: choice } => {
                if self.session.dialogue().is_none() {
                    warn!(step = index, "choose with no dialogue");
                    return Err(ScriptError::NoDialogue { step: index });
                }
                if self.session.choose(choice).is_none() {
                    warn!(step = index, choice, "choice out of range");
                    return Err(ScriptError::NoSuchChoice {
                        step: index,
                        index: choice,
                    });
                }
            }
            ScriptStep::Menu => {
                if !self.session.toggle_menu() {
                    warn!(step = index, "menu toggle ignored after ending");
                }
            }
            ScriptStep::Restart => self.session.restart(),
        }
        Ok(())
    }

    fn walk(&mut self, index: usize, tiles: u32) -> Result<(), ScriptError> {
        // Speeds are at least one pixel per tick, so a tile never takes
        // more than `tile_size` ticks plus the departure tick.
        let guard = u64::try_from(self.session.tuning().tile_size)
            .unwrap_or(u64::MAX)
            .saturating_add(2);
        for _ in 0..tiles {
            if !self.session.is_running() {
                debug!(step = index, "walk stopped early");
                return Ok(());
            }
            let mut spent = 0;
            loop {
                match self.tick() {
                    TickEvent::Arrived { .. } => break,
                    TickEvent::Blocked => {
                        warn!(step = index, "walk blocked");
                        return Err(ScriptError::Blocked { step: index });
                    }
                    TickEvent::Inhibited | TickEvent::Concluded(_) => return Ok(()),
                    TickEvent::Idle | TickEvent::Departed(_) | TickEvent::Moving => {}
                }
                spent += 1;
                if spent > guard {
                    warn!(step = index, "walk stalled");
                    return Err(ScriptError::Stalled { step: index });
                }
            }
        }
        Ok(())
    }
}

/// Run every step of `script` against `session`.
///
/// # Errors
///
/// Returns the first step that could not be carried out. The session keeps
/// whatever state it reached up to that point.
pub fn run_script(
    session: &mut Session,
    script: &InputScript,
) -> Result<ScriptReport, ScriptError> {
    let mut runner = Runner {
        session,
        ticks: 0,
        arrivals: Vec::new(),
    };
    for (index, &step) in script.steps.iter().enumerate() {
        runner.step(index, step)?;
    }

    let Runner {
        session,
        ticks,
        arrivals,
    } = runner;
    Ok(ScriptReport {
        ticks,
        steps: script.steps.len(),
        arrivals,
        ending: session.ending().map(|ending| ending.kind),
        snapshot: session.snapshot(),
    })
}
