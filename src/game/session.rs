//! Session controller: owns every piece of game state and drives the tick loop.
//!
//! The session is an explicit mode machine. Gameplay (motion, triggers,
//! drain and the ending check) only runs in [`Mode::Running`]; the other
//! modes each carry exactly the data they need, so states such as "dialogue
//! open after the game ended" cannot be represented.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, Tuning};
use crate::error::{ConfigError, LayoutError};
use crate::game::{
    assert_invariants, evaluate, on_arrival, speed_for, ChoiceAction, Coord, Dialogue, Direction,
    DirectionalInput, Ending, EndingKind, GridMap, Player, Snapshot, StatLedger, Step, TileKind,
};

/// What the session is currently doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Gameplay ticks are live.
    Running,
    /// A dialogue is waiting for a choice.
    AwaitingChoice(Dialogue),
    /// The pause menu is open. `resume` holds the dialogue that was open
    /// when the menu was raised, if any.
    Paused {
        /// Dialogue to restore when the menu closes.
        resume: Option<Dialogue>,
    },
    /// Terminal state until restart.
    Ended(Ending),
}

impl Mode {
    /// Short lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Mode::Running => "running",
            Mode::AwaitingChoice(_) => "awaiting_choice",
            Mode::Paused { .. } => "paused",
            Mode::Ended(_) => "ended",
        }
    }
}

/// What one call to [`Session::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// The session is not running; nothing happened.
    Inhibited,
    /// Idle with no direction held.
    Idle,
    /// Idle; the requested tile is blocked.
    Blocked,
    /// A move towards the given tile started.
    Departed(Coord),
    /// Still travelling.
    Moving,
    /// Arrived on a tile; `triggered` names the trigger kind that fired.
    Arrived {
        /// Destination tile.
        at: Coord,
        /// Trigger kind found on arrival, if any.
        triggered: Option<TileKind>,
    },
    /// A threshold ending was reached.
    Concluded(EndingKind),
}

/// What is left of a session after [`Session::abort`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Running ticks since the last (re)start.
    pub ticks: u64,
    /// Ending reached, if any.
    pub ending: Option<EndingKind>,
    /// Final ledger.
    pub stats: StatLedger,
}

/// One play-through of the minigame.
#[derive(Debug, Clone)]
pub struct Session {
    tuning: Tuning,
    initial_map: GridMap,
    map: GridMap,
    spawn: Coord,
    player: Player,
    initial_stats: StatLedger,
    stats: StatLedger,
    mode: Mode,
    input: DirectionalInput,
    ticks: u64,
}

impl Session {
    /// Start a session from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let map = config.validate()?;
        Self::from_map(map, config.spawn, config.tuning, config.initial.ledger())
    }

    /// Start a session on an already-built map.
    ///
    /// # Errors
    ///
    /// Returns an error if `tuning` is out of range or `spawn` is not
    /// walkable.
    pub fn from_map(
        map: GridMap,
        spawn: Coord,
        tuning: Tuning,
        initial_stats: StatLedger,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        if !map.is_walkable(spawn) {
            return Err(LayoutError::SpawnBlocked {
                x: spawn.x,
                y: spawn.y,
            }
            .into());
        }
        info!(
            width = map.width(),
            height = map.height(),
            x = spawn.x,
            y = spawn.y,
            "session started"
        );
        Ok(Self {
            tuning,
            initial_map: map.clone(),
            map,
            spawn,
            player: Player::spawn(spawn, tuning.tile_size),
            initial_stats,
            stats: initial_stats,
            mode: Mode::Running,
            input: DirectionalInput::default(),
            ticks: 0,
        })
    }

    /// Advance the simulation by one frame.
    ///
    /// Does nothing unless the session is [`Mode::Running`]. The ending check
    /// runs before motion, so a ledger pushed past a threshold while paused
    /// concludes on the first running tick.
    pub fn tick(&mut self) -> TickEvent {
        if self.mode != Mode::Running {
            return TickEvent::Inhibited;
        }
        self.ticks += 1;
        let event = self.run_frame();
        assert_invariants(self);
        event
    }

    fn run_frame(&mut self) -> TickEvent {
        if let Some(kind) = evaluate(&self.stats) {
            self.conclude(kind);
            return TickEvent::Concluded(kind);
        }

        let speed = speed_for(&self.stats, &self.tuning.speeds);
        let step = self
            .player
            .step(self.input.resolve(), &self.map, speed, self.tuning.tile_size);
        match step {
            Step::Idle => TickEvent::Idle,
            Step::Blocked => TickEvent::Blocked,
            Step::Departed(to) => TickEvent::Departed(to),
            Step::Moving => TickEvent::Moving,
            Step::Arrived(at) => {
                let triggered = self.map.tile_at(at).filter(|kind| kind.is_trigger());
                if let Some(dialogue) = on_arrival(
                    &mut self.map,
                    &mut self.stats,
                    at,
                    self.tuning.core_sync_required,
                ) {
                    self.mode = Mode::AwaitingChoice(dialogue);
                }
                self.stats.apply_step_drain();
                debug!(
                    x = at.x,
                    y = at.y,
                    energy = self.stats.energy(),
                    "arrived"
                );
                TickEvent::Arrived { at, triggered }
            }
        }
    }

    fn conclude(&mut self, kind: EndingKind) {
        let ending = kind.ending();
        info!(
            ending = ending.title,
            ticks = self.ticks,
            energy = self.stats.energy(),
            corruption = self.stats.corruption(),
            sync = self.stats.sync(),
            "session concluded"
        );
        self.input.clear();
        self.mode = Mode::Ended(ending);
    }

    /// Record a key-down for `dir`.
    pub fn press(&mut self, dir: Direction) {
        self.input.set(dir, true);
    }

    /// Record a key-up for `dir`.
    pub fn release(&mut self, dir: Direction) {
        self.input.set(dir, false);
    }

    /// Replace the whole held-key state.
    pub fn set_input(&mut self, input: DirectionalInput) {
        self.input = input;
    }

    /// Current held-key state.
    #[must_use]
    pub const fn input(&self) -> DirectionalInput {
        self.input
    }

    /// Move the sweetness lever.
    ///
    /// Returns `false` once the session has ended.
    pub fn set_sweetness(&mut self, value: f64) -> bool {
        if self.is_ended() {
            return false;
        }
        self.stats.set_sweetness(value);
        debug!(
            sweetness = self.stats.sweetness(),
            modifier = ?self.stats.modifier(),
            "sweetness set"
        );
        true
    }

    /// Perform the manual "consume sugar data" action.
    ///
    /// Returns `false` once the session has ended.
    pub fn consume_cache(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.stats.consume_cache();
        info!(
            energy = self.stats.energy(),
            corruption = self.stats.corruption(),
            sync = self.stats.sync(),
            "cache consumed"
        );
        true
    }

    /// Take choice `index` of the open dialogue.
    ///
    /// Returns the resolved action, or `None` when no dialogue is open or the
    /// index is out of range.
    pub fn choose(&mut self, index: usize) -> Option<ChoiceAction> {
        let Mode::AwaitingChoice(dialogue) = &self.mode else {
            return None;
        };
        let choice = dialogue.choice(index)?;
        let action = choice.action();
        info!(label = choice.label(), "choice taken");
        match action {
            ChoiceAction::Resume => self.mode = Mode::Running,
            ChoiceAction::Conclude(kind) => self.conclude(kind),
        }
        Some(action)
    }

    /// Open the pause menu. Returns `false` if it was already open or the
    /// session has ended.
    pub fn pause(&mut self) -> bool {
        let resume = match &self.mode {
            Mode::Running => None,
            Mode::AwaitingChoice(dialogue) => Some(dialogue.clone()),
            Mode::Paused { .. } | Mode::Ended(_) => return false,
        };
        self.mode = Mode::Paused { resume };
        debug!("menu opened");
        true
    }

    /// Close the pause menu, restoring any dialogue it covered. Returns
    /// `false` if the menu was not open.
    pub fn resume(&mut self) -> bool {
        let Mode::Paused { resume } = &mut self.mode else {
            return false;
        };
        self.mode = match resume.take() {
            Some(dialogue) => Mode::AwaitingChoice(dialogue),
            None => Mode::Running,
        };
        debug!("menu closed");
        true
    }

    /// Toggle the pause menu. A no-op once the session has ended.
    pub fn toggle_menu(&mut self) -> bool {
        if self.is_menu_open() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Reset map, player, ledger and mode to their initial state.
    pub fn restart(&mut self) {
        self.map.clone_from(&self.initial_map);
        self.player = Player::spawn(self.spawn, self.tuning.tile_size);
        self.stats = self.initial_stats;
        self.mode = Mode::Running;
        self.input.clear();
        self.ticks = 0;
        info!("session restarted");
    }

    /// Discard the session.
    #[must_use]
    pub fn abort(self) -> SessionSummary {
        let summary = SessionSummary {
            ticks: self.ticks,
            ending: self.ending().map(|ending| ending.kind),
            stats: self.stats,
        };
        info!(ticks = summary.ticks, ending = ?summary.ending, "session aborted");
        summary
    }

    /// Read-only view for renderers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Whether gameplay ticks are live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }

    /// Whether the pause menu is open.
    #[must_use]
    pub const fn is_menu_open(&self) -> bool {
        matches!(self.mode, Mode::Paused { .. })
    }

    /// Whether an ending has been reached.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        matches!(self.mode, Mode::Ended(_))
    }

    /// The dialogue awaiting a choice, if any.
    #[must_use]
    pub const fn dialogue(&self) -> Option<&Dialogue> {
        match &self.mode {
            Mode::AwaitingChoice(dialogue) => Some(dialogue),
            _ => None,
        }
    }

    /// The ending, if reached.
    #[must_use]
    pub const fn ending(&self) -> Option<&Ending> {
        match &self.mode {
            Mode::Ended(ending) => Some(ending),
            _ => None,
        }
    }

    /// The live map.
    #[must_use]
    pub const fn map(&self) -> &GridMap {
        &self.map
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The ledger.
    #[must_use]
    pub const fn stats(&self) -> &StatLedger {
        &self.stats
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Spawn tile.
    #[must_use]
    pub const fn spawn(&self) -> Coord {
        self.spawn
    }

    /// Running ticks since the last (re)start.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Tile the player currently occupies.
    #[must_use]
    pub fn player_tile(&self) -> Option<Coord> {
        self.player.pos().tile(self.tuning.tile_size)
    }
}
