//! Session configuration: tuning constants, map layout, spawn and starting ledger.
//!
//! Every field is defaulted, so an empty JSON object yields the shipped game.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::game::{Coord, GridMap, StatLedger, DEFAULT_LAYOUT};

/// Lowest accepted tick rate.
pub const MIN_TICK_RATE_HZ: u32 = 10;

/// Highest accepted tick rate.
pub const MAX_TICK_RATE_HZ: u32 = 240;

/// Largest accepted tile size in pixels. Keeps pixel coordinates of the
/// largest possible map inside `i32`.
pub const MAX_TILE_SIZE: i32 = 1024;

/// Pixels-per-tick speeds for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speeds {
    /// Normal walking speed.
    pub base: i32,
    /// Speed while sweetness is below 20.
    pub slow: i32,
    /// Speed under the Frenzy modifier.
    pub fast: i32,
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            base: 4,
            slow: 2,
            fast: 8,
        }
    }
}

/// Fog-of-war radii in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fog {
    /// Tiles within this distance are fully visible.
    pub clear_radius: f64,
    /// Tiles beyond this distance are fully dark.
    pub dark_radius: f64,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            clear_radius: 100.0,
            dark_radius: 180.0,
        }
    }
}

/// Numeric knobs of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Tile edge length in pixels.
    pub tile_size: i32,
    /// Player speeds.
    pub speeds: Speeds,
    /// Fog radii.
    pub fog: Fog,
    /// Sync needed to interact with the Core.
    pub core_sync_required: f64,
    /// Ticks per second for the interactive loop.
    pub tick_rate_hz: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: 64,
            speeds: Speeds::default(),
            fog: Fog::default(),
            core_sync_required: 60.0,
            tick_rate_hz: 60,
        }
    }
}

impl Tuning {
    /// Check that the tuning values describe a playable session.
    ///
    /// # Errors
    ///
    /// Returns the first field that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_TILE_SIZE).contains(&self.tile_size) || self.tile_size % 2 != 0 {
            return Err(invalid(
                "tuning.tile_size",
                format!(
                    "must be even and within 2..={MAX_TILE_SIZE}, got {}",
                    self.tile_size
                ),
            ));
        }

        let speed_range = 1..=self.tile_size;
        for (field, speed) in [
            ("tuning.speeds.base", self.speeds.base),
            ("tuning.speeds.slow", self.speeds.slow),
            ("tuning.speeds.fast", self.speeds.fast),
        ] {
            if !speed_range.contains(&speed) {
                return Err(invalid(
                    field,
                    format!("must be within 1..={}, got {speed}", self.tile_size),
                ));
            }
        }

        let fog = self.fog;
        if !(fog.clear_radius >= 0.0 && fog.dark_radius > fog.clear_radius) {
            return Err(invalid(
                "tuning.fog",
                format!(
                    "dark radius ({}) must exceed a non-negative clear radius ({})",
                    fog.dark_radius, fog.clear_radius
                ),
            ));
        }

        if !self.core_sync_required.is_finite() {
            return Err(invalid(
                "tuning.core_sync_required",
                "must be a finite number".to_string(),
            ));
        }

        if !(MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.tick_rate_hz) {
            return Err(invalid(
                "tuning.tick_rate_hz",
                format!(
                    "must be within {MIN_TICK_RATE_HZ}..={MAX_TICK_RATE_HZ}, got {}",
                    self.tick_rate_hz
                ),
            ));
        }

        Ok(())
    }
}

/// Ledger values at session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialStats {
    /// Starting energy.
    pub energy: f64,
    /// Starting corruption.
    pub corruption: f64,
    /// Starting sync.
    pub sync: f64,
    /// Starting sweetness lever.
    pub sweetness: f64,
}

impl Default for InitialStats {
    fn default() -> Self {
        let stats = StatLedger::default();
        Self {
            energy: stats.energy(),
            corruption: stats.corruption(),
            sync: stats.sync(),
            sweetness: stats.sweetness(),
        }
    }
}

impl InitialStats {
    /// Build the starting ledger.
    #[must_use]
    pub fn ledger(&self) -> StatLedger {
        StatLedger::with_values(self.energy, self.corruption, self.sync, self.sweetness)
    }
}

/// Full session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Numeric knobs.
    pub tuning: Tuning,
    /// Map rows as glyph strings.
    pub layout: Vec<String>,
    /// Spawn tile.
    pub spawn: Coord,
    /// Starting ledger.
    pub initial: InitialStats,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            layout: DEFAULT_LAYOUT.iter().map(|row| (*row).to_string()).collect(),
            spawn: Coord::new(1, 1),
            initial: InitialStats::default(),
        }
    }
}

impl Config {
    /// Read a config from a JSON file.
    ///
    /// The result is not validated; call [`Config::validate`] before use.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse a config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check every field and build the map.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field or layout problem found.
    pub fn validate(&self) -> Result<GridMap, ConfigError> {
        self.tuning.validate()?;
        self.build_map()
    }

    /// Parse the layout and check the spawn tile.
    ///
    /// # Errors
    ///
    /// Returns a layout error if the rows do not form a valid map or the
    /// spawn tile is not walkable.
    pub fn build_map(&self) -> Result<GridMap, ConfigError> {
        let map = GridMap::from_rows(&self.layout)?;
        if !map.is_walkable(self.spawn) {
            return Err(crate::error::LayoutError::SpawnBlocked {
                x: self.spawn.x,
                y: self.spawn.y,
            }
            .into());
        }
        Ok(map)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
