//! Stat ledger: the four bounded resources and the derived modifier.
//!
//! Every mutation clamps its results, so the ledger can never hold a value
//! outside `STAT_MIN..=STAT_MAX`.

use serde::Serialize;

use crate::game::TileKind;

/// Lower bound for every resource.
pub const STAT_MIN: f64 = 0.0;

/// Upper bound for every resource.
pub const STAT_MAX: f64 = 100.0;

/// Sweetness band that grants [`Modifier::Calm`].
const CALM_BAND: std::ops::RangeInclusive<f64> = 25.0..=35.0;

/// Sweetness at or above which [`Modifier::Frenzy`] applies.
const FRENZY_FROM: f64 = 85.0;

/// Sweetness above which each step costs the crash drain.
const CRASH_SWEETNESS_ABOVE: f64 = 80.0;

const DRAIN_BASE: f64 = 2.0;
const DRAIN_CALM: f64 = 0.5;
const DRAIN_CRASH: f64 = 4.0;

/// Gameplay modifier derived from the sweetness lever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Modifier {
    /// Temperance: cheap steps.
    Calm,
    /// Sugar rush: fast steps.
    Frenzy,
}

impl Modifier {
    /// Derive the modifier for a sweetness value.
    #[must_use]
    pub fn for_sweetness(sweetness: f64) -> Option<Self> {
        if CALM_BAND.contains(&sweetness) {
            Some(Modifier::Calm)
        } else if sweetness >= FRENZY_FROM {
            Some(Modifier::Frenzy)
        } else {
            None
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Modifier::Calm => "Calm",
            Modifier::Frenzy => "Frenzy",
        }
    }
}

/// Resource deltas applied when a trigger tile fires.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerEffect {
    /// Change to energy.
    pub energy: f64,
    /// Change to corruption.
    pub corruption: f64,
    /// Change to sync.
    pub sync: f64,
}

/// The trigger-effect table.
///
/// Floor, Wall and Core carry no direct resource effect.
#[must_use]
pub const fn trigger_effect(kind: TileKind) -> Option<TriggerEffect> {
    match kind {
        TileKind::Memory => Some(TriggerEffect {
            energy: 0.0,
            corruption: 0.0,
            sync: 20.0,
        }),
        TileKind::Trap => Some(TriggerEffect {
            energy: -20.0,
            corruption: 15.0,
            sync: 0.0,
        }),
        TileKind::Cache => Some(TriggerEffect {
            energy: 25.0,
            corruption: 0.0,
            sync: 0.0,
        }),
        TileKind::Floor | TileKind::Wall | TileKind::Core => None,
    }
}

fn clamp_stat(value: f64) -> f64 {
    if value.is_nan() {
        STAT_MIN
    } else {
        value.clamp(STAT_MIN, STAT_MAX)
    }
}

/// The four resources plus the derived modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatLedger {
    energy: f64,
    corruption: f64,
    sync: f64,
    sweetness: f64,
    modifier: Option<Modifier>,
}

impl Default for StatLedger {
    fn default() -> Self {
        Self::with_values(100.0, 10.0, 40.0, 50.0)
    }
}

impl StatLedger {
    /// Build a ledger from raw values, clamping each and deriving the modifier.
    #[must_use]
    pub fn with_values(energy: f64, corruption: f64, sync: f64, sweetness: f64) -> Self {
        let sweetness = clamp_stat(sweetness);
        Self {
            energy: clamp_stat(energy),
            corruption: clamp_stat(corruption),
            sync: clamp_stat(sync),
            sweetness,
            modifier: Modifier::for_sweetness(sweetness),
        }
    }

    /// Mental stability.
    #[must_use]
    pub const fn energy(&self) -> f64 {
        self.energy
    }

    /// Greed.
    #[must_use]
    pub const fn corruption(&self) -> f64 {
        self.corruption
    }

    /// Memory alignment.
    #[must_use]
    pub const fn sync(&self) -> f64 {
        self.sync
    }

    /// Player-set lever.
    #[must_use]
    pub const fn sweetness(&self) -> f64 {
        self.sweetness
    }

    /// Current modifier, if any.
    #[must_use]
    pub const fn modifier(&self) -> Option<Modifier> {
        self.modifier
    }

    /// Move the sweetness lever and recompute the modifier.
    pub fn set_sweetness(&mut self, value: f64) {
        self.sweetness = clamp_stat(value);
        self.modifier = Modifier::for_sweetness(self.sweetness);
    }

    /// Energy cost of one completed step.
    ///
    /// Calm is checked before the sweetness crash rule.
    #[must_use]
    pub fn drain_amount(&self) -> f64 {
        if self.modifier == Some(Modifier::Calm) {
            DRAIN_CALM
        } else if self.sweetness > CRASH_SWEETNESS_ABOVE {
            DRAIN_CRASH
        } else {
            DRAIN_BASE
        }
    }

    /// Charge the per-step drain against energy.
    pub fn apply_step_drain(&mut self) {
        self.energy = clamp_stat(self.energy - self.drain_amount());
    }

    /// The manual "consume sugar data" action, scaled by sweetness.
    pub fn consume_cache(&mut self) {
        let ratio = self.sweetness / STAT_MAX;
        self.apply(TriggerEffect {
            energy: 10.0 + 30.0 * ratio,
            corruption: 5.0 + 20.0 * ratio,
            sync: -(5.0 + 15.0 * ratio),
        });
    }

    /// Apply the table effect for a trigger tile. Returns `false` for kinds
    /// without an effect.
    pub fn apply_trigger_effect(&mut self, kind: TileKind) -> bool {
        match trigger_effect(kind) {
            Some(effect) => {
                self.apply(effect);
                true
            }
            None => false,
        }
    }

    /// Apply a resource delta with clamping.
    pub fn apply(&mut self, effect: TriggerEffect) {
        self.energy = clamp_stat(self.energy + effect.energy);
        self.corruption = clamp_stat(self.corruption + effect.corruption);
        self.sync = clamp_stat(self.sync + effect.sync);
    }
}
