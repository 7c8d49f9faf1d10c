//! Endings and the threshold evaluator.

use serde::{Deserialize, Serialize};

use crate::game::{StatLedger, STAT_MAX, STAT_MIN};

/// Terminal session outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingKind {
    /// Corruption reached its cap.
    DataConsumed,
    /// Energy ran out.
    SystemCrash,
    /// "Calibrate World Order" at the Core.
    Good,
    /// "Linger in Dream" at the Core.
    Neutral,
    /// "Consume Everything" at the Core.
    Bad,
}

/// An RGB accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accent {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Accent {
    /// `#ff9ec4`.
    pub const ROSE: Accent = Accent::rgb(0xff, 0x9e, 0xc4);
    /// `#888888`.
    pub const ASH: Accent = Accent::rgb(0x88, 0x88, 0x88);
    /// `#9affdc`.
    pub const MINT: Accent = Accent::rgb(0x9a, 0xff, 0xdc);
    /// `#d4b3ff`.
    pub const LAVENDER: Accent = Accent::rgb(0xd4, 0xb3, 0xff);
    /// `#e6c288`.
    pub const GOLD: Accent = Accent::rgb(0xe6, 0xc2, 0x88);
    /// `#8afff7`.
    pub const CYAN: Accent = Accent::rgb(0x8a, 0xff, 0xf7);

    /// Build a color from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A terminal record shown once the session concludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ending {
    /// Which ending.
    pub kind: EndingKind,
    /// Headline.
    pub title: &'static str,
    /// Closing narration.
    pub description: &'static str,
    /// Accent color for the ending screen.
    pub accent: Accent,
}

impl EndingKind {
    /// Every ending.
    pub const ALL: [EndingKind; 5] = [
        EndingKind::DataConsumed,
        EndingKind::SystemCrash,
        EndingKind::Good,
        EndingKind::Neutral,
        EndingKind::Bad,
    ];

    /// The full ending record.
    #[must_use]
    pub const fn ending(self) -> Ending {
        let (title, description, accent) = match self {
            EndingKind::DataConsumed => (
                "DATA CONSUMED",
                "My avarice grew too great. The corruption has overwritten my source code.",
                Accent::ROSE,
            ),
            EndingKind::SystemCrash => (
                "SYSTEM CRASH",
                "Insufficient energy to maintain consciousness. The void reclaims me.",
                Accent::ASH,
            ),
            EndingKind::Good => (
                "INFINITE BALANCE",
                "Order is restored. Dimensions merged. I am no longer a sinner, but a guardian.",
                Accent::MINT,
            ),
            EndingKind::Neutral => (
                "FRAGMENTED REUNION",
                "It's not perfect, but I can see him. I will stay in this broken simulation forever.",
                Accent::LAVENDER,
            ),
            EndingKind::Bad => (
                "DATA CORRUPTION",
                "I drowned in the sweetness. My desire consumed the world, leaving only void.",
                Accent::ROSE,
            ),
        };
        Ending {
            kind: self,
            title,
            description,
            accent,
        }
    }
}

/// Threshold check run every running tick.
///
/// Corruption is checked before energy, so a ledger breaching both yields
/// [`EndingKind::DataConsumed`].
#[must_use]
pub fn evaluate(stats: &StatLedger) -> Option<EndingKind> {
    if stats.corruption() >= STAT_MAX {
        Some(EndingKind::DataConsumed)
    } else if stats.energy() <= STAT_MIN {
        Some(EndingKind::SystemCrash)
    } else {
        None
    }
}
