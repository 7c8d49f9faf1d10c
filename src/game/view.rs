//! Read-only snapshots for renderers, including fog-of-war opacity.

use serde::Serialize;

use crate::config::Fog;
use crate::game::{
    Coord, Dialogue, Direction, Ending, PixelPos, Session, StatLedger, TileKind,
};

/// Traps stay hidden until their opacity exceeds this.
pub const TRAP_REVEAL_OPACITY: f64 = 0.8;

/// Opacity of the tile at `coord` as seen from a player at `player`.
///
/// Distance is measured between the player's visual centre and the tile
/// centre: fully visible up to the clear radius, linear fall-off to zero at
/// the dark radius.
#[must_use]
pub fn fog_opacity(player: PixelPos, coord: Coord, tile_size: i32, fog: &Fog) -> f64 {
    let half = f64::from(tile_size) / 2.0;
    let size = f64::from(tile_size);
    let px = f64::from(player.x) + half;
    let py = f64::from(player.y) + half;
    let tx = f64::from(coord.x) * size + half;
    let ty = f64::from(coord.y) * size + half;
    let dist = (px - tx).hypot(py - ty);

    if dist <= fog.clear_radius {
        1.0
    } else if dist <= fog.dark_radius {
        1.0 - (dist - fog.clear_radius) / (fog.dark_radius - fog.clear_radius)
    } else {
        0.0
    }
}

/// One tile as a renderer should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileView {
    /// Grid position.
    pub coord: Coord,
    /// Current kind.
    pub kind: TileKind,
    /// Fog opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Whether the tile's contents should be drawn at all.
    pub visible: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Player pixel position.
    pub position: PixelPos,
    /// Tile containing the player's centre.
    pub tile: Option<Coord>,
    /// Facing direction.
    pub facing: Direction,
    /// Animation pose in `1..=4`.
    pub frame: u8,
    /// Sprite key such as `D1`.
    pub sprite: String,
    /// Whether a move is in progress.
    pub in_transit: bool,
    /// Map width in tiles.
    pub width: u16,
    /// Map height in tiles.
    pub height: u16,
    /// Every tile, row-major.
    pub tiles: Vec<TileView>,
    /// Ledger for the HUD.
    pub stats: StatLedger,
    /// Whether the Core shows as revealed (sync meets the requirement).
    pub core_revealed: bool,
    /// Mode name.
    pub mode: &'static str,
    /// Open dialogue, if any.
    pub dialogue: Option<Dialogue>,
    /// Ending, if reached.
    pub ending: Option<Ending>,
    /// Running ticks since the last (re)start.
    pub ticks: u64,
}

impl Snapshot {
    /// Capture the current state of `session`.
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        let tuning = session.tuning();
        let player = session.player();
        let tiles = session
            .map()
            .iter()
            .map(|(coord, kind)| {
                let opacity = fog_opacity(player.pos(), coord, tuning.tile_size, &tuning.fog);
                let visible = match kind {
                    TileKind::Trap => opacity > TRAP_REVEAL_OPACITY,
                    _ => opacity > 0.0,
                };
                TileView {
                    coord,
                    kind,
                    opacity,
                    visible,
                }
            })
            .collect();

        Self {
            position: player.pos(),
            tile: session.player_tile(),
            facing: player.facing(),
            frame: player.frame(),
            sprite: player.sprite_key(),
            in_transit: player.in_transit(),
            width: session.map().width(),
            height: session.map().height(),
            tiles,
            stats: *session.stats(),
            core_revealed: session.stats().sync() >= tuning.core_sync_required,
            mode: session.mode().name(),
            dialogue: session.dialogue().cloned(),
            ending: session.ending().copied(),
            ticks: session.ticks(),
        }
    }

    /// The view of the tile at `coord`.
    #[must_use]
    pub fn tile_view(&self, coord: Coord) -> Option<&TileView> {
        if coord.x >= self.width || coord.y >= self.height {
            return None;
        }
        self.tiles
            .get(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
    }
}
