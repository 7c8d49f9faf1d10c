//! Event trigger engine: what happens when the player arrives on a tile.

use tracing::info;

use crate::game::{
    Choice, ChoiceAction, Coord, Dialogue, EndingKind, GridMap, StatLedger, TileKind,
};

const MEMORY_TEXT: &str = "A fragment of memory... It tastes like sweet nostalgia. (Sync +20%)";
const TRAP_TEXT: &str = "IT BURNS! A hidden firewall protocol. (Stamina -20, Greed +15)";
const CACHE_TEXT: &str = "A cache of raw data sugar. Pure energy.";
const CORE_READY_TEXT: &str =
    "The Philosopher's Stone... The final variable. With this, I can rewrite the code of this world.";

fn core_locked_text(required: f64) -> String {
    format!(
        "The Philosopher's Stone is obscured by static... You lack the synchronization \
         to interact with it. (Req: {required:.0}% Sync)"
    )
}

/// Fire the event for the tile at `coord`, if it has one.
///
/// One-shot tiles are cleared to floor before their effect is applied. The
/// Core is never cleared; its dialogue depends on the current sync each time
/// it is entered. Returns the dialogue to open, or `None` for plain floor.
pub fn on_arrival(
    map: &mut GridMap,
    stats: &mut StatLedger,
    coord: Coord,
    core_sync_required: f64,
) -> Option<Dialogue> {
    let kind = map.tile_at(coord)?;
    let (text, label) = match kind {
        TileKind::Floor | TileKind::Wall => return None,
        TileKind::Core => return Some(core_dialogue(stats, core_sync_required)),
        TileKind::Memory => (MEMORY_TEXT, "Integrate"),
        TileKind::Trap => (TRAP_TEXT, "Recover"),
        TileKind::Cache => (CACHE_TEXT, "Consume"),
    };

    if kind.is_one_shot() {
        map.set(coord, TileKind::Floor);
    }
    stats.apply_trigger_effect(kind);
    info!(
        x = coord.x,
        y = coord.y,
        ?kind,
        energy = stats.energy(),
        corruption = stats.corruption(),
        sync = stats.sync(),
        "trigger fired"
    );
    Some(Dialogue::acknowledge(text, label))
}

fn core_dialogue(stats: &StatLedger, required: f64) -> Dialogue {
    if stats.sync() < required {
        info!(sync = stats.sync(), required, "core locked");
        return Dialogue::acknowledge(core_locked_text(required), "Step Back");
    }

    info!(sync = stats.sync(), "core ready");
    Dialogue::from_choices(
        CORE_READY_TEXT,
        [
            Choice::new(
                "Calibrate World Order (Good)",
                ChoiceAction::Conclude(EndingKind::Good),
            ),
            Choice::new(
                "Linger in Dream (Neutral)",
                ChoiceAction::Conclude(EndingKind::Neutral),
            ),
            Choice::new(
                "Consume Everything (Bad)",
                ChoiceAction::Conclude(EndingKind::Bad),
            ),
        ],
    )
}
