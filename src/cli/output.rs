//! Output formatting utilities for CLI.

use std::fmt::{self, Display, Formatter};

use candybug::game::{Mode, Snapshot, TileKind};
use candybug::{Config, GridMap, ScriptReport};

struct ReportText<'a>(&'a ScriptReport);

impl Display for ReportText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let snap = &report.snapshot;

        writeln!(f, "Script Result")?;
        writeln!(f, "  Steps: {}", report.steps)?;
        writeln!(f, "  Ticks: {}", report.ticks)?;
        writeln!(f, "  Mode:  {}", snap.mode)?;
        match snap.tile {
            Some(tile) => writeln!(
                f,
                "  Tile:  ({}, {}) facing {:?}",
                tile.x, tile.y, snap.facing
            )?,
            None => writeln!(f, "  Tile:  off-grid")?,
        }
        writeln!(f)?;

        let stats = &snap.stats;
        writeln!(f, "  Energy:     {:>6.1}", stats.energy())?;
        writeln!(f, "  Corruption: {:>6.1}", stats.corruption())?;
        writeln!(f, "  Sync:       {:>6.1}", stats.sync())?;
        writeln!(f, "  Sweetness:  {:>6.1}", stats.sweetness())?;
        if let Some(modifier) = stats.modifier() {
            writeln!(f, "  Modifier:   {}", modifier.name())?;
        }

        let mut triggers = report
            .arrivals
            .iter()
            .filter_map(|a| a.triggered.map(|kind| (a, kind)))
            .peekable();
        if triggers.peek().is_some() {
            writeln!(f)?;
            writeln!(f, "  Triggers:")?;
            for (arrival, kind) in triggers {
                writeln!(
                    f,
                    "    tick {:>5}: {} at ({}, {})",
                    arrival.tick,
                    kind.name(),
                    arrival.at.x,
                    arrival.at.y
                )?;
            }
        }

        if let Some(dialogue) = &snap.dialogue {
            writeln!(f)?;
            writeln!(f, "  Dialogue: {}", dialogue.text())?;
            for (i, choice) in dialogue.choices().iter().enumerate() {
                writeln!(f, "    [{i}] {}", choice.label())?;
            }
        }

        if let Some(ending) = &snap.ending {
            writeln!(f)?;
            writeln!(f, "  Ending: {} ({})", ending.title, ending.accent.hex())?;
            writeln!(f, "    {}", ending.description)?;
        }

        Ok(())
    }
}

struct CheckText<'a> {
    config: &'a Config,
    map: &'a GridMap,
}

impl Display for CheckText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self { config, map } = *self;

        writeln!(f, "Map: {}x{} tiles", map.width(), map.height())?;
        writeln!(f, "Spawn: ({}, {})", config.spawn.x, config.spawn.y)?;
        for row in map.to_rows() {
            writeln!(f, "  {row}")?;
        }
        for kind in TileKind::ALL {
            writeln!(f, "  {} {:<7} {}", kind.glyph(), kind.name(), map.count(kind))?;
        }
        let tuning = &config.tuning;
        writeln!(
            f,
            "Tuning: tile {}px, speeds {}/{}/{}, fog {}-{}px, core sync {}, {} Hz",
            tuning.tile_size,
            tuning.speeds.slow,
            tuning.speeds.base,
            tuning.speeds.fast,
            tuning.fog.clear_radius,
            tuning.fog.dark_radius,
            tuning.core_sync_required,
            tuning.tick_rate_hz
        )?;
        if map.count(TileKind::Core) == 0 {
            writeln!(f, "Warning: no Core tile; only threshold endings are reachable")?;
        }

        Ok(())
    }
}

/// Format a script report as human-readable text.
pub(super) fn format_report(report: &ScriptReport) -> String {
    ReportText(report).to_string()
}

/// Format the `check` summary for a validated config.
pub(super) fn format_check(config: &Config, map: &GridMap) -> String {
    CheckText { config, map }.to_string()
}

/// One-line status used by the TUI header.
pub(super) fn status_line(snap: &Snapshot, mode: &Mode) -> String {
    let status = match mode {
        Mode::Running if snap.in_transit => "MOVING",
        Mode::Running => "EXPLORING",
        Mode::AwaitingChoice(_) => "DIALOGUE",
        Mode::Paused { .. } => "PAUSED",
        Mode::Ended(_) => "ENDED",
    };
    format!(" Candybug | {status} | Tick {} ", snap.ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candybug::game::DEFAULT_LAYOUT;
    use candybug::{run_script, InputScript, Session};

    #[test]
    fn test_format_check_default() {
        let config = Config::default();
        let map = config.validate().unwrap();
        let text = format_check(&config, &map);
        assert!(text.contains("Map: 15x11 tiles"));
        assert!(text.contains("Spawn: (1, 1)"));
        for row in DEFAULT_LAYOUT {
            assert!(text.contains(&format!("  {row}\n")), "missing row {row}");
        }
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_format_check_shows_cleared_layout_and_warning() {
        let config = Config {
            layout: vec!["11111".into(), "10201".into(), "11111".into()],
            ..Config::default()
        };
        let map = config.validate().unwrap();
        let text = format_check(&config, &map);
        assert!(text.contains("Map: 5x3 tiles"));
        assert!(text.contains("  #.m.#\n"));
        assert!(text.contains("Warning: no Core tile"));
    }

    #[test]
    fn test_format_report_mentions_triggers() {
        let mut session = Session::new(&Config::default()).unwrap();
        let script = InputScript::from_json(
            r#"{"steps": [
                {"op": "walk", "dir": "down", "tiles": 4},
                {"op": "walk", "dir": "right", "tiles": 2},
                {"op": "walk", "dir": "down", "tiles": 2},
                {"op": "walk", "dir": "left", "tiles": 2}
            ]}"#,
        )
        .unwrap();
        let report = run_script(&mut session, &script).unwrap();
        let text = format_report(&report);
        assert!(text.contains("Memory at (1, 7)"));
        assert!(text.contains("[0] Integrate"));
    }
}
