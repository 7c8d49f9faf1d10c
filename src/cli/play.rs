//! Play command implementation - interactive TUI.

// Fog shading and layout use intentional float-to-int casts
#![allow(
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use super::output::status_line;
use super::{load_config, CliError};
use candybug::game::{Accent, Snapshot, TileKind, TileView};
use candybug::{Direction, Session};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, stdout, Stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long a key press counts as held when the terminal cannot report
/// key releases.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Sweetness lever step for `+`/`-`.
const SWEETNESS_STEP: f64 = 5.0;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the terminal fails.
pub(crate) fn execute(config: Option<PathBuf>, tick_rate: Option<u32>) -> Result<(), CliError> {
    let config = load_config(config.as_deref(), tick_rate)?;
    let session = Session::new(&config)?;
    let tick = Duration::from_secs_f64(1.0 / f64::from(config.tuning.tick_rate_hz));
    run_tui(session, tick)
}

/// Whether the main loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// App state for the TUI.
struct App {
    session: Session,
    tick: Duration,
    reports_releases: bool,
    held_until: [(Direction, Option<Instant>); 4],
}

impl App {
    fn new(session: Session, tick: Duration, reports_releases: bool) -> Self {
        Self {
            session,
            tick,
            reports_releases,
            held_until: Direction::PRECEDENCE.map(|dir| (dir, None)),
        }
    }

    fn press(&mut self, dir: Direction) {
        self.session.press(dir);
        if !self.reports_releases
            && let Some(slot) = self.held_until.iter_mut().find(|(d, _)| *d == dir)
        {
            slot.1 = Some(Instant::now() + HOLD_WINDOW);
        }
    }

    fn release(&mut self, dir: Direction) {
        self.session.release(dir);
    }

    /// Release keys whose hold window has lapsed.
    fn expire_holds(&mut self) {
        let now = Instant::now();
        for (dir, until) in &mut self.held_until {
            if until.is_some_and(|deadline| deadline <= now) {
                *until = None;
                self.session.release(*dir);
            }
        }
    }

    fn nudge_sweetness(&mut self, delta: f64) {
        let value = self.session.stats().sweetness() + delta;
        self.session.set_sweetness(value);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if let Some(dir) = direction_for(key.code) {
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => self.press(dir),
                KeyEventKind::Release => self.release(dir),
            }
            return Flow::Continue;
        }
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Esc => {
                self.session.toggle_menu();
            }
            KeyCode::Char('r') if self.session.is_menu_open() || self.session.is_ended() => {
                self.session.restart();
                self.held_until = Direction::PRECEDENCE.map(|dir| (dir, None));
            }
            KeyCode::Char(c @ '1'..='3') => {
                let index = usize::from(c as u8 - b'1');
                self.session.choose(index);
            }
            KeyCode::Enter => {
                self.session.choose(0);
            }
            KeyCode::Char('+' | '=') => self.nudge_sweetness(SWEETNESS_STEP),
            KeyCode::Char('-' | '_') => self.nudge_sweetness(-SWEETNESS_STEP),
            KeyCode::Char('c') => {
                self.session.consume_cache();
            }
            _ => {}
        }
        Flow::Continue
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Direction::Right),
        _ => None,
    }
}

fn run_tui(session: Session, tick: Duration) -> Result<(), CliError> {
    enable_raw_mode()?;
    let reports_releases = supports_keyboard_enhancement().unwrap_or(false);
    let mut terminal = match enter_terminal(reports_releases) {
        Ok(terminal) => terminal,
        Err(e) => {
            if let Err(restore) = restore_terminal(&mut stdout(), reports_releases) {
                warn!(%restore, "failed to restore terminal");
            }
            return Err(e);
        }
    };

    info!(reports_releases, tick = ?tick, "terminal ready");
    let mut app = App::new(session, tick, reports_releases);
    let result = event_loop(&mut terminal, &mut app);
    let restored = restore_terminal(terminal.backend_mut(), reports_releases);

    let summary = app.session.abort();
    info!(ticks = summary.ticks, ending = ?summary.ending, "play finished");
    result?;
    Ok(restored?)
}

fn enter_terminal(
    reports_releases: bool,
) -> Result<Terminal<CrosstermBackend<Stdout>>, CliError> {
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if reports_releases {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| CliError::new(e.to_string()))
}

/// Undo everything `enter_terminal` and `enable_raw_mode` set up.
fn restore_terminal<W: Write>(out: &mut W, reports_releases: bool) -> io::Result<()> {
    if reports_releases {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    let mut last_tick = Instant::now();
    loop {
        // Draw
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input until the next tick is due
        let timeout = app.tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && app.handle_key(key) == Flow::Quit
        {
            return Ok(());
        }

        if last_tick.elapsed() >= app.tick {
            app.expire_holds();
            app.session.tick();
            last_tick = Instant::now();
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let snap = app.session.snapshot();

    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app, &snap);

    let map_width = snap.width.saturating_mul(2).saturating_add(2);
    let main_chunks = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Length(map_width), Constraint::Min(28)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], &snap);
    render_hud(f, main_chunks[1], &snap);
    render_footer(f, chunks[2], app);

    if let Some(dialogue) = &snap.dialogue {
        let mut lines = vec![Line::from(dialogue.text().to_string()), Line::from("")];
        for (i, choice) in dialogue.choices().iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("[{}] {}", i + 1, choice.label()),
                Style::default().fg(accent(Accent::CYAN)),
            )));
        }
        render_popup(f, " Signal ", lines, accent(Accent::GOLD));
    } else if app.session.is_menu_open() {
        let lines = vec![
            Line::from("SYSTEM PAUSED"),
            Line::from(""),
            Line::from("[Esc] Resume   [r] Restart   [q] Quit"),
        ];
        render_popup(f, " Menu ", lines, Color::Gray);
    } else if let Some(ending) = &snap.ending {
        let color = accent(ending.accent);
        let lines = vec![
            Line::from(Span::styled(
                ending.title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(ending.description),
            Line::from(""),
            Line::from("[r] Restart   [q] Quit"),
        ];
        render_popup(f, " Ending ", lines, color);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, snap: &Snapshot) {
    let header = Paragraph::new(status_line(snap, app.session.mode()))
        .style(
            Style::default()
                .fg(accent(Accent::CYAN))
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, snap: &Snapshot) {
    let width = usize::from(snap.width);
    let mut lines: Vec<Line> = Vec::with_capacity(usize::from(snap.height));

    for row in snap.tiles.chunks(width.max(1)) {
        let spans: Vec<Span> = row
            .iter()
            .map(|view| {
                if snap.tile == Some(view.coord) {
                    player_span(snap)
                } else {
                    tile_span(view, snap.core_revealed)
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let map_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Dream "));

    f.render_widget(map_widget, area);
}

fn player_span(snap: &Snapshot) -> Span<'static> {
    let glyph = match (snap.facing, snap.frame % 2 == 0) {
        (Direction::Up, false) => "▲ ",
        (Direction::Up, true) => "△ ",
        (Direction::Down, false) => "▼ ",
        (Direction::Down, true) => "▽ ",
        (Direction::Left, false) => "◀ ",
        (Direction::Left, true) => "◁ ",
        (Direction::Right, false) => "▶ ",
        (Direction::Right, true) => "▷ ",
    };
    Span::styled(
        glyph,
        Style::default()
            .fg(accent(Accent::ROSE))
            .add_modifier(Modifier::BOLD),
    )
}

fn tile_span(view: &TileView, core_revealed: bool) -> Span<'static> {
    if !view.visible {
        return Span::raw("  ");
    }
    let (glyph, base) = match view.kind {
        TileKind::Floor => ("· ", Accent::rgb(0x55, 0x4a, 0x66)),
        TileKind::Wall => ("██", Accent::rgb(0x6a, 0x4c, 0x8c)),
        TileKind::Memory => ("◆ ", Accent::CYAN),
        TileKind::Trap => ("^^", Accent::ROSE),
        TileKind::Core if core_revealed => ("◎ ", Accent::GOLD),
        TileKind::Core => ("◎ ", Accent::ASH),
        TileKind::Cache => ("$ ", Accent::MINT),
    };
    Span::styled(glyph, Style::default().fg(shade(base, view.opacity)))
}

fn render_hud(f: &mut Frame, area: Rect, snap: &Snapshot) {
    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let stats = &snap.stats;
    let gauges = [
        (" Energy ", stats.energy(), Accent::MINT),
        (" Corruption ", stats.corruption(), Accent::ROSE),
        (" Sync ", stats.sync(), Accent::CYAN),
        (" Sweetness ", stats.sweetness(), Accent::GOLD),
    ];
    for (i, (title, value, color)) in gauges.into_iter().enumerate() {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(accent(color)))
            .ratio((value / 100.0).clamp(0.0, 1.0))
            .label(format!("{value:.1}"));
        f.render_widget(gauge, rows[i]);
    }

    let modifier = stats.modifier().map_or("None", candybug::game::Modifier::name);
    let core = if snap.core_revealed {
        "Core: resonating"
    } else {
        "Core: obscured"
    };
    let info = Paragraph::new(vec![
        Line::from(format!("Modifier: {modifier}")),
        Line::from(core),
        Line::from(format!("Sprite: {}", snap.sprite)),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Status "))
    .wrap(Wrap { trim: false });
    f.render_widget(info, rows[4]);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.session.is_ended() {
        " [r] Restart  [q] Quit "
    } else {
        " [←↑↓→/WASD] Move  [Esc] Menu  [1-3] Choose  [+/-] Sweetness  [c] Consume  [q] Quit "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn render_popup(f: &mut Frame, title: &str, lines: Vec<Line>, color: Color) {
    let area = centered_rect(60, 40, f.area());
    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn accent(color: Accent) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Dim a color towards black by fog opacity.
fn shade(color: Accent, opacity: f64) -> Color {
    let scale = |c: u8| (f64::from(c) * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::Rgb(scale(color.r), scale(color.g), scale(color.b))
}
