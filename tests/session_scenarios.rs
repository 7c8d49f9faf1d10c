//! Scenario tests driving whole sessions through the public API.
//!
//! Run with: cargo test session_scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use candybug::game::{ChoiceAction, Modifier, PixelPos};
use candybug::{
    run_script, Config, Coord, Direction, EndingKind, InputScript, Session, TickEvent, TileKind,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn session_with(layout: &[&str], spawn: Coord) -> Session {
    let config = Config {
        layout: layout.iter().map(|row| (*row).to_string()).collect(),
        spawn,
        ..Config::default()
    };
    Session::new(&config).unwrap()
}

/// Hold `dir` until the player arrives on the next tile (or is blocked).
fn walk(session: &mut Session, dir: Direction) -> TickEvent {
    session.press(dir);
    let mut last = TickEvent::Idle;
    for _ in 0..200 {
        last = session.tick();
        if matches!(
            last,
            TickEvent::Arrived { .. } | TickEvent::Blocked | TickEvent::Inhibited
        ) {
            break;
        }
    }
    session.release(dir);
    last
}

fn walk_n(session: &mut Session, dir: Direction, tiles: usize) {
    for _ in 0..tiles {
        let event = walk(session, dir);
        assert!(
            matches!(event, TickEvent::Arrived { .. }),
            "walk {dir:?} ended with {event:?}"
        );
    }
}

#[test]
fn test_blocked_then_committed_move() {
    let mut session = Session::new(&Config::default()).unwrap();

    session.press(Direction::Up);
    assert_eq!(session.tick(), TickEvent::Blocked);
    assert!(!session.player().in_transit());
    assert_eq!(session.player().pos(), PixelPos::new(64, 64));
    session.release(Direction::Up);

    session.press(Direction::Down);
    assert_eq!(session.tick(), TickEvent::Departed(Coord::new(1, 2)));
    assert_eq!(session.player().target(), PixelPos::new(64, 128));
    session.release(Direction::Down);

    let mut ticks = 0;
    loop {
        ticks += 1;
        match session.tick() {
            TickEvent::Moving => assert!(session.player().pos().y <= 128),
            TickEvent::Arrived { at, triggered } => {
                assert_eq!(at, Coord::new(1, 2));
                assert_eq!(triggered, None);
                break;
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(ticks, 16);
    assert_eq!(session.player().pos(), PixelPos::new(64, 128));
    assert!(!session.player().in_transit());
    assert!(approx(session.stats().energy(), 98.0));
}

#[test]
fn test_sweetness_modifiers() {
    let mut session = Session::new(&Config::default()).unwrap();
    session.set_sweetness(30.0);
    assert_eq!(session.stats().modifier(), Some(Modifier::Calm));
    session.set_sweetness(90.0);
    assert_eq!(session.stats().modifier(), Some(Modifier::Frenzy));
    session.set_sweetness(50.0);
    assert_eq!(session.stats().modifier(), None);
}

#[test]
fn test_memory_fires_once() {
    let mut session = session_with(&["######", "#.m..#", "######"], Coord::new(1, 1));

    let event = walk(&mut session, Direction::Right);
    assert_eq!(
        event,
        TickEvent::Arrived {
            at: Coord::new(2, 1),
            triggered: Some(TileKind::Memory)
        }
    );
    assert!(approx(session.stats().sync(), 60.0));
    assert_eq!(session.map().tile_at(Coord::new(2, 1)), Some(TileKind::Floor));
    assert_eq!(session.choose(0), Some(ChoiceAction::Resume));

    walk_n(&mut session, Direction::Right, 1);
    let back = walk(&mut session, Direction::Left);
    assert_eq!(
        back,
        TickEvent::Arrived {
            at: Coord::new(2, 1),
            triggered: None
        }
    );
    assert!(session.dialogue().is_none());
    assert!(approx(session.stats().sync(), 60.0));
}

#[test]
fn test_core_requires_sync() {
    let mut session = session_with(&["######", "#C.mm#", "######"], Coord::new(2, 1));

    let event = walk(&mut session, Direction::Left);
    assert_eq!(
        event,
        TickEvent::Arrived {
            at: Coord::new(1, 1),
            triggered: Some(TileKind::Core)
        }
    );
    let locked = session.dialogue().unwrap();
    assert_eq!(locked.choices().len(), 1);
    assert_eq!(locked.choices()[0].label(), "Step Back");
    assert!(approx(session.stats().sync(), 40.0));
    assert!(approx(session.stats().corruption(), 10.0));
    assert!(approx(session.stats().energy(), 98.0));
    assert_eq!(session.choose(0), Some(ChoiceAction::Resume));
    assert_eq!(session.map().tile_at(Coord::new(1, 1)), Some(TileKind::Core));

    walk_n(&mut session, Direction::Right, 2);
    session.choose(0);
    walk_n(&mut session, Direction::Right, 1);
    session.choose(0);
    assert!(approx(session.stats().sync(), 80.0));

    walk_n(&mut session, Direction::Left, 3);
    let ready = session.dialogue().unwrap();
    assert_eq!(ready.choices().len(), 3);
    assert_eq!(
        session.choose(2),
        Some(ChoiceAction::Conclude(EndingKind::Bad))
    );
    let ending = session.ending().unwrap();
    assert_eq!(ending.title, "DATA CORRUPTION");
}

#[test]
fn test_greed_ending_from_cache() {
    let mut config = Config::default();
    config.initial.corruption = 85.0;
    config.initial.sweetness = 100.0;
    let mut session = Session::new(&config).unwrap();

    assert!(session.consume_cache());
    assert!(approx(session.stats().corruption(), 100.0));
    assert!(session.ending().is_none());

    assert_eq!(session.tick(), TickEvent::Concluded(EndingKind::DataConsumed));
    assert_eq!(session.ending().unwrap().title, "DATA CONSUMED");
}

#[test]
fn test_ending_waits_for_paused_session() {
    let mut config = Config::default();
    config.initial.corruption = 85.0;
    config.initial.sweetness = 100.0;
    let mut session = Session::new(&config).unwrap();

    assert!(session.toggle_menu());
    assert!(session.consume_cache());
    assert_eq!(session.tick(), TickEvent::Inhibited);
    assert!(session.ending().is_none());

    assert!(session.toggle_menu());
    assert_eq!(session.tick(), TickEvent::Concluded(EndingKind::DataConsumed));
}

#[test]
fn test_energy_crash() {
    let mut config = Config::default();
    config.initial.energy = 2.0;
    let mut session = Session::new(&config).unwrap();

    walk_n(&mut session, Direction::Down, 1);
    assert!(approx(session.stats().energy(), 0.0));
    assert_eq!(session.tick(), TickEvent::Concluded(EndingKind::SystemCrash));
    assert_eq!(session.ending().unwrap().title, "SYSTEM CRASH");
}

#[test]
fn test_frenzy_is_fast_and_costly() {
    let mut session = Session::new(&Config::default()).unwrap();
    session.set_sweetness(90.0);
    session.press(Direction::Down);
    let mut ticks = 0;
    loop {
        ticks += 1;
        if matches!(session.tick(), TickEvent::Arrived { .. }) {
            break;
        }
    }
    // Departure tick plus 64 / 8 moving ticks.
    assert_eq!(ticks, 9);
    assert!(approx(session.stats().energy(), 96.0));
}

#[test]
fn test_low_sweetness_drags() {
    let mut session = Session::new(&Config::default()).unwrap();
    session.set_sweetness(10.0);
    session.press(Direction::Down);
    let mut ticks = 0;
    loop {
        ticks += 1;
        if matches!(session.tick(), TickEvent::Arrived { .. }) {
            break;
        }
    }
    assert_eq!(ticks, 33);
}

#[test]
fn test_calm_step_is_cheap() {
    let mut session = Session::new(&Config::default()).unwrap();
    session.set_sweetness(30.0);
    walk_n(&mut session, Direction::Down, 2);
    assert!(approx(session.stats().energy(), 99.0));
}

#[test]
fn test_menu_freezes_motion_mid_move() {
    let mut session = Session::new(&Config::default()).unwrap();
    session.press(Direction::Down);
    for _ in 0..5 {
        session.tick();
    }
    let frozen = session.player().pos();
    assert!(session.player().in_transit());

    session.toggle_menu();
    for _ in 0..30 {
        assert_eq!(session.tick(), TickEvent::Inhibited);
    }
    assert_eq!(session.player().pos(), frozen);

    session.toggle_menu();
    assert_eq!(session.tick(), TickEvent::Moving);
}

#[test]
fn test_full_default_maze_good_ending() {
    let mut session = Session::new(&Config::default()).unwrap();

    // Memory fragment in the west wing.
    walk_n(&mut session, Direction::Down, 4);
    walk_n(&mut session, Direction::Right, 2);
    walk_n(&mut session, Direction::Down, 2);
    walk_n(&mut session, Direction::Left, 2);
    assert_eq!(session.player_tile(), Some(Coord::new(1, 7)));
    assert!(approx(session.stats().sync(), 60.0));
    assert_eq!(session.choose(0), Some(ChoiceAction::Resume));

    // Sugar cache in the south-west corner.
    walk_n(&mut session, Direction::Down, 2);
    assert_eq!(session.dialogue().unwrap().choices()[0].label(), "Consume");
    session.choose(0);
    assert!(approx(session.stats().energy(), 98.0));

    // Through the trap in the middle corridor.
    walk_n(&mut session, Direction::Right, 4);
    walk_n(&mut session, Direction::Up, 2);
    walk_n(&mut session, Direction::Right, 3);
    assert_eq!(session.player_tile(), Some(Coord::new(8, 7)));
    assert_eq!(session.dialogue().unwrap().choices()[0].label(), "Recover");
    session.choose(0);
    assert!(approx(session.stats().corruption(), 25.0));
    assert!(approx(session.stats().energy(), 60.0));

    // The Philosopher's Stone.
    walk_n(&mut session, Direction::Down, 2);
    walk_n(&mut session, Direction::Left, 1);
    assert_eq!(session.player_tile(), Some(Coord::new(7, 9)));
    let labels: Vec<_> = session
        .dialogue()
        .unwrap()
        .choices()
        .iter()
        .map(|c| c.label().to_string())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Calibrate World Order (Good)",
            "Linger in Dream (Neutral)",
            "Consume Everything (Bad)",
        ]
    );
    assert_eq!(
        session.choose(0),
        Some(ChoiceAction::Conclude(EndingKind::Good))
    );

    let ending = session.ending().unwrap();
    assert_eq!(ending.title, "INFINITE BALANCE");
    assert_eq!(ending.accent.hex(), "#9affdc");
    assert!(approx(session.stats().energy(), 54.0));

    let summary = session.abort();
    assert_eq!(summary.ending, Some(EndingKind::Good));
}

#[test]
fn test_restart_after_ending_restores_maze() {
    let mut config = Config::default();
    config.initial.energy = 2.0;
    let mut session = Session::new(&config).unwrap();
    walk_n(&mut session, Direction::Down, 1);
    session.tick();
    assert!(session.is_ended());

    session.restart();
    assert!(session.is_running());
    assert!(approx(session.stats().energy(), 2.0));
    assert_eq!(session.player_tile(), Some(Coord::new(1, 1)));
    assert_eq!(session.map().count(TileKind::Memory), 3);
    assert_eq!(session.ticks(), 0);
}

#[test]
fn test_scripted_run_matches_manual_walk() {
    let script = InputScript::from_json(
        r#"{"steps": [
            {"op": "walk", "dir": "down", "tiles": 4},
            {"op": "walk", "dir": "right", "tiles": 2},
            {"op": "walk", "dir": "down", "tiles": 2},
            {"op": "walk", "dir": "left", "tiles": 2},
            {"op": "choose", "index": 0},
            {"op": "walk", "dir": "down", "tiles": 2},
            {"op": "choose", "index": 0},
            {"op": "walk", "dir": "right", "tiles": 4},
            {"op": "walk", "dir": "up", "tiles": 2},
            {"op": "walk", "dir": "right", "tiles": 3},
            {"op": "choose", "index": 0},
            {"op": "walk", "dir": "down", "tiles": 2},
            {"op": "walk", "dir": "left", "tiles": 1},
            {"op": "choose", "index": 1}
        ]}"#,
    )
    .unwrap();
    let mut session = Session::new(&Config::default()).unwrap();
    let report = run_script(&mut session, &script).unwrap();

    assert_eq!(report.ending, Some(EndingKind::Neutral));
    assert_eq!(report.snapshot.mode, "ended");
    assert_eq!(report.arrivals.len(), 24);
    let triggered: Vec<_> = report.arrivals.iter().filter_map(|a| a.triggered).collect();
    assert_eq!(
        triggered,
        vec![TileKind::Memory, TileKind::Cache, TileKind::Trap, TileKind::Core]
    );
    // 24 tiles at 17 ticks each, the walk resumes from idle every time.
    assert_eq!(report.ticks, 24 * 17);
}
