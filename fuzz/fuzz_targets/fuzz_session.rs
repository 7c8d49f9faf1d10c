#![no_main]

//! Session input fuzzer.
//!
//! Drives the default maze with an arbitrary mix of key presses, ticks,
//! lever moves, dialogue choices, menu toggles and restarts, checking the
//! session invariants after every operation.

use arbitrary::Arbitrary;
use candybug::game::{check_invariants, STAT_MAX, STAT_MIN};
use candybug::{Config, Direction, Session};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated input.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzOp {
    Press(u8),
    Release(u8),
    Tick(u8),
    Sweetness(f64),
    ConsumeCache,
    Choose(u8),
    Menu,
    Restart,
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// Starting sweetness.
    sweetness: f64,
    /// Starting corruption.
    corruption: f64,
    /// Operations to replay.
    ops: Vec<FuzzOp>,
}

fn direction(code: u8) -> Direction {
    match code % 4 {
        0 => Direction::Up,
        1 => Direction::Down,
        2 => Direction::Left,
        _ => Direction::Right,
    }
}

fuzz_target!(|input: SessionInput| {
    let mut config = Config::default();
    config.initial.sweetness = input.sweetness;
    config.initial.corruption = input.corruption;
    let mut session = match Session::new(&config) {
        Ok(session) => session,
        Err(_) => return,
    };

    for op in input.ops.into_iter().take(200) {
        match op {
            FuzzOp::Press(code) => session.press(direction(code)),
            FuzzOp::Release(code) => session.release(direction(code)),
            FuzzOp::Tick(n) => {
                for _ in 0..(n % 64) {
                    session.tick();
                }
            }
            FuzzOp::Sweetness(value) => {
                session.set_sweetness(value);
            }
            FuzzOp::ConsumeCache => {
                session.consume_cache();
            }
            FuzzOp::Choose(index) => {
                session.choose(usize::from(index % 4));
            }
            FuzzOp::Menu => {
                session.toggle_menu();
            }
            FuzzOp::Restart => session.restart(),
        }

        let violations = check_invariants(&session);
        if !violations.is_empty() {
            panic!("invariant violations after {op:?}: {violations:?}");
        }
        let stats = session.stats();
        for value in [stats.energy(), stats.corruption(), stats.sync(), stats.sweetness()] {
            assert!((STAT_MIN..=STAT_MAX).contains(&value), "stat out of range: {value}");
        }
    }
});
