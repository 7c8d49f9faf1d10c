#![no_main]

//! Config and layout fuzzer.
//!
//! Feeds arbitrary JSON documents through config parsing and validation. Any
//! config that validates must produce a session that can tick without
//! panicking.

use candybug::{Config, Direction, Session};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = Config::from_json(text) else {
        return;
    };
    let Ok(mut session) = Session::new(&config) else {
        return;
    };

    for dir in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
        session.press(dir);
        for _ in 0..32 {
            session.tick();
        }
        session.release(dir);
    }
    let snapshot = session.snapshot();
    assert_eq!(snapshot.tiles.len(), usize::from(snapshot.width) * usize::from(snapshot.height));
});
