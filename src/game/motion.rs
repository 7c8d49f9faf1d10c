//! Player motion: directional input, tile-to-tile movement and walk animation.
//!
//! The controller is a two-state machine. While idle it samples the held
//! direction and commits a move when the neighbouring tile is walkable.
//! While moving it advances the pixel position by the current speed each
//! tick, never overshooting, and reports arrival once the target is reached.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Speeds;
use crate::game::{Coord, GridMap, Modifier, StatLedger};

/// Number of walk animation poses.
pub const ANIMATION_FRAMES: u8 = 4;

/// Idle pose.
pub const IDLE_FRAME: u8 = 1;

/// Sweetness below which the player drags along at the slow speed.
pub const SLOW_SWEETNESS_BELOW: f64 = 20.0;

/// Facing / input direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// All directions in input precedence order.
    pub const PRECEDENCE: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Tile delta for one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Single-letter code used by sprite sheets (`U`, `D`, `L`, `R`).
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// Raw held-key state for the four directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionalInput {
    held: [bool; 4],
}

impl DirectionalInput {
    const fn slot(dir: Direction) -> usize {
        match dir {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Record a key-down (`true`) or key-up (`false`) for `dir`.
    pub fn set(&mut self, dir: Direction, down: bool) {
        self.held[Self::slot(dir)] = down;
    }

    /// Check if `dir` is currently held.
    #[must_use]
    pub const fn is_held(&self, dir: Direction) -> bool {
        self.held[Self::slot(dir)]
    }

    /// Release every key.
    pub fn clear(&mut self) {
        self.held = [false; 4];
    }

    /// The one direction honoured this tick: Up > Down > Left > Right.
    #[must_use]
    pub fn resolve(&self) -> Option<Direction> {
        Direction::PRECEDENCE
            .into_iter()
            .find(|&dir| self.is_held(dir))
    }
}

/// A position in pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelPos {
    /// Horizontal pixel offset.
    pub x: i32,
    /// Vertical pixel offset.
    pub y: i32,
}

impl PixelPos {
    /// Create a new pixel position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin pixel of a tile.
    #[must_use]
    pub fn of_tile(coord: Coord, tile_size: i32) -> Self {
        Self::new(i32::from(coord.x) * tile_size, i32::from(coord.y) * tile_size)
    }

    /// Signed tile column/row containing this position's visual centre.
    #[must_use]
    pub const fn tile_xy(self, tile_size: i32) -> (i32, i32) {
        let half = tile_size / 2;
        (
            (self.x + half).div_euclid(tile_size),
            (self.y + half).div_euclid(tile_size),
        )
    }

    /// Tile containing this position's visual centre, if non-negative.
    #[must_use]
    pub fn tile(self, tile_size: i32) -> Option<Coord> {
        let (x, y) = self.tile_xy(tile_size);
        Some(Coord::new(u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }
}

/// Outcome of one motion tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum Step {
    /// Idle with no direction held.
    Idle,
    /// Idle; the requested neighbour is not walkable.
    Blocked,
    /// A move towards the given tile was committed.
    Departed(Coord),
    /// Still travelling.
    Moving,
    /// Reached the given tile this tick.
    Arrived(Coord),
}

/// The player avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Player {
    pos: PixelPos,
    target: PixelPos,
    facing: Direction,
    frame: u8,
    anim_timer: u32,
    in_transit: bool,
}

impl Player {
    /// Spawn an idle player on `coord`, facing down.
    #[must_use]
    pub fn spawn(coord: Coord, tile_size: i32) -> Self {
        let pos = PixelPos::of_tile(coord, tile_size);
        Self {
            pos,
            target: pos,
            facing: Direction::Down,
            frame: IDLE_FRAME,
            anim_timer: 0,
            in_transit: false,
        }
    }

    /// Current pixel position.
    #[must_use]
    pub const fn pos(&self) -> PixelPos {
        self.pos
    }

    /// Pixel position of the committed destination (equal to `pos` when idle).
    #[must_use]
    pub const fn target(&self) -> PixelPos {
        self.target
    }

    /// Facing direction.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Animation pose in `1..=4`.
    #[must_use]
    pub const fn frame(&self) -> u8 {
        self.frame
    }

    /// Whether a move is in progress.
    #[must_use]
    pub const fn in_transit(&self) -> bool {
        self.in_transit
    }

    /// Sprite key such as `D1` or `R3`.
    #[must_use]
    pub fn sprite_key(&self) -> String {
        format!("{}{}", self.facing.code(), self.frame)
    }

    /// Advance the motion state machine by one tick.
    pub fn step(
        &mut self,
        input: Option<Direction>,
        map: &GridMap,
        speed: i32,
        tile_size: i32,
    ) -> Step {
        if self.in_transit {
            self.advance(speed, tile_size)
        } else {
            self.try_depart(input, map, tile_size)
        }
    }

    #[cfg(test)]
    pub(crate) fn force_state(
        &mut self,
        pos: PixelPos,
        target: PixelPos,
        in_transit: bool,
        frame: u8,
    ) {
        self.pos = pos;
        self.target = target;
        self.in_transit = in_transit;
        self.frame = frame;
    }

    fn try_depart(&mut self, input: Option<Direction>, map: &GridMap, tile_size: i32) -> Step {
        let Some(dir) = input else {
            self.frame = IDLE_FRAME;
            return Step::Idle;
        };

        self.facing = dir;
        let Some(to) = self
            .pos
            .tile(tile_size)
            .and_then(|here| here.step(dir))
            .filter(|&to| map.is_walkable(to))
        else {
            self.frame = IDLE_FRAME;
            return Step::Blocked;
        };

        let (dx, dy) = dir.delta();
        let (dpx, dpy) = (i32::from(dx) * tile_size, i32::from(dy) * tile_size);
        self.target = PixelPos::new(self.pos.x + dpx, self.pos.y + dpy);
        self.in_transit = true;

        debug!(x = to.x, y = to.y, facing = ?dir, "move committed");
        Step::Departed(to)
    }

    fn advance(&mut self, speed: i32, tile_size: i32) -> Step {
        let speed = speed.max(1);
        self.pos.x = approach(self.pos.x, self.target.x, speed);
        self.pos.y = approach(self.pos.y, self.target.y, speed);

        self.anim_timer += 1;
        if i64::from(self.anim_timer) * i64::from(speed) > 32 {
            self.frame = self.frame % ANIMATION_FRAMES + 1;
            self.anim_timer = 0;
        }

        if self.pos != self.target {
            return Step::Moving;
        }

        self.in_transit = false;
        match self.pos.tile(tile_size) {
            Some(at) => Step::Arrived(at),
            None => Step::Idle,
        }
    }
}

fn approach(current: i32, target: i32, speed: i32) -> i32 {
    match current.cmp(&target) {
        Ordering::Less => (current + speed).min(target),
        Ordering::Greater => (current - speed).max(target),
        Ordering::Equal => current,
    }
}

/// Pixels per tick for the current ledger.
///
/// Frenzy wins over the low-sweetness drag when both would apply.
#[must_use]
pub fn speed_for(stats: &StatLedger, speeds: &Speeds) -> i32 {
    if stats.modifier() == Some(Modifier::Frenzy) {
        speeds.fast
    } else if stats.sweetness() < SLOW_SWEETNESS_BELOW {
        speeds.slow
    } else {
        speeds.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: i32 = 64;

    fn corridor() -> GridMap {
        GridMap::from_rows(&["#####", "#...#", "#.#.#", "#####"]).unwrap()
    }

    #[test]
    fn test_input_precedence() {
        let mut input = DirectionalInput::default();
        assert_eq!(input.resolve(), None);

        input.set(Direction::Right, true);
        input.set(Direction::Left, true);
        assert_eq!(input.resolve(), Some(Direction::Left));

        input.set(Direction::Down, true);
        assert_eq!(input.resolve(), Some(Direction::Down));

        input.set(Direction::Up, true);
        assert_eq!(input.resolve(), Some(Direction::Up));

        input.set(Direction::Up, false);
        assert_eq!(input.resolve(), Some(Direction::Down));

        input.clear();
        assert_eq!(input.resolve(), None);
    }

    #[test]
    fn test_spawn_is_idle_on_tile_origin() {
        let player = Player::spawn(Coord::new(1, 1), TILE);
        assert_eq!(player.pos(), PixelPos::new(64, 64));
        assert_eq!(player.target(), player.pos());
        assert_eq!(player.facing(), Direction::Down);
        assert_eq!(player.frame(), IDLE_FRAME);
        assert!(!player.in_transit());
        assert_eq!(player.sprite_key(), "D1");
    }

    #[test]
    fn test_blocked_move_stays_idle() {
        let map = corridor();
        let mut player = Player::spawn(Coord::new(1, 1), TILE);
        let step = player.step(Some(Direction::Up), &map, 4, TILE);
        assert_eq!(step, Step::Blocked);
        assert!(!player.in_transit());
        assert_eq!(player.facing(), Direction::Up);
        assert_eq!(player.frame(), IDLE_FRAME);
    }

    #[test]
    fn test_grid_edge_blocks_without_walls() {
        let map = GridMap::new(2, 2).unwrap();
        let mut player = Player::spawn(Coord::new(0, 0), TILE);
        for dir in [Direction::Up, Direction::Left] {
            assert_eq!(player.step(Some(dir), &map, 4, TILE), Step::Blocked);
            assert_eq!(player.pos(), PixelPos::new(0, 0));
        }
        assert_eq!(
            player.step(Some(Direction::Down), &map, 4, TILE),
            Step::Departed(Coord::new(0, 1))
        );
        assert_eq!(player.target(), PixelPos::new(0, 64));
    }

    #[test]
    fn test_move_arrives_exactly_without_overshoot() {
        let map = corridor();
        let mut player = Player::spawn(Coord::new(1, 1), TILE);

        assert_eq!(
            player.step(Some(Direction::Right), &map, 4, TILE),
            Step::Departed(Coord::new(2, 1))
        );
        assert_eq!(player.target(), PixelPos::new(128, 64));

        let mut ticks = 0;
        loop {
            ticks += 1;
            match player.step(None, &map, 4, TILE) {
                Step::Moving => {
                    assert!(player.pos().x <= 128);
                    assert!(player.in_transit());
                }
                Step::Arrived(at) => {
                    assert_eq!(at, Coord::new(2, 1));
                    break;
                }
                other => panic!("unexpected step {other:?}"),
            }
        }
        assert_eq!(ticks, 16);
        assert_eq!(player.pos(), PixelPos::new(128, 64));
        assert!(!player.in_transit());
    }

    #[test]
    fn test_speed_that_does_not_divide_tile_clamps() {
        let map = corridor();
        let mut player = Player::spawn(Coord::new(1, 1), TILE);
        player.step(Some(Direction::Right), &map, 5, TILE);
        let mut last = Step::Moving;
        for _ in 0..13 {
            last = player.step(None, &map, 5, TILE);
            assert!(player.pos().x <= 128);
        }
        assert_eq!(last, Step::Arrived(Coord::new(2, 1)));
    }

    #[test]
    fn test_animation_cycles_through_four_poses() {
        let map = GridMap::new(20, 1).unwrap();
        let mut player = Player::spawn(Coord::new(0, 0), TILE);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            player.step(Some(Direction::Right), &map, 4, TILE);
            seen.insert(player.frame());
            assert!((1..=ANIMATION_FRAMES).contains(&player.frame()));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_idle_without_input_resets_frame() {
        let map = corridor();
        let mut player = Player::spawn(Coord::new(1, 1), TILE);
        player.step(Some(Direction::Right), &map, 8, TILE);
        for _ in 0..8 {
            player.step(None, &map, 8, TILE);
        }
        assert_eq!(player.step(None, &map, 8, TILE), Step::Idle);
        assert_eq!(player.frame(), IDLE_FRAME);
    }

    #[test]
    fn test_speed_policy() {
        let speeds = Speeds::default();
        let mut stats = StatLedger::default();
        assert_eq!(speed_for(&stats, &speeds), 4);

        stats.set_sweetness(10.0);
        assert_eq!(speed_for(&stats, &speeds), 2);

        stats.set_sweetness(90.0);
        assert_eq!(speed_for(&stats, &speeds), 8);

        stats.set_sweetness(30.0);
        assert_eq!(speed_for(&stats, &speeds), 4);
    }
}
