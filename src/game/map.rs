//! Map and tile types.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::game::Direction;

/// The maze the minigame ships with, one string per row.
///
/// Glyphs: `.` floor, `#` wall, `m` memory, `^` trap, `C` core, `$` cache.
pub const DEFAULT_LAYOUT: [&str; 11] = [
    "###############",
    "#...#....#m..$#",
    "#.#.#.##.####.#",
    "#.#...#$....#.#",
    "#.#########.#.#",
    "#......^......#",
    "###.######.####",
    "#m..#...^#..m.#",
    "#.###.##.#.##.#",
    "#$....#C.#.^..#",
    "###############",
];

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one tile away in `dir`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// The upper bounds are the map's business.
    #[must_use]
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self::new(x, y))
    }
}

/// Semantic category of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Plain walkable floor.
    Floor = 0,
    /// Impassable wall.
    Wall = 1,
    /// Memory fragment, raises sync.
    Memory = 2,
    /// Hidden firewall trap.
    Trap = 3,
    /// The Philosopher's Stone. Persists after triggering.
    Core = 4,
    /// Raw sugar cache, restores energy.
    Cache = 5,
}

impl TileKind {
    /// Every kind, in code order.
    pub const ALL: [TileKind; 6] = [
        TileKind::Floor,
        TileKind::Wall,
        TileKind::Memory,
        TileKind::Trap,
        TileKind::Core,
        TileKind::Cache,
    ];

    /// Check if the player can stand on this kind of tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    /// Check if arriving on this kind of tile fires an event.
    #[must_use]
    pub const fn is_trigger(self) -> bool {
        !matches!(self, TileKind::Floor | TileKind::Wall)
    }

    /// Whether the tile reverts to floor once its event has fired.
    #[must_use]
    pub const fn is_one_shot(self) -> bool {
        matches!(self, TileKind::Memory | TileKind::Trap | TileKind::Cache)
    }

    /// Decode a numeric tile code (0..=5).
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileKind::Floor),
            1 => Some(TileKind::Wall),
            2 => Some(TileKind::Memory),
            3 => Some(TileKind::Trap),
            4 => Some(TileKind::Core),
            5 => Some(TileKind::Cache),
            _ => None,
        }
    }

    /// Decode a layout glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TileKind::Floor),
            '#' => Some(TileKind::Wall),
            'm' => Some(TileKind::Memory),
            '^' => Some(TileKind::Trap),
            'C' => Some(TileKind::Core),
            '$' => Some(TileKind::Cache),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TileKind::Floor => "Floor",
            TileKind::Wall => "Wall",
            TileKind::Memory => "Memory",
            TileKind::Trap => "Trap",
            TileKind::Core => "Core",
            TileKind::Cache => "Cache",
        }
    }

    /// The layout glyph for this kind.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::Memory => 'm',
            TileKind::Trap => '^',
            TileKind::Core => 'C',
            TileKind::Cache => '$',
        }
    }
}

/// The tile grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridMap {
    /// Width of the map in tiles.
    width: u16,
    /// Height of the map in tiles.
    height: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<TileKind>,
}

impl GridMap {
    /// Create a new map filled with floor tiles.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            tiles: vec![TileKind::Floor; size],
        })
    }

    /// Parse a map from glyph rows.
    ///
    /// Digits `0` to `5` are accepted as numeric tile codes and may be mixed
    /// with glyphs.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no rows, the rows differ in length,
    /// a row is too long, or a glyph is unknown.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let height = u16::try_from(rows.len()).map_err(|_| LayoutError::TooLarge)?;
        let first = rows.first().ok_or(LayoutError::Empty)?;
        let expected = first.as_ref().chars().count();
        let width = u16::try_from(expected).map_err(|_| LayoutError::TooLarge)?;
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(usize::from(width) * usize::from(height));
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != expected {
                return Err(LayoutError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph)
                    .or_else(|| {
                        glyph
                            .to_digit(10)
                            .and_then(|code| u8::try_from(code).ok())
                            .and_then(TileKind::from_code)
                    })
                    .ok_or(LayoutError::UnknownGlyph { row, column, glyph })?;
                tiles.push(kind);
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Build the shipped maze.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn default_layout() -> Self {
        let mut map = Self {
            width: DEFAULT_LAYOUT[0].len() as u16,
            height: DEFAULT_LAYOUT.len() as u16,
            tiles: Vec::with_capacity(DEFAULT_LAYOUT.len() * DEFAULT_LAYOUT[0].len()),
        };
        for line in DEFAULT_LAYOUT {
            map.tiles
                .extend(line.chars().map(|g| TileKind::from_glyph(g).unwrap_or(TileKind::Wall)));
        }
        map
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the raw tiles in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// The kind of tile at `coord`, or `None` outside the grid.
    #[must_use]
    pub fn tile_at(&self, coord: Coord) -> Option<TileKind> {
        self.coord_to_index(coord).map(|idx| self.tiles[idx])
    }

    /// Check whether the player may stand on `coord`.
    ///
    /// Out-of-bounds coordinates and walls are never walkable.
    #[must_use]
    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.tile_at(coord).is_some_and(TileKind::is_walkable)
    }

    /// Set the tile at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, kind: TileKind) -> bool {
        if let Some(idx) = self.coord_to_index(coord) {
            self.tiles[idx] = kind;
            true
        } else {
            false
        }
    }

    /// Iterate over all coordinates and tiles.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (Coord, TileKind)> + '_ {
        let width = usize::from(self.width);
        self.tiles.iter().enumerate().map(move |(idx, &kind)| {
            let x = (idx % width) as u16;
            let y = (idx / width) as u16;
            (Coord::new(x, y), kind)
        })
    }

    /// Count tiles of a given kind.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }

    /// Render the map back into glyph rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(usize::from(self.width))
            .map(|row| row.iter().map(|k| k.glyph()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_step() {
        let coord = Coord::new(5, 5);
        assert_eq!(coord.step(Direction::Up), Some(Coord::new(5, 4)));
        assert_eq!(coord.step(Direction::Down), Some(Coord::new(5, 6)));
        assert_eq!(coord.step(Direction::Left), Some(Coord::new(4, 5)));
        assert_eq!(coord.step(Direction::Right), Some(Coord::new(6, 5)));
    }

    #[test]
    fn test_coord_step_at_origin() {
        let coord = Coord::new(0, 0);
        assert_eq!(coord.step(Direction::Up), None);
        assert_eq!(coord.step(Direction::Left), None);
    }

    #[test]
    fn test_map_zero_size() {
        assert!(GridMap::new(0, 10).is_none());
        assert!(GridMap::new(10, 0).is_none());
    }

    #[test]
    fn test_default_layout_dimensions() {
        let map = GridMap::default_layout();
        assert_eq!(map.width(), 15);
        assert_eq!(map.height(), 11);
        assert_eq!(map.count(TileKind::Core), 1);
        assert_eq!(map.count(TileKind::Memory), 3);
        assert_eq!(map.count(TileKind::Trap), 3);
        assert_eq!(map.count(TileKind::Cache), 3);
        assert_eq!(map.tile_at(Coord::new(7, 9)), Some(TileKind::Core));
        assert_eq!(map.tile_at(Coord::new(1, 1)), Some(TileKind::Floor));
    }

    #[test]
    fn test_from_rows_matches_default() {
        let parsed = GridMap::from_rows(&DEFAULT_LAYOUT).unwrap();
        assert_eq!(parsed, GridMap::default_layout());
        assert_eq!(parsed.to_rows(), DEFAULT_LAYOUT.to_vec());
    }

    #[test]
    fn test_from_rows_numeric_codes() {
        let numeric = GridMap::from_rows(&["11111", "10231", "145.1", "11111"]).unwrap();
        let glyphs = GridMap::from_rows(&["#####", "#.m^#", "#C$.#", "#####"]).unwrap();
        assert_eq!(numeric, glyphs);
        assert_eq!(numeric.to_rows()[1], "#.m^#");
        assert!(matches!(
            GridMap::from_rows(&["#6#"]),
            Err(LayoutError::UnknownGlyph { row: 0, column: 1, glyph: '6' })
        ));
    }

    #[test]
    fn test_from_rows_errors() {
        let empty: [&str; 0] = [];
        assert!(matches!(GridMap::from_rows(&empty), Err(LayoutError::Empty)));
        assert!(matches!(
            GridMap::from_rows(&["###", "##"]),
            Err(LayoutError::Ragged { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            GridMap::from_rows(&["#x#"]),
            Err(LayoutError::UnknownGlyph { row: 0, column: 1, glyph: 'x' })
        ));
    }

    #[test]
    fn test_walkability() {
        let map = GridMap::default_layout();
        assert!(!map.is_walkable(Coord::new(0, 0)));
        assert!(map.is_walkable(Coord::new(1, 1)));
        assert!(map.is_walkable(Coord::new(7, 9)));
        assert!(!map.is_walkable(Coord::new(15, 1)));
        assert!(!map.is_walkable(Coord::new(1, 11)));
        assert!(map.is_walkable(Coord::new(1, 2)));
    }

    #[test]
    fn test_boundaries_impassable_regardless_of_kind() {
        let map = GridMap::new(3, 3).unwrap();
        assert!(map.is_walkable(Coord::new(2, 2)));
        assert!(!map.is_walkable(Coord::new(3, 2)));
        assert!(!map.is_walkable(Coord::new(2, 3)));
    }

    #[test]
    fn test_map_set() {
        let mut map = GridMap::new(4, 4).unwrap();
        assert!(map.set(Coord::new(1, 1), TileKind::Memory));
        assert_eq!(map.tile_at(Coord::new(1, 1)), Some(TileKind::Memory));
        assert!(!map.set(Coord::new(4, 0), TileKind::Wall));
    }

    #[test]
    fn test_tile_codes_round_trip() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_code(kind as u8), Some(kind));
            assert_eq!(TileKind::from_glyph(kind.glyph()), Some(kind));
        }
        assert_eq!(TileKind::from_code(6), None);
    }

    #[test]
    fn test_trigger_kinds() {
        assert!(!TileKind::Floor.is_trigger());
        assert!(!TileKind::Wall.is_trigger());
        assert!(TileKind::Core.is_trigger());
        assert!(!TileKind::Core.is_one_shot());
        assert!(TileKind::Memory.is_one_shot());
    }
}
