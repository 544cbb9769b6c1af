//! Maze grid: parsing, tile queries, collectible bookkeeping and the
//! tile/continuous-space mapping.
//!
//! Layout rows use `W` for walls and `.` for collectibles; every other
//! character is open floor. All rows must have the same length. The outer
//! border is expected to be walls, but that is left to whoever writes the
//! layout. Out-of-bounds queries answer as if the tile were a wall.

use std::collections::BTreeSet;
use std::fmt;

use bevy::math::{Rect, Vec2};
use thiserror::Error;
use tracing::debug;

use crate::components::{Direction, TilePos};

/// The 20x14 maze the game ships with.
pub const CLASSIC_LAYOUT: &str = include_str!("../assets/maps/classic.txt");

// ---------------------------------------------------------------------------
// Tile types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Wall,
    Open,
    Collectible,
}

impl TileKind {
    pub fn from_char(c: char) -> Self {
        match c {
            'W' => TileKind::Wall,
            '.' => TileKind::Collectible,
            _ => TileKind::Open,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            TileKind::Wall => 'W',
            TileKind::Collectible => '.',
            TileKind::Open => ' ',
        }
    }

    pub fn is_walkable(self) -> bool {
        self != TileKind::Wall
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout has no rows")]
    Empty,
    #[error("maze layout has zero width")]
    ZeroWidth,
    #[error("maze row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("maze layout has no walkable tile")]
    NoOpenTiles,
}

// ---------------------------------------------------------------------------
// Maze grid
// ---------------------------------------------------------------------------

/// Fixed-size tile grid. Tiles are stored row-major; `initial` keeps the
/// parsed layout so the grid can be restored in place.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<TileKind>,
    initial: Vec<TileKind>,
    collectibles: BTreeSet<TilePos>,
}

impl MazeGrid {
    /// Parse layout rows into a grid whose tiles are `tile_size` units wide.
    pub fn parse<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, MazeError> {
        let mut grid = MazeGrid {
            width: 0,
            height: 0,
            tile_size,
            tiles: Vec::new(),
            initial: Vec::new(),
            collectibles: BTreeSet::new(),
        };
        grid.load(rows)?;
        Ok(grid)
    }

    /// Parse newline-separated layout text.
    pub fn from_text(text: &str, tile_size: f32) -> Result<Self, MazeError> {
        let rows: Vec<&str> = text.lines().collect();
        Self::parse(&rows, tile_size)
    }

    /// Replace the grid with a new layout, reusing the existing buffers.
    /// On error the grid is left untouched.
    pub fn reset_from<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<(), MazeError> {
        self.load(rows)
    }

    /// Restore every tile and the collectible set to the parsed layout.
    pub fn reset(&mut self) {
        self.tiles.clone_from(&self.initial);
        self.rebuild_collectibles();
    }

    fn load<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<(), MazeError> {
        let Some(first) = rows.first() else {
            return Err(MazeError::Empty);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MazeError::ZeroWidth);
        }
        for (row, line) in rows.iter().enumerate() {
            let found = line.as_ref().chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        self.width = width;
        self.height = rows.len();
        self.initial.clear();
        self.initial.extend(
            rows.iter()
                .flat_map(|line| line.as_ref().chars().map(TileKind::from_char)),
        );
        self.reset();
        debug!(
            width = self.width,
            height = self.height,
            collectibles = self.collectibles.len(),
            "maze loaded"
        );
        Ok(())
    }

    fn rebuild_collectibles(&mut self) {
        self.collectibles.clear();
        for (i, tile) in self.tiles.iter().enumerate() {
            if *tile == TileKind::Collectible {
                self.collectibles.insert(self.pos_of(i));
            }
        }
    }

    fn pos_of(&self, index: usize) -> TilePos {
        TilePos {
            x: (index % self.width) as i32,
            y: (index / self.width) as i32,
        }
    }

    fn index_of(&self, pos: TilePos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Tile kind at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: TilePos) -> Option<TileKind> {
        self.index_of(pos).map(|i| self.tiles[i])
    }

    /// Tile kind at `pos`; out-of-bounds reads as a wall.
    pub fn tile_at(&self, pos: TilePos) -> TileKind {
        self.get(pos).unwrap_or(TileKind::Wall)
    }

    pub fn is_walkable(&self, pos: TilePos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    /// Walkable 4-connected neighbors.
    pub fn neighbors(&self, pos: TilePos) -> impl Iterator<Item = TilePos> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |dir| pos.offset(dir))
            .filter(|n| self.is_walkable(*n))
    }

    pub fn walkable_tiles(&self) -> Vec<TilePos> {
        (0..self.tiles.len())
            .filter(|i| self.tiles[*i].is_walkable())
            .map(|i| self.pos_of(i))
            .collect()
    }

    /// Turn a collectible into open floor. Returns whether one was there.
    pub fn consume_collectible(&mut self, pos: TilePos) -> bool {
        let Some(i) = self.index_of(pos) else {
            return false;
        };
        if self.tiles[i] != TileKind::Collectible {
            return false;
        }
        self.tiles[i] = TileKind::Open;
        self.collectibles.remove(&pos);
        true
    }

    /// Remaining collectibles in row-major order.
    pub fn collectibles(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.collectibles.iter().copied()
    }

    pub fn collectible_count(&self) -> usize {
        self.collectibles.len()
    }

    // -----------------------------------------------------------------------
    // Continuous space
    // -----------------------------------------------------------------------

    pub fn tile_center(&self, pos: TilePos) -> Vec2 {
        Vec2::new(
            (pos.x as f32 + 0.5) * self.tile_size,
            (pos.y as f32 + 0.5) * self.tile_size,
        )
    }

    pub fn tile_rect(&self, pos: TilePos) -> Rect {
        let min = Vec2::new(pos.x as f32, pos.y as f32) * self.tile_size;
        Rect {
            min,
            max: min + Vec2::splat(self.tile_size),
        }
    }

    /// Tile that contains `point`.
    pub fn tile_containing(&self, point: Vec2) -> TilePos {
        let t = (point / self.tile_size).floor();
        TilePos {
            x: t.x as i32,
            y: t.y as i32,
        }
    }

    /// Size of the whole maze in continuous units.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            min: Vec2::ZERO,
            max: self.extent(),
        }
    }

    /// Rectangles of every wall tile (out-of-bounds tiles included) whose
    /// cell lies under `area`.
    pub fn wall_rects_near(&self, area: Rect) -> Vec<Rect> {
        let lo = self.tile_containing(area.min);
        let hi = self.tile_containing(area.max);
        let mut walls = Vec::new();
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let pos = TilePos { x, y };
                if self.tile_at(pos) == TileKind::Wall {
                    walls.push(self.tile_rect(pos));
                }
            }
        }
        walls
    }

    /// Current grid as layout rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width)
            .map(|row| row.iter().map(|t| t.to_char()).collect())
            .collect()
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MAZE: &str = "\
WWWW
W. W
W.xW
WWWW";

    fn grid() -> MazeGrid {
        MazeGrid::from_text(TEST_MAZE, 50.0).unwrap()
    }

    #[test]
    fn parse_small_maze() {
        let maze = grid();
        assert_eq!(maze.width(), 4);
        assert_eq!(maze.height(), 4);
        assert_eq!(maze.collectible_count(), 2);
        assert_eq!(maze.tile_at(TilePos::new(0, 0)), TileKind::Wall);
        assert_eq!(maze.tile_at(TilePos::new(1, 1)), TileKind::Collectible);
        assert_eq!(maze.tile_at(TilePos::new(2, 1)), TileKind::Open);
        // Unknown characters are open floor
        assert_eq!(maze.tile_at(TilePos::new(2, 2)), TileKind::Open);
    }

    #[test]
    fn walkability() {
        let maze = grid();
        assert!(!maze.is_walkable(TilePos::new(0, 0)));
        assert!(maze.is_walkable(TilePos::new(1, 1)));
        assert!(maze.is_walkable(TilePos::new(2, 2)));
        // Out of bounds is a wall
        assert!(!maze.is_walkable(TilePos::new(-1, 0)));
        assert!(!maze.is_walkable(TilePos::new(10, 10)));
        assert_eq!(maze.tile_at(TilePos::new(4, 1)), TileKind::Wall);
        assert_eq!(maze.get(TilePos::new(4, 1)), None);
    }

    #[test]
    fn neighbors_skip_walls() {
        let maze = grid();
        let n: Vec<_> = maze.neighbors(TilePos::new(1, 1)).collect();
        assert_eq!(n.len(), 2);
        assert!(n.contains(&TilePos::new(2, 1)));
        assert!(n.contains(&TilePos::new(1, 2)));
    }

    #[test]
    fn consume_is_idempotent() {
        let mut maze = grid();
        let pos = TilePos::new(1, 1);
        assert!(maze.consume_collectible(pos));
        assert!(!maze.consume_collectible(pos));
        assert_eq!(maze.tile_at(pos), TileKind::Open);
        assert_eq!(maze.collectible_count(), 1);
        // Walls and open tiles never report a collectible
        assert!(!maze.consume_collectible(TilePos::new(0, 0)));
        assert!(!maze.consume_collectible(TilePos::new(2, 1)));
        assert!(!maze.consume_collectible(TilePos::new(-3, 9)));
    }

    #[test]
    fn reset_restores_layout() {
        let mut maze = grid();
        let before = maze.tiles().to_vec();
        let points: Vec<_> = maze.collectibles().collect();
        for p in points.clone() {
            maze.consume_collectible(p);
        }
        assert_eq!(maze.collectible_count(), 0);
        maze.reset();
        assert_eq!(maze.tiles(), before.as_slice());
        assert_eq!(maze.collectibles().collect::<Vec<_>>(), points);
    }

    #[test]
    fn reset_from_replaces_layout() {
        let mut maze = grid();
        maze.reset_from(&["WWW", "W.W", "WWW"]).unwrap();
        assert_eq!(maze.width(), 3);
        assert_eq!(maze.collectible_count(), 1);

        let err = maze.reset_from(&["WWW", "W."]).unwrap_err();
        assert_eq!(
            err,
            MazeError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        // Failed reload leaves the previous grid in place
        assert_eq!(maze.width(), 3);
    }

    #[test]
    fn malformed_layouts() {
        let empty: [&str; 0] = [];
        assert_eq!(MazeGrid::parse(&empty, 50.0).unwrap_err(), MazeError::Empty);
        assert_eq!(MazeGrid::parse(&[""], 50.0).unwrap_err(), MazeError::ZeroWidth);
        assert!(matches!(
            MazeGrid::parse(&["WWW", "W.", "WWW"], 50.0),
            Err(MazeError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn tile_space_mapping() {
        let maze = grid();
        let pos = TilePos::new(2, 1);
        assert_eq!(maze.tile_center(pos), Vec2::new(125.0, 75.0));
        assert_eq!(maze.tile_containing(Vec2::new(125.0, 75.0)), pos);
        assert_eq!(maze.tile_containing(Vec2::new(100.0, 50.0)), pos);
        assert_eq!(maze.tile_containing(Vec2::new(-1.0, 10.0)), TilePos::new(-1, 0));
        assert_eq!(maze.extent(), Vec2::new(200.0, 200.0));
        let r = maze.tile_rect(pos);
        assert_eq!(r.min, Vec2::new(100.0, 50.0));
        assert_eq!(r.max, Vec2::new(150.0, 100.0));
    }

    #[test]
    fn wall_rects_near_covers_area() {
        let maze = grid();
        // Box around tile (1,1): touches walls above and to the left.
        let area = Rect::new(55.0, 55.0, 95.0, 95.0);
        assert!(maze.wall_rects_near(area).is_empty());
        let area = Rect::new(45.0, 55.0, 85.0, 95.0);
        let walls = maze.wall_rects_near(area);
        assert_eq!(walls, vec![maze.tile_rect(TilePos::new(0, 1))]);
    }

    #[test]
    fn display_reflects_consumption() {
        let mut maze = grid();
        maze.consume_collectible(TilePos::new(1, 1));
        assert_eq!(maze.to_rows()[1], "W  W");
        assert!(maze.to_string().starts_with("WWWW\n"));
    }

    #[test]
    fn classic_layout_is_enclosed() {
        let maze = MazeGrid::from_text(CLASSIC_LAYOUT, 50.0).unwrap();
        assert_eq!(maze.width(), 20);
        assert_eq!(maze.height(), 14);
        for x in 0..20 {
            assert_eq!(maze.tile_at(TilePos::new(x, 0)), TileKind::Wall);
            assert_eq!(maze.tile_at(TilePos::new(x, 13)), TileKind::Wall);
        }
        for y in 0..14 {
            assert_eq!(maze.tile_at(TilePos::new(0, y)), TileKind::Wall);
            assert_eq!(maze.tile_at(TilePos::new(19, y)), TileKind::Wall);
        }
        assert_eq!(maze.extent(), Vec2::new(1000.0, 700.0));
    }

    #[test]
    fn parse_all_map_files() {
        for name in &["classic", "small"] {
            let path = format!("assets/maps/{}.txt", name);
            let text = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
            let maze = MazeGrid::from_text(&text, 50.0)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e));
            assert!(maze.collectible_count() > 0, "{} has no points", name);
        }
    }
}
