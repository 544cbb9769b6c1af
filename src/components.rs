use bevy::math::{Rect, Vec2};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Grid and spatial
// ---------------------------------------------------------------------------

/// Tile coordinate: column `x`, row `y`, row 0 at the top of the maze.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dir: Direction) -> TilePos {
        let (dx, dy) = dir.delta();
        TilePos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Cardinal direction for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid offset for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Unit vector in screen space (+y points down).
    pub fn unit(&self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f32, dy as f32)
    }
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// Axis-aligned bounding box positioned by its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl Body {
    pub fn new(center: Vec2, size: f32) -> Self {
        Self {
            center,
            half_extent: Vec2::splat(size / 2.0),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_half_size(self.center, self.half_extent)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.center = rect.center();
    }
}

/// Anything with a bounding box that takes part in collision checks.
pub trait Collidable {
    fn body(&self) -> &Body;

    fn center(&self) -> Vec2 {
        self.body().center
    }

    fn bounds(&self) -> Rect {
        self.body().rect()
    }

    fn touches<C: Collidable + ?Sized>(&self, other: &C) -> bool {
        crate::geometry::intersects(self.bounds(), other.bounds())
    }
}

// ---------------------------------------------------------------------------
// Render markers
// ---------------------------------------------------------------------------

#[derive(Component, Debug)]
pub struct PlayerSprite;

/// Index into the session's pursuer list.
#[derive(Component, Debug, Clone, Copy)]
pub struct PursuerSprite(pub usize);

#[derive(Component, Debug)]
pub struct WallTile;

/// Collectible dot drawn at this tile.
#[derive(Component, Debug, Clone, Copy)]
pub struct PointMarker(pub TilePos);
