//! Pursuit AI: shortest-path search over the maze and the pursuer that
//! follows its result.

pub mod pursuer;

use bevy::math::Vec2;
use pathfinding::prelude::astar;
use tracing::{debug, info_span};

use crate::components::{Direction, TilePos};
use crate::maze::MazeGrid;

pub use pursuer::{Pursuer, PursuerState, PursuerStep};

/// Manhattan distance heuristic.
pub fn manhattan(a: TilePos, b: TilePos) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// A* over 4-connected tiles with unit step cost.
///
/// Returns the tiles after `start` up to and including `goal`, or an empty
/// path when the goal cannot be reached (or already is the start).
/// Ties between equal-cost routes are broken arbitrarily.
pub fn find_tile_path<F>(start: TilePos, goal: TilePos, walkable: F) -> Vec<TilePos>
where
    F: Fn(TilePos) -> bool,
{
    let walkable = &walkable;
    let result = astar(
        &start,
        |pos| {
            Direction::ALL
                .map(|dir| pos.offset(dir))
                .into_iter()
                .filter(move |next| walkable(*next))
                .map(|next| (next, 1u32))
        },
        |pos| manhattan(*pos, goal),
        |pos| *pos == goal,
    );

    result
        .map(|(steps, _cost)| steps.into_iter().skip(1).collect())
        .unwrap_or_default()
}

/// Shortest path between two tiles of `maze`, as tile-center waypoints.
pub fn find_path(maze: &MazeGrid, start: TilePos, goal: TilePos) -> Vec<Vec2> {
    let _span = info_span!("find_path").entered();
    let tiles = find_tile_path(start, goal, |pos| maze.is_walkable(pos));
    debug!(?start, ?goal, steps = tiles.len(), "path search finished");
    tiles.into_iter().map(|t| maze.tile_center(t)).collect()
}
