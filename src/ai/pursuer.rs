//! Pursuer: caches a waypoint path toward its target and steps along it on
//! a fixed cadence, re-running the search whenever the path runs out.

use std::collections::VecDeque;

use bevy::math::Vec2;

use crate::components::{Body, Collidable};
use crate::maze::MazeGrid;

/// `Following` while a cached path remains, `Planning` once it is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuerState {
    Following,
    Planning,
}

/// What a pursuer did on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuerStep {
    /// Cadence not reached yet.
    Waiting,
    /// Jumped to the next waypoint.
    Moved(Vec2),
    /// Searched and cached a path with this many waypoints.
    Planned(usize),
    /// Searched and found nothing; retried next cadence.
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct Pursuer {
    pub body: Body,
    path: VecDeque<Vec2>,
    ticks: u32,
    cadence: u32,
}

impl Collidable for Pursuer {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl Pursuer {
    pub fn new(center: Vec2, size: f32, cadence: u32) -> Self {
        Self {
            body: Body::new(center, size),
            path: VecDeque::new(),
            ticks: 0,
            cadence: cadence.max(1),
        }
    }

    pub fn state(&self) -> PursuerState {
        if self.path.is_empty() {
            PursuerState::Planning
        } else {
            PursuerState::Following
        }
    }

    /// Remaining waypoints, next one first.
    pub fn path(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.path.iter().copied()
    }

    /// Move to `center` and forget the cached path and cadence progress.
    pub fn reset(&mut self, center: Vec2) {
        self.body.center = center;
        self.path.clear();
        self.ticks = 0;
    }

    /// Advance one tick toward `target`.
    ///
    /// Every `cadence` ticks the pursuer either jumps to the front waypoint
    /// or, with no path cached, searches from its tile to the target's tile.
    /// A search never moves the pursuer on the tick it runs.
    pub fn update<T: Collidable + ?Sized>(&mut self, maze: &MazeGrid, target: &T) -> PursuerStep {
        self.ticks += 1;
        if self.ticks < self.cadence {
            return PursuerStep::Waiting;
        }
        self.ticks = 0;

        if let Some(next) = self.path.pop_front() {
            self.body.center = next;
            return PursuerStep::Moved(next);
        }

        let start = maze.tile_containing(self.body.center);
        let goal = maze.tile_containing(target.center());
        let waypoints = super::find_path(maze, start, goal);
        if waypoints.is_empty() {
            return PursuerStep::Unreachable;
        }
        self.path.extend(waypoints);
        PursuerStep::Planned(self.path.len())
    }
}
