//! Player controller: turns a directional intent into continuous movement
//! against the maze walls.
//!
//! Movement is a fixed offset per tick along the intent axis. What happens
//! when that offset runs into a wall depends on the [`CollisionPolicy`];
//! how intent survives key release depends on the [`IntentMode`]. Either
//! way the committed box never overlaps a wall and stays inside the maze.

use bevy::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::components::{Body, Collidable, Direction};
use crate::geometry::{clamp_inside, intersects, slide_to_contact, translate, would_collide};
use crate::maze::MazeGrid;

/// Response to a move whose candidate box overlaps a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Discard the whole move.
    #[default]
    Reject,
    /// Stop with the leading edge touching the wall.
    Slide,
}

/// What a tick without a pressed direction means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentMode {
    /// Keep moving in the last pressed direction.
    #[default]
    Latched,
    /// Stop as soon as no direction is held.
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerVariant {
    pub collision: CollisionPolicy,
    pub intent: IntentMode,
}

/// Result of one player step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No direction to move in.
    Idle,
    Moved,
    /// Moved part of the way and stopped against a wall.
    Slid,
    /// The move would have entered a wall and was dropped.
    Blocked,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    pub direction: Option<Direction>,
    pub score: u64,
}

impl Collidable for Player {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl Player {
    pub fn new(center: Vec2, size: f32, speed: f32) -> Self {
        Self {
            body: Body::new(center, size),
            speed,
            direction: None,
            score: 0,
        }
    }

    /// Put the player back at `center` with no intent and a zero score.
    pub fn reset(&mut self, center: Vec2) {
        self.body.center = center;
        self.direction = None;
        self.score = 0;
    }

    /// Record this tick's intent.
    pub fn apply_intent(&mut self, intent: Option<Direction>, mode: IntentMode) {
        match (intent, mode) {
            (Some(dir), _) => self.direction = Some(dir),
            (None, IntentMode::Held) => self.direction = None,
            (None, IntentMode::Latched) => {}
        }
    }

    /// Advance one tick: move along the current direction and bump the
    /// survival score, which grows whether or not the player moved.
    pub fn update(&mut self, maze: &MazeGrid, policy: CollisionPolicy) -> MoveOutcome {
        self.score += 1;
        let Some(dir) = self.direction else {
            return MoveOutcome::Idle;
        };

        let from = self.body.rect();
        let candidate = translate(from, dir.unit() * self.speed);
        let walls = maze.wall_rects_near(candidate.union(from));

        let (next, outcome) = if !would_collide(candidate, walls.iter().copied()) {
            (candidate, MoveOutcome::Moved)
        } else {
            match policy {
                CollisionPolicy::Reject => (from, MoveOutcome::Blocked),
                CollisionPolicy::Slide => slide(from, candidate, dir, &walls),
            }
        };

        let next = clamp_inside(next, maze.bounds());
        if would_collide(next, walls.iter().copied()) {
            return MoveOutcome::Blocked;
        }
        self.body.set_rect(next);
        outcome
    }
}

fn slide(from: Rect, candidate: Rect, dir: Direction, walls: &[Rect]) -> (Rect, MoveOutcome) {
    let slid = slide_to_contact(candidate, dir, walls);
    let progress = (slid.center() - from.center()).dot(dir.unit());
    if progress <= 0.0 || walls.iter().any(|w| intersects(slid, *w)) {
        return (from, MoveOutcome::Blocked);
    }
    (slid, MoveOutcome::Slid)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
