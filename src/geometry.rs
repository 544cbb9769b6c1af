//! Axis-aligned rectangle tests used for wall, agent and collectible contact.
//!
//! Overlap is strict: two boxes collide only when their intervals share a
//! positive length on both axes. Boxes that merely share an edge do not.

use bevy::math::{Rect, Vec2};

use crate::components::Direction;

pub fn intersects(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// True iff `candidate` overlaps any of `walls`.
pub fn would_collide<I>(candidate: Rect, walls: I) -> bool
where
    I: IntoIterator<Item = Rect>,
{
    walls.into_iter().any(|wall| intersects(candidate, wall))
}

pub fn translate(rect: Rect, by: Vec2) -> Rect {
    Rect {
        min: rect.min + by,
        max: rect.max + by,
    }
}

/// Shift `rect` the smallest amount that puts it fully inside `bounds`.
/// A rect larger than `bounds` is aligned to the min corner.
pub fn clamp_inside(rect: Rect, bounds: Rect) -> Rect {
    let mut shift = Vec2::ZERO;
    if rect.max.x > bounds.max.x {
        shift.x = bounds.max.x - rect.max.x;
    }
    if rect.min.x + shift.x < bounds.min.x {
        shift.x = bounds.min.x - rect.min.x;
    }
    if rect.max.y > bounds.max.y {
        shift.y = bounds.max.y - rect.max.y;
    }
    if rect.min.y + shift.y < bounds.min.y {
        shift.y = bounds.min.y - rect.min.y;
    }
    translate(rect, shift)
}

/// Pull `candidate` back along `dir` so its leading edge rests on the
/// nearest facing edge of the walls it overlaps.
pub fn slide_to_contact(candidate: Rect, dir: Direction, walls: &[Rect]) -> Rect {
    let hits = walls.iter().filter(|w| intersects(candidate, **w));
    let shift = match dir {
        Direction::Up => {
            let edge = hits.map(|w| w.max.y).fold(f32::NEG_INFINITY, f32::max);
            Vec2::new(0.0, (edge - candidate.min.y).max(0.0))
        }
        Direction::Down => {
            let edge = hits.map(|w| w.min.y).fold(f32::INFINITY, f32::min);
            Vec2::new(0.0, (edge - candidate.max.y).min(0.0))
        }
        Direction::Left => {
            let edge = hits.map(|w| w.max.x).fold(f32::NEG_INFINITY, f32::max);
            Vec2::new((edge - candidate.min.x).max(0.0), 0.0)
        }
        Direction::Right => {
            let edge = hits.map(|w| w.min.x).fold(f32::INFINITY, f32::min);
            Vec2::new((edge - candidate.max.x).min(0.0), 0.0)
        }
    };
    if !shift.is_finite() {
        return candidate;
    }
    translate(candidate, shift)
}
