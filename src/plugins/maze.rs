//! Maze rendering: one sprite per wall tile and per collectible point.
//!
//! The simulation works in screen space (origin at the top-left, y down).
//! Sprites live in Bevy world space, centered on the origin with y up, so
//! every position passes through [`screen_to_world`].

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_scope};

use crate::components::{PointMarker, TilePos, WallTile};
use crate::maze::{MazeGrid, TileKind};
use crate::plugins::session::ActiveSession;
use crate::plugins::telemetry::GameSet;

pub struct MazePlugin;

impl Plugin for MazePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            spawn_maze
                .in_set(GameSet::Presentation)
                .run_if(resource_added::<ActiveSession>),
        );
        app.add_systems(
            Update,
            sync_point_visibility
                .in_set(GameSet::Presentation)
                .run_if(resource_exists::<ActiveSession>),
        );
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const WALL_COLOR: Color = Color::srgb(0.1, 0.1, 0.9);
const POINT_COLOR: Color = Color::srgb(1.0, 0.85, 0.0);

/// Drawn size of a point; collection uses the configured `point_size`.
const POINT_DRAW_SIZE: f32 = 6.0;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// Map a screen-space point of `maze` to world space.
pub fn screen_to_world(point: Vec2, maze: &MazeGrid) -> Vec2 {
    let extent = maze.extent();
    Vec2::new(point.x - extent.x / 2.0, extent.y / 2.0 - point.y)
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn spawn_maze(mut commands: Commands, session: Res<ActiveSession>) {
    span_scope!("spawn_maze");
    let maze = session.maze();
    let tile_size = maze.tile_size();
    let mut walls = 0;
    let mut points = 0;

    for y in 0..maze.height() as i32 {
        for x in 0..maze.width() as i32 {
            let pos = TilePos::new(x, y);
            let world = screen_to_world(maze.tile_center(pos), maze);
            match maze.tile_at(pos) {
                TileKind::Wall => {
                    commands.spawn((
                        WallTile,
                        Sprite::from_color(WALL_COLOR, Vec2::splat(tile_size)),
                        Transform::from_xyz(world.x, world.y, 0.0),
                    ));
                    walls += 1;
                }
                TileKind::Collectible => {
                    commands.spawn((
                        PointMarker(pos),
                        Sprite::from_color(POINT_COLOR, Vec2::splat(POINT_DRAW_SIZE)),
                        Transform::from_xyz(world.x, world.y, 1.0),
                    ));
                    points += 1;
                }
                TileKind::Open => {}
            }
        }
    }

    info!(
        "maze spawned: {}x{} walls={} points={}",
        maze.width(),
        maze.height(),
        walls,
        points
    );
}

/// Hide eaten points; show them again after a restart refills the maze.
fn sync_point_visibility(
    session: Res<ActiveSession>,
    mut points: Query<(&PointMarker, &mut Visibility)>,
) {
    if !session.is_changed() {
        return;
    }
    let maze = session.maze();
    for (marker, mut visibility) in &mut points {
        let wanted = if maze.tile_at(marker.0) == TileKind::Collectible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Difficulty, SessionConfig};
    use crate::session::{Session, TickInput};

    fn small_session() -> Session {
        let config = SessionConfig {
            layout: vec![
                "WWWWW".into(),
                "W.. W".into(),
                "WWWWW".into(),
            ],
            seed: Some(3),
            player_spawn: Some(TilePos::new(3, 1)),
            pursuer_spawns: vec![TilePos::new(2, 1)],
            ..default()
        };
        Session::new(config, Difficulty::Easy).unwrap()
    }

    fn setup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(MazePlugin);
        app.insert_resource(ActiveSession(small_session()));
        app.update();
        app
    }

    fn count<C: Component>(app: &mut App) -> usize {
        app.world_mut().query::<&C>().iter(app.world()).count()
    }

    #[test]
    fn world_coordinates_center_the_maze() {
        let maze = MazeGrid::from_text("WWWW\nW  W\nWWWW", 50.0).unwrap();
        // Extent 200x150.
        assert_eq!(
            screen_to_world(Vec2::new(25.0, 25.0), &maze),
            Vec2::new(-75.0, 50.0)
        );
        assert_eq!(screen_to_world(Vec2::new(100.0, 75.0), &maze), Vec2::ZERO);
    }

    #[test]
    fn spawns_walls_and_points_once() {
        let mut app = setup_app();
        assert_eq!(count::<WallTile>(&mut app), 12);
        assert_eq!(count::<PointMarker>(&mut app), 2);
        app.update();
        assert_eq!(count::<WallTile>(&mut app), 12);
    }

    #[test]
    fn eaten_points_are_hidden_and_restored_on_restart() {
        let mut app = setup_app();
        {
            let mut session = app.world_mut().resource_mut::<ActiveSession>();
            session.place_player(TilePos::new(1, 1));
            session.tick(&TickInput::default());
        }
        app.update();

        let hidden: Vec<TilePos> = app
            .world_mut()
            .query::<(&PointMarker, &Visibility)>()
            .iter(app.world())
            .filter(|(_, v)| **v == Visibility::Hidden)
            .map(|(m, _)| m.0)
            .collect();
        assert_eq!(hidden, vec![TilePos::new(1, 1)]);

        app.world_mut().resource_mut::<ActiveSession>().restart();
        app.update();
        let hidden = app
            .world_mut()
            .query::<&Visibility>()
            .iter(app.world())
            .filter(|v| **v == Visibility::Hidden)
            .count();
        assert_eq!(hidden, 0);
    }
}
