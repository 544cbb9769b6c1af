use bevy::prelude::*;
use micromegas_tracing::prelude::{span_fn, span_scope};

use super::session::ActiveSession;
use super::telemetry::GameSet;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
        app.add_systems(Update, fit_camera_to_maze.in_set(GameSet::Presentation));
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Orthographic scale that fits `extent` plus a one-tile margin on each side.
pub fn fit_scale(extent: Vec2, tile_size: f32, window: Vec2) -> f32 {
    let padded = extent + Vec2::splat(tile_size * 2.0);
    (padded.x / window.x).max(padded.y / window.y)
}

/// Scale the camera to fit the maze with some padding.
#[span_fn]
fn fit_camera_to_maze(
    session: Option<Res<ActiveSession>>,
    windows: Query<&Window>,
    mut cameras: Query<&mut Projection, With<Camera2d>>,
) {
    let Some(session) = session else { return };
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok(mut projection) = cameras.single_mut() else {
        return;
    };

    let maze = session.maze();
    let scale = fit_scale(maze.extent(), maze.tile_size(), window.size());
    if let Projection::Orthographic(ref mut ortho) = *projection {
        ortho.scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_fits_the_tighter_axis() {
        // 1000x700 maze, 50px tiles: 1100x800 with margins.
        let scale = fit_scale(Vec2::new(1000.0, 700.0), 50.0, Vec2::new(1100.0, 400.0));
        assert_eq!(scale, 2.0);
        let scale = fit_scale(Vec2::new(1000.0, 700.0), 50.0, Vec2::new(2200.0, 1600.0));
        assert_eq!(scale, 0.5);
    }

    #[test]
    fn fit_system_runs_headless_without_window() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, fit_camera_to_maze);
        app.update();
        app.update();
    }
}
