pub mod ai;
pub mod app_state;
pub mod components;
pub mod events;
pub mod geometry;
pub mod maze;
pub mod movement;
pub mod plugins;
pub mod resources;
pub mod session;
pub mod tracing_bridge;

use bevy::prelude::*;

use app_state::AppState;
use plugins::agents::AgentsPlugin;
use plugins::camera::CameraPlugin;
use plugins::game_over::GameOverPlugin;
use plugins::hud::HudPlugin;
use plugins::maze::MazePlugin;
use plugins::menu::MenuPlugin;
use plugins::session::SessionPlugin;
use plugins::telemetry::TelemetryPlugin;
use resources::SessionConfig;

/// Everything the game needs on top of Bevy's default plugins.
pub struct MazeChasePlugin {
    pub config: SessionConfig,
}

impl Plugin for MazeChasePlugin {
    fn build(&self, app: &mut App) {
        // State machine (StatesPlugin comes from DefaultPlugins)
        app.init_state::<AppState>();

        // One simulation tick per fixed step.
        app.insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz));
        app.insert_resource(ClearColor(Color::BLACK));
        app.insert_resource(self.config.clone());

        app.add_plugins(TelemetryPlugin);
        app.add_plugins(CameraPlugin);
        app.add_plugins(SessionPlugin);
        app.add_plugins(MazePlugin);
        app.add_plugins(AgentsPlugin);
        app.add_plugins(HudPlugin);
        app.add_plugins(MenuPlugin);
        app.add_plugins(GameOverPlugin);
    }
}
