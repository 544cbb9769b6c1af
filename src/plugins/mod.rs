pub mod agents;
pub mod camera;
pub mod game_over;
pub mod hud;
pub mod maze;
pub mod menu;
pub mod session;
pub mod telemetry;
