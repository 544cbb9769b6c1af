use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, States)]
pub enum AppState {
    /// Difficulty selection.
    #[default]
    MainMenu,
    InGame,
    GameOver,
}
