//! Game Over overlay: final score and the restart prompt.
//!
//! Restart and quit keys are handled by the session plugin, which feeds
//! them to the session tick; this plugin only draws.

use bevy::prelude::*;

use crate::app_state::AppState;
use crate::plugins::session::ActiveSession;

pub struct GameOverPlugin;

impl Plugin for GameOverPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::GameOver), spawn_game_over);
        app.add_systems(OnExit(AppState::GameOver), despawn_game_over);
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct GameOverRoot;

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn spawn_game_over(mut commands: Commands, session: Option<Res<ActiveSession>>) {
    let score = session.map(|s| s.score()).unwrap_or_default();

    commands
        .spawn((
            GameOverRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("GAME OVER"),
                TextColor(Color::srgb(1.0, 0.0, 0.0)),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
            ));
            parent.spawn((
                Text::new(format!("Final Score: {score}")),
                TextColor(Color::WHITE),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("Press R to restart or Esc to quit"),
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
            ));
        });
}

fn despawn_game_over(mut commands: Commands, query: Query<Entity, With<GameOverRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
