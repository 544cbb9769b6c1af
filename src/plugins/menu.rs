//! Main menu: pick a difficulty to start a session.

use bevy::prelude::*;
use micromegas_tracing::prelude::{error, info};

use crate::app_state::AppState;
use crate::plugins::session::ActiveSession;
use crate::resources::{Difficulty, SessionConfig};
use crate::session::Session;

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::MainMenu), spawn_menu);
        app.add_systems(OnExit(AppState::MainMenu), despawn_menu);
        app.add_systems(
            Update,
            menu_input.run_if(in_state(AppState::MainMenu)),
        );
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct MenuRoot;

/// Shown when the selected configuration could not start a session.
#[derive(Component)]
pub struct MenuError;

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn spawn_menu(mut commands: Commands) {
    commands
        .spawn((
            MenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.02, 0.02, 0.06)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("MAZE CHASE"),
                TextColor(Color::srgb(1.0, 1.0, 0.0)),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("Choose the difficulty"),
                TextColor(Color::srgb(0.7, 0.7, 0.8)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
            ));
            for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
                parent.spawn((
                    Text::new(format!(
                        "{} - {} ({} pursuer{})",
                        i + 1,
                        difficulty.label(),
                        difficulty.pursuer_count(),
                        if difficulty.pursuer_count() == 1 { "" } else { "s" }
                    )),
                    TextColor(Color::WHITE),
                    TextFont {
                        font_size: 24.0,
                        ..default()
                    },
                ));
            }
            parent.spawn((
                MenuError,
                Text::new(""),
                TextColor(Color::srgb(1.0, 0.3, 0.3)),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
            ));
        });
}

fn despawn_menu(mut commands: Commands, query: Query<Entity, With<MenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn selected_difficulty(keyboard: &ButtonInput<KeyCode>) -> Option<Difficulty> {
    const KEYS: [[KeyCode; 2]; 3] = [
        [KeyCode::Digit1, KeyCode::Numpad1],
        [KeyCode::Digit2, KeyCode::Numpad2],
        [KeyCode::Digit3, KeyCode::Numpad3],
    ];
    KEYS.iter()
        .zip(Difficulty::ALL)
        .find(|(keys, _)| keyboard.any_just_pressed(**keys))
        .map(|(_, difficulty)| difficulty)
}

fn menu_input(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<SessionConfig>,
    mut next_state: ResMut<NextState<AppState>>,
    mut error_text: Query<&mut Text, With<MenuError>>,
) {
    let Some(difficulty) = selected_difficulty(&keyboard) else {
        return;
    };
    match Session::new(config.clone(), difficulty) {
        Ok(session) => {
            info!("starting session: difficulty={}", difficulty.label());
            commands.insert_resource(ActiveSession(session));
            next_state.set(AppState::InGame);
        }
        Err(e) => {
            error!("cannot start session: {}", e);
            if let Ok(mut text) = error_text.single_mut() {
                **text = e.to_string();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
