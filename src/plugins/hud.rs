//! HUD overlay: running score.

use bevy::prelude::*;
use micromegas_tracing::prelude::{span_fn, span_scope};

use crate::app_state::AppState;
use crate::plugins::session::ActiveSession;
use crate::plugins::telemetry::GameSet;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_hud);
        app.add_systems(OnExit(AppState::InGame), despawn_hud);
        app.add_systems(
            Update,
            update_hud
                .in_set(GameSet::Presentation)
                .run_if(in_state(AppState::InGame).and(resource_exists::<ActiveSession>)),
        );
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct ScoreText;

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

#[span_fn]
fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Auto,
                padding: UiRect::all(Val::Px(12.0)),
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                ScoreText,
                Text::new("Score: 0"),
                TextColor(Color::WHITE),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
            ));
        });
}

fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn update_hud(session: Res<ActiveSession>, mut query: Query<&mut Text, With<ScoreText>>) {
    if !session.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = format!("Score: {}", session.score());
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
    use bevy::state::app::StatesPlugin;

    fn setup_app() -> App {
        let config = SessionConfig {
            seed: Some(5),
            ..default()
        };
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);
        app.init_state::<AppState>();
        app.insert_resource(ActiveSession(Session::new(config, Difficulty::Easy).unwrap()));
        app.add_plugins(HudPlugin);
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::InGame);
        for _ in 0..3 {
            app.update();
        }
        app
    }

    fn score_text(app: &mut App) -> String {
        app.world_mut()
            .query_filtered::<&Text, With<ScoreText>>()
            .single(app.world())
            .unwrap()
            .0
            .clone()
    }

    #[test]
    fn hud_tracks_score() {
        let mut app = setup_app();
        let expected = {
            let mut session = app.world_mut().resource_mut::<ActiveSession>();
            session.tick(&TickInput::default());
            session.score()
        };
        app.update();
        assert_eq!(score_text(&mut app), format!("Score: {expected}"));
    }

    #[test]
    fn hud_despawns_on_exit() {
        let mut app = setup_app();
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::GameOver);
        for _ in 0..3 {
            app.update();
        }
        let count = app
            .world_mut()
            .query::<&HudRoot>()
            .iter(app.world())
            .count();
        assert_eq!(count, 0);
    }
}
