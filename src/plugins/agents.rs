//! Player and pursuer sprites, moved to the session's positions each frame.

use bevy::prelude::*;
use micromegas_tracing::prelude::{span_fn, span_scope};

use crate::components::{PlayerSprite, PursuerSprite};
use crate::plugins::maze::screen_to_world;
use crate::plugins::session::ActiveSession;
use crate::plugins::telemetry::GameSet;

pub struct AgentsPlugin;

impl Plugin for AgentsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_agents.run_if(resource_added::<ActiveSession>),
                sync_agent_transforms.run_if(resource_exists::<ActiveSession>),
            )
                .chain()
                .in_set(GameSet::Presentation),
        );
    }
}

const PLAYER_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);
const PURSUER_COLORS: [Color; 3] = [
    Color::srgb(1.0, 0.0, 0.0),
    Color::srgb(1.0, 0.5, 0.8),
    Color::srgb(0.0, 1.0, 1.0),
];
const AGENT_Z: f32 = 10.0;

#[span_fn]
fn spawn_agents(mut commands: Commands, session: Res<ActiveSession>) {
    let config = session.config();
    let scene = session.scene();

    let player = screen_to_world(scene.player, scene.maze);
    commands.spawn((
        PlayerSprite,
        Sprite::from_color(PLAYER_COLOR, Vec2::splat(config.player_size)),
        Transform::from_xyz(player.x, player.y, AGENT_Z),
    ));

    for (i, center) in scene.pursuers.iter().enumerate() {
        let world = screen_to_world(*center, scene.maze);
        let color = PURSUER_COLORS[i % PURSUER_COLORS.len()];
        commands.spawn((
            PursuerSprite(i),
            Sprite::from_color(color, Vec2::splat(config.pursuer_size)),
            Transform::from_xyz(world.x, world.y, AGENT_Z),
        ));
    }
}

fn sync_agent_transforms(
    session: Res<ActiveSession>,
    mut player: Query<&mut Transform, (With<PlayerSprite>, Without<PursuerSprite>)>,
    mut pursuers: Query<(&PursuerSprite, &mut Transform), Without<PlayerSprite>>,
) {
    if !session.is_changed() {
        return;
    }
    let scene = session.scene();

    if let Ok(mut transform) = player.single_mut() {
        let world = screen_to_world(scene.player, scene.maze);
        transform.translation = world.extend(AGENT_Z);
    }
    for (sprite, mut transform) in &mut pursuers {
        if let Some(center) = scene.pursuers.get(sprite.0) {
            let world = screen_to_world(*center, scene.maze);
            transform.translation = world.extend(AGENT_Z);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TilePos;
    use crate::resources::{Difficulty, SessionConfig};
    use crate::session::Session;

    fn setup_app(difficulty: Difficulty) -> App {
        let config = SessionConfig {
            seed: Some(11),
            player_spawn: Some(TilePos::new(1, 1)),
            ..default()
        };
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(AgentsPlugin);
        app.insert_resource(ActiveSession(Session::new(config, difficulty).unwrap()));
        app.update();
        app
    }

    fn player_translation(app: &mut App) -> Vec3 {
        app.world_mut()
            .query_filtered::<&Transform, With<PlayerSprite>>()
            .single(app.world())
            .unwrap()
            .translation
    }

    #[test]
    fn one_sprite_per_pursuer() {
        let mut app = setup_app(Difficulty::Hard);
        let count = app
            .world_mut()
            .query::<&PursuerSprite>()
            .iter(app.world())
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn player_sprite_starts_at_spawn() {
        let mut app = setup_app(Difficulty::Easy);
        // Classic maze is 1000x700; tile (1, 1) center is (75, 75).
        assert_eq!(player_translation(&mut app), Vec3::new(-425.0, 275.0, AGENT_Z));
    }

    #[test]
    fn sprites_follow_session_positions() {
        let mut app = setup_app(Difficulty::Easy);
        {
            let mut session = app.world_mut().resource_mut::<ActiveSession>();
            session.place_player(TilePos::new(2, 1));
            session.place_pursuer(0, TilePos::new(18, 12));
        }
        app.update();
        assert_eq!(player_translation(&mut app), Vec3::new(-375.0, 275.0, AGENT_Z));

        let pursuer = app
            .world_mut()
            .query::<(&PursuerSprite, &Transform)>()
            .iter(app.world())
            .map(|(_, t)| t.translation)
            .next()
            .unwrap();
        // (925, 625) on screen.
        assert_eq!(pursuer, Vec3::new(425.0, -275.0, AGENT_Z));
    }
}
