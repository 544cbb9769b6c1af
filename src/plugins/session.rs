//! Drives the running session: keyboard input is sampled every frame, the
//! simulation advances on the fixed schedule at the configured tick rate,
//! and the app state follows the session's Active/Over state.

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_fn, span_scope};

use crate::app_state::AppState;
use crate::components::Direction;
use crate::events::{PlayerCaught, PointsCollected, SessionRestarted};
use crate::plugins::telemetry::GameSet;
use crate::session::{Session, SessionState, TickInput};

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingInput>();
        app.add_systems(
            Update,
            gather_input
                .in_set(GameSet::Input)
                .run_if(resource_exists::<ActiveSession>),
        );
        app.add_systems(
            FixedUpdate,
            run_session_tick.run_if(resource_exists::<ActiveSession>),
        );
        app.add_systems(
            Update,
            sync_app_state
                .in_set(GameSet::Presentation)
                .run_if(resource_exists::<ActiveSession>),
        );
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// The session currently being played. Inserted by the menu.
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveSession(pub Session);

/// Input gathered between fixed ticks.
///
/// `restart` and `quit` stay set until a tick consumes them so a short key
/// press is never lost between two fixed steps.
#[derive(Resource, Debug, Default)]
pub struct PendingInput {
    pub intent: Option<Direction>,
    pub restart: bool,
    pub quit: bool,
}

impl PendingInput {
    fn take(&mut self) -> TickInput {
        TickInput {
            intent: self.intent,
            restart: std::mem::take(&mut self.restart),
            quit: std::mem::take(&mut self.quit),
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

const DIRECTION_KEYS: [(Direction, [KeyCode; 2]); 4] = [
    (Direction::Up, [KeyCode::ArrowUp, KeyCode::KeyW]),
    (Direction::Down, [KeyCode::ArrowDown, KeyCode::KeyS]),
    (Direction::Left, [KeyCode::ArrowLeft, KeyCode::KeyA]),
    (Direction::Right, [KeyCode::ArrowRight, KeyCode::KeyD]),
];

fn held_direction(keyboard: &ButtonInput<KeyCode>) -> Option<Direction> {
    DIRECTION_KEYS
        .iter()
        .find(|(_, keys)| keyboard.any_pressed(*keys))
        .map(|(dir, _)| *dir)
}

fn gather_input(keyboard: Res<ButtonInput<KeyCode>>, mut pending: ResMut<PendingInput>) {
    pending.intent = held_direction(&keyboard);
    if keyboard.just_pressed(KeyCode::KeyR) {
        pending.restart = true;
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        pending.quit = true;
    }
}

#[span_fn]
fn run_session_tick(
    mut commands: Commands,
    mut session: ResMut<ActiveSession>,
    mut pending: ResMut<PendingInput>,
    mut exit: MessageWriter<AppExit>,
) {
    let input = pending.take();
    let report = session.tick(&input);

    if report.quit_requested {
        info!("quit requested at tick {}", session.tick_count());
        exit.write(AppExit::Success);
        return;
    }
    if report.restarted {
        commands.trigger(SessionRestarted);
    }
    if report.points_collected > 0 {
        commands.trigger(PointsCollected {
            count: report.points_collected,
            score: session.score(),
        });
    }
    if report.caught {
        commands.trigger(PlayerCaught {
            score: session.score(),
            ticks: session.tick_count(),
        });
    }
}

fn sync_app_state(
    session: Res<ActiveSession>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    match (session.state(), state.get()) {
        (SessionState::Over, AppState::InGame) => next_state.set(AppState::GameOver),
        (SessionState::Active, AppState::GameOver) => next_state.set(AppState::InGame),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
