//! Frame-level telemetry and gameplay counters.

use bevy::prelude::*;
use micromegas_tracing::prelude::{fmetric, imetric, info, span_scope};

use crate::events::{PlayerCaught, PointsCollected, SessionRestarted};

/// Ordering of the per-frame systems around the fixed-rate session tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Presentation,
}

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, (GameSet::Input, GameSet::Presentation).chain());
        app.init_resource::<SessionCounters>();
        app.add_systems(Last, frame_telemetry);
        app.add_observer(on_points_collected);
        app.add_observer(on_player_caught);
        app.add_observer(on_session_restarted);
    }
}

/// Running totals across restarts of the current app run.
#[derive(Resource, Debug, Default)]
pub struct SessionCounters {
    pub points_collected: u64,
    pub games_over: u64,
    pub restarts: u64,
}

fn frame_telemetry(time: Res<Time>) {
    span_scope!("frame");
    let dt_ms = time.delta_secs_f64() * 1000.0;
    fmetric!("frame_time_ms", "ms", dt_ms);
}

fn on_points_collected(trigger: On<PointsCollected>, mut counters: ResMut<SessionCounters>) {
    let event = trigger.event();
    counters.points_collected += event.count as u64;
    imetric!("points_collected", "count", counters.points_collected);
    imetric!("score", "points", event.score);
}

fn on_player_caught(trigger: On<PlayerCaught>, mut counters: ResMut<SessionCounters>) {
    let event = trigger.event();
    counters.games_over += 1;
    info!(
        "player_caught: score={} ticks={} games_over={}",
        event.score, event.ticks, counters.games_over
    );
    imetric!("games_over", "count", counters.games_over);
}

fn on_session_restarted(_trigger: On<SessionRestarted>, mut counters: ResMut<SessionCounters>) {
    counters.restarts += 1;
    info!("session_restarted: restarts={}", counters.restarts);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(TelemetryPlugin);
        app
    }

    #[test]
    fn counters_follow_events() {
        let mut app = setup_app();
        app.world_mut().trigger(PointsCollected { count: 2, score: 40 });
        app.world_mut().trigger(PointsCollected { count: 1, score: 55 });
        app.world_mut().trigger(PlayerCaught { score: 55, ticks: 30 });
        app.world_mut().trigger(SessionRestarted);
        app.update();

        let counters = app.world().resource::<SessionCounters>();
        assert_eq!(counters.points_collected, 3);
        assert_eq!(counters.games_over, 1);
        assert_eq!(counters.restarts, 1);
    }
}
