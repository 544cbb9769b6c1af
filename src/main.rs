use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPoolBuilder};
use mazechase::resources::{ConfigError, Difficulty, SessionConfig};
use mazechase::session::Session;
use mazechase::tracing_bridge::MicromegasBridgeLayer;
use micromegas_telemetry_sink::TelemetryGuardBuilder;
use micromegas_telemetry_sink::tracing_interop::TracingCaptureLayer;
use micromegas_tracing::dispatch::init_thread_stream;
use micromegas_tracing::levels::LevelFilter;
use micromegas_tracing::prelude::{error, info};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

const CONFIG_ENV: &str = "MAZECHASE_CONFIG";

/// Config path from the first argument, then the environment.
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
}

/// Load the configuration and make sure it can start a session.
fn load_config() -> Result<SessionConfig, ConfigError> {
    let config = match config_path() {
        Some(path) => {
            info!("loading config from {}", path.display());
            SessionConfig::load(&path)?
        }
        None => SessionConfig::default(),
    };
    Session::new(config.clone(), Difficulty::Easy)?;
    Ok(config)
}

fn main() {
    // 1. Telemetry sink. Spans need MICROMEGAS_ENABLE_CPU_TRACING=true;
    //    logs and metrics always flow.
    let _telemetry_guard = TelemetryGuardBuilder::default()
        .with_install_tracing_capture(false)
        .build()
        .expect("failed to initialize telemetry");

    info!("Maze Chase starting");

    // 2. Global tracing subscriber, installed before Bevy starts.
    let log_layer = TracingCaptureLayer {
        max_level: LevelFilter::Info,
    };
    let subscriber = Registry::default()
        .with(MicromegasBridgeLayer)
        .with(log_layer);
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // 3. ComputeTaskPool with Micromegas thread callbacks, before App::new().
    ComputeTaskPool::get_or_init(|| {
        TaskPoolBuilder::new()
            .on_thread_spawn(|| {
                init_thread_stream();
            })
            .on_thread_destroy(|| {
                micromegas_tracing::dispatch::flush_thread_buffer();
                micromegas_tracing::dispatch::unregister_thread_stream();
            })
            .build()
    });

    // 4. Run Bevy app
    App::new()
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Maze Chase".into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(mazechase::MazeChasePlugin { config })
        .run();
}
