//! Gameplay events triggered by the session plugin and observed by telemetry.

use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy)]
pub struct PointsCollected {
    pub count: u32,
    pub score: u64,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerCaught {
    pub score: u64,
    pub ticks: u64,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SessionRestarted;
