use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::TilePos;
use crate::maze::{CLASSIC_LAYOUT, MazeError};
use crate::movement::PlayerVariant;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("pursuer count must be 1, 2 or 3 (got {0})")]
    InvalidPursuerCount(usize),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn pursuer_count(self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_pursuer_count(count: usize) -> Result<Self, ConfigError> {
        match count {
            1 => Ok(Difficulty::Easy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            n => Err(ConfigError::InvalidPursuerCount(n)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

// ---------------------------------------------------------------------------
// Session config
// ---------------------------------------------------------------------------

/// Tuning and layout for a session. Every field has a default, so a JSON
/// file only needs the values it changes.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Edge length of one tile in continuous units.
    pub tile_size: f32,
    pub player_size: f32,
    pub pursuer_size: f32,
    /// Units the player moves per tick.
    pub player_speed: f32,
    /// Ticks between pursuer moves.
    pub pursuer_cadence: u32,
    pub point_bonus: u64,
    /// Edge length of the square hit box around each collectible.
    pub point_size: f32,
    /// Fixed tick rate of the presentation loop.
    pub tick_hz: f64,
    pub variant: PlayerVariant,
    /// Seed for spawn placement; `None` draws from entropy.
    pub seed: Option<u64>,
    pub player_spawn: Option<TilePos>,
    pub pursuer_spawns: Vec<TilePos>,
    pub layout: Vec<String>,
    /// Text file whose rows override `layout`.
    pub maze_file: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_size: 50.0,
            player_size: 40.0,
            pursuer_size: 40.0,
            player_speed: 5.0,
            pursuer_cadence: 10,
            point_bonus: 10,
            point_size: 4.0,
            tick_hz: 80.0,
            variant: PlayerVariant::default(),
            seed: None,
            player_spawn: None,
            pursuer_spawns: Vec::new(),
            layout: CLASSIC_LAYOUT.lines().map(str::to_string).collect(),
            maze_file: None,
        }
    }
}

impl SessionConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Effective layout rows: the maze file when set, otherwise `layout`.
    pub fn layout_rows(&self) -> Result<Vec<String>, ConfigError> {
        match &self.maze_file {
            Some(file) => {
                let text = std::fs::read_to_string(file).map_err(|source| ConfigError::Io {
                    path: PathBuf::from(file),
                    source,
                })?;
                Ok(text.lines().map(str::to_string).collect())
            }
            None => Ok(self.layout.clone()),
        }
    }

    /// Reject sizes and rates the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tile_size", self.tile_size)?;
        positive("player_size", self.player_size)?;
        positive("pursuer_size", self.pursuer_size)?;
        positive("player_speed", self.player_speed)?;
        positive("point_size", self.point_size)?;
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "tick_hz",
                reason: format!("must be positive, got {}", self.tick_hz),
            });
        }
        if self.pursuer_cadence == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pursuer_cadence",
                reason: "must be at least one tick".to_string(),
            });
        }
        for (field, size) in [
            ("player_size", self.player_size),
            ("pursuer_size", self.pursuer_size),
        ] {
            if size > self.tile_size {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{size} does not fit in a {} tile", self.tile_size),
                });
            }
        }
        // Movement only checks where the box lands, so one step must be too
        // short to pass clean over a wall tile or a pursuer.
        let max_step = self.tile_size.min(self.pursuer_size) + self.player_size;
        if self.player_speed >= max_step {
            return Err(ConfigError::InvalidValue {
                field: "player_speed",
                reason: format!(
                    "{} per tick can pass through obstacles, must be below {max_step}",
                    self.player_speed
                ),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
