//! Session: owns the maze, the player and the pursuers, and advances them
//! one tick at a time.
//!
//! Tick order while active: player move, pursuer moves (in index order),
//! player/pursuer contact, collectible pickup. Once caught, the session is
//! `Over` and only a restart request does anything.

use bevy::math::{Rect, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{info, info_span};

use crate::ai::Pursuer;
use crate::components::{Collidable, Direction, TilePos};
use crate::geometry::intersects;
use crate::maze::MazeGrid;
use crate::movement::Player;
use crate::resources::{ConfigError, Difficulty, SessionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Active,
    Over,
}

/// Input gathered for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub intent: Option<Direction>,
    pub restart: bool,
    pub quit: bool,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub state: SessionState,
    pub points_collected: u32,
    pub caught: bool,
    pub restarted: bool,
    pub quit_requested: bool,
}

impl TickReport {
    fn idle(state: SessionState) -> Self {
        Self {
            state,
            points_collected: 0,
            caught: false,
            restarted: false,
            quit_requested: false,
        }
    }
}

/// Everything a renderer needs after a tick.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub maze: &'a MazeGrid,
    pub player: Vec2,
    pub pursuers: Vec<Vec2>,
    pub score: u64,
    pub over: bool,
}

pub struct Session {
    config: SessionConfig,
    maze: MazeGrid,
    player: Player,
    pursuers: Vec<Pursuer>,
    state: SessionState,
    ticks: u64,
    rng: StdRng,
}

impl Session {
    pub fn new(config: SessionConfig, difficulty: Difficulty) -> Result<Self, ConfigError> {
        config.validate()?;
        let rows = config.layout_rows()?;
        let maze = MazeGrid::parse(&rows, config.tile_size)?;
        if maze.walkable_tiles().is_empty() {
            return Err(crate::maze::MazeError::NoOpenTiles.into());
        }
        for (field, spawn) in config
            .player_spawn
            .iter()
            .map(|p| ("player_spawn", p))
            .chain(config.pursuer_spawns.iter().map(|p| ("pursuer_spawns", p)))
        {
            if !maze.is_walkable(*spawn) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("tile ({}, {}) is not walkable", spawn.x, spawn.y),
                });
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let player = Player::new(Vec2::ZERO, config.player_size, config.player_speed);
        let pursuers = (0..difficulty.pursuer_count())
            .map(|_| Pursuer::new(Vec2::ZERO, config.pursuer_size, config.pursuer_cadence))
            .collect();

        let mut session = Session {
            config,
            maze,
            player,
            pursuers,
            state: SessionState::Active,
            ticks: 0,
            rng,
        };
        session.place_agents();
        info!(
            pursuers = session.pursuers.len(),
            points = session.maze.collectible_count(),
            "session started"
        );
        Ok(session)
    }

    /// Build a session from a raw pursuer count (1 to 3).
    pub fn with_pursuer_count(config: SessionConfig, count: usize) -> Result<Self, ConfigError> {
        Self::new(config, Difficulty::from_pursuer_count(count)?)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn maze(&self) -> &MazeGrid {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.player.score
    }

    /// Ticks simulated since the session (re)started.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Put the player at the center of `tile`.
    pub fn place_player(&mut self, tile: TilePos) {
        self.player.body.center = self.maze.tile_center(tile);
    }

    /// Put pursuer `index` at the center of `tile` with no cached path.
    pub fn place_pursuer(&mut self, index: usize, tile: TilePos) {
        let center = self.maze.tile_center(tile);
        if let Some(p) = self.pursuers.get_mut(index) {
            p.reset(center);
        }
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            maze: &self.maze,
            player: self.player.center(),
            pursuers: self.pursuers.iter().map(|p| p.center()).collect(),
            score: self.player.score,
            over: self.state == SessionState::Over,
        }
    }

    /// Advance the session by one tick.
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        let _span = info_span!("session_tick").entered();
        if input.quit {
            let mut report = TickReport::idle(self.state);
            report.quit_requested = true;
            return report;
        }

        if self.state == SessionState::Over {
            let mut report = TickReport::idle(self.state);
            if input.restart {
                self.restart();
                report.state = self.state;
                report.restarted = true;
            }
            return report;
        }

        self.ticks += 1;
        let variant = self.config.variant;
        self.player.apply_intent(input.intent, variant.intent);
        self.player.update(&self.maze, variant.collision);

        for pursuer in &mut self.pursuers {
            pursuer.update(&self.maze, &self.player);
        }

        let caught = self.pursuers.iter().any(|p| p.touches(&self.player));
        if caught {
            self.state = SessionState::Over;
            info!(score = self.player.score, ticks = self.ticks, "player caught");
        }

        let points_collected = self.collect_points();

        TickReport {
            state: self.state,
            points_collected,
            caught,
            restarted: false,
            quit_requested: false,
        }
    }

    /// Consume every collectible under the player and award the bonus.
    fn collect_points(&mut self) -> u32 {
        let bounds = self.player.bounds();
        let half = Vec2::splat(self.config.point_size / 2.0);
        let hits: Vec<TilePos> = self
            .maze
            .collectibles()
            .filter(|tile| {
                let point = Rect::from_center_half_size(self.maze.tile_center(*tile), half);
                intersects(bounds, point)
            })
            .collect();

        let mut collected = 0;
        for tile in hits {
            if self.maze.consume_collectible(tile) {
                self.player.score += self.config.point_bonus;
                collected += 1;
            }
        }
        collected
    }

    /// Start over on the same agents: fresh maze, zero score, new spawns.
    pub fn restart(&mut self) {
        self.maze.reset();
        self.state = SessionState::Active;
        self.ticks = 0;
        self.place_agents();
        info!(points = self.maze.collectible_count(), "session restarted");
    }

    fn place_agents(&mut self) {
        let walkable = self.maze.walkable_tiles();
        let player_tile = match self.config.player_spawn {
            Some(tile) => tile,
            None => *walkable
                .choose(&mut self.rng)
                .unwrap_or(&TilePos::new(0, 0)),
        };
        self.player.reset(self.maze.tile_center(player_tile));

        let away: Vec<TilePos> = walkable
            .iter()
            .copied()
            .filter(|t| *t != player_tile)
            .collect();
        let pool = if away.is_empty() { &walkable } else { &away };
        for (i, pursuer) in self.pursuers.iter_mut().enumerate() {
            let tile = match self.config.pursuer_spawns.get(i) {
                Some(tile) => *tile,
                None => *pool.choose(&mut self.rng).unwrap_or(&player_tile),
            };
            pursuer.reset(self.maze.tile_center(tile));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
