//! Snake Duel - a neon snake arena where you race a pursuit AI to ten points
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, snakes, collisions, AI, tick)
//! - `game`: Control surface and published snapshots for a host frame loop
//! - `highscores`: Leaderboard reporting (best effort, never blocks a round)
//! - `settings`: Player preferences
//! - `input`: Key/tap decoding into intents
//! - `platform`: Browser bindings

pub mod game;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::{Game, Snapshot};
pub use highscores::{ScoreStore, Standing, report_outcome};
pub use settings::{GraphicsLevel, Settings};

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in pixels
    pub const CELL_SIZE: i32 = 20;
    /// First side to reach this score wins the round
    pub const WIN_SCORE: u32 = 10;
    /// Snakes never get shorter than this
    pub const MIN_LENGTH: usize = 3;

    /// Cells covered by a single dash
    pub const DASH_DISTANCE: u32 = 3;
    /// Time between dashes (ms)
    pub const DASH_COOLDOWN_MS: u64 = 3_000;

    /// Power-up spawn period (ms)
    pub const POWERUP_SPAWN_INTERVAL_MS: u64 = 8_000;
    /// How long a collected power-up stays in effect (ms)
    pub const POWERUP_DURATION_MS: u64 = 5_000;
    /// How long an uncollected power-up stays on the board (ms)
    pub const POWERUP_BOARD_TTL_MS: u64 = 10_000;
    /// Maximum uncollected power-ups at once
    pub const MAX_POWERUPS_ON_BOARD: usize = 2;
    /// Step interval multiplier while a speed effect is active
    pub const SPEED_BOOST_FACTOR: f32 = 0.6;

    /// Initial player body (in cells, head first)
    pub const PLAYER_SPAWN: [(i32, i32); 3] = [(9, 10), (8, 10), (7, 10)];
    /// Initial AI body (in cells, head first)
    pub const AI_SPAWN: [(i32, i32); 3] = [(5, 5), (4, 5), (3, 5)];
}
