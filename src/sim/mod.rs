//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is injected, read once per tick
//! - Seeded RNG only
//! - Fixed evaluation order (player before AI)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod grid;
pub mod powerups;
pub mod state;
pub mod tick;

pub use ai::{decide_direction, preference_order};
pub use collision::{check_move, is_safe};
pub use grid::{Cell, CellBounds, Grid};
pub use powerups::PowerUpRules;
pub use state::{
    ActiveEffects, Difficulty, Direction, EffectWindow, GameConfig, GameEvent, GamePhase,
    GameState, Outcome, OutcomeCause, PowerUp, PowerUpKind, Side, SideState, Snake,
};
pub use tick::{TickInput, TickResult, step_interval_ms, tick};
