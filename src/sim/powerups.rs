//! Power-up rule module
//!
//! Optional layer over the base rules. A round without `PowerUpRules` never
//! spawns pickups and never consults effect windows beyond their defaults.
//!
//! Effects are keyed to the collecting side, except shrink and freeze which
//! land on the opponent. Shrink halves the opponent immediately (floored at
//! the minimum length); freeze suppresses the opponent's movement until its
//! window ends.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::state::{GameEvent, GameState, PowerUp, PowerUpKind, Side};
use crate::consts::*;

/// Timings for the power-up layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpRules {
    pub spawn_interval_ms: u64,
    pub effect_duration_ms: u64,
    /// Uncollected pickups vanish after this long
    pub board_ttl_ms: u64,
    pub max_on_board: usize,
}

impl Default for PowerUpRules {
    fn default() -> Self {
        Self {
            spawn_interval_ms: POWERUP_SPAWN_INTERVAL_MS,
            effect_duration_ms: POWERUP_DURATION_MS,
            board_ttl_ms: POWERUP_BOARD_TTL_MS,
            max_on_board: MAX_POWERUPS_ON_BOARD,
        }
    }
}

impl PowerUpRules {
    /// Start the spawn timer (first frame of a round)
    pub fn arm(&self, state: &mut GameState, now_ms: u64) {
        state.next_powerup_at_ms = now_ms + self.spawn_interval_ms;
    }

    /// Spawn a pickup if the periodic timer has run out
    pub fn maybe_spawn(&self, state: &mut GameState, now_ms: u64) {
        if now_ms < state.next_powerup_at_ms {
            return;
        }
        state.next_powerup_at_ms = now_ms + self.spawn_interval_ms;
        if state.powerups.len() >= self.max_on_board {
            return;
        }

        let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
        let cell = state.grid.random_cell(&mut state.rng);
        let id = state.next_entity_id();
        state.powerups.push(PowerUp {
            id,
            kind,
            cell,
            spawned_at_ms: now_ms,
        });
        state.events.push(GameEvent::PowerUpSpawned { kind });
        log::debug!("Spawned {:?} at ({}, {})", kind, cell.x, cell.y);
    }

    /// Collect the pickup under `head`, if any, on behalf of `side`
    pub fn collect(&self, state: &mut GameState, side: Side, head: Cell, now_ms: u64) -> bool {
        let Some(index) = state.powerups.iter().position(|p| p.cell == head) else {
            return false;
        };
        let pickup = state.powerups.remove(index);
        let kind = pickup.kind;

        let target = if kind.targets_opponent() {
            side.opponent()
        } else {
            side
        };
        let min_length = state.config.min_length;
        let target_state = state.side_mut(target);
        target_state
            .effects
            .start(kind, now_ms + self.effect_duration_ms);
        if kind == PowerUpKind::Shrink {
            target_state.snake.shrink_to_half(min_length);
        }

        state.events.push(GameEvent::PowerUpCollected { side, kind });
        log::info!("{:?} collected {:?}", side, kind);
        true
    }

    /// Close ended effect windows and drop stale pickups
    pub fn expire(&self, state: &mut GameState, now_ms: u64) {
        for side in [Side::Player, Side::Ai] {
            for kind in state.side_mut(side).effects.expire(now_ms) {
                state.events.push(GameEvent::EffectExpired { side, kind });
            }
        }
        let ttl = self.board_ttl_ms;
        state
            .powerups
            .retain(|p| now_ms.saturating_sub(p.spawned_at_ms) <= ttl);
    }
}
