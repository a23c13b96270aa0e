//! Fixed timestep simulation tick
//!
//! Core game loop that advances a round one step at a time. The host calls
//! `tick` every frame with the current time; a step only runs once the step
//! interval has elapsed since the previous one.
//!
//! Step order (player first, so the player wins every same-tick tie):
//! 1. Player: heading, candidate head, wall/self/opponent checks, food,
//!    power-up, commit.
//! 2. AI (skipped while frozen): decide, candidate head, the same checks,
//!    food, power-up, commit.
//! 3. Effect expiry and power-up spawning.
//!
//! A terminal outcome ends the step immediately.

use super::ai;
use super::collision::check_move;
use super::grid::Cell;
use super::powerups::PowerUpRules;
use super::state::{
    Direction, GameEvent, GamePhase, GameState, Outcome, OutcomeCause, PowerUpKind, Side,
};
use crate::consts::SPEED_BOOST_FACTOR;

/// Intents gathered since the previous step (consumed by the next one)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested player heading
    pub direction: Option<Direction>,
    /// Dash request
    pub dash: bool,
    /// Let the AI policy steer the player (demo mode)
    pub autopilot: bool,
}

/// What a call to `tick` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Round not running (ready, paused or over)
    Idle,
    /// Step interval not reached yet
    Waiting,
    /// One step applied
    Stepped,
    /// One step applied and it ended the round
    Ended(Outcome),
}

impl TickResult {
    /// Whether a step ran (and the input should be cleared)
    pub fn stepped(&self) -> bool {
        matches!(self, TickResult::Stepped | TickResult::Ended(_))
    }
}

/// Current step interval: the base speed, shortened while a speed effect runs
pub fn step_interval_ms(state: &GameState, now_ms: u64) -> u64 {
    let boosted = [Side::Player, Side::Ai]
        .into_iter()
        .any(|side| state.side(side).effects.is_active(PowerUpKind::Speed, now_ms));
    if boosted {
        ((state.speed_ms as f32 * SPEED_BOOST_FACTOR).round() as u64).max(1)
    } else {
        state.speed_ms
    }
}

/// Advance the round if enough time has passed since the last step
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> TickResult {
    match state.phase {
        GamePhase::Playing => {}
        GamePhase::Paused => {
            // Paused time never counts toward the next step
            state.last_tick_ms = Some(now_ms);
            return TickResult::Idle;
        }
        GamePhase::Ready | GamePhase::GameOver => return TickResult::Idle,
    }

    let Some(last) = state.last_tick_ms else {
        // First frame of the round arms the clocks
        state.last_tick_ms = Some(now_ms);
        if let Some(rules) = state.config.powerups.clone() {
            rules.arm(state, now_ms);
        }
        return TickResult::Waiting;
    };

    if now_ms.saturating_sub(last) < step_interval_ms(state, now_ms) {
        return TickResult::Waiting;
    }

    // Drift is accepted: the next step is measured from now, not last + interval
    state.last_tick_ms = Some(now_ms);
    state.ticks += 1;

    match step(state, input, now_ms) {
        Some(outcome) => {
            state.finish(outcome);
            TickResult::Ended(outcome)
        }
        None => TickResult::Stepped,
    }
}

/// Run one simulation step; returns the terminal outcome if one fired
fn step(state: &mut GameState, input: &TickInput, now_ms: u64) -> Option<Outcome> {
    let rules = state.config.powerups.clone();
    let rules = rules.as_ref();

    if !is_frozen(state, Side::Player, now_ms) {
        if let Some(outcome) = player_step(state, input, now_ms, rules) {
            return Some(outcome);
        }
    }

    if !is_frozen(state, Side::Ai, now_ms) {
        let direction =
            ai::decide_direction(&state.grid, &state.ai.snake, &state.player.snake, state.food);
        state.ai.snake.direction = direction;
        let candidate = state.ai.snake.advance(direction, state.grid.cell_size);
        if let Some(outcome) = move_side(state, Side::Ai, candidate, None, now_ms, rules) {
            return Some(outcome);
        }
    }

    if let Some(rules) = rules {
        rules.expire(state, now_ms);
        rules.maybe_spawn(state, now_ms);
    }
    None
}

fn is_frozen(state: &GameState, side: Side, now_ms: u64) -> bool {
    state.side(side).effects.is_active(PowerUpKind::Freeze, now_ms)
}

fn player_step(
    state: &mut GameState,
    input: &TickInput,
    now_ms: u64,
    rules: Option<&PowerUpRules>,
) -> Option<Outcome> {
    if input.autopilot {
        state.player.snake.direction =
            ai::decide_direction(&state.grid, &state.player.snake, &state.ai.snake, state.food);
    } else if let Some(direction) = input.direction {
        if !direction.is_opposite(state.player.snake.direction) {
            state.player.snake.direction = direction;
        }
    }

    // Direction is locked here for the whole dash
    let direction = state.player.snake.direction;
    let dash = input.dash
        && state.dash_ready(now_ms)
        && state.player.snake.len() > state.config.min_length;
    let distance = if dash { state.config.dash_distance } else { 1 };
    let candidate = state
        .player
        .snake
        .advance_by(direction, distance, state.grid.cell_size);

    move_side(
        state,
        Side::Player,
        candidate,
        dash.then_some(distance),
        now_ms,
        rules,
    )
}

/// Resolve one side's move onto `candidate` and commit it.
///
/// `dash` carries the dash distance when the move is a dash.
fn move_side(
    state: &mut GameState,
    side: Side,
    candidate: Cell,
    dash: Option<u32>,
    now_ms: u64,
    rules: Option<&PowerUpRules>,
) -> Option<Outcome> {
    let (own, opponent) = match side {
        Side::Player => (&state.player, &state.ai),
        Side::Ai => (&state.ai, &state.player),
    };
    let invincible = own.effects.is_active(PowerUpKind::Invincible, now_ms);
    if let Some(cause) = check_move(&state.grid, candidate, &own.snake, &opponent.snake, invincible)
    {
        return Some(Outcome {
            cause,
            triggered_by: side,
        });
    }

    let ate = candidate == state.food;
    if ate {
        let win_score = state.config.win_score;
        let me = state.side_mut(side);
        let points = if me.effects.is_active(PowerUpKind::Multiplier, now_ms) {
            2
        } else {
            1
        };
        me.score += points;
        let score = me.score;
        state.events.push(GameEvent::FoodEaten { side, points });
        state.respawn_food();
        if score >= win_score {
            return Some(Outcome {
                cause: OutcomeCause::ScoreReached,
                triggered_by: side,
            });
        }
    }

    if let Some(rules) = rules {
        rules.collect(state, side, candidate, now_ms);
    }

    match dash {
        Some(distance) => {
            let min_length = state.config.min_length;
            let trimmed = state.player.snake.dash_to(candidate, distance, min_length);
            state.dash_ready_at_ms = now_ms + state.config.dash_cooldown_ms;
            state.events.push(GameEvent::Dashed { trimmed });
        }
        None => state.side_mut(side).snake.grow_or_shrink(candidate, ate),
    }
    None
}
