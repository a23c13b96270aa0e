//! Game control surface
//!
//! Wraps the simulation for a host frame loop: menus and input handlers call
//! the setters, the frame callback calls `frame`, and the renderer/HUD read a
//! `Snapshot` afterwards. Setters only write intents; the next step consumes
//! and clears them.

use serde::Serialize;

use crate::sim::{
    Cell, Difficulty, Direction, EffectWindow, GameConfig, GameEvent, GamePhase, GameState, Grid,
    Outcome, PowerUp, TickInput, TickResult, tick,
};

/// Read-only view of a round, published once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
    pub player: Vec<Cell>,
    pub ai: Vec<Cell>,
    pub food: Cell,
    pub powerups: Vec<PowerUp>,
    pub player_effects: Vec<EffectWindow>,
    pub ai_effects: Vec<EffectWindow>,
    pub player_score: u32,
    pub ai_score: u32,
    pub phase: GamePhase,
    pub paused: bool,
    pub dash_ready: bool,
    pub outcome: Option<Outcome>,
    pub message: Option<String>,
}

/// A game session driven by the host's clock
pub struct Game {
    state: GameState,
    input: TickInput,
    /// Latest timestamp seen by `frame`
    now_ms: u64,
}

impl Game {
    pub fn new(seed: u64, grid: Grid) -> Self {
        Self::with_config(seed, grid, GameConfig::default())
    }

    pub fn with_config(seed: u64, grid: Grid, config: GameConfig) -> Self {
        Self {
            state: GameState::new(seed, grid, config),
            input: TickInput::default(),
            now_ms: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Begin a round at the given step interval
    pub fn start(&mut self, speed_ms: u64, difficulty: Difficulty) {
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..TickInput::default()
        };
        self.state.start_round(speed_ms, difficulty);
    }

    /// Begin a fresh round with the previous round's speed and difficulty
    pub fn restart(&mut self) {
        let (speed, difficulty) = (self.state.speed_ms, self.state.difficulty);
        self.start(speed, difficulty);
    }

    /// Request a new heading. Reversing onto the current heading is ignored.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.phase != GamePhase::Playing
            || direction.is_opposite(self.state.player.snake.direction)
        {
            return false;
        }
        self.input.direction = Some(direction);
        true
    }

    /// Request a dash on the next step. Ignored on cooldown or at minimum length.
    pub fn request_dash(&mut self) -> bool {
        if self.state.phase != GamePhase::Playing
            || !self.state.dash_ready(self.now_ms)
            || self.state.player.snake.len() <= self.state.config.min_length
        {
            return false;
        }
        self.input.dash = true;
        true
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        log::info!("Pause toggled: {:?}", self.state.phase);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Track a viewport resize; applies from the next bounds check or spawn
    pub fn resize(&mut self, width: i32, height: i32) {
        self.state.grid.resize(width, height);
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    /// Feed one frame of the host clock
    pub fn frame(&mut self, now_ms: u64) -> TickResult {
        self.now_ms = now_ms;
        let result = tick(&mut self.state, &self.input, now_ms);
        if result.stepped() {
            // One-shot intents are consumed by the step
            self.input.direction = None;
            self.input.dash = false;
        }
        result
    }

    /// Events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            width: state.grid.width,
            height: state.grid.height,
            cell_size: state.grid.cell_size,
            player: state.player.snake.body.iter().copied().collect(),
            ai: state.ai.snake.body.iter().copied().collect(),
            food: state.food,
            powerups: state.powerups.clone(),
            player_effects: state.player.effects.windows.clone(),
            ai_effects: state.ai.effects.windows.clone(),
            player_score: state.player.score,
            ai_score: state.ai.score,
            phase: state.phase,
            paused: state.phase == GamePhase::Paused,
            dash_ready: state.dash_ready(self.now_ms),
            outcome: state.outcome,
            message: state.outcome.map(|o| o.message().to_string()),
        }
    }
}
