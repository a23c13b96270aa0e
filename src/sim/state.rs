//! Game state and core simulation types
//!
//! Everything a round needs lives in one `GameState` aggregate that the tick
//! function borrows mutably.

use std::collections::VecDeque;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use super::powerups::PowerUpRules;
use crate::consts::*;

/// Cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Scan order used when every preference has been exhausted
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit step in screen space (y grows downward)
    pub fn unit(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Which snake an event or effect belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

/// A snake: head-first list of cells plus its heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    pub body: VecDeque<Cell>,
    pub direction: Direction,
}

impl Snake {
    pub fn new(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        Self {
            body: cells.into_iter().collect(),
            direction,
        }
    }

    /// Build a snake from (col, row) grid coordinates
    pub fn from_grid_cells(cells: &[(i32, i32)], grid: &Grid, direction: Direction) -> Self {
        Self::new(
            cells.iter().map(|&(col, row)| grid.cell_at(col, row)),
            direction,
        )
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(IVec2::ZERO)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Whether any segment (head included) sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Cell one step ahead of the head
    pub fn advance(&self, direction: Direction, cell_size: i32) -> Cell {
        self.head() + direction.unit() * cell_size
    }

    /// Cell `distance` steps ahead of the head, all along one direction
    pub fn advance_by(&self, direction: Direction, distance: u32, cell_size: i32) -> Cell {
        (0..distance).fold(self.head(), |cell, _| cell + direction.unit() * cell_size)
    }

    /// Prepend the new head; drop the tail unless the snake ate
    pub fn grow_or_shrink(&mut self, new_head: Cell, ate: bool) {
        self.body.push_front(new_head);
        if !ate {
            self.body.pop_back();
        }
    }

    /// Prepend a dash landing cell and trim up to `distance` tail cells,
    /// never going below `min_length`. Returns how many cells were trimmed.
    pub fn dash_to(&mut self, new_head: Cell, distance: u32, min_length: usize) -> usize {
        let spare = self.len().saturating_sub(min_length);
        let trim = (distance as usize).min(spare);
        self.body.push_front(new_head);
        for _ in 0..trim {
            self.body.pop_back();
        }
        trim
    }

    /// Halve the length, floored at `min_length`
    pub fn shrink_to_half(&mut self, min_length: usize) {
        let target = (self.len() / 2).max(min_length);
        self.body.truncate(target);
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Invincible,
    Multiplier,
    Shrink,
    Freeze,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Speed,
        PowerUpKind::Invincible,
        PowerUpKind::Multiplier,
        PowerUpKind::Shrink,
        PowerUpKind::Freeze,
    ];

    /// Shrink and freeze land on the collector's opponent
    pub fn targets_opponent(self) -> bool {
        matches!(self, PowerUpKind::Shrink | PowerUpKind::Freeze)
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "SPEED",
            PowerUpKind::Invincible => "INVINCIBLE",
            PowerUpKind::Multiplier => "2X SCORE",
            PowerUpKind::Shrink => "SHRINK",
            PowerUpKind::Freeze => "FREEZE",
        }
    }
}

/// A power-up waiting on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub cell: Cell,
    pub spawned_at_ms: u64,
}

/// A timed modifier bound to one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectWindow {
    pub kind: PowerUpKind,
    pub ends_at_ms: u64,
}

/// Effect windows currently applied to a side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub windows: Vec<EffectWindow>,
}

impl ActiveEffects {
    /// An effect stays active until `now` passes its end timestamp
    pub fn is_active(&self, kind: PowerUpKind, now_ms: u64) -> bool {
        self.windows
            .iter()
            .any(|w| w.kind == kind && now_ms <= w.ends_at_ms)
    }

    /// Start (or extend) an effect window
    pub fn start(&mut self, kind: PowerUpKind, ends_at_ms: u64) {
        match self.windows.iter_mut().find(|w| w.kind == kind) {
            Some(window) => window.ends_at_ms = window.ends_at_ms.max(ends_at_ms),
            None => self.windows.push(EffectWindow { kind, ends_at_ms }),
        }
    }

    /// Drop windows whose end has passed, returning their kinds
    pub fn expire(&mut self, now_ms: u64) -> Vec<PowerUpKind> {
        let expired = self
            .windows
            .iter()
            .filter(|w| now_ms > w.ends_at_ms)
            .map(|w| w.kind)
            .collect();
        self.windows.retain(|w| now_ms <= w.ends_at_ms);
        expired
    }

    pub fn clear(&mut self) {
        self.windows.clear();
    }
}

/// Difficulty presets from the level select screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Impossible,
    ];

    /// Step interval in milliseconds for this level
    pub fn speed_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Medium => 120,
            Difficulty::Hard => 90,
            Difficulty::Impossible => 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Impossible => "Impossible",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "impossible" => Some(Difficulty::Impossible),
            _ => None,
        }
    }
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No round armed yet
    Ready,
    /// Ticks are being simulated
    Playing,
    /// Scheduling suspended; state kept
    Paused,
    /// Round ended; restart required
    GameOver,
}

/// What ended the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeCause {
    WallCollision,
    SelfCollision,
    HitOpponent,
    ScoreReached,
}

/// The single terminal event of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub cause: OutcomeCause,
    /// The side whose move triggered the outcome
    pub triggered_by: Side,
}

impl Outcome {
    pub fn winner(&self) -> Side {
        match self.cause {
            OutcomeCause::ScoreReached => self.triggered_by,
            _ => self.triggered_by.opponent(),
        }
    }

    pub fn player_won(&self) -> bool {
        self.winner() == Side::Player
    }

    /// End-screen headline
    pub fn message(&self) -> &'static str {
        match (self.cause, self.triggered_by) {
            (OutcomeCause::ScoreReached, Side::Player) => "YOU WIN!",
            (OutcomeCause::ScoreReached, Side::Ai) => "AI WINS!",
            (OutcomeCause::WallCollision, Side::Player) => "GAME OVER - AI WINS!",
            (OutcomeCause::SelfCollision, Side::Player) => "COLLISION - AI WINS!",
            (OutcomeCause::HitOpponent, Side::Player) => "CRASHED INTO AI - AI WINS!",
            (OutcomeCause::WallCollision, Side::Ai) => "AI HIT THE WALL - YOU WIN!",
            (OutcomeCause::SelfCollision, Side::Ai) => "AI BIT ITSELF - YOU WIN!",
            (OutcomeCause::HitOpponent, Side::Ai) => "AI CRASHED INTO YOU - YOU WIN!",
        }
    }
}

/// Things that happened during a step, for audio and effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    FoodEaten { side: Side, points: u32 },
    Dashed { trimmed: usize },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { side: Side, kind: PowerUpKind },
    EffectExpired { side: Side, kind: PowerUpKind },
    RoundOver(Outcome),
}

/// Per-side mutable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub snake: Snake,
    pub score: u32,
    pub effects: ActiveEffects,
}

impl SideState {
    pub fn new(snake: Snake) -> Self {
        Self {
            snake,
            score: 0,
            effects: ActiveEffects::default(),
        }
    }
}

/// Round rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub win_score: u32,
    pub min_length: usize,
    pub dash_distance: u32,
    pub dash_cooldown_ms: u64,
    /// Power-up rule module; `None` plays the base rules only
    pub powerups: Option<PowerUpRules>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_score: WIN_SCORE,
            min_length: MIN_LENGTH,
            dash_distance: DASH_DISTANCE,
            dash_cooldown_ms: DASH_COOLDOWN_MS,
            powerups: Some(PowerUpRules::default()),
        }
    }
}

impl GameConfig {
    /// Base rules without power-ups
    pub fn classic() -> Self {
        Self {
            powerups: None,
            ..Self::default()
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub config: GameConfig,
    pub grid: Grid,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Base step interval (ms)
    pub speed_ms: u64,
    pub player: SideState,
    pub ai: SideState,
    pub food: Cell,
    /// Uncollected power-ups (sorted by id)
    pub powerups: Vec<PowerUp>,
    /// Timestamp of the last applied step; `None` until the first frame
    pub last_tick_ms: Option<u64>,
    /// Player dash becomes available again at this time
    pub dash_ready_at_ms: u64,
    pub next_powerup_at_ms: u64,
    pub outcome: Option<Outcome>,
    /// Applied steps this round
    pub ticks: u64,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state in the `Ready` phase with snakes at their spawn cells
    pub fn new(seed: u64, grid: Grid, config: GameConfig) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            grid,
            phase: GamePhase::Ready,
            difficulty: Difficulty::default(),
            speed_ms: Difficulty::default().speed_ms(),
            player: SideState::new(Snake::from_grid_cells(
                &PLAYER_SPAWN,
                &grid,
                Direction::Right,
            )),
            ai: SideState::new(Snake::from_grid_cells(&AI_SPAWN, &grid, Direction::Right)),
            food: IVec2::ZERO,
            powerups: Vec::new(),
            last_tick_ms: None,
            dash_ready_at_ms: 0,
            next_powerup_at_ms: 0,
            outcome: None,
            ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.respawn_food();
        state
    }

    /// Reset entities and scores and enter `Playing`
    pub fn start_round(&mut self, speed_ms: u64, difficulty: Difficulty) {
        let grid = self.grid;
        self.speed_ms = speed_ms.max(1);
        self.difficulty = difficulty;
        self.player = SideState::new(Snake::from_grid_cells(
            &PLAYER_SPAWN,
            &grid,
            Direction::Right,
        ));
        self.ai = SideState::new(Snake::from_grid_cells(&AI_SPAWN, &grid, Direction::Right));
        self.powerups.clear();
        self.last_tick_ms = None;
        self.dash_ready_at_ms = 0;
        self.next_powerup_at_ms = 0;
        self.outcome = None;
        self.ticks = 0;
        self.phase = GamePhase::Playing;
        self.respawn_food();
        self.events.push(GameEvent::RoundStarted);
        log::info!(
            "Round started: {} ({} ms/step), viewport {}x{}",
            difficulty.as_str(),
            self.speed_ms,
            grid.width,
            grid.height
        );
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    /// Move food to a fresh random cell using the current viewport
    pub fn respawn_food(&mut self) {
        self.food = self.grid.random_cell(&mut self.rng);
        log::debug!("Food at ({}, {})", self.food.x, self.food.y);
    }

    /// Flip between `Playing` and `Paused`; other phases are untouched
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Whether the player may dash at `now_ms`
    pub fn dash_ready(&self, now_ms: u64) -> bool {
        now_ms >= self.dash_ready_at_ms
    }

    /// Record the terminal outcome and stop the round
    pub fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        log::info!(
            "Round over: {:?} by {:?}, {} - {}",
            outcome.cause,
            outcome.triggered_by,
            self.player.score,
            self.ai.score
        );
        self.outcome = Some(outcome);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::RoundOver(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(list: &[(i32, i32)]) -> Vec<Cell> {
        list.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert!(dir.is_opposite(dir.opposite()));
            assert_eq!(dir.unit() + dir.opposite().unit(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_advance_one_cell() {
        let snake = Snake::new(cells(&[(180, 200), (160, 200), (140, 200)]), Direction::Right);
        assert_eq!(snake.advance(Direction::Right, 20), IVec2::new(200, 200));
        assert_eq!(snake.advance(Direction::Up, 20), IVec2::new(180, 180));
        assert_eq!(snake.advance_by(Direction::Down, 3, 20), IVec2::new(180, 260));
    }

    #[test]
    fn test_grow_or_shrink() {
        let mut snake = Snake::new(cells(&[(40, 0), (20, 0), (0, 0)]), Direction::Right);
        snake.grow_or_shrink(IVec2::new(60, 0), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), IVec2::new(60, 0));
        assert!(!snake.occupies(IVec2::new(0, 0)));

        snake.grow_or_shrink(IVec2::new(80, 0), true);
        assert_eq!(snake.len(), 4);
        assert!(snake.occupies(IVec2::new(20, 0)));
    }

    #[test]
    fn test_dash_trim_clamped() {
        let body = cells(&[(100, 0), (80, 0), (60, 0), (40, 0)]);
        let mut snake = Snake::new(body, Direction::Right);
        let trimmed = snake.dash_to(IVec2::new(160, 0), 3, 3);
        assert_eq!(trimmed, 1);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), IVec2::new(160, 0));

        let long: Vec<Cell> = (0..10).rev().map(|i| IVec2::new(i * 20, 0)).collect();
        let mut snake = Snake::new(long, Direction::Right);
        assert_eq!(snake.dash_to(IVec2::new(240, 0), 3, 3), 3);
        assert_eq!(snake.len(), 8);
    }

    #[test]
    fn test_shrink_floor() {
        let long: Vec<Cell> = (0..9).map(|i| IVec2::new(i * 20, 0)).collect();
        let mut snake = Snake::new(long, Direction::Left);
        snake.shrink_to_half(3);
        assert_eq!(snake.len(), 4);
        snake.shrink_to_half(3);
        assert_eq!(snake.len(), 3);
        snake.shrink_to_half(3);
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_effect_window_expiry() {
        let mut effects = ActiveEffects::default();
        effects.start(PowerUpKind::Multiplier, 1_000);
        assert!(effects.is_active(PowerUpKind::Multiplier, 1_000));
        assert!(!effects.is_active(PowerUpKind::Speed, 500));
        assert!(effects.expire(1_000).is_empty());
        assert_eq!(effects.expire(1_001), vec![PowerUpKind::Multiplier]);
        assert!(!effects.is_active(PowerUpKind::Multiplier, 1_001));
    }

    #[test]
    fn test_effect_restart_extends() {
        let mut effects = ActiveEffects::default();
        effects.start(PowerUpKind::Speed, 1_000);
        effects.start(PowerUpKind::Speed, 3_000);
        assert_eq!(effects.windows.len(), 1);
        assert!(effects.is_active(PowerUpKind::Speed, 2_500));
    }

    #[test]
    fn test_outcome_winner() {
        let wall = Outcome {
            cause: OutcomeCause::WallCollision,
            triggered_by: Side::Player,
        };
        assert_eq!(wall.winner(), Side::Ai);
        assert!(!wall.player_won());

        let score = Outcome {
            cause: OutcomeCause::ScoreReached,
            triggered_by: Side::Player,
        };
        assert!(score.player_won());
        assert_eq!(score.message(), "YOU WIN!");
    }

    #[test]
    fn test_new_state_spawn_layout() {
        let state = GameState::new(1, Grid::new(400, 400), GameConfig::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.player.snake.head(), IVec2::new(180, 200));
        assert_eq!(state.ai.snake.head(), IVec2::new(100, 100));
        assert_eq!(state.player.snake.len(), MIN_LENGTH);
        assert!(state.grid.in_bounds(state.food));
    }

    #[test]
    fn test_toggle_pause_only_while_running() {
        let mut state = GameState::new(1, Grid::new(400, 400), GameConfig::default());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Ready);

        state.start_round(120, Difficulty::Medium);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_difficulty_parse() {
        for level in Difficulty::ALL {
            assert_eq!(Difficulty::parse(level.as_str()), Some(level));
        }
        assert_eq!(Difficulty::parse("nightmare"), None);
        assert!(Difficulty::Impossible.speed_ms() < Difficulty::Easy.speed_ms());
    }
}
