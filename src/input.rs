//! Input decoding
//!
//! Turns raw key names (as reported by the browser's `KeyboardEvent.key`),
//! swipes and taps into intents for the `Game` control surface.

use crate::game::Game;
use crate::sim::Direction;

/// Two presses of the same direction within this window trigger a dash
pub const DOUBLE_TAP_MS: u64 = 250;
/// Shortest swipe that counts as a turn (pixels)
pub const MIN_SWIPE_PX: f32 = 30.0;

/// A decoded player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    Dash,
    TogglePause,
    Restart,
}

/// Key/tap decoder with double-tap tracking
#[derive(Debug, Default)]
pub struct InputHandler {
    last_turn: Option<(Direction, u64)>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self { last_turn: None }
    }

    /// Decode a key press at `now_ms`
    pub fn handle_key(&mut self, key: &str, now_ms: u64) -> Option<Intent> {
        let intent = match key {
            "ArrowUp" | "w" | "W" => Intent::Turn(Direction::Up),
            "ArrowDown" | "s" | "S" => Intent::Turn(Direction::Down),
            "ArrowLeft" | "a" | "A" => Intent::Turn(Direction::Left),
            "ArrowRight" | "d" | "D" => Intent::Turn(Direction::Right),
            " " | "Spacebar" => Intent::TogglePause,
            "Shift" => Intent::Dash,
            "r" | "R" => Intent::Restart,
            _ => return None,
        };
        match intent {
            Intent::Turn(direction) => Some(self.turn(direction, now_ms)),
            other => Some(other),
        }
    }

    /// Decode a swipe gesture by its dominant axis
    pub fn handle_swipe(&mut self, dx: f32, dy: f32, now_ms: u64) -> Option<Intent> {
        if dx.abs().max(dy.abs()) < MIN_SWIPE_PX {
            return None;
        }
        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(self.turn(direction, now_ms))
    }

    fn turn(&mut self, direction: Direction, now_ms: u64) -> Intent {
        if let Some((last, at)) = self.last_turn {
            if last == direction && now_ms.saturating_sub(at) <= DOUBLE_TAP_MS {
                self.last_turn = None;
                return Intent::Dash;
            }
        }
        self.last_turn = Some((direction, now_ms));
        Intent::Turn(direction)
    }
}

/// Route an intent to the game
pub fn apply(game: &mut Game, intent: Intent) {
    match intent {
        Intent::Turn(direction) => {
            game.set_direction(direction);
        }
        Intent::Dash => {
            game.request_dash();
        }
        Intent::TogglePause => game.toggle_pause(),
        Intent::Restart => game.restart(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_wasd() {
        let mut handler = InputHandler::new();
        assert_eq!(
            handler.handle_key("ArrowUp", 0),
            Some(Intent::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key("a", 1_000),
            Some(Intent::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key("S", 2_000),
            Some(Intent::Turn(Direction::Down))
        );
        assert_eq!(handler.handle_key(" ", 3_000), Some(Intent::TogglePause));
        assert_eq!(handler.handle_key("x", 3_000), None);
    }

    #[test]
    fn test_double_tap_dash() {
        let mut handler = InputHandler::new();
        assert_eq!(
            handler.handle_key("ArrowRight", 100),
            Some(Intent::Turn(Direction::Right))
        );
        assert_eq!(handler.handle_key("d", 300), Some(Intent::Dash));
        // A third press starts a new sequence
        assert_eq!(
            handler.handle_key("d", 400),
            Some(Intent::Turn(Direction::Right))
        );
        // Too slow
        assert_eq!(
            handler.handle_key("d", 700),
            Some(Intent::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_double_tap_needs_same_direction() {
        let mut handler = InputHandler::new();
        handler.handle_key("ArrowUp", 0);
        assert_eq!(
            handler.handle_key("ArrowLeft", 50),
            Some(Intent::Turn(Direction::Left))
        );
    }

    #[test]
    fn test_swipe() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_swipe(5.0, 10.0, 0), None);
        assert_eq!(
            handler.handle_swipe(-80.0, 20.0, 0),
            Some(Intent::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_swipe(10.0, 60.0, 1_000),
            Some(Intent::Turn(Direction::Down))
        );
    }

    #[test]
    fn test_apply_routes_to_game() {
        use crate::sim::{Difficulty, GamePhase, Grid};

        let mut game = Game::new(3, Grid::new(400, 400));
        game.start(150, Difficulty::Easy);
        apply(&mut game, Intent::TogglePause);
        assert_eq!(game.state().phase, GamePhase::Paused);
        apply(&mut game, Intent::TogglePause);
        assert_eq!(game.state().phase, GamePhase::Playing);

        apply(&mut game, Intent::Turn(Direction::Up));
        game.frame(0);
        game.frame(150);
        assert_eq!(game.state().player.snake.direction, Direction::Up);
    }
}
