//! Collision rules for a candidate head cell
//!
//! Checks run in a fixed order (wall, self, opponent) so that a move failing
//! several rules at once always reports the same cause.

use super::grid::{Cell, Grid};
use super::state::{OutcomeCause, Snake};

/// Check a candidate head against the board.
///
/// `own` and `opponent` are the bodies as they were before this move. When
/// `phase_through_opponent` is set the opponent check is skipped entirely.
pub fn check_move(
    grid: &Grid,
    candidate: Cell,
    own: &Snake,
    opponent: &Snake,
    phase_through_opponent: bool,
) -> Option<OutcomeCause> {
    if !grid.in_bounds(candidate) {
        return Some(OutcomeCause::WallCollision);
    }
    if own.occupies(candidate) {
        return Some(OutcomeCause::SelfCollision);
    }
    if !phase_through_opponent && opponent.occupies(candidate) {
        return Some(OutcomeCause::HitOpponent);
    }
    None
}

/// A cell the AI may step into: inside the board and off both bodies.
/// Food and power-ups never make a cell unsafe.
pub fn is_safe(grid: &Grid, cell: Cell, own: &Snake, opponent: &Snake) -> bool {
    check_move(grid, cell, own, opponent, false).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Direction;
    use glam::IVec2;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::new(cells.iter().map(|&(x, y)| IVec2::new(x, y)), Direction::Right)
    }

    #[test]
    fn test_wall_first() {
        let grid = Grid::new(400, 400);
        let own = snake(&[(380, 0), (360, 0), (340, 0)]);
        let other = snake(&[(100, 100)]);
        assert_eq!(
            check_move(&grid, IVec2::new(400, 0), &own, &other, false),
            Some(OutcomeCause::WallCollision)
        );
        assert_eq!(
            check_move(&grid, IVec2::new(0, -20), &own, &other, true),
            Some(OutcomeCause::WallCollision)
        );
    }

    #[test]
    fn test_self_before_opponent() {
        let grid = Grid::new(400, 400);
        let own = snake(&[(40, 40), (40, 60), (60, 60)]);
        let other = snake(&[(60, 60), (80, 60)]);
        assert_eq!(
            check_move(&grid, IVec2::new(60, 60), &own, &other, false),
            Some(OutcomeCause::SelfCollision)
        );
    }

    #[test]
    fn test_opponent_and_phase() {
        let grid = Grid::new(400, 400);
        let own = snake(&[(40, 40), (20, 40), (0, 40)]);
        let other = snake(&[(60, 40), (60, 60), (60, 80)]);
        let candidate = IVec2::new(60, 40);
        assert_eq!(
            check_move(&grid, candidate, &own, &other, false),
            Some(OutcomeCause::HitOpponent)
        );
        assert_eq!(check_move(&grid, candidate, &own, &other, true), None);
        assert!(!is_safe(&grid, candidate, &own, &other));
        assert!(is_safe(&grid, IVec2::new(40, 20), &own, &other));
    }
}
