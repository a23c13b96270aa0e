//! Pursuit AI
//!
//! Greedy one-step policy: head for the food along the longer axis first and
//! take the first direction whose next cell is safe. It never looks further
//! than one cell ahead, so it can be trapped.

use super::collision::is_safe;
use super::grid::{Cell, Grid};
use super::state::{Direction, Snake};

/// Directions ranked by how directly they close the distance to `target`.
///
/// Primary axis is the one with the larger gap (vertical on ties), then the
/// other axis toward the target, then that axis away, then primary away. The
/// reverse of `heading` is left out.
pub fn preference_order(head: Cell, target: Cell, heading: Direction) -> Vec<Direction> {
    let delta = target - head;
    let horizontal = if delta.x > 0 {
        Direction::Right
    } else {
        Direction::Left
    };
    let vertical = if delta.y > 0 {
        Direction::Down
    } else {
        Direction::Up
    };

    let (primary, secondary) = if delta.x.abs() > delta.y.abs() {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };

    let reverse = heading.opposite();
    [primary, secondary, secondary.opposite(), primary.opposite()]
        .into_iter()
        .filter(|&dir| dir != reverse)
        .collect()
}

/// Pick the AI's next heading.
///
/// Falls back to any safe non-reverse direction, then to the reverse, and
/// finally keeps the current heading when nothing is safe (the move then
/// fails its collision check).
pub fn decide_direction(grid: &Grid, me: &Snake, opponent: &Snake, target: Cell) -> Direction {
    let heading = me.direction;
    let safe = |dir: Direction| is_safe(grid, me.advance(dir, grid.cell_size), me, opponent);

    if let Some(dir) = preference_order(me.head(), target, heading)
        .into_iter()
        .find(|&dir| safe(dir))
    {
        return dir;
    }

    let reverse = heading.opposite();
    if let Some(dir) = Direction::ALL
        .into_iter()
        .filter(|&dir| dir != reverse)
        .chain(std::iter::once(reverse))
        .find(|&dir| safe(dir))
    {
        log::debug!("AI fell back to {:?}", dir);
        return dir;
    }

    log::debug!("AI boxed in, keeping {:?}", heading);
    heading
}
