use super::Coordinate;
use serde::Serialize;

/// The snake's current heading.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Move `from` one cell along `self`.  Returns `None` if the move would
    /// go below zero on either axis, which the step function treats as a
    /// wall hit.
    pub(crate) fn step(self, from: Coordinate) -> Option<Coordinate> {
        let Coordinate { mut x, mut y } = from;
        match self {
            Direction::Up => y = y.checked_sub(1)?,
            Direction::Down => y = y.checked_add(1)?,
            Direction::Left => x = x.checked_sub(1)?,
            Direction::Right => x = x.checked_add(1)?,
        }
        Some(Coordinate { x, y })
    }
}
