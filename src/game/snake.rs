use super::Coordinate;
use serde::Serialize;
use std::collections::VecDeque;

/// The snake's body, ordered head-first.
///
/// All positions are grid-cell addresses.  The body is never empty; a
/// self-collision ends the game before a duplicate cell could be stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Snake {
    cells: VecDeque<Coordinate>,
}

impl Snake {
    /// Create a length-one snake at `head`.
    pub(crate) fn spawn(head: Coordinate) -> Snake {
        Snake {
            cells: VecDeque::from([head]),
        }
    }

    /// Return the position of the snake's head
    pub fn head(&self) -> Coordinate {
        self.cells
            .front()
            .copied()
            .expect("snake body is never empty")
    }

    /// Return the number of cells in the body, head included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether any cell of the body, head and tail included, sits at `cell`
    pub fn contains(&self, cell: Coordinate) -> bool {
        self.cells.contains(&cell)
    }

    /// Return the cells of the body, head first
    pub fn cells(&self) -> &VecDeque<Coordinate> {
        &self.cells
    }

    /// Prepend a new head cell, growing the body by one
    pub(crate) fn push_head(&mut self, cell: Coordinate) {
        self.cells.push_front(cell);
    }

    /// Remove the tail cell
    pub(crate) fn drop_tail(&mut self) {
        let _ = self.cells.pop_back();
    }
}
