//! Sparse occupancy map over (slot, room) cells.
//!
//! The grid is bounded by the session's slot and room lists at the start
//! of an optimization run and never resizes.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::domain::foundation::TopicId;
use crate::domain::session::SessionError;

/// A (slot, room) pair, by position in the session's slot and room lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub slot: usize,
    pub room: usize,
}

impl Cell {
    pub fn new(slot: usize, room: usize) -> Self {
        Self { slot, room }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(slot {}, room {})", self.slot, self.room)
    }
}

/// Grid invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {cell} is outside a {slots}x{rooms} grid")]
    OutOfBounds {
        cell: Cell,
        slots: usize,
        rooms: usize,
    },

    #[error("cell {cell} is already occupied by topic '{occupant}'")]
    Occupied { cell: Cell, occupant: TopicId },

    #[error("cell {cell} is not occupied")]
    Vacant { cell: Cell },
}

impl From<GridError> for SessionError {
    fn from(err: GridError) -> Self {
        SessionError::invalid_state(err.to_string())
    }
}

/// Which topic occupies which cell during one optimization run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGrid {
    slots: usize,
    rooms: usize,
    cells: HashMap<Cell, TopicId>,
}

impl ScheduleGrid {
    /// Creates an empty grid of `slots` x `rooms` cells.
    pub fn new(slots: usize, rooms: usize) -> Self {
        Self {
            slots,
            rooms,
            cells: HashMap::new(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots
    }

    pub fn room_count(&self) -> usize {
        self.rooms
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.slot < self.slots && cell.room < self.rooms
    }

    /// Returns true if the cell is inside the grid and unoccupied.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.contains(cell) && !self.cells.contains_key(&cell)
    }

    pub fn occupant_of(&self, cell: Cell) -> Option<&TopicId> {
        self.cells.get(&cell)
    }

    /// Marks a free cell as held by `topic`.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if the cell lies outside the grid
    /// - `Occupied` if another topic already holds the cell
    pub fn occupy(&mut self, cell: Cell, topic: TopicId) -> Result<(), GridError> {
        self.check_bounds(cell)?;
        if let Some(occupant) = self.cells.get(&cell) {
            return Err(GridError::Occupied {
                cell,
                occupant: occupant.clone(),
            });
        }
        self.cells.insert(cell, topic);
        Ok(())
    }

    /// Frees a cell, returning the topic that held it.
    pub fn release(&mut self, cell: Cell) -> Result<TopicId, GridError> {
        self.check_bounds(cell)?;
        self.cells.remove(&cell).ok_or(GridError::Vacant { cell })
    }

    /// Exchanges the occupants of two occupied cells.
    ///
    /// Nothing changes unless both cells are occupied.
    pub fn swap(&mut self, a: Cell, b: Cell) -> Result<(), GridError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        if !self.cells.contains_key(&a) {
            return Err(GridError::Vacant { cell: a });
        }
        if !self.cells.contains_key(&b) {
            return Err(GridError::Vacant { cell: b });
        }
        if a == b {
            return Ok(());
        }

        if let (Some(first), Some(second)) = (self.cells.remove(&a), self.cells.remove(&b)) {
            self.cells.insert(a, second);
            self.cells.insert(b, first);
        }
        Ok(())
    }

    fn check_bounds(&self, cell: Cell) -> Result<(), GridError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                cell,
                slots: self.slots,
                rooms: self.rooms,
            })
        }
    }
}
