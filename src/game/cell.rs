//! Map cells.

use crate::game::{DropoffId, PlayerId, Position, UnitId};

/// Structure standing on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureRef {
    /// The shipyard of the given player.
    Shipyard(PlayerId),
    /// The dropoff with the given id.
    Dropoff(DropoffId),
}

/// A single cell of the map.
///
/// `unit` is rebuilt every turn from the players' unit lists; `structure` is
/// set once and persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Fixed position of this cell.
    pub position: Position,
    /// Energy on the cell.
    pub energy: i32,
    /// Unit occupying (or claimed to move onto) this cell this turn.
    pub unit: Option<UnitId>,
    /// Structure on this cell.
    pub structure: Option<StructureRef>,
}

impl Cell {
    /// Create an unoccupied cell.
    #[must_use]
    pub const fn new(position: Position, energy: i32) -> Self {
        Self {
            position,
            energy,
            unit: None,
            structure: None,
        }
    }

    /// Whether a unit occupies this cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.unit.is_some()
    }

    /// Whether a structure stands on this cell.
    #[must_use]
    pub const fn has_structure(&self) -> bool {
        self.structure.is_some()
    }

    /// Whether the cell has neither a unit nor a structure.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.is_occupied() && !self.has_structure()
    }

    /// Claim this cell for a unit.
    pub fn mark_unsafe(&mut self, unit: UnitId) {
        self.unit = Some(unit);
    }
}
