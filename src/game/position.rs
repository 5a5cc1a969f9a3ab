//! Grid positions.

use crate::game::Direction;

/// A cell coordinate.
///
/// Not normalized on construction; wrapping is relative to a map's
/// dimensions, see [`crate::game::GameMap::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one step away in the given direction (unwrapped).
    #[must_use]
    pub const fn directional_offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four neighbours, in north, south, east, west order (unwrapped).
    #[must_use]
    pub fn surrounding_cardinals(self) -> [Position; 4] {
        Direction::ALL_CARDINALS.map(|direction| self.directional_offset(direction))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
