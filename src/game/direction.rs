//! Movement directions and their wire encoding.

use thiserror::Error;

/// A character that does not encode a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid direction '{0}', expected one of n, s, e, w, o")]
pub struct DirectionError(pub char);

/// One of the four cardinal moves, or staying put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards smaller y.
    North,
    /// Towards larger y.
    South,
    /// Towards larger x.
    East,
    /// Towards smaller x.
    West,
    /// No movement.
    Still,
}

impl Direction {
    /// The four moving directions, in north, south, east, west order.
    pub const ALL_CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The opposite direction. `Still` is its own inverse.
    #[must_use]
    pub const fn invert(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Still => Direction::Still,
        }
    }

    /// The `(dx, dy)` step this direction applies to a position.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Still => (0, 0),
        }
    }

    /// Single-character wire encoding.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
            Direction::Still => 'o',
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = DirectionError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'n' => Ok(Direction::North),
            's' => Ok(Direction::South),
            'e' => Ok(Direction::East),
            'w' => Ok(Direction::West),
            'o' => Ok(Direction::Still),
            other => Err(DirectionError(other)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 5] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Still,
    ];

    #[test]
    fn test_invert_is_involution() {
        for direction in ALL {
            assert_eq!(direction.invert().invert(), direction);
        }
        assert_eq!(Direction::Still.invert(), Direction::Still);
        assert_eq!(Direction::North.invert(), Direction::South);
        assert_eq!(Direction::East.invert(), Direction::West);
    }

    #[test]
    fn test_inverse_offsets_cancel() {
        for direction in ALL {
            let (dx, dy) = direction.offset();
            let (ix, iy) = direction.invert().offset();
            assert_eq!((dx + ix, dy + iy), (0, 0));
        }
    }

    #[test]
    fn test_char_encoding_round_trips() {
        for direction in ALL {
            assert_eq!(Direction::try_from(direction.as_char()), Ok(direction));
        }
    }

    #[test]
    fn test_invalid_char() {
        let err = Direction::try_from('x').unwrap_err();
        assert_eq!(err, DirectionError('x'));
        assert!(err.to_string().contains("'x'"));
        assert!(Direction::try_from('N').is_err());
    }
}
