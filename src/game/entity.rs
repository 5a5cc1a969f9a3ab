//! Units and structures, and how they are read off the turn stream.

use std::io::BufRead;

use crate::error::ProtocolResult;
use crate::game::{Command, Direction, Position};
use crate::input::TokenStream;

/// Player identifier as issued by the judge.
pub type PlayerId = u32;

/// Unit identifier, stable across turns.
pub type UnitId = u32;

/// Dropoff identifier as issued by the judge.
pub type DropoffId = u32;

/// Anything that sits on the map and belongs to a player.
pub trait Entity {
    /// The owning player.
    fn owner(&self) -> PlayerId;
    /// Current position (as reported, not normalized).
    fn position(&self) -> Position;
}

/// A mobile unit carrying energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Unit id.
    pub id: UnitId,
    /// Owning player.
    pub owner: PlayerId,
    /// Current position.
    pub position: Position,
    /// Energy carried.
    pub cargo: i32,
}

impl Unit {
    /// Read one unit record: `id x y cargo`.
    ///
    /// # Errors
    ///
    /// Fails if the stream ends or a token is malformed.
    pub fn read<R: BufRead>(input: &mut TokenStream<R>, owner: PlayerId) -> ProtocolResult<Self> {
        let id = input.next_id()?;
        let x = input.next_int()?;
        let y = input.next_int()?;
        let cargo = input.next_int()?;
        Ok(Self {
            id,
            owner,
            position: Position::new(x, y),
            cargo,
        })
    }

    /// Whether the unit carries at least `max_energy`.
    #[must_use]
    pub fn is_full(&self, max_energy: i64) -> bool {
        i64::from(self.cargo) >= max_energy
    }

    /// Command moving this unit one step.
    #[must_use]
    pub const fn move_in(&self, direction: Direction) -> Command {
        Command::Move(self.id, direction)
    }

    /// Command keeping this unit in place.
    #[must_use]
    pub const fn stay_still(&self) -> Command {
        Command::Move(self.id, Direction::Still)
    }

    /// Command converting this unit into a dropoff.
    #[must_use]
    pub const fn make_dropoff(&self) -> Command {
        Command::Convert(self.id)
    }
}

impl Entity for Unit {
    fn owner(&self) -> PlayerId {
        self.owner
    }

    fn position(&self) -> Position {
        self.position
    }
}

/// A structure built by converting a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dropoff {
    /// Dropoff id.
    pub id: DropoffId,
    /// Owning player.
    pub owner: PlayerId,
    /// Position.
    pub position: Position,
}

impl Dropoff {
    /// Read one dropoff record: `id x y`.
    ///
    /// # Errors
    ///
    /// Fails if the stream ends or a token is malformed.
    pub fn read<R: BufRead>(input: &mut TokenStream<R>, owner: PlayerId) -> ProtocolResult<Self> {
        let id = input.next_id()?;
        let x = input.next_int()?;
        let y = input.next_int()?;
        Ok(Self {
            id,
            owner,
            position: Position::new(x, y),
        })
    }
}

impl Entity for Dropoff {
    fn owner(&self) -> PlayerId {
        self.owner
    }

    fn position(&self) -> Position {
        self.position
    }
}

/// A player's home structure, fixed for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shipyard {
    /// Owning player.
    pub owner: PlayerId,
    /// Position.
    pub position: Position,
}

impl Shipyard {
    /// Command spawning a unit here.
    #[must_use]
    pub const fn spawn(&self) -> Command {
        Command::Spawn
    }
}

impl Entity for Shipyard {
    fn owner(&self) -> PlayerId {
        self.owner
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(text: &str) -> TokenStream<Cursor<Vec<u8>>> {
        TokenStream::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_read_unit() {
        let mut input = stream("7 3 4 250\n");
        let unit = Unit::read(&mut input, 1).unwrap();
        assert_eq!(
            unit,
            Unit {
                id: 7,
                owner: 1,
                position: Position::new(3, 4),
                cargo: 250,
            }
        );
    }

    #[test]
    fn test_read_dropoff_keeps_raw_coordinates() {
        let mut input = stream("2 40 -1\n");
        let dropoff = Dropoff::read(&mut input, 0).unwrap();
        assert_eq!(dropoff.position, Position::new(40, -1));
        assert_eq!(dropoff.owner(), 0);
    }

    #[test]
    fn test_short_unit_record() {
        let mut input = stream("7 3 4\n");
        assert!(Unit::read(&mut input, 1).unwrap_err().is_end_of_input());
    }

    #[test]
    fn test_unit_commands() {
        let unit = Unit {
            id: 5,
            owner: 0,
            position: Position::new(0, 0),
            cargo: 1000,
        };
        assert!(unit.is_full(1000));
        assert!(!unit.is_full(1001));
        assert_eq!(unit.move_in(Direction::East), Command::Move(5, Direction::East));
        assert_eq!(unit.stay_still(), Command::Move(5, Direction::Still));
        assert_eq!(unit.make_dropoff(), Command::Convert(5));
    }

    #[test]
    fn test_shipyard_spawn() {
        let shipyard = Shipyard {
            owner: 2,
            position: Position::new(8, 8),
        };
        assert_eq!(shipyard.spawn(), Command::Spawn);
        assert_eq!(shipyard.position(), Position::new(8, 8));
    }
}
