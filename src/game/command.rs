//! Turn commands and their wire grammar.
//!
//! ```text
//! g            spawn a unit at the shipyard
//! c <id>       convert unit <id> into a dropoff
//! m <id> <d>   move unit <id>, <d> one of n s e w o
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::game::{Direction, DirectionError, UnitId};

/// A command sent to the judge at the end of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Spawn a unit at the player's shipyard.
    Spawn,
    /// Convert a unit into a dropoff.
    Convert(UnitId),
    /// Move a unit one step.
    Move(UnitId, Direction),
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Spawn => write!(f, "g"),
            Command::Convert(id) => write!(f, "c {id}"),
            Command::Move(id, direction) => write!(f, "m {id} {}", direction.as_char()),
        }
    }
}

/// Failure to parse a command from its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    /// No verb was given.
    #[error("empty command")]
    Empty,
    /// The verb is not `g`, `c` or `m`.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// A required argument is missing.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    /// A unit id did not parse.
    #[error("invalid unit id '{0}'")]
    InvalidId(String),
    /// The direction argument is not a single valid character.
    #[error("invalid direction argument '{0}'")]
    InvalidDirection(String),
    /// The direction character is outside the encoding.
    #[error(transparent)]
    Direction(#[from] DirectionError),
    /// Extra tokens followed a complete command.
    #[error("unexpected trailing argument '{0}'")]
    Trailing(String),
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().ok_or(CommandParseError::Empty)?;

        let command = match verb {
            "g" => Command::Spawn,
            "c" => Command::Convert(parse_id(parts.next())?),
            "m" => {
                let id = parse_id(parts.next())?;
                let arg = parts
                    .next()
                    .ok_or(CommandParseError::MissingArgument("direction"))?;
                let mut chars = arg.chars();
                let direction = match (chars.next(), chars.next()) {
                    (Some(c), None) => Direction::try_from(c)?,
                    _ => return Err(CommandParseError::InvalidDirection(arg.to_string())),
                };
                Command::Move(id, direction)
            }
            other => return Err(CommandParseError::UnknownCommand(other.to_string())),
        };

        match parts.next() {
            Some(extra) => Err(CommandParseError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_id(token: Option<&str>) -> Result<UnitId, CommandParseError> {
    let token = token.ok_or(CommandParseError::MissingArgument("unit id"))?;
    token
        .parse()
        .map_err(|_| CommandParseError::InvalidId(token.to_string()))
}

/// Render commands as one space-separated turn line, without the newline.
#[must_use]
pub fn render_turn(commands: &[Command]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_grammar() {
        assert_eq!(Command::Spawn.to_string(), "g");
        assert_eq!(Command::Convert(12).to_string(), "c 12");
        assert_eq!(Command::Move(3, Direction::West).to_string(), "m 3 w");
        assert_eq!(Command::Move(3, Direction::Still).to_string(), "m 3 o");
    }

    #[test]
    fn test_render_turn() {
        let commands = [
            Command::Move(1, Direction::North),
            Command::Convert(2),
            Command::Spawn,
        ];
        assert_eq!(render_turn(&commands), "m 1 n c 2 g");
        assert_eq!(render_turn(&[]), "");
    }

    #[test]
    fn test_parse() {
        assert_eq!("g".parse::<Command>(), Ok(Command::Spawn));
        assert_eq!("c 9".parse::<Command>(), Ok(Command::Convert(9)));
        assert_eq!(
            " m  4 s ".parse::<Command>(),
            Ok(Command::Move(4, Direction::South))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandParseError::Empty));
        assert_eq!(
            "x".parse::<Command>(),
            Err(CommandParseError::UnknownCommand("x".to_string()))
        );
        assert_eq!(
            "m 4".parse::<Command>(),
            Err(CommandParseError::MissingArgument("direction"))
        );
        assert_eq!(
            "m 4 q".parse::<Command>(),
            Err(CommandParseError::Direction(DirectionError('q')))
        );
        assert_eq!(
            "m 4 ne".parse::<Command>(),
            Err(CommandParseError::InvalidDirection("ne".to_string()))
        );
        assert_eq!(
            "c -1".parse::<Command>(),
            Err(CommandParseError::InvalidId("-1".to_string()))
        );
        assert_eq!(
            "g 1".parse::<Command>(),
            Err(CommandParseError::Trailing("1".to_string()))
        );
    }
}
