//! Error types for the judge protocol.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::Phase;
use crate::game::{DropoffId, PlayerId, UnitId};

/// Failure while reading the judge's input or writing commands back.
///
/// Apart from [`ProtocolError::EndOfInput`], every variant means the token
/// cursor is no longer in step with the judge and cannot be recovered.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The judge closed the input stream.
    #[error("input stream closed")]
    EndOfInput,
    /// Reading from the input stream failed.
    #[error("failed to read input: {0}")]
    Io(#[source] io::Error),
    /// Writing to the command stream failed.
    #[error("failed to write commands: {0}")]
    Output(#[source] io::Error),
    /// A token did not parse as the type the protocol expects at this point.
    #[error("invalid {expected} token '{token}' on input line {line}")]
    InvalidToken {
        /// The offending token.
        token: String,
        /// What the protocol expected.
        expected: &'static str,
        /// One-based input line the token came from.
        line: usize,
    },
    /// A raw line was requested while tokens of the current line were unconsumed.
    #[error("{count} unconsumed tokens before raw line read on input line {line}")]
    PendingTokens {
        /// Number of tokens left over.
        count: usize,
        /// One-based input line the tokens came from.
        line: usize,
    },
    /// Grid dimensions were zero or negative.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Reported width.
        width: i32,
        /// Reported height.
        height: i32,
    },
    /// A count field (players, units, deltas) was negative.
    #[error("negative {what} count {count}")]
    NegativeCount {
        /// Which count was negative.
        what: &'static str,
        /// The reported value.
        count: i32,
    },
    /// The handshake named an own-player id that is not in the roster.
    #[error("player {0} is not in the roster")]
    UnknownPlayer(PlayerId),
    /// The same unit id was reported twice for one player in one turn.
    #[error("unit {unit} reported twice for player {owner}")]
    DuplicateUnit {
        /// Owning player.
        owner: PlayerId,
        /// Repeated unit id.
        unit: UnitId,
    },
    /// The same dropoff id was reported twice for one player in one turn.
    #[error("dropoff {dropoff} reported twice for player {owner}")]
    DuplicateDropoff {
        /// Owning player.
        owner: PlayerId,
        /// Repeated dropoff id.
        dropoff: DropoffId,
    },
    /// The configuration line could not be parsed or lacked a required key.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    /// An engine operation was called in the wrong phase.
    #[error("{operation} is not allowed in phase {phase:?}")]
    OutOfPhase {
        /// The rejected operation.
        operation: &'static str,
        /// The phase the engine was in.
        phase: Phase,
    },
}

impl ProtocolError {
    /// Whether this error is the judge closing the connection at game end.
    #[must_use]
    pub const fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_input_is_distinguished() {
        assert!(ProtocolError::EndOfInput.is_end_of_input());
        let err = ProtocolError::InvalidToken {
            token: "x".to_string(),
            expected: "integer",
            line: 3,
        };
        assert!(!err.is_end_of_input());
    }

    #[test]
    fn test_display_names_token_and_line() {
        let err = ProtocolError::InvalidToken {
            token: "abc".to_string(),
            expected: "integer",
            line: 7,
        };
        let text = err.to_string();
        assert!(text.contains("abc"));
        assert!(text.contains("line 7"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: ProtocolError = ConfigError::OddTokenCount(3).into();
        assert!(matches!(err, ProtocolError::Config(_)));
    }
}
