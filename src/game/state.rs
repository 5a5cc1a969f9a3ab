//! Game state handed to the decision layer each turn.

use serde::Serialize;

use crate::config::ConfigDictionary;
use crate::error::{ProtocolError, ProtocolResult};
use crate::game::{GameMap, Player, PlayerId};

/// Complete game state, as of the last turn read.
///
/// Settings stay as the raw handshake dictionary; the decision layer
/// coerces the keys it needs, e.g. through [`crate::Constants`].
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Settings sent in the handshake.
    pub config: ConfigDictionary,
    /// Current turn number (0 before the first turn is read).
    pub turn: u32,
    /// All players, in roster order.
    pub players: Vec<Player>,
    /// The map.
    pub map: GameMap,
    /// Id of the player this client controls.
    my_id: PlayerId,
    /// Index of that player in `players`.
    my_index: usize,
}

impl GameState {
    /// Assemble the state at turn 0.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownPlayer`] if `my_id` is not in `players`.
    pub fn new(
        config: ConfigDictionary,
        my_id: PlayerId,
        players: Vec<Player>,
        map: GameMap,
    ) -> ProtocolResult<Self> {
        let my_index = players
            .iter()
            .position(|p| p.id == my_id)
            .ok_or(ProtocolError::UnknownPlayer(my_id))?;
        Ok(Self {
            config,
            turn: 0,
            players,
            map,
            my_id,
            my_index,
        })
    }

    /// Id of the player this client controls.
    #[must_use]
    pub const fn my_id(&self) -> PlayerId {
        self.my_id
    }

    /// The player this client controls.
    #[must_use]
    pub fn me(&self) -> &Player {
        &self.players[self.my_index]
    }

    /// Get a player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players other than this client's.
    pub fn opponents(&self) -> impl Iterator<Item = &Player> {
        let my_id = self.my_id;
        self.players.iter().filter(move |p| p.id != my_id)
    }

    /// Compact summary for logging.
    #[must_use]
    pub fn summary(&self) -> TurnSummary {
        TurnSummary {
            turn: self.turn,
            map_energy: self.map.total_energy(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id,
                    energy: p.energy,
                    units: p.unit_count(),
                    dropoffs: p.dropoff_count(),
                })
                .collect(),
        }
    }
}

/// Per-turn summary, serialized to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnSummary {
    /// Turn number.
    pub turn: u32,
    /// Energy left on the map.
    pub map_energy: i64,
    /// One entry per player, in roster order.
    pub players: Vec<PlayerSummary>,
}

/// One player's line in a [`TurnSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    /// Player id.
    pub id: PlayerId,
    /// Energy banked.
    pub energy: i32,
    /// Number of units.
    pub units: usize,
    /// Number of dropoffs.
    pub dropoffs: usize,
}
