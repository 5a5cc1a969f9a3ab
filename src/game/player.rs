//! Player state and per-turn entity reconstruction.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io::BufRead;

use crate::error::{ProtocolError, ProtocolResult};
use crate::game::{Dropoff, DropoffId, PlayerId, Position, Shipyard, Unit, UnitId};
use crate::input::TokenStream;

/// State for a single player.
///
/// Units and dropoffs are replaced wholesale every turn; an entity missing
/// from a turn's report no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Player id.
    pub id: PlayerId,
    /// Home structure, fixed for the game.
    pub shipyard: Shipyard,
    /// Energy banked.
    pub energy: i32,
    units: BTreeMap<UnitId, Unit>,
    dropoffs: BTreeMap<DropoffId, Dropoff>,
}

impl Player {
    /// Create a player with no units, dropoffs or energy.
    #[must_use]
    pub fn new(id: PlayerId, shipyard: Shipyard) -> Self {
        Self {
            id,
            shipyard,
            energy: 0,
            units: BTreeMap::new(),
            dropoffs: BTreeMap::new(),
        }
    }

    /// Read one handshake roster entry: `id x y` of the shipyard.
    ///
    /// # Errors
    ///
    /// Fails if the stream ends or a token is malformed.
    pub fn read_roster_entry<R: BufRead>(input: &mut TokenStream<R>) -> ProtocolResult<Self> {
        let id = input.next_id()?;
        let x = input.next_int()?;
        let y = input.next_int()?;
        Ok(Self::new(
            id,
            Shipyard {
                owner: id,
                position: Position::new(x, y),
            },
        ))
    }

    /// Replace this player's units and dropoffs with the next `unit_count`
    /// unit records and `dropoff_count` dropoff records, then set the energy.
    ///
    /// # Errors
    ///
    /// Fails on a short read, a malformed token, or an id repeated within
    /// this turn's report.
    pub fn update<R: BufRead>(
        &mut self,
        input: &mut TokenStream<R>,
        unit_count: usize,
        dropoff_count: usize,
        energy: i32,
    ) -> ProtocolResult<()> {
        self.units.clear();
        for _ in 0..unit_count {
            let unit = Unit::read(input, self.id)?;
            self.insert_unit(unit)?;
        }

        self.dropoffs.clear();
        for _ in 0..dropoff_count {
            let dropoff = Dropoff::read(input, self.id)?;
            self.insert_dropoff(dropoff)?;
        }

        self.energy = energy;
        Ok(())
    }

    /// Add a unit to this turn's collection.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::DuplicateUnit`] if the id is already present.
    pub fn insert_unit(&mut self, unit: Unit) -> ProtocolResult<()> {
        match self.units.entry(unit.id) {
            Entry::Occupied(_) => Err(ProtocolError::DuplicateUnit {
                owner: self.id,
                unit: unit.id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(unit);
                Ok(())
            }
        }
    }

    /// Add a dropoff to this turn's collection.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::DuplicateDropoff`] if the id is already present.
    pub fn insert_dropoff(&mut self, dropoff: Dropoff) -> ProtocolResult<()> {
        match self.dropoffs.entry(dropoff.id) {
            Entry::Occupied(_) => Err(ProtocolError::DuplicateDropoff {
                owner: self.id,
                dropoff: dropoff.id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(dropoff);
                Ok(())
            }
        }
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Whether this player has a unit with the given id this turn.
    #[must_use]
    pub fn has_unit(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// Units in ascending id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Number of units this turn.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Look up a dropoff by id.
    #[must_use]
    pub fn dropoff(&self, id: DropoffId) -> Option<&Dropoff> {
        self.dropoffs.get(&id)
    }

    /// Dropoffs in ascending id order.
    pub fn dropoffs(&self) -> impl Iterator<Item = &Dropoff> {
        self.dropoffs.values()
    }

    /// Number of dropoffs this turn.
    #[must_use]
    pub fn dropoff_count(&self) -> usize {
        self.dropoffs.len()
    }
}
