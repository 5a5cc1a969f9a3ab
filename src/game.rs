//! Game model.
//!
//! Mirrors the judge's view of the game:
//! - Toroidal map of cells holding energy
//! - Players with a fixed shipyard, banked energy, units and dropoffs
//! - Commands sent back at the end of each turn

mod cell;
mod command;
mod direction;
mod entity;
mod map;
mod player;
mod position;
mod state;

pub use cell::{Cell, StructureRef};
pub use command::{Command, CommandParseError, render_turn};
pub use direction::{Direction, DirectionError};
pub use entity::{Dropoff, DropoffId, Entity, PlayerId, Shipyard, Unit, UnitId};
pub use map::{GameMap, MAX_DIMENSION};
pub use player::Player;
pub use position::Position;
pub use state::{GameState, PlayerSummary, TurnSummary};
