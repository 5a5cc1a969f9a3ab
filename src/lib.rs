// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tideline: client-side adapter for a turn-based, toroidal-grid resource
//! game played against a judge over stdin/stdout.
//!
//! The crate turns the judge's line-oriented text protocol into a typed,
//! self-consistent game state each turn and writes the decision layer's
//! commands back:
//! - Handshake parsing (configuration, roster, initial map)
//! - Per-turn state reconstruction (units, dropoffs, energy deltas, occupancy)
//! - Toroidal geometry and greedy collision-avoiding navigation
//! - Command serialization in the judge's wire grammar
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Strategy (decision layer)       │
//! ├─────────────────────────────────────┤
//! │  TurnEngine (handshake, turn loop)  │
//! ├─────────────────────────────────────┤
//! │  GameState: GameMap, Players, ...   │
//! ├─────────────────────────────────────┤
//! │  TokenStream / ConfigDictionary     │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod input;
pub mod log;
pub mod shutdown;

pub use error::{ProtocolError, ProtocolResult};

// Re-export key types at crate root for convenience
pub use config::{ConfigDictionary, ConfigError, Constants};
pub use engine::{Phase, RunOutcome, Strategy, TurnEngine};
pub use game::{Command, Direction, GameMap, GameState, Player, PlayerId, Position, Unit};
pub use shutdown::ShutdownSignal;
