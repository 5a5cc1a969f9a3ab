//! Turn engine: the handshake and per-turn read/write cycle.
//!
//! ```text
//! AwaitingHandshake -> Ready -> TurnStart <-> TurnEnd
//!                                  |
//!                              Terminated
//! ```
//!
//! Each turn is one read phase ([`TurnEngine::begin_turn`]) followed by one
//! write phase ([`TurnEngine::end_turn`]). The engine never decides when the
//! game ends; it runs until the judge closes the input or a shutdown is
//! requested.

use std::io::{BufRead, Write};

use tracing::{Level, debug, info, warn};

use crate::config::{ConfigCell, ConfigDictionary, Constants};
use crate::error::{ProtocolError, ProtocolResult};
use crate::game::{Command, GameMap, GameState, Player, render_turn};
use crate::input::TokenStream;
use crate::shutdown::ShutdownSignal;

/// Engine lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing read yet.
    AwaitingHandshake,
    /// Handshake consumed; the ready line may be sent.
    Ready,
    /// A turn has been read and awaits commands.
    TurnStart,
    /// Commands for the last turn have been written.
    TurnEnd,
    /// Input closed, shutdown observed, or a fatal error occurred.
    Terminated,
}

/// Decision layer driven by [`TurnEngine::run`].
pub trait Strategy {
    /// Display name sent as the ready line.
    fn name(&self) -> &str;

    /// Called once after the handshake, before the ready line is sent.
    fn on_start(&mut self, _state: &GameState) {}

    /// Decide this turn's commands.
    ///
    /// The state is mutable so that navigation can claim target cells.
    fn play_turn(&mut self, state: &mut GameState) -> Vec<Command>;
}

/// How a completed [`TurnEngine::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The judge closed the input stream.
    InputClosed {
        /// Turns fully played.
        turns: u32,
    },
    /// A shutdown was requested and observed at a turn boundary.
    Terminated {
        /// Turns fully played.
        turns: u32,
    },
}

impl RunOutcome {
    /// Turns fully played.
    #[must_use]
    pub const fn turns(self) -> u32 {
        match self {
            Self::InputClosed { turns } | Self::Terminated { turns } => turns,
        }
    }
}

/// Protocol driver over an input reader and a command writer.
#[derive(Debug)]
pub struct TurnEngine<R, W> {
    input: TokenStream<R>,
    output: W,
    config: ConfigCell,
    state: Option<GameState>,
    phase: Phase,
    announced: bool,
    shutdown: ShutdownSignal,
}

impl<R: BufRead, W: Write> TurnEngine<R, W> {
    /// Create an engine with a shutdown flag that is never set.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self::with_shutdown(input, output, ShutdownSignal::new())
    }

    /// Create an engine that stops at the next turn boundary once `shutdown`
    /// is requested.
    #[must_use]
    pub fn with_shutdown(input: R, output: W, shutdown: ShutdownSignal) -> Self {
        Self {
            input: TokenStream::new(input),
            output,
            config: ConfigCell::new(),
            state: None,
            phase: Phase::AwaitingHandshake,
            announced: false,
            shutdown,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Raw configuration dictionary, once the handshake has read it.
    #[must_use]
    pub fn config(&self) -> Option<&ConfigDictionary> {
        self.config.get()
    }

    /// Game state, once the handshake has completed.
    #[must_use]
    pub const fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Mutable game state, once the handshake has completed.
    pub const fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    /// Consume the engine and return the command writer.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read the handshake block: config line, player count, own id, roster,
    /// map dimensions and initial energy.
    ///
    /// # Errors
    ///
    /// Fails on any short read or malformed token, on a config line with an
    /// odd token count, or if called twice. Missing or unparsable settings
    /// are left for the decision layer to handle.
    pub fn handshake(&mut self) -> ProtocolResult<&GameState> {
        self.expect_phase("handshake", Phase::AwaitingHandshake)?;
        let result = self.read_handshake();
        self.settle(result, Phase::Ready)?;
        self.state.as_ref().ok_or(ProtocolError::OutOfPhase {
            operation: "handshake",
            phase: self.phase,
        })
    }

    fn read_handshake(&mut self) -> ProtocolResult<()> {
        let line = self.input.next_line()?;
        let config = self.config.init(&line)?.clone();
        debug!(entries = config.len(), "handshake.config");
        if tracing::enabled!(Level::DEBUG) {
            log_constants(&config);
        }

        let player_count = self.input.next_count("player")?;
        let my_id = self.input.next_id()?;
        let mut players = Vec::new();
        for _ in 0..player_count {
            players.push(Player::read_roster_entry(&mut self.input)?);
        }

        let mut map = GameMap::read(&mut self.input)?;
        map.refresh_occupancy(&players);

        let state = GameState::new(config, my_id, players, map)?;
        info!(
            player = my_id,
            players = player_count,
            width = state.map.width(),
            height = state.map.height(),
            "handshake.complete"
        );
        self.state = Some(state);
        Ok(())
    }

    /// Send the one-line ready announcement carrying the display name.
    ///
    /// # Errors
    ///
    /// Fails if the handshake has not completed, the line was already sent,
    /// or the write fails.
    pub fn ready(&mut self, name: &str) -> ProtocolResult<()> {
        if self.announced {
            return Err(ProtocolError::OutOfPhase {
                operation: "ready",
                phase: self.phase,
            });
        }
        self.expect_phase("ready", Phase::Ready)?;
        let result = write_line(&mut self.output, name);
        self.settle(result, Phase::Ready)?;
        self.announced = true;
        info!(name, "ready");
        Ok(())
    }

    /// Read the next turn block and rebuild occupancy.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::EndOfInput`] when the judge closes the stream
    /// at game end, or another variant on a malformed turn block. Either way
    /// the engine is terminated.
    pub fn begin_turn(&mut self) -> ProtocolResult<&mut GameState> {
        let turn_ready = match self.phase {
            Phase::Ready => self.announced,
            Phase::TurnEnd => true,
            _ => false,
        };
        if !turn_ready {
            return Err(ProtocolError::OutOfPhase {
                operation: "begin_turn",
                phase: self.phase,
            });
        }
        let result = self.read_turn();
        self.settle(result, Phase::TurnStart)?;
        self.state.as_mut().ok_or(ProtocolError::OutOfPhase {
            operation: "begin_turn",
            phase: Phase::TurnStart,
        })
    }

    fn read_turn(&mut self) -> ProtocolResult<()> {
        let Some(state) = self.state.as_mut() else {
            return Err(ProtocolError::OutOfPhase {
                operation: "begin_turn",
                phase: self.phase,
            });
        };
        let input = &mut self.input;

        state.turn = input.next_as("turn")?;
        for player in &mut state.players {
            let reported = input.next_id()?;
            if reported != player.id {
                debug!(expected = player.id, reported, "turn.player_order");
            }
            let units = input.next_count("unit")?;
            let dropoffs = input.next_count("dropoff")?;
            let energy = input.next_int()?;
            player.update(input, units, dropoffs, energy)?;
        }

        let deltas = input.next_count("energy delta")?;
        state.map.apply_energy_deltas(deltas, input)?;
        state.map.refresh_occupancy(&state.players);

        debug!(turn = state.turn, deltas, "turn.start");
        if tracing::enabled!(Level::DEBUG) {
            match serde_json::to_string(&state.summary()) {
                Ok(summary) => debug!(turn = state.turn, %summary, "turn.summary"),
                Err(err) => warn!(%err, "turn.summary_failed"),
            }
        }
        Ok(())
    }

    /// Write this turn's commands as one space-separated line.
    ///
    /// # Errors
    ///
    /// Fails if no turn is in progress or the write fails.
    pub fn end_turn(&mut self, commands: &[Command]) -> ProtocolResult<()> {
        self.expect_phase("end_turn", Phase::TurnStart)?;
        let line = render_turn(commands);
        let result = write_line(&mut self.output, &line);
        self.settle(result, Phase::TurnEnd)?;
        debug!(commands = commands.len(), "turn.end");
        Ok(())
    }

    /// Drive a whole game: handshake, [`Strategy::on_start`], the ready
    /// line, then turns until the input closes or a shutdown is requested.
    ///
    /// Steps already taken by hand (a prior [`TurnEngine::handshake`]) are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns any protocol error other than the input closing.
    pub fn run<S: Strategy + ?Sized>(&mut self, strategy: &mut S) -> ProtocolResult<RunOutcome> {
        let mut turns = 0;
        match self.play(strategy, &mut turns) {
            Err(ProtocolError::EndOfInput) => {
                info!(turns, "input.closed");
                Ok(RunOutcome::InputClosed { turns })
            }
            other => other,
        }
    }

    fn play<S: Strategy + ?Sized>(
        &mut self,
        strategy: &mut S,
        turns: &mut u32,
    ) -> ProtocolResult<RunOutcome> {
        if self.phase == Phase::AwaitingHandshake {
            self.handshake()?;
        }
        if !self.announced {
            if let Some(state) = self.state.as_ref() {
                strategy.on_start(state);
            }
            self.ready(strategy.name())?;
        }

        loop {
            if self.shutdown.is_requested() {
                self.phase = Phase::Terminated;
                info!(turns = *turns, "shutdown.observed");
                return Ok(RunOutcome::Terminated { turns: *turns });
            }
            let state = self.begin_turn()?;
            let commands = strategy.play_turn(state);
            self.end_turn(&commands)?;
            *turns += 1;
        }
    }

    fn expect_phase(&self, operation: &'static str, expected: Phase) -> ProtocolResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ProtocolError::OutOfPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    /// Move to `next` on success, to [`Phase::Terminated`] on failure.
    fn settle(&mut self, result: ProtocolResult<()>, next: Phase) -> ProtocolResult<()> {
        self.phase = if result.is_ok() { next } else { Phase::Terminated };
        result
    }
}

fn log_constants(config: &ConfigDictionary) {
    match Constants::from_dictionary(config) {
        Ok(constants) => match serde_json::to_string(&constants) {
            Ok(json) => debug!(constants = %json, "handshake.constants"),
            Err(err) => warn!(%err, "handshake.constants_failed"),
        },
        Err(err) => debug!(%err, "handshake.constants_incomplete"),
    }
}

fn write_line<W: Write>(output: &mut W, line: &str) -> ProtocolResult<()> {
    writeln!(output, "{line}").map_err(ProtocolError::Output)?;
    output.flush().map_err(ProtocolError::Output)
}
