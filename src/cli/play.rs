//! Play command implementation.

use super::CliError;
use super::collector::Collector;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tideline::log::{self, LogFile};
use tideline::{RunOutcome, ShutdownSignal, TurnEngine};
use tracing::{error, info, warn};

/// Options for a single game.
#[derive(Debug, Clone)]
pub(crate) struct PlayOptions {
    /// Ready-line display name.
    pub(crate) name: String,
    /// Where the log file goes.
    pub(crate) log_dir: PathBuf,
    /// `EnvFilter` directive.
    pub(crate) log_filter: String,
    /// Shutdown grace period.
    pub(crate) grace: Duration,
    /// Last spawning turn for the collector.
    pub(crate) spawn_until: u32,
}

/// Execute the play command.
///
/// End of input and an observed shutdown are both a normal finish.
///
/// # Errors
///
/// Returns an error if logging or the signal handler cannot be set up, or if
/// the game ends on a protocol or configuration failure.
pub(crate) fn execute(options: &PlayOptions) -> Result<(), CliError> {
    let sink = LogFile::new();
    log::init(&options.log_filter, sink.clone())?;

    let result = install_shutdown(options.grace, &sink).and_then(|shutdown| {
        play(io::stdin().lock(), io::stdout().lock(), shutdown, options, &sink)
    });
    finish(result, &sink, &options.log_dir)
}

fn install_shutdown(grace: Duration, sink: &LogFile) -> Result<ShutdownSignal, CliError> {
    let expire_sink = sink.clone();
    let shutdown = ShutdownSignal::install(grace, move || {
        if let Err(e) = expire_sink.flush() {
            eprintln!("Error: failed to flush log: {e}");
        }
        std::process::exit(0);
    })?;
    Ok(shutdown)
}

/// Play one game over `input`/`output`.
///
/// A log file that cannot be opened does not stop the game; output stays
/// buffered in memory instead.
fn play<R: BufRead, W: Write>(
    input: R,
    output: W,
    shutdown: ShutdownSignal,
    options: &PlayOptions,
    sink: &LogFile,
) -> Result<(), CliError> {
    let mut engine = TurnEngine::with_shutdown(input, output, shutdown);

    let my_id = match engine.handshake() {
        Ok(state) => state.my_id(),
        Err(e) if e.is_end_of_input() => {
            info!("input.closed_before_handshake");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    match sink.open_for_player(&options.log_dir, my_id) {
        Ok(path) => info!(path = %path.display(), "log.opened"),
        Err(e) => warn!(error = %e, dir = %options.log_dir.display(), "log.open_failed"),
    }

    let mut strategy = Collector::new(options.name.clone(), options.spawn_until);
    match engine.run(&mut strategy)? {
        RunOutcome::InputClosed { turns } => info!(turns, "game.finished"),
        RunOutcome::Terminated { turns } => warn!(turns, "game.terminated"),
    }
    Ok(())
}

/// Log a failed game, saving the buffered log under a fallback name when no
/// file is open yet. The game's own result is returned unchanged.
fn finish(result: Result<(), CliError>, sink: &LogFile, log_dir: &Path) -> Result<(), CliError> {
    if let Err(e) = &result {
        error!(error = %e, "game.failed");
        if !sink.is_open() {
            match sink.open_fallback(log_dir) {
                Ok(path) => warn!(path = %path.display(), "log.fallback"),
                Err(log_err) => eprintln!("Error: failed to write log: {log_err}"),
            }
        }
    }
    if let Err(e) = sink.flush() {
        eprintln!("Error: failed to flush log: {e}");
    }
    result
}
