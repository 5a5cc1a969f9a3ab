//! Per-player log file.
//!
//! Stdout carries the command protocol, so diagnostics go to a file. The
//! file name depends on the player id, which is only known after the
//! handshake; until then log output is buffered in memory.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::game::PlayerId;

#[derive(Debug)]
enum Sink {
    Buffer(Vec<u8>),
    File(File),
}

/// Log destination shared between the subscriber and the binary.
///
/// Cloning shares the same destination.
#[derive(Debug, Clone)]
pub struct LogFile {
    sink: Arc<Mutex<Sink>>,
}

impl Default for LogFile {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFile {
    /// Create a sink that buffers until opened.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(Mutex::new(Sink::Buffer(Vec::new()))),
        }
    }

    /// Create the file at `path`, write everything buffered so far into it,
    /// and send all further output there.
    ///
    /// # Errors
    ///
    /// Fails if the sink is already open or the file cannot be written.
    pub fn open(&self, path: &Path) -> io::Result<()> {
        let mut sink = lock(&self.sink)?;
        let Sink::Buffer(buffered) = &*sink else {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "log file already open",
            ));
        };
        let mut file = File::create(path)?;
        file.write_all(buffered)?;
        *sink = Sink::File(file);
        Ok(())
    }

    /// Open `bot-<player>.log` in `dir`.
    ///
    /// # Errors
    ///
    /// Same as [`LogFile::open`].
    pub fn open_for_player(&self, dir: &Path, player: PlayerId) -> io::Result<PathBuf> {
        let path = dir.join(format!("bot-{player}.log"));
        self.open(&path)?;
        Ok(path)
    }

    /// Open `bot-unknown-<unix seconds>.log` in `dir`, for failures before the
    /// player id is known.
    ///
    /// # Errors
    ///
    /// Same as [`LogFile::open`].
    pub fn open_fallback(&self, dir: &Path) -> io::Result<PathBuf> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let path = dir.join(format!("bot-unknown-{secs}.log"));
        self.open(&path)?;
        Ok(path)
    }

    /// Whether output currently goes to a file.
    #[must_use]
    pub fn is_open(&self) -> bool {
        lock(&self.sink).is_ok_and(|sink| matches!(*sink, Sink::File(_)))
    }

    /// Flush the file, if open.
    ///
    /// # Errors
    ///
    /// Fails if the flush fails.
    pub fn flush(&self) -> io::Result<()> {
        match &mut *lock(&self.sink)? {
            Sink::File(file) => file.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}

/// Writer handed to the subscriber for each event.
#[derive(Debug)]
pub struct LogWriter {
    sink: Arc<Mutex<Sink>>,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *lock(&self.sink)? {
            Sink::Buffer(buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            Sink::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *lock(&self.sink)? {
            Sink::File(file) => file.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            sink: Arc::clone(&self.sink),
        }
    }
}

fn lock(sink: &Mutex<Sink>) -> io::Result<MutexGuard<'_, Sink>> {
    sink.lock().map_err(|_| io::Error::other("log sink mutex poisoned"))
}

/// Failure to install the global log subscriber.
#[derive(Debug, Error)]
pub enum LogInitError {
    /// The filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global `tracing` subscriber writing to `sink`.
///
/// # Errors
///
/// Fails if `filter` is not a valid directive or a subscriber is already set.
pub fn init(filter: &str, sink: LogFile) -> Result<(), LogInitError> {
    let filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(sink)
        .try_init()
        .map_err(LogInitError::Install)
}
