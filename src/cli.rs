//! CLI command implementations for Tideline.

pub(crate) mod play;

mod collector;

use std::error::Error;
use std::fmt;

use tideline::ProtocolError;
use tideline::log::LogInitError;

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ProtocolError> for CliError {
    fn from(e: ProtocolError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<LogInitError> for CliError {
    fn from(e: LogInitError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ctrlc::Error> for CliError {
    fn from(e: ctrlc::Error) -> Self {
        Self::new(format!("failed to install signal handler: {e}"))
    }
}
