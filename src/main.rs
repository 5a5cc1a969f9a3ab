//! Tideline bot - plays one game against the judge over stdin/stdout.

// Stdout is the command channel; the last-resort error report goes to stderr
#![allow(clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Tideline - a toroidal-grid resource game client
#[derive(Parser, Debug)]
#[command(name = "tideline")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Display name sent to the judge as the ready line
    #[arg(short, long, default_value = "tideline")]
    name: String,

    /// Directory for the per-player log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,

    /// Log filter directive (e.g. "info", "tideline=debug")
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Grace period after a termination signal, in milliseconds
    #[arg(long, default_value = "500")]
    grace_ms: u64,

    /// Last turn on which the shipyard may spawn units
    #[arg(long, default_value = "200")]
    spawn_until: u32,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let options = cli::play::PlayOptions {
        name: args.name,
        log_dir: args.log_dir,
        log_filter: args.log_filter,
        grace: Duration::from_millis(args.grace_ms),
        spawn_until: args.spawn_until,
    };

    match cli::play::execute(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
