use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use crate::commands::{InspectCommand, ListCommand, RemoveCommand};
use crate::logging::LogFormat;

/**
    Remove chapters from MP3 files by title.
*/
#[derive(Parser)]
#[command(name = "chapcut", version)]
pub struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t, global = true, env = "CHAPCUT_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove chapters whose title contains a filter string.
    Remove(RemoveCommand),
    /// List the chapters of an MP3 file.
    List(ListCommand),
    /// Show tag frames and audio stream details.
    Inspect(InspectCommand),
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::WARN,
            (false, 0) => LevelFilter::INFO,
            (false, 1) => LevelFilter::DEBUG,
            (false, _) => LevelFilter::TRACE,
        }
    }

    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Remove(cmd) => cmd.run(),
            Command::List(cmd) => cmd.run(),
            Command::Inspect(cmd) => cmd.run(),
        }
    }
}
