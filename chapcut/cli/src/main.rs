use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.log_level(), cli.log_format)?;
    cli.run()
}
