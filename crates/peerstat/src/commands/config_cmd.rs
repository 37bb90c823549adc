//! `peerstat config` handlers.

use std::path::Path;

use peerstat_config::Config;

use crate::cli::ConfigCommand;
use crate::error::CliError;

pub fn handle(command: &ConfigCommand, path: &Path, config: &Config) -> Result<(), CliError> {
    match command {
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Show => print!("{}", config.to_toml()?),
    }
    Ok(())
}
