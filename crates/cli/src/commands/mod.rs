//! Command implementations for the Fractus CLI

mod info;
mod recover;

pub use info::InfoCommand;
pub use recover::RecoverCommand;

use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Recover a secret from a share document
    Recover(RecoverCommand),

    /// Display information about the shares in a document
    Info(InfoCommand),
}

impl Commands {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            Commands::Recover(cmd) => cmd.execute(config),
            Commands::Info(cmd) => cmd.execute(config),
        }
    }
}
