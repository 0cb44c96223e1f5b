use clap::{Parser, Subcommand};

use crate::common::{CliError, LogArgs};

/// Chained account command-line tool
#[derive(Parser, Debug)]
#[command(version, infer_subcommands = true)]
pub struct Cli {
    /// Logging configuration
    #[command(flatten)]
    pub log: LogArgs,

    /// The command to run
    #[command(subcommand)]
    pub cmd: MainCmd,
}

/// Main command enumeration for the chained CLI tool
#[derive(Subcommand, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum MainCmd {
    /// Print the digest an owner signs for `executeSigned`
    Digest(crate::digest::Cmd),
    /// Sign an `executeSigned` operation or a user operation hash
    Sign(crate::sign::Cmd),
    /// Apply injection rules to call data
    Patch(crate::patch::Cmd),
    /// Dry-run a call list against scripted contracts
    Run(crate::run::Cmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error of a subcommand
    #[error("{0}")]
    Cli(#[from] CliError),
}

impl Cli {
    /// Set up logging and execute the selected command
    pub fn run(&self) -> Result<(), Error> {
        self.log.init()?;
        self.cmd.run()
    }
}

impl MainCmd {
    /// Execute the main command
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Digest(cmd) => cmd.run()?,
            Self::Sign(cmd) => cmd.run()?,
            Self::Patch(cmd) => cmd.run()?,
            Self::Run(cmd) => cmd.run()?,
        }
        Ok(())
    }
}
