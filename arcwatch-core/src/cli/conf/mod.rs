mod check;
mod dump;
mod init;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
pub use init::*;
use std::path::PathBuf;

use crate::conf::DEFAULT_CONFIG_PATH;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to the config file
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,

        /// Plain error output (no colours)
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Print resolved configuration
    Dump {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,

        /// Output as JSON instead of HCL
        #[arg(long)]
        json: bool,
    },

    /// Write a commented starter config file
    Init {
        /// Path of the file to create
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path, plain } => check(path, plain),
        ConfigCmd::Dump { path, json } => dump(path, json),
        ConfigCmd::Init { path } => init(path),
    }
}
