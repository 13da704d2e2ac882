//! Command-line interface definition and parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the sensor reading server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "IOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// What to do; serves the API when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// The server's subcommands.
#[derive(Subcommand, Debug, Clone, Default, PartialEq, Eq)]
pub enum Commands {
    /// Serve the HTTP API
    #[default]
    Serve,

    /// Print a signed token for a device, using the configured auth secret
    MintToken {
        /// The device identity the token is bound to
        #[arg(long)]
        subject: String,

        /// How long the token stays valid
        #[arg(long, default_value = "1h")]
        lifetime: humantime::Duration,
    },
}

impl Cli {
    /// Parse command-line arguments, after loading a `.env` file if there
    /// is one.
    pub fn import() -> Result<Self, clap::Error> {
        let _ = dotenvy::dotenv();
        Self::try_parse()
    }
}
