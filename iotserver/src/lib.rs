#![warn(missing_docs)]
//! The sensor reading server: configuration, command line, and wiring of
//! the InfluxDB store into the HTTP API.

mod cli;
pub use cli::{Cli, Commands};

mod config;
pub use config::AppConfig;
