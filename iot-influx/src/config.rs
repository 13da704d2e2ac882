//! Configuration types for the InfluxDB connection.
//!
//! This module provides the options needed to reach an InfluxDB 3 server:
//! where it lives, how to authenticate, which database to use and how long
//! to wait for it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the InfluxDB client.
///
/// # Examples
///
/// ```
/// use iot_influx::config::InfluxConfig;
/// use std::time::Duration;
///
/// let config = InfluxConfig {
///     host: "https://influx.example.com".to_string(),
///     token: "apiv3_secret".to_string(),
///     database: "sensors".to_string(),
///     timeout: Duration::from_secs(5),
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InfluxConfig {
    /// Base URL of the server
    #[serde(default = "default_host")]
    pub host: String,

    /// API token sent as a bearer credential
    #[serde(default)]
    pub token: String,

    /// The database (bucket) readings are written to and read from
    #[serde(default)]
    pub database: String,

    /// Per-request deadline for store calls
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_host() -> String {
    "http://localhost:8181".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            token: String::new(),
            database: String::new(),
            timeout: default_timeout(),
        }
    }
}
