//! Application configuration management.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables.

use crate::Cli;
use iot_axum::config::{AuthConfig, AxumConfig};
use iot_core::models::WindowQuery;
use iot_influx::config::InfluxConfig;
use serde::{Deserialize, Serialize};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Web server configuration (bind address, timeout, header limit)
    #[serde(default)]
    pub server: AxumConfig,

    /// Where readings are stored
    #[serde(default)]
    pub store: InfluxConfig,

    /// How `/data` requests are authenticated
    #[serde(default)]
    pub auth: AuthConfig,

    /// The window `GET /data` returns
    #[serde(default)]
    pub query: WindowQuery,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `IOT_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// export IOT_STORE__HOST="http://influxdb:8181"
    /// export IOT_STORE__TOKEN="apiv3_..."
    /// export IOT_AUTH__SECRET="..."
    /// export IOT_QUERY__WINDOW="15m"
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        Self::load_with(cli, environment())
    }

    fn load_with(cli: &Cli, environment: config::Environment) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        config = config.add_source(environment);

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}

/// `IOT_STORE__HOST` maps to `store.host`.
///
/// Values stay strings until deserialization so secrets such as `0123` keep
/// their exact text; numeric fields are still parsed from them.
fn environment() -> config::Environment {
    config::Environment::with_prefix("IOT")
        .prefix_separator("_")
        .separator("__")
}
