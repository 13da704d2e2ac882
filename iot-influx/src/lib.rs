#![warn(missing_docs)]
//! An InfluxDB 3 implementation of [`ReadingRepository`].
//!
//! Writes go through the v2-compatible `/api/v2/write` endpoint as a single
//! line-protocol record; the dashboard window is read with SQL through
//! `/api/v3/query_sql` and returned as JSON rows.
//!
//! ```no_run
//! # use iot_influx::{Influx, config::InfluxConfig};
//! # fn example() -> Result<(), iot_influx::Error> {
//! let influx = Influx::open(&InfluxConfig::default())?;
//! # Ok(())
//! # }
//! ```

use iot_core::{
    models::{Row, SensorReading, WindowQuery},
    ports::ReadingRepository,
};
use reqwest::{StatusCode, Url, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{Level, event};

pub mod config;
mod line_protocol;
mod rows;
mod sql;

use config::InfluxConfig;

/// Store operations fail for a handful of reasons; this is the unified error
/// type our functions return.
#[derive(Debug, Error)]
pub enum Error {
    /// The client could not be built from the configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Transport failure: connect, timeout, or body read
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("store responded {status}: {body}")]
    Status {
        /// The HTTP status returned by the store
        status: StatusCode,
        /// The response body, usually an error message
        body: String,
    },

    /// The query result was not the expected JSON
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A time column held something that is not a timestamp
    #[error("invalid timestamp in column `{column}`: {value}")]
    Timestamp {
        /// The offending column
        column: String,
        /// The raw value
        value: String,
    },
}

/// A handle to an InfluxDB 3 database.
///
/// Cloning is cheap: every clone shares the same connection pool, so one
/// instance is created at startup and handed to every request.
#[derive(Clone, Debug)]
pub struct Influx {
    client: reqwest::Client,
    endpoints: Arc<Endpoints>,
}

#[derive(Debug)]
struct Endpoints {
    write: Url,
    query: Url,
    database: String,
    token: String,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    db: &'a str,
    q: &'a str,
    format: &'static str,
}

impl Influx {
    /// Build a client for the configured server.
    ///
    /// No connection is made here; the first store call opens one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host is not a valid base URL or the
    /// database name is empty, and [`Error::Http`] if the TLS backend cannot
    /// be initialised.
    pub fn open(config: &InfluxConfig) -> Result<Self, Error> {
        if config.database.is_empty() {
            return Err(Error::Config("database name is empty".to_string()));
        }

        let mut base = Url::parse(&config.host)
            .map_err(|err| Error::Config(format!("invalid host {}: {err}", config.host)))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid host {}", config.host)));
        }
        // Url::join replaces the last segment unless the path ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = |path: &str| {
            base.join(path)
                .map_err(|err| Error::Config(format!("invalid endpoint {path}: {err}")))
        };

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoints: Arc::new(Endpoints {
                write: endpoint("api/v2/write")?,
                query: endpoint("api/v3/query_sql")?,
                database: config.database.clone(),
                token: config.token.clone(),
            }),
        })
    }
}

/// Turn a non-success response into [`Error::Status`].
async fn success(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(Error::Status { status, body })
    }
}

impl ReadingRepository for Influx {
    type Error = Error;

    async fn write_reading(&self, reading: &SensorReading) -> Result<(), Self::Error> {
        let line = line_protocol::encode(reading);
        event!(Level::DEBUG, line, "writing point");

        let response = self
            .client
            .post(self.endpoints.write.clone())
            .query(&[
                ("bucket", self.endpoints.database.as_str()),
                ("precision", "ns"),
            ])
            .bearer_auth(&self.endpoints.token)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line)
            .send()
            .await?;
        success(response).await?;
        Ok(())
    }

    async fn query_window(&self, query: &WindowQuery) -> Result<Vec<Row>, Self::Error> {
        let sql = sql::window(query);
        event!(Level::DEBUG, sql, "querying window");

        let response = self
            .client
            .post(self.endpoints.query.clone())
            .bearer_auth(&self.endpoints.token)
            .json(&QueryRequest {
                db: &self.endpoints.database,
                q: &sql,
                format: "json",
            })
            .send()
            .await?;
        let body = success(response).await?.bytes().await?;

        // an empty result can come back as an empty body rather than `[]`
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let objects: Vec<Map<String, Value>> = serde_json::from_slice(&body)?;
        objects.into_iter().map(rows::decode).collect()
    }
}
