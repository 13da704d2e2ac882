#![warn(missing_docs)]
//! The HTTP surface of the sensor reading service.
//!
//! Three routes are served:
//!
//! - `GET /healthz` returns a static HTML page and is never authenticated.
//! - `POST /data` decodes one [`SensorReading`](iot_core::models::SensorReading)
//!   and writes it to the store.
//! - `GET /data` returns the configured window of readings as JSON.
//!
//! Every request is logged, bounded by a header-size limit and a deadline,
//! and both `/data` routes sit behind the configured [`auth::TokenValidator`].
//! Failures of any kind leave as a JSON `{"error": "..."}` body produced by
//! [`error::ApiError`].

mod data_routes;
mod gates;

pub mod auth;
pub mod config;
pub mod error;

use auth::TokenValidator;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::Html,
    routing::get,
};
use config::AxumConfig;
use iot_core::{models::WindowQuery, ports::ReadingRepository};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{Level, event};

const HEALTH_PAGE: &str = "<html><head><title>Health Check</title></head>\
    <body><h1>Server ready for requests</h1></body></html>";

/// Liveness page; touches nothing but the process itself
async fn health_check() -> Html<&'static str> {
    Html(HEALTH_PAGE)
}

/// What every handler can reach: the store, the window GET /data serves,
/// and the credential check (absent when authentication is disabled).
#[derive(Clone)]
pub struct AppState<S> {
    store: S,
    query: Arc<WindowQuery>,
    validator: Option<Arc<dyn TokenValidator>>,
}

impl<S: ReadingRepository> AppState<S> {
    /// Bundle the request-independent pieces the routes need.
    pub fn new(
        store: S,
        query: WindowQuery,
        validator: Option<Arc<dyn TokenValidator>>,
    ) -> Self {
        Self {
            store,
            query: Arc::new(query),
            validator,
        }
    }
}

/// Construct the full router with the given state and config
pub fn router<S: ReadingRepository>(state: AppState<S>, config: &AxumConfig) -> axum::Router {
    let mut data = data_routes::router::<S>();
    if let Some(validator) = state.validator.clone() {
        data = data.route_layer(from_fn_with_state(validator, gates::require_token));
    }

    axum::Router::new()
        .route("/healthz", get(health_check))
        .merge(data)
        .layer(from_fn_with_state(
            config.request_timeout,
            gates::enforce_deadline,
        ))
        .layer(from_fn_with_state(
            config.max_header_bytes,
            gates::limit_headers,
        ))
        .layer(from_fn(gates::report_errors))
        .layer(from_fn(gates::log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server and serves until Ctrl-C
pub async fn start_server<S: ReadingRepository>(
    config: AxumConfig,
    state: AppState<S>,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let service = router(state, &config);
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            event!(Level::ERROR, err = err.to_string(), "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
