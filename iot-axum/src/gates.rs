//! Middleware wrapped around the routes.
//!
//! Outermost first: request logging, error reporting, the header-size limit,
//! the request deadline, and, on `/data` only, the credential check.

use crate::{
    auth::TokenValidator,
    error::{self, ApiError, ErrorReport},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::{sync::Arc, time::Duration};
use tracing::{Level, event};

/// Log every request before anything else runs.
pub(crate) async fn log_request(request: Request, next: Next) -> Response {
    event!(
        Level::INFO,
        "{} {} endpoint hit",
        request.method(),
        request.uri().path()
    );
    next.run(request).await
}

/// Prefix every [`ApiError`] raised further in with `METHOD PATH: ` and log it.
pub(crate) async fn report_errors(request: Request, next: Next) -> Response {
    let context = format!("{} {}", request.method(), request.uri().path());
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<ErrorReport>() {
        Some(ErrorReport(message)) => error::report(response.status(), &context, &message),
        None => response,
    }
}

/// Refuse requests whose header names and values add up to more than `limit`.
pub(crate) async fn limit_headers(
    State(limit): State<usize>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let size: usize = request
        .headers()
        .iter()
        .map(|(name, value)| name.as_str().len() + value.len())
        .sum();
    if size > limit {
        return Err(ApiError::HeadersTooLarge { limit });
    }
    Ok(next.run(request).await)
}

/// Abandon the request if it is still running after `deadline`.
pub(crate) async fn enforce_deadline(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    tokio::time::timeout(deadline, next.run(request))
        .await
        .map_err(|_| ApiError::Timeout)
}

/// Run the configured [`TokenValidator`]; the route only runs if it passes.
pub(crate) async fn require_token(
    State(validator): State<Arc<dyn TokenValidator>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    validator.validate(request.headers())?;
    Ok(next.run(request).await)
}
