use crate::{AppState, error::ApiError};
use axum::{
    Router,
    body::{Body, to_bytes},
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use iot_core::{
    models::{DataResponse, QueriedDataPoint, SensorReading},
    ports::ReadingRepository,
};
use tracing::{Level, event};

/// Largest reading body we are willing to buffer.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// `/data`: POST stores one reading, GET returns the dashboard window.
pub(crate) fn router<S: ReadingRepository>() -> Router<AppState<S>> {
    Router::new().route("/data", get(query_window::<S>).post(ingest::<S>))
}

/// Decode, validate and store a single reading.
async fn ingest<S: ReadingRepository>(
    State(state): State<AppState<S>>,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(ApiError::ReadBody)?;
    let reading: SensorReading = serde_json::from_slice(&body).map_err(ApiError::Decode)?;
    reading.validate()?;

    state
        .store
        .write_reading(&reading)
        .await
        .map_err(|err| ApiError::Write(Box::new(err)))?;

    event!(
        Level::DEBUG,
        measurement = %reading.measurement,
        location = %reading.location,
        "reading stored"
    );
    Ok(StatusCode::OK)
}

/// Read the configured window and return it as `{"data": [...]}`.
async fn query_window<S: ReadingRepository>(
    State(state): State<AppState<S>>,
) -> Result<Response, ApiError> {
    let rows = state
        .store
        .query_window(&state.query)
        .await
        .map_err(|err| ApiError::Query(Box::new(err)))?;

    let data = rows
        .into_iter()
        .map(QueriedDataPoint::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let body = serde_json::to_vec(&DataResponse { data }).map_err(ApiError::Encode)?;

    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}
