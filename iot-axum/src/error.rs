use crate::auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_core::models::{InvalidReading, SchemaMismatch};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a request can fail. Converting one into a response is the only
/// place error bodies are produced; the request-context gate then prefixes
/// the message with the method and path and logs it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be read off the wire
    #[error("couldn't read request: {0}")]
    ReadBody(#[source] axum::Error),

    /// The body is not a reading
    #[error("couldn't unmarshal request body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The body decoded but is not acceptable
    #[error(transparent)]
    InvalidReading(#[from] InvalidReading),

    /// The request carried no usable credential
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// The header block is over the configured limit
    #[error("request headers exceed {limit} bytes")]
    HeadersTooLarge {
        /// The configured limit
        limit: usize,
    },

    /// The request did not finish within the configured deadline
    #[error("request timed out")]
    Timeout,

    /// The store refused or failed the write
    #[error("couldn't insert data into database: {0}")]
    Write(#[source] BoxError),

    /// The store refused or failed the window query
    #[error("couldn't query data from database: {0}")]
    Query(#[source] BoxError),

    /// A returned row does not have the expected shape
    #[error("couldn't read query result: {0}")]
    Schema(#[from] SchemaMismatch),

    /// The response could not be serialized
    #[error("couldn't marshal response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// The response status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::InvalidReading(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(err) => err.status(),
            Self::HeadersTooLarge { .. } => StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::ReadBody(_)
            | Self::Write(_)
            | Self::Query(_)
            | Self::Schema(_)
            | Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// The bare message of an [`ApiError`], carried on its response.
#[derive(Clone, Debug)]
pub(crate) struct ErrorReport(pub(crate) String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        let body = ErrorBody {
            error: error.clone(),
        };
        let mut response = (self.status(), Json(body)).into_response();
        response.extensions_mut().insert(ErrorReport(error));
        response
    }
}

/// Log `message` for a request and write it as the error envelope.
pub(crate) fn report(status: StatusCode, context: &str, message: &str) -> Response {
    let error = format!("{context}: {message}");
    if status.is_server_error() {
        event!(Level::ERROR, status = status.as_u16(), err = error);
    } else {
        event!(Level::WARN, status = status.as_u16(), err = error);
    }
    (status, Json(ErrorBody { error })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::HeaderError;
    use axum::{body::to_bytes, http::header::CONTENT_TYPE};
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::InvalidReading(InvalidReading::EmptyMeasurement), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Unauthorized(AuthError::Header(HeaderError::Missing)), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Unauthorized(AuthError::InvalidSecret), StatusCode::FORBIDDEN)]
    #[case(ApiError::HeadersTooLarge { limit: 8192 }, StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)]
    #[case(ApiError::Timeout, StatusCode::REQUEST_TIMEOUT)]
    #[case(ApiError::Write("connection refused".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(ApiError::Query("connection refused".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_status(#[case] err: ApiError, #[case] status: StatusCode) {
        assert_eq!(err.status(), status);
    }

    #[tokio::test]
    async fn writes_json_envelope() {
        let response = ApiError::Write("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );

        assert_eq!(
            response.extensions().get::<ErrorReport>().unwrap().0,
            "couldn't insert data into database: connection refused"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "error": "couldn't insert data into database: connection refused" })
        );
    }

    #[tokio::test]
    async fn report_prefixes_the_request() {
        let response = report(
            StatusCode::BAD_REQUEST,
            "POST /data",
            "couldn't unmarshal request body: EOF while parsing a value at line 1 column 0",
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["error"],
            "POST /data: couldn't unmarshal request body: EOF while parsing a value at line 1 column 0"
        );
    }
}
