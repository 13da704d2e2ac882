//! Credential checks for the data routes.
//!
//! Every check reads the `Authorization` header and expects exactly two
//! whitespace-separated fields, the first being the case-sensitive word
//! `Bearer`. A missing or malformed header is the client's mistake and maps
//! to 400; a well-formed header carrying the wrong credential maps to 403.

use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use thiserror::Error;

mod shared_secret;
pub mod signed_token;

pub use shared_secret::SharedSecret;
pub use signed_token::{SignedTokenValidator, TokenError};

/// Something that can decide whether a request's headers carry a valid
/// credential.
///
/// Implementations are shared across requests behind an `Arc`.
pub trait TokenValidator: Send + Sync {
    /// Accept or reject the request.
    fn validate(&self, headers: &HeaderMap) -> Result<(), AuthError>;
}

/// The `Authorization` header could not be read as `Bearer <credential>`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// No header, or an empty one
    #[error("authorization header not present")]
    Missing,
    /// Anything other than `Bearer <credential>`
    #[error("invalid authorization header format")]
    Malformed,
}

/// Why a request was turned away.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The header itself is unusable
    #[error(transparent)]
    Header(HeaderError),
    /// The shared secret did not match
    #[error("bearer token provided is invalid")]
    InvalidSecret,
    /// The signed token was rejected
    #[error(transparent)]
    Token(TokenError),
}

impl AuthError {
    /// The response status for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Header(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSecret | Self::Token(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<HeaderError> for AuthError {
    fn from(err: HeaderError) -> Self {
        Self::Header(err)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Header(err) => Self::Header(err),
            other => Self::Token(other),
        }
    }
}

/// Extract the credential from `Authorization: Bearer <credential>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, HeaderError> {
    let value = headers.get(AUTHORIZATION).ok_or(HeaderError::Missing)?;
    let value = value.to_str().map_err(|_| HeaderError::Malformed)?;
    if value.is_empty() {
        return Err(HeaderError::Missing);
    }

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(HeaderError::Malformed),
    }
}
