//! Short-lived HS256 tokens binding a device identity.
//!
//! A token carries the fixed issuer [`ISSUER`], the device identity as its
//! subject, and an expiry. Validation checks, in order, the signature, the
//! expiry, the issuer, and the subject.

use super::{AuthError, HeaderError, TokenValidator, bearer_token};
use axum::http::HeaderMap;
use jwt_simple::{
    JWTError,
    algorithms::{HS256Key, MACLike},
    claims::{Claims, NoCustomClaims},
    common::VerificationOptions,
    prelude::{Duration, UnixTimeStamp},
};
use thiserror::Error;
use time::OffsetDateTime;

/// The issuer every token is minted with and checked against.
pub const ISSUER: &str = "iot-backend";

/// Why a signed token was not accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The header did not carry a bearer token
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// Minting failed
    #[error("couldn't sign token: {0}")]
    Signing(String),

    /// Not a token, or not one signed with our key
    #[error("token verification failed: {0}")]
    Invalid(String),

    /// Past its expiry, or without one
    #[error("token has expired")]
    Expired,

    /// Minted by someone else
    #[error("token has an unexpected issuer")]
    Issuer,

    /// Minted for another device
    #[error("token has an unexpected subject")]
    Subject,
}

/// Mint a token for `subject`, valid for `lifetime` from now.
pub fn generate(
    subject: &str,
    key: &[u8],
    lifetime: std::time::Duration,
) -> Result<String, TokenError> {
    let millis = u64::try_from(lifetime.as_millis()).unwrap_or(u64::MAX);
    let claims = Claims::create(Duration::from_millis(millis))
        .with_issuer(ISSUER)
        .with_subject(subject);
    HS256Key::from_bytes(key)
        .authenticate(claims)
        .map_err(|err| TokenError::Signing(err.to_string()))
}

/// Check the bearer token in `headers` against `subject` and `key`, as of now.
pub fn validate(subject: &str, key: &[u8], headers: &HeaderMap) -> Result<(), TokenError> {
    validate_at(subject, key, headers, OffsetDateTime::now_utc())
}

/// Check the bearer token in `headers` as of `now`.
pub fn validate_at(
    subject: &str,
    key: &[u8],
    headers: &HeaderMap,
    now: OffsetDateTime,
) -> Result<(), TokenError> {
    let token = bearer_token(headers)?;
    let now = UnixTimeStamp::from_secs(u64::try_from(now.unix_timestamp()).unwrap_or(0));

    let options = VerificationOptions {
        artificial_time: Some(now),
        ..Default::default()
    };
    let claims = HS256Key::from_bytes(key)
        .verify_token::<NoCustomClaims>(token, Some(options))
        .map_err(|err| match err.downcast_ref::<JWTError>() {
            Some(JWTError::TokenHasExpired) => TokenError::Expired,
            _ => TokenError::Invalid(err.to_string()),
        })?;

    // the library allows some clock skew past expiry; we do not
    match claims.expires_at {
        Some(expires_at) if now < expires_at => {}
        _ => return Err(TokenError::Expired),
    }
    if claims.issuer.as_deref() != Some(ISSUER) {
        return Err(TokenError::Issuer);
    }
    if claims.subject.as_deref() != Some(subject) {
        return Err(TokenError::Subject);
    }
    Ok(())
}

/// A [`TokenValidator`] for tokens minted by [`generate`].
pub struct SignedTokenValidator {
    key: Vec<u8>,
    subject: String,
}

impl SignedTokenValidator {
    /// Accept tokens for `subject` signed with `key`.
    pub fn new(key: &[u8], subject: impl Into<String>) -> Self {
        Self {
            key: key.to_vec(),
            subject: subject.into(),
        }
    }
}

impl TokenValidator for SignedTokenValidator {
    fn validate(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        validate(&self.subject, &self.key, headers).map_err(AuthError::from)
    }
}
