use super::{AuthError, TokenValidator, bearer_token};
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

/// Accepts `Authorization: Bearer <secret>` for one configured secret.
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    /// Accept requests presenting `secret`.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl TokenValidator for SharedSecret {
    fn validate(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = bearer_token(headers)?;
        if bool::from(token.as_bytes().ct_eq(self.secret.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::InvalidSecret)
        }
    }
}
