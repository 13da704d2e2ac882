//! Configuration types for the Axum HTTP server.
//!
//! This module provides configuration options for the REST API server,
//! including network binding, request limits and the choice of credential
//! check guarding `/data`.

use crate::auth::{SharedSecret, SignedTokenValidator, TokenValidator};
use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr, sync::Arc, time::Duration};
use thiserror::Error;

/// Configuration for the Axum HTTP server.
///
/// # Examples
///
/// ```
/// use iot_axum::config::AxumConfig;
/// use std::time::Duration;
///
/// // Use default configuration
/// let config = AxumConfig::default();
///
/// // Custom configuration
/// let config = AxumConfig {
///     bind_address: "127.0.0.1:3000".parse().unwrap(),
///     request_timeout: Duration::from_secs(2),
///     max_header_bytes: 4096,
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AxumConfig {
    /// The address to bind the server to
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Deadline for handling a single request, store call included
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Largest accepted header block (names plus values)
    #[serde(default = "default_max_header_bytes")]
    pub max_header_bytes: usize,
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_max_header_bytes() -> usize {
    8192
}

impl Default for AxumConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            request_timeout: default_request_timeout(),
            max_header_bytes: default_max_header_bytes(),
        }
    }
}

/// Which credential check guards the data routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// No check at all
    Disabled,
    /// `Authorization: Bearer <secret>` compared against a shared secret
    #[default]
    SharedSecret,
    /// `Authorization: Bearer <jwt>` signed with the secret as HS256 key
    SignedToken,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "disabled",
            Self::SharedSecret => "shared_secret",
            Self::SignedToken => "signed_token",
        })
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// The credential check to run
    #[serde(default)]
    pub mode: AuthMode,

    /// The shared secret, or the HMAC key for signed tokens
    #[serde(default)]
    pub secret: String,

    /// The subject signed tokens must carry
    #[serde(default)]
    pub subject: String,
}

/// A configuration that cannot produce a validator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthConfigError {
    /// The selected mode needs a secret
    #[error("auth.secret must be set when auth.mode is {0}")]
    MissingSecret(AuthMode),

    /// Signed tokens need an expected subject
    #[error("auth.subject must be set when auth.mode is {0}")]
    MissingSubject(AuthMode),
}

impl AuthConfig {
    /// Build the validator for the configured mode, `None` when disabled.
    pub fn validator(&self) -> Result<Option<Arc<dyn TokenValidator>>, AuthConfigError> {
        if self.mode != AuthMode::Disabled && self.secret.is_empty() {
            return Err(AuthConfigError::MissingSecret(self.mode));
        }
        Ok(match self.mode {
            AuthMode::Disabled => None,
            AuthMode::SharedSecret => Some(Arc::new(SharedSecret::new(self.secret.clone()))),
            AuthMode::SignedToken => {
                if self.subject.is_empty() {
                    return Err(AuthConfigError::MissingSubject(self.mode));
                }
                Some(Arc::new(SignedTokenValidator::new(
                    self.secret.as_bytes(),
                    self.subject.clone(),
                )))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let config = AxumConfig::default();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_header_bytes, 8192);
    }

    #[test]
    fn enabled_modes_need_a_secret() {
        for mode in [AuthMode::SharedSecret, AuthMode::SignedToken] {
            let config = AuthConfig {
                mode,
                ..Default::default()
            };
            assert_eq!(
                config.validator().err(),
                Some(AuthConfigError::MissingSecret(mode))
            );
        }
    }

    #[test]
    fn signed_tokens_need_a_subject() {
        let config = AuthConfig {
            mode: AuthMode::SignedToken,
            secret: "key".to_string(),
            subject: String::new(),
        };
        assert_eq!(
            config.validator().err(),
            Some(AuthConfigError::MissingSubject(AuthMode::SignedToken))
        );
    }

    #[test]
    fn disabled_builds_no_validator() {
        let config = AuthConfig {
            mode: AuthMode::Disabled,
            ..Default::default()
        };
        assert!(config.validator().unwrap().is_none());
    }

    #[test]
    fn mode_names_are_snake_case() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"mode":"signed_token","secret":"k","subject":"s"}"#)
                .unwrap();
        assert_eq!(config.mode, AuthMode::SignedToken);
        assert!(config.validator().unwrap().is_some());
    }
}
