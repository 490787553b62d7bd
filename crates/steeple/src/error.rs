//! Error types for the steeple library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, platform response, input validation, and
//! configuration errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for steeple operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
///
/// Logical absence is never an error: a list query with no matches returns
/// an empty `Vec`, and a single-record lookup returns `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (client-credentials exchange rejected).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx responses from the platform.
    #[error("platform error: {0}")]
    Http(#[from] HttpError),

    /// Input validation errors (invalid base URL, table name, record shape).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Configuration errors (missing environment variables).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP transport error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
///
/// A failed token exchange is fatal to the operation in progress; the
/// library never retries it.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The OAuth2 client-credentials exchange was rejected.
    #[error("token exchange rejected (HTTP {status}){}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    ExchangeRejected {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// Best-effort response body from the token endpoint.
        detail: Option<String>,
    },
}

/// A non-2xx response from the platform.
///
/// Carries the status code, the canonical reason phrase, and the response
/// body text when it could be read. Reading the body is best-effort: if it
/// fails, the status-based message surfaces alone.
#[derive(Debug)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status, if known.
    pub reason: Option<String>,
    /// Response body text, if it could be read.
    pub body: Option<String>,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref reason) = self.reason {
            write!(f, " {}", reason)?;
        }
        if let Some(ref body) = self.body {
            write!(f, ": {}", body)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Create a new platform error.
    pub fn new(status: u16, reason: Option<String>, body: Option<String>) -> Self {
        Self {
            status,
            reason,
            body,
        }
    }

    /// Check if this is an authentication/authorization failure.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL format.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Invalid table name.
    #[error("invalid table name '{value}': {reason}")]
    Table { value: String, reason: String },

    /// Invalid stored-procedure name.
    #[error("invalid procedure name '{value}': {reason}")]
    Procedure { value: String, reason: String },

    /// Invalid record shape.
    #[error("invalid record: {reason}")]
    Record { reason: String },

    /// Invalid file content type.
    #[error("invalid content type '{value}'")]
    ContentType { value: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are missing.
    #[error("missing required environment variables: {}", names.join(", "))]
    MissingEnv { names: Vec<String> },
}
