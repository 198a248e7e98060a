//! Error types for the request core.
//!
//! # Design
//! Every backend maps its native failure into [`TransportError`] so the
//! normalizer can treat all libraries the same way. Callers of
//! `Transport::execute` never see these: they only get a result string or
//! nothing. [`Error`] is reserved for the typed conversion helpers.

use thiserror::Error;

pub const REASON_TIMEOUT: &str = "Connection timed out: connect";
pub const REASON_REFUSED: &str = "Connection refused: connect";

/// Backend-agnostic failure of one HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection (or the call) timed out before a response arrived.
    #[error("connection timed out: {0}")]
    ConnectTimeout(String),

    /// The remote host refused the connection.
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// Any other failure, including I/O errors mid-transfer.
    #[error("I/O error: {0}")]
    Io(String),

    /// The response carried no entity.
    #[error("response has no body")]
    MissingBody,
}

impl TransportError {
    /// Canonical reason message understood by the normalizer.
    pub fn reason(&self) -> String {
        match self {
            TransportError::ConnectTimeout(_) => REASON_TIMEOUT.to_string(),
            TransportError::ConnectionRefused(_) => REASON_REFUSED.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => TransportError::ConnectTimeout(err.to_string()),
            std::io::ErrorKind::ConnectionRefused => {
                TransportError::ConnectionRefused(err.to_string())
            }
            _ => TransportError::Io(err.to_string()),
        }
    }
}

/// Errors from converting a result into a typed value.
#[derive(Debug, Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
