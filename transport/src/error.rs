//! Transport construction errors and failure classification helpers.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;
use unihttp_core::TransportError;

/// Errors raised while constructing a transport.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid proxy {proxy}: {message}")]
    InvalidProxy { proxy: String, message: String },

    #[error("failed to build client: {0}")]
    Client(String),
}

/// First `io::ErrorKind` found along `err`'s source chain.
pub(crate) fn io_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            return Some(io.kind());
        }
        current = e.source();
    }
    None
}

/// Map a backend error to the shared taxonomy using its source chain.
#[cfg_attr(not(feature = "reqwest"), allow(dead_code))]
pub(crate) fn classify(err: &(dyn StdError + 'static)) -> TransportError {
    let message = err.to_string();
    match io_kind(err) {
        Some(io::ErrorKind::TimedOut) | Some(io::ErrorKind::WouldBlock) => {
            TransportError::ConnectTimeout(message)
        }
        Some(io::ErrorKind::ConnectionRefused) => TransportError::ConnectionRefused(message),
        _ => TransportError::Io(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("wrapped")]
    struct Wrapped(#[source] io::Error);

    #[test]
    fn classify_walks_sources() {
        let err = Wrapped(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(matches!(classify(&err), TransportError::ConnectionRefused(_)));

        let err = Wrapped(io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(classify(&err), TransportError::ConnectTimeout(_)));

        let err = Wrapped(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(classify(&err), TransportError::Io(_)));
    }
}
