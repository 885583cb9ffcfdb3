//! Error types for the gurl client core.
//!
//! # Design
//! Every failure is fatal for a single-shot CLI, so the variants only say
//! *where* things went wrong: the invocation, the URL, the socket, the bytes
//! the peer sent back, or JSON body encoding. A peer closing the connection
//! right after a complete response is not an error and never shows up here;
//! see [`crate::transport::Exchange::ClosedAfter`].

use thiserror::Error;

/// Errors surfaced by request assembly, connection resolution and dispatch.
#[derive(Debug, Error)]
pub enum GurlError {
    /// Malformed invocation: bad method, bad request item, bad auth syntax,
    /// conflicting flags.
    #[error("{0}")]
    Usage(String),

    /// The URL could not be parsed or uses a scheme other than http.
    #[error("invalid URL {0}")]
    Url(String),

    /// Dial, write or read failure on the socket.
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// The peer sent something that is not a complete HTTP/1.1 response.
    #[error("invalid response: {0}")]
    Protocol(String),

    /// Body fields could not be serialized to JSON.
    #[error("JSON encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl GurlError {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        GurlError::Usage(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GurlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_message_is_printed_verbatim() {
        let err = GurlError::usage("invalid request item \"a\"");
        assert_eq!(err.to_string(), "invalid request item \"a\"");
    }

    #[test]
    fn io_errors_convert_to_network() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: GurlError = io.into();
        assert!(matches!(err, GurlError::Network(_)));
        assert!(err.to_string().starts_with("network error"));
    }
}
