//! Error taxonomy for the remote search and run endpoints.

use thiserror::Error;

/// Failure modes of a remote operation issued by one of the controllers.
///
/// Cancellation is part of the taxonomy on purpose: a superseded operation
/// settles with [`ApiError::Cancelled`] and callers treat it as a rendering
/// no-op rather than a failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The operation's cancellation token fired before it settled.
    #[error("request cancelled")]
    Cancelled,

    /// Network-level failure (connect, send, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    ///
    /// `message` is already user-presentable: either the server-supplied
    /// error text or a generic message carrying the status code.
    #[error("{message}")]
    Endpoint {
        /// HTTP status code of the response.
        status: u16,
        /// User-presentable failure message.
        message: String,
    },

    /// The endpoint answered 2xx but the payload was not understandable.
    #[error("unexpected payload: {0}")]
    Malformed(String),

    /// An endpoint URL from the configuration could not be parsed.
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Whether this settlement stems from cancellation rather than failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_error_displays_its_message() {
        let err = ApiError::Endpoint {
            status: 500,
            message: String::from("model timeout"),
        };
        assert_eq!(err.to_string(), "model timeout");
        assert!(!err.is_cancelled());
    }

    #[test]
    fn cancelled_is_flagged() {
        assert!(ApiError::Cancelled.is_cancelled());
    }
}
