//! Error types for alert intake and dispatch

use thiserror::Error;

/// Errors that end an alert request before (or instead of) a dispatch.
///
/// None of these are retried. `ResponderNotFound`, `InvalidRequest` and
/// `Config` are raised before any provider call is made.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No responder found for patient {0}")]
    ResponderNotFound(String),

    #[error("Invalid alert request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Voice markup error: {0}")]
    Markup(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single outbound channel operation (SMS or voice call).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    /// The request never got a response: DNS, TLS, connect, timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("Provider rejected request (HTTP {status}): {message}")]
    Rejected {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// The provider answered with success but the body was not understood.
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}
