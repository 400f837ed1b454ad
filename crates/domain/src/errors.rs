//! Error types returned by every RemoteBuild operation
//!
//! All service calls fail with exactly one type, [`ResponseErr`]. It pairs the
//! decoded response (when the server answered with valid status headers) with
//! the [`ErrorCause`] that made the call fail. Transport errors are classified
//! into [`TransportFailure`] so the HTTP library never leaks through the API.

use std::fmt;

use thiserror::Error;

use crate::types::{JobState, ResponseMeta, ResponseStatus};

/// Classification of a failure that happened before any response was read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFailureKind {
    /// The connection or request timed out
    Timeout,
    /// DNS resolution, connection refused, TLS handshake
    Connect,
    /// The request could not be built or sent
    Request,
    /// Reading the response body failed
    Body,
    /// Too many redirects or a redirect loop
    Redirect,
    /// Anything the transport could not classify
    Other,
}

impl TransportFailureKind {
    /// Stable label suitable for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Redirect => "redirect",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified transport failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure ({kind}): {message}")]
pub struct TransportFailure {
    pub kind: TransportFailureKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// Underlying reason a call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorCause {
    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    /// Status headers missing or malformed
    #[error("invalid response headers")]
    InvalidResponseHeaders,

    /// The server reported an application-level failure
    #[error("response returned an error")]
    ResponseError,

    /// Rejected locally before any request was issued
    #[error("invalid job state: {0}")]
    InvalidJobState(JobState),

    /// Success status but the body was not the expected JSON
    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("failed to encode request payload: {0}")]
    Encode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// The single error type returned by RemoteBuild operations
///
/// `response` is present whenever the server answered with valid status
/// headers; `cause` describes what went wrong. Both may be absent only for
/// a synthesized "unexpected error".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseErr {
    pub response: Option<ResponseMeta>,
    pub cause: Option<ErrorCause>,
}

impl ResponseErr {
    /// Build an error from an optional decoded response and optional cause.
    ///
    /// A response that reports [`ResponseStatus::Error`] without an explicit
    /// cause gets [`ErrorCause::ResponseError`].
    pub fn from_response(response: Option<ResponseMeta>, cause: Option<ErrorCause>) -> Self {
        let cause = match (&response, cause) {
            (Some(meta), None) if meta.status == ResponseStatus::Error => {
                Some(ErrorCause::ResponseError)
            }
            (_, cause) => cause,
        };

        Self { response, cause }
    }

    /// Error with no response attached.
    pub fn from_cause(cause: impl Into<ErrorCause>) -> Self {
        Self { response: None, cause: Some(cause.into()) }
    }

    pub fn http_code(&self) -> Option<u16> {
        self.response.as_ref().map(|meta| meta.http_code)
    }

    /// Server-supplied status message, if a response was decoded.
    pub fn message(&self) -> Option<&str> {
        self.response.as_ref().map(|meta| meta.message.as_str())
    }

    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    pub fn is_header_error(&self) -> bool {
        matches!(self.cause, Some(ErrorCause::InvalidResponseHeaders))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self.cause, Some(ErrorCause::Transport(_)))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.cause, Some(ErrorCause::ResponseError))
    }
}

impl fmt::Display for ResponseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.response, &self.cause) {
            (Some(meta), _) => write!(f, "HTTPCode: {}; Message: {}", meta.http_code, meta.message),
            (None, Some(cause)) => write!(f, "{cause}"),
            (None, None) => f.write_str("unexpected error"),
        }
    }
}

impl std::error::Error for ResponseErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl From<ErrorCause> for ResponseErr {
    fn from(cause: ErrorCause) -> Self {
        Self::from_cause(cause)
    }
}

impl From<TransportFailure> for ResponseErr {
    fn from(failure: TransportFailure) -> Self {
        Self::from_cause(failure)
    }
}

/// Strict parse failure for a wire enum name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}

/// Result type alias for RemoteBuild operations
pub type Result<T> = std::result::Result<T, ResponseErr>;
