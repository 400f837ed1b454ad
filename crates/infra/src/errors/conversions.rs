//! Conversions from external infrastructure errors into domain errors.
//!
//! `reqwest::Error` never crosses the crate boundary; it is classified into a
//! [`TransportFailure`] here.

use std::error::Error as StdError;

use remotebuild_domain::{TransportFailure, TransportFailureKind};
use reqwest::Error as HttpError;

/// Classify an external error into a [`TransportFailure`].
pub trait IntoTransportFailure {
    fn into_transport_failure(self) -> TransportFailure;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportFailure */
/* -------------------------------------------------------------------------- */

impl IntoTransportFailure for HttpError {
    fn into_transport_failure(self) -> TransportFailure {
        let kind = if self.is_timeout() {
            TransportFailureKind::Timeout
        } else if self.is_connect() {
            TransportFailureKind::Connect
        } else if self.is_redirect() {
            TransportFailureKind::Redirect
        } else if self.is_body() || self.is_decode() {
            TransportFailureKind::Body
        } else if self.is_builder() || self.is_request() {
            TransportFailureKind::Request
        } else {
            TransportFailureKind::Other
        };

        TransportFailure::new(kind, error_chain(&self))
    }
}

/// Render an error together with its sources, e.g. `a: b: c`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
