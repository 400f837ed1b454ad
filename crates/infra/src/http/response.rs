//! Status-header response decoder
//!
//! Every server response carries `X-Response-Status` and
//! `X-Response-Message`. The status header, not the HTTP code, decides whether
//! a call succeeded. A body is only parsed when the status is success and the
//! caller asked for a value.

use std::collections::BTreeMap;

use remotebuild_domain::constants::{HEADER_STATUS, HEADER_STATUS_MESSAGE};
use remotebuild_domain::{ErrorCause, ResponseErr, ResponseMeta, ResponseStatus, Result};
use reqwest::header::HeaderMap;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::errors::IntoTransportFailure;

/// A decoded response, optionally still holding the open body
#[derive(Debug)]
pub struct RestResponse {
    meta: ResponseMeta,
    body: Option<Response>,
}

impl RestResponse {
    /// Status headers.
    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    /// HTTP status code.
    pub fn http_code(&self) -> u16 {
        self.meta.http_code
    }

    /// Application status from `X-Response-Status`.
    pub fn status(&self) -> ResponseStatus {
        self.meta.status
    }

    /// Message from `X-Response-Message`.
    pub fn message(&self) -> &str {
        &self.meta.message
    }

    /// All response headers, names lower-cased.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.meta.headers
    }

    pub fn is_success(&self) -> bool {
        self.meta.is_success()
    }

    /// Whether the body was kept open for the caller.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Take the open body, if the request was sent with `with_no_body_close`.
    pub fn into_body(self) -> Option<Response> {
        self.body
    }

    pub fn into_meta(self) -> ResponseMeta {
        self.meta
    }

    pub(crate) fn into_parts(self) -> (ResponseMeta, Option<Response>) {
        (self.meta, self.body)
    }

    /// Turn an error status into a [`ResponseErr`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.meta.is_success() {
            Ok(self)
        } else {
            Err(ResponseErr::from_response(Some(self.meta), None))
        }
    }
}

/// A decoded response together with the parsed value
///
/// `value` is only ever `Some` when the status is success.
#[derive(Debug)]
pub struct Decoded<T> {
    pub response: RestResponse,
    pub value: Option<T>,
}

impl<T> Decoded<T> {
    /// The parsed value, or the server's error.
    pub fn into_value(self) -> Result<T> {
        let response = self.response.error_for_status()?;
        self.value.ok_or_else(|| {
            ResponseErr::from_response(
                Some(response.into_meta()),
                Some(ErrorCause::Decode("response carried no value".into())),
            )
        })
    }
}

/// Validate the status headers of a response.
///
/// A missing or malformed header yields a header error with no response
/// attached, whatever the HTTP code was.
pub fn read_status(http_code: u16, headers: &HeaderMap) -> Result<ResponseMeta> {
    let status = headers
        .get(HEADER_STATUS)
        .and_then(|value| value.to_str().ok())
        .and_then(ResponseStatus::from_header)
        .ok_or_else(header_error)?;

    let message = headers
        .get(HEADER_STATUS_MESSAGE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .ok_or_else(header_error)?;

    let headers = headers
        .iter()
        .map(|(name, value)| {
            (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned())
        })
        .collect();

    Ok(ResponseMeta { http_code, status, message, headers })
}

fn header_error() -> ResponseErr {
    ResponseErr::from_cause(ErrorCause::InvalidResponseHeaders)
}

/// Decode a response without parsing its body.
pub(crate) fn decode(response: Response, close_body: bool) -> Result<RestResponse> {
    let meta = read_status(response.status().as_u16(), response.headers())?;
    trace!(http_code = meta.http_code, status = %meta.status, "decoded response status");

    let body = if close_body { None } else { Some(response) };
    Ok(RestResponse { meta, body })
}

/// Decode a response and parse its JSON body into `T` on success.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    close_body: bool,
) -> Result<Decoded<T>> {
    let meta = read_status(response.status().as_u16(), response.headers())?;
    trace!(http_code = meta.http_code, status = %meta.status, "decoded response status");

    if !meta.is_success() {
        let body = if close_body { None } else { Some(response) };
        return Ok(Decoded { response: RestResponse { meta, body }, value: None });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|err| ResponseErr::from_cause(err.into_transport_failure()))?;

    let value = serde_json::from_slice(&bytes)
        .map_err(|err| ResponseErr::from_cause(ErrorCause::Decode(err.to_string())))?;

    Ok(Decoded { response: RestResponse { meta, body: None }, value: Some(value) })
}
