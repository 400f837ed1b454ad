//! Request/response protocol vocabulary
//!
//! Methods, endpoints, content types and the application status carried in
//! the `X-Response-Status` header.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ParseEnumError;

/// Application-level status reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResponseStatus {
    Error,
    Success,
}

crate::impl_wire_enum!(ResponseStatus {
    Error => ("Error", 0),
    Success => ("Success", 1),
});

impl ResponseStatus {
    /// Parse the raw `X-Response-Status` header value.
    ///
    /// Returns `None` for anything that is not an integer in `{0, 1}`.
    pub fn from_header(value: &str) -> Option<Self> {
        let code: i64 = value.trim().parse().ok()?;
        u8::try_from(code).ok().and_then(Self::from_code)
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl TryFrom<u8> for ResponseStatus {
    type Error = ParseEnumError;

    fn try_from(code: u8) -> Result<Self, ParseEnumError> {
        Self::from_code(code).ok_or_else(|| ParseEnumError::new("ResponseStatus", code.to_string()))
    }
}

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the request payload is put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestType {
    /// Payload serialized as JSON
    #[default]
    Json,
    /// Payload sent as-is (bytes or stream)
    Raw,
}

/// Value of the `Content-Type` request header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[default]
    Json,
    OctetStream,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed catalog of server endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Ping,
    Login,
    Register,
    JobCreate,
    Jobs,
    JobCancel,
    JobPause,
    JobResume,
    JobLogs,
    CcacheClear,
    CcacheStats,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Ping => "/ping",
            Self::Login => "/user/login",
            Self::Register => "/user/register",
            Self::JobCreate => "/job/create",
            Self::Jobs => "/jobs",
            Self::JobCancel => "/job/cancel",
            Self::JobPause => "/job/pause",
            Self::JobResume => "/job/resume",
            Self::JobLogs => "/job/logs",
            Self::CcacheClear => "/ccache/clear",
            Self::CcacheStats => "/ccache/stats",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Authorization scheme of the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    Bearer,
}

impl AuthScheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
        }
    }
}

/// Credentials attached to a request
#[derive(Clone, PartialEq, Eq)]
pub struct Authorization {
    pub scheme: AuthScheme,
    pub payload: String,
}

impl Authorization {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self { scheme: AuthScheme::Bearer, payload: token.into() }
    }

    /// Rendered header value, e.g. `Bearer <token>`.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme.as_str(), self.payload)
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("scheme", &self.scheme)
            .field("payload", &"<redacted>")
            .finish()
    }
}

/// Decoded status of a server response, without its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub http_code: u16,
    pub status: ResponseStatus,
    pub message: String,
    /// Response headers, names lower-cased
    pub headers: BTreeMap<String, String>,
}

impl ResponseMeta {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}
