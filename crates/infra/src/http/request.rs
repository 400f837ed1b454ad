//! Outbound request builder
//!
//! A [`Request`] describes one call against a fixed endpoint. It is built with
//! by-value mutators that can be applied in any order and is consumed by one of
//! the send methods.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use remotebuild_domain::{
    Authorization, ClientConfig, ContentType, Endpoint, ErrorCause, Method, RequestType,
    ResponseErr, Result,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Body;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{trace, warn};
use url::Url;

use super::client::HttpClient;
use super::response::{self, Decoded, RestResponse};

/// Body of a request
#[derive(Debug, Default)]
pub enum Payload {
    /// No payload. Sent as `null` for JSON requests.
    #[default]
    Empty,
    /// JSON document, for JSON requests.
    Json(serde_json::Value),
    /// Raw bytes, sent verbatim by raw requests.
    Bytes(Vec<u8>),
    /// Streamed raw body.
    Stream(Body),
    /// A value that failed to serialize; surfaced when the request is sent.
    Invalid(String),
}

impl Payload {
    /// Serialize `value` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::Json(value),
            Err(err) => Self::Invalid(err.to_string()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Json(_) => "json",
            Self::Bytes(_) => "bytes",
            Self::Stream(_) => "stream",
            Self::Invalid(_) => "invalid",
        }
    }

    /// Whether this payload belongs to a raw request.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Bytes(_) | Self::Stream(_))
    }

    fn into_body(self, request_type: RequestType) -> std::result::Result<Body, ErrorCause> {
        match (request_type, self) {
            (_, Self::Invalid(message)) => Err(ErrorCause::Encode(message)),
            (RequestType::Json, Self::Empty) => Ok(Body::from("null")),
            (RequestType::Json, Self::Json(value)) => serde_json::to_vec(&value)
                .map(Body::from)
                .map_err(|err| ErrorCause::Encode(err.to_string())),
            (RequestType::Raw, Self::Bytes(bytes)) => Ok(Body::from(bytes)),
            (RequestType::Raw, Self::Stream(body)) => Ok(body),
            (RequestType::Raw, Self::Empty) => Ok(Body::from(Vec::new())),
            (request_type, payload) => {
                warn!(
                    ?request_type,
                    payload = payload.kind(),
                    "payload does not match request type, sending empty body"
                );
                Ok(Body::from(Vec::new()))
            }
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Body> for Payload {
    fn from(body: Body) -> Self {
        Self::Stream(body)
    }
}

/// One outbound call, borrowed from the client that built it
#[derive(Debug)]
pub struct Request<'a> {
    http: &'a HttpClient,
    config: &'a ClientConfig,
    endpoint: Endpoint,
    payload: Payload,
    method: Method,
    request_type: RequestType,
    content_type: ContentType,
    authorization: Option<Authorization>,
    headers: HashMap<String, String>,
    close_body: bool,
    bench: Option<mpsc::Sender<DateTime<Utc>>>,
}

impl<'a> Request<'a> {
    pub(crate) fn new(
        http: &'a HttpClient,
        config: &'a ClientConfig,
        endpoint: Endpoint,
        payload: Payload,
    ) -> Self {
        Self {
            http,
            config,
            endpoint,
            payload,
            method: Method::default(),
            request_type: RequestType::default(),
            content_type: ContentType::default(),
            authorization: None,
            headers: HashMap::new(),
            close_body: true,
            bench: None,
        }
    }

    /// HTTP method, `POST` unless set.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// How the payload is encoded.
    pub fn with_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = request_type;
        self
    }

    /// Value of the `Content-Type` header.
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Send `authorization` in the `Authorization` header.
    pub fn with_auth(mut self, authorization: Authorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Bearer authorization from the client's session token.
    pub fn with_auth_from_config(self) -> Self {
        let authorization = self.config.bearer_auth();
        self.with_auth(authorization)
    }

    /// Add an extra header. Setting the same name twice keeps the last value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Keep the response body open and hand it to the caller.
    pub fn with_no_body_close(mut self) -> Self {
        self.close_body = false;
        self
    }

    /// Receive the instant the round trip completed.
    pub fn with_bench_channel(mut self, sender: mpsc::Sender<DateTime<Utc>>) -> Self {
        self.bench = Some(sender);
        self
    }

    /// Endpoint this request targets.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// HTTP method that will be used.
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn authorization(&self) -> Option<&Authorization> {
        self.authorization.as_ref()
    }

    /// Send the request and validate the status headers. The body is not
    /// parsed.
    pub async fn send(self) -> Result<RestResponse> {
        let (response, close_body) = self.execute().await?;
        response::decode(response, close_body)
    }

    /// Send the request and parse the body into `T` on success.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<Decoded<T>> {
        let (response, close_body) = self.execute().await?;
        response::decode_json(response, close_body).await
    }

    /// Send the request and return the parsed value, failing on an error
    /// status.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T> {
        self.send_json().await?.into_value()
    }

    /// Send the request and fail on an error status.
    pub async fn send_checked(self) -> Result<RestResponse> {
        self.send().await?.error_for_status()
    }

    async fn execute(self) -> Result<(reqwest::Response, bool)> {
        let url = join_url(&self.config.base_url, self.endpoint)?;
        let headers = self.header_map().map_err(ResponseErr::from_cause)?;
        let body = self.payload.into_body(self.request_type).map_err(ResponseErr::from_cause)?;

        let builder =
            self.http.request(to_reqwest_method(self.method), url).headers(headers).body(body);

        let result = self.http.send(builder).await;

        if let Some(bench) = &self.bench {
            if bench.try_send(Utc::now()).is_err() {
                trace!("timing channel full or closed, timestamp dropped");
            }
        }

        let response = result.map_err(ResponseErr::from_cause)?;
        Ok((response, self.close_body))
    }

    /// Content type, then extra headers, then authorization. Later entries
    /// replace earlier ones with the same name.
    fn header_map(&self) -> std::result::Result<HeaderMap, ErrorCause> {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, header_value(self.content_type.as_str())?);

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ErrorCause::Encode(format!("invalid header name: {name}")))?;
            map.insert(name, header_value(value)?);
        }

        if let Some(authorization) = &self.authorization {
            map.insert(AUTHORIZATION, header_value(&authorization.header_value())?);
        }

        Ok(map)
    }
}

fn header_value(value: &str) -> std::result::Result<HeaderValue, ErrorCause> {
    HeaderValue::from_str(value).map_err(|_| ErrorCause::Encode("invalid header value".into()))
}

/// Append the endpoint path to the base URL's path.
pub(crate) fn join_url(base: &str, endpoint: Endpoint) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|err| ResponseErr::from_cause(ErrorCause::InvalidUrl(format!("{base}: {err}"))))?;

    let path = format!("{}{}", url.path().trim_end_matches('/'), endpoint.path());
    url.set_path(&path);
    Ok(url)
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_keeps_base_path() {
        let url = join_url("https://build.example/api/", Endpoint::JobCreate).unwrap();
        assert_eq!(url.as_str(), "https://build.example/api/job/create");

        let url = join_url("http://localhost:9999", Endpoint::Jobs).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/jobs");
    }

    #[test]
    fn join_url_rejects_garbage() {
        let err = join_url("not a url", Endpoint::Ping).unwrap_err();
        assert!(matches!(err.cause, Some(ErrorCause::InvalidUrl(_))));
        assert!(err.response.is_none());
    }

    #[test]
    fn request_defaults() {
        let http = HttpClient::new().unwrap();
        let config = ClientConfig::default();

        let request = Request::new(&http, &config, Endpoint::Ping, Payload::Empty);

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.request_type, RequestType::Json);
        assert_eq!(request.content_type, ContentType::Json);
        assert!(request.close_body);
        assert!(request.authorization().is_none());
    }

    #[test]
    fn mutators_are_order_insensitive() {
        let http = HttpClient::new().unwrap();
        let config = ClientConfig::default().with_session("bob", "tok");

        let a = Request::new(&http, &config, Endpoint::Jobs, Payload::Empty)
            .with_method(Method::Get)
            .with_auth_from_config()
            .with_no_body_close();
        let b = Request::new(&http, &config, Endpoint::Jobs, Payload::Empty)
            .with_no_body_close()
            .with_auth_from_config()
            .with_method(Method::Get);

        assert_eq!(a.method(), b.method());
        assert_eq!(a.authorization(), b.authorization());
        assert_eq!(a.close_body, b.close_body);
    }

    #[test]
    fn later_headers_replace_earlier_ones() {
        let http = HttpClient::new().unwrap();
        let config = ClientConfig::default().with_session("bob", "tok");

        let request = Request::new(&http, &config, Endpoint::Jobs, Payload::Empty)
            .with_header("X-Trace", "first")
            .with_header("X-Trace", "second")
            .with_header("Content-Type", "text/plain")
            .with_auth_from_config();

        let map = request.header_map().unwrap();
        assert_eq!(map.get_all("x-trace").iter().count(), 1);
        assert_eq!(map["x-trace"], "second");
        assert_eq!(map[CONTENT_TYPE], "text/plain");
        assert_eq!(map[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn invalid_header_name_is_an_encode_error() {
        let http = HttpClient::new().unwrap();
        let config = ClientConfig::default();

        let request = Request::new(&http, &config, Endpoint::Jobs, Payload::Empty)
            .with_header("bad header", "v");

        assert!(matches!(request.header_map(), Err(ErrorCause::Encode(_))));
    }

    #[test]
    fn json_payload_encodes_null_when_empty() {
        assert!(Payload::Empty.into_body(RequestType::Json).is_ok());
        assert!(Payload::Bytes(vec![1, 2]).is_raw());
        assert!(!Payload::json(&serde_json::json!({"a": 1})).is_raw());
    }

    #[test]
    fn unserializable_payload_fails_on_send() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "value");

        let payload = Payload::json(&map);
        let err = payload.into_body(RequestType::Json).unwrap_err();
        assert!(matches!(err, ErrorCause::Encode(_)));
    }
}
