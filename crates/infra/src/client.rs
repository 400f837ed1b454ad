//! RemoteBuild client
//!
//! Owns the connection settings and the HTTP transport. Every service call
//! builds its own [`Request`] borrowing both, so a shared client can serve
//! concurrent calls.

use remotebuild_domain::{ClientConfig, Endpoint, ResponseErr, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::http::{HttpClient, Payload, Request};

const USER_AGENT: &str = concat!("remotebuild-client/", env!("CARGO_PKG_VERSION"));

/// Client for a RemoteBuild server
#[derive(Debug, Clone)]
pub struct RemoteBuildClient {
    config: ClientConfig,
    http: HttpClient,
}

impl RemoteBuildClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `config` - Server URL, session and TLS settings
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built (e.g. the
    /// TLS backend failed to initialize).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .accept_invalid_certs(config.ignore_cert_errors)
            .build()
            .map_err(ResponseErr::from_cause)?;

        debug!(base_url = %config.base_url, "remotebuild client created");
        Ok(Self { config, http })
    }

    /// Create a client on top of a preconfigured transport.
    pub fn with_http_client(config: ClientConfig, http: HttpClient) -> Self {
        Self { config, http }
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request against `endpoint`.
    ///
    /// Defaults: POST, JSON request type and content type, body closed after
    /// decoding, no authorization.
    pub fn request(&self, endpoint: Endpoint, payload: impl Into<Payload>) -> Request<'_> {
        Request::new(&self.http, &self.config, endpoint, payload.into())
    }

    /// POST `payload` as JSON to `endpoint` and return the decoded value.
    #[instrument(skip(self, payload))]
    pub async fn call<T, P>(&self, endpoint: Endpoint, payload: &P, authorized: bool) -> Result<T>
    where
        T: DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        let mut request = self.request(endpoint, Payload::json(payload));
        if authorized {
            request = request.with_auth_from_config();
        }
        request.fetch().await
    }
}

#[cfg(test)]
mod tests {
    use remotebuild_domain::{ErrorCause, StringResponse};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn ok(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("X-Response-Status", "1")
            .insert_header("X-Response-Message", "ok")
            .set_body_json(body)
    }

    async fn client_for(server: &MockServer) -> RemoteBuildClient {
        let config = ClientConfig::new(server.uri()).with_session("bob", "tok");
        RemoteBuildClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn call_sends_json_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer tok"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"Payload": "ping"})))
            .respond_with(ok(json!({"content": "pong"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let reply: StringResponse =
            client.call(Endpoint::Ping, &json!({"Payload": "ping"}), true).await.unwrap();

        assert_eq!(reply.content, "pong");
    }

    #[tokio::test]
    async fn unauthorized_call_sends_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(ok(json!({"content": "pong"})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let _: StringResponse = client.call(Endpoint::Ping, &json!({}), false).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn error_status_is_classified_as_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Response-Status", "0")
                    .insert_header("X-Response-Message", "nope")
                    .set_body_string("{not json"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.call::<StringResponse, _>(Endpoint::Ping, &json!({}), false).await.unwrap_err();

        assert!(err.is_server_error());
        assert!(matches!(err.cause, Some(ErrorCause::ResponseError)));
        assert_eq!(err.to_string(), "HTTPCode: 200; Message: nope");
    }

    #[tokio::test]
    async fn base_url_path_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ping"))
            .respond_with(ok(json!({"content": "pong"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::new(format!("{}/api", server.uri()));
        let client = RemoteBuildClient::new(config).unwrap();
        let _: StringResponse = client.call(Endpoint::Ping, &json!({}), false).await.unwrap();
    }
}
