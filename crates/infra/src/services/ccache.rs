//! Compiler cache operations

use async_trait::async_trait;
use remotebuild_core::CcacheStore;
use remotebuild_domain::{Endpoint, Method, Result, StringResponse};
use tracing::instrument;

use crate::client::RemoteBuildClient;
use crate::http::Payload;

#[async_trait]
impl CcacheStore for RemoteBuildClient {
    #[instrument(skip(self))]
    async fn clear_ccache(&self) -> Result<String> {
        let response = self
            .request(Endpoint::CcacheClear, Payload::Empty)
            .with_auth_from_config()
            .send_checked()
            .await?;
        Ok(response.message().to_string())
    }

    #[instrument(skip(self))]
    async fn query_ccache(&self) -> Result<StringResponse> {
        self.request(Endpoint::CcacheStats, Payload::Empty)
            .with_method(Method::Get)
            .with_auth_from_config()
            .fetch()
            .await
    }
}

#[cfg(test)]
mod tests {
    use remotebuild_domain::ClientConfig;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> RemoteBuildClient {
        RemoteBuildClient::new(ClientConfig::new(server.uri()).with_session("bob", "tok")).unwrap()
    }

    #[tokio::test]
    async fn clear_returns_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ccache/clear"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Response-Status", "1")
                    .insert_header("X-Response-Message", "ccache cleared"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let message = client_for(&server).clear_ccache().await.unwrap();
        assert_eq!(message, "ccache cleared");
    }

    #[tokio::test]
    async fn query_decodes_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ccache/stats"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Response-Status", "1")
                    .insert_header("X-Response-Message", "")
                    .set_body_json(json!({"content": "cache hit rate 42 %"})),
            )
            .mount(&server)
            .await;

        let stats = client_for(&server).query_ccache().await.unwrap();
        assert_eq!(stats.content, "cache hit rate 42 %");
    }

    #[tokio::test]
    async fn query_without_status_headers_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ccache/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "x"})))
            .mount(&server)
            .await;

        let err = client_for(&server).query_ccache().await.unwrap_err();
        assert!(err.is_header_error());
        assert!(err.response.is_none());
    }
}
