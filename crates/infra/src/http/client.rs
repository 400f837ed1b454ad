use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use remotebuild_domain::TransportFailure;
use tracing::{debug, warn};

use crate::errors::IntoTransportFailure;

/// Thin wrapper over `reqwest::Client`.
///
/// Requests go out exactly once: no retries and no client-side timeout.
/// Callers bound long calls themselves (e.g. `tokio::time::timeout`).
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TransportFailure> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TransportFailure> {
        let request = builder.build().map_err(IntoTransportFailure::into_transport_failure)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(err.into_transport_failure())
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    user_agent: Option<String>,
    accept_invalid_certs: bool,
}

impl HttpClientBuilder {
    /// Set the `User-Agent` sent with every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Skip TLS certificate validation (self-signed build servers).
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// Build the client. Environment proxies are never used.
    pub fn build(self) -> Result<HttpClient, TransportFailure> {
        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if self.accept_invalid_certs {
            warn!("TLS certificate validation disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(IntoTransportFailure::into_transport_failure)?;

        Ok(HttpClient { client })
    }
}
