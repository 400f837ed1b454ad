//! Session operations: ping, login and registration

use remotebuild_domain::constants::PING_PAYLOAD;
use remotebuild_domain::{
    CredentialsRequest, Endpoint, LoginResponse, PingRequest, ResponseMeta, Result,
    StringResponse,
};
use tracing::{debug, instrument};

use crate::client::RemoteBuildClient;
use crate::http::Payload;

impl RemoteBuildClient {
    /// Check that the server is reachable. Authorized when a session token is
    /// configured.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<StringResponse> {
        let body = PingRequest { payload: PING_PAYLOAD.to_string() };
        let mut request = self.request(Endpoint::Ping, Payload::json(&body));
        if self.config().has_session_token() {
            request = request.with_auth_from_config();
        }
        request.fetch().await
    }

    /// Log in and obtain a session token for this machine.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = CredentialsRequest {
            machine_id: self.config().machine_id.clone(),
            username: username.to_lowercase(),
            password: password.to_string(),
        };

        let response: LoginResponse =
            self.request(Endpoint::Login, Payload::json(&body)).fetch().await?;

        debug!("login succeeded");
        Ok(response)
    }

    /// Create a new account.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<ResponseMeta> {
        let body = CredentialsRequest {
            machine_id: String::new(),
            username: username.to_lowercase(),
            password: password.to_string(),
        };

        let response = self.request(Endpoint::Register, Payload::json(&body)).send_checked().await?;
        Ok(response.into_meta())
    }
}
