use std::sync::OnceLock;

use remotebuild_domain::ClientConfig;
use remotebuild_infra::RemoteBuildClient;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use wiremock::{MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test_token_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a test-writer tracing subscriber (idempotent).
///
/// Set `RUST_LOG=remotebuild_infra=trace` to see request flow.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Client pointed at `server` with a logged-in session.
pub fn client_for(server: &MockServer) -> RemoteBuildClient {
    init_tracing();
    let config = ClientConfig::new(server.uri())
        .with_session("bob", TEST_TOKEN)
        .with_machine_id("test-machine");
    RemoteBuildClient::new(config).expect("client should build")
}

/// Response carrying the given application status and message.
pub fn status_response(http_code: u16, status: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(http_code)
        .insert_header("X-Response-Status", status)
        .insert_header("X-Response-Message", message)
}

/// Successful response with a JSON body.
pub fn success_json(body: Value) -> ResponseTemplate {
    status_response(200, "1", "ok").set_body_json(body)
}

/// JSON job entry as the server encodes it.
pub fn job_json(id: u64, state: u8) -> Value {
    serde_json::json!({
        "id": id,
        "info": format!("yay #{id}"),
        "pos": id,
        "jobtype": 1,
        "uploadtype": 1,
        "state": state,
        "rs": "0001-01-01T00:00:00Z",
        "dr": 1_500_000_000_i64,
    })
}
