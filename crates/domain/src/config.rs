//! Client configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUR_NAMESPACE, DEFAULT_SERVER_URL, SESSION_TOKEN_LENGTH};
use crate::types::{Authorization, JobType};

/// Settings every request is built from
///
/// Owned by the client; requests only ever borrow it, so it cannot change
/// while a call is in flight.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub machine_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub session_token: String,
    /// Skip TLS certificate validation. Never enabled by default.
    #[serde(default)]
    pub ignore_cert_errors: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn with_session(mut self, username: impl Into<String>, token: impl Into<String>) -> Self {
        self.username = username.into();
        self.session_token = token.into();
        self
    }

    pub fn with_machine_id(mut self, machine_id: impl Into<String>) -> Self {
        self.machine_id = machine_id.into();
        self
    }

    /// Opt in to skipping certificate validation.
    pub fn with_ignore_cert_errors(mut self, ignore: bool) -> Self {
        self.ignore_cert_errors = ignore;
        self
    }

    /// Bearer authorization derived from the session token.
    pub fn bearer_auth(&self) -> Authorization {
        Authorization::bearer(self.session_token.clone())
    }

    pub fn has_session_token(&self) -> bool {
        !self.session_token.is_empty()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            machine_id: String::new(),
            username: String::new(),
            session_token: String::new(),
            ignore_cert_errors: false,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("machine_id", &self.machine_id)
            .field("username", &self.username)
            .field("session_token", &"<redacted>")
            .field("ignore_cert_errors", &self.ignore_cert_errors)
            .finish()
    }
}

/// On-disk client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub machine_id: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub data_manager: DataManagerConfig,
}

/// Build server connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub ignore_cert: bool,
}

/// Logged-in user
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub session_token: String,
}

/// DataManager upload settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataManagerConfig {
    /// Upload namespace per job type name (e.g. `buildAUR`)
    pub namespaces: BTreeMap<String, String>,
}

impl FileConfig {
    /// Namespace to upload artifacts of `job_type` into, if configured.
    pub fn namespace_for(&self, job_type: JobType) -> Option<&str> {
        self.data_manager.namespaces.get(job_type.as_str()).map(String::as_str)
    }

    pub fn is_logged_in(&self) -> bool {
        !self.user.username.is_empty() && is_token_valid(&self.user.session_token)
    }

    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.server.url.clone(),
            machine_id: self.machine_id.clone(),
            username: self.user.username.clone(),
            session_token: self.user.session_token.clone(),
            ignore_cert_errors: self.server.ignore_cert,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            machine_id: String::new(),
            server: ServerConfig::default(),
            user: UserConfig::default(),
            data_manager: DataManagerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { url: DEFAULT_SERVER_URL.to_string(), ignore_cert: false }
    }
}

impl Default for DataManagerConfig {
    fn default() -> Self {
        let mut namespaces = BTreeMap::new();
        namespaces.insert(JobType::Aur.as_str().to_string(), DEFAULT_AUR_NAMESPACE.to_string());
        Self { namespaces }
    }
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("session_token", &"<redacted>")
            .finish()
    }
}

/// Whether `token` has the shape of a session token issued by the server.
pub fn is_token_valid(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_never_skip_cert_validation() {
        let config = ClientConfig::default();
        assert!(!config.ignore_cert_errors);
        assert_eq!(config.base_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn bearer_auth_uses_session_token() {
        let config = ClientConfig::new("https://build.example").with_session("bob", "tok");
        assert_eq!(config.bearer_auth().header_value(), "Bearer tok");
        assert!(config.has_session_token());
    }

    #[test]
    fn debug_redacts_session_token() {
        let config = ClientConfig::new("https://build.example").with_session("bob", "s3cret");
        assert!(!format!("{config:?}").contains("s3cret"));
    }

    #[test]
    fn default_file_config_has_aur_namespace() {
        let config = FileConfig::default();
        assert_eq!(config.namespace_for(JobType::Aur), Some(DEFAULT_AUR_NAMESPACE));
        assert_eq!(config.namespace_for(JobType::NoBuild), None);
        assert!(!config.is_logged_in());
    }

    #[test]
    fn file_config_maps_to_client_config() {
        let mut file = FileConfig::default();
        file.server.url = "https://rb.example".into();
        file.server.ignore_cert = true;
        file.user.username = "bob".into();
        file.user.session_token = "x".repeat(64);
        file.machine_id = "mid".into();

        let client = file.to_client_config();
        assert_eq!(client.base_url, "https://rb.example");
        assert!(client.ignore_cert_errors);
        assert_eq!(client.machine_id, "mid");
        assert!(file.is_logged_in());
    }

    #[test]
    fn token_validity_is_length_based() {
        assert!(is_token_valid(&"a".repeat(64)));
        assert!(!is_token_valid("short"));
        assert!(!is_token_valid(""));
    }
}
