//! Protocol constants
//!
//! Header names, argument-map keys and defaults shared by every crate in the
//! workspace.

// Response headers carrying the application status
pub const HEADER_STATUS: &str = "X-Response-Status";
pub const HEADER_STATUS_MESSAGE: &str = "X-Response-Message";

// DataManager upload keys (merged into the job argument map)
pub const DM_TOKEN_KEY: &str = "DM_Token";
pub const DM_USER_KEY: &str = "DM_USER";
pub const DM_HOST_KEY: &str = "DM_HOST";
pub const DM_NAMESPACE_KEY: &str = "DM_NAMESPACE";

// AUR job keys
pub const AUR_PACKAGE_KEY: &str = "REPO";

// Client defaults
pub const DEFAULT_SERVER_URL: &str = "http://localhost:9999";
pub const DEFAULT_AUR_NAMESPACE: &str = "AURbuild";
pub const PING_PAYLOAD: &str = "ping";
pub const SESSION_TOKEN_LENGTH: usize = 64;
