//! Port interface for the server-side compiler cache

use async_trait::async_trait;
use remotebuild_domain::{Result, StringResponse};

/// Compiler cache maintenance
#[async_trait]
pub trait CcacheStore: Send + Sync {
    /// Clear the cache, returning the server's status message
    async fn clear_ccache(&self) -> Result<String>;

    /// Cache statistics as rendered by the server
    async fn query_ccache(&self) -> Result<StringResponse>;
}
