//! Service operations on [`RemoteBuildClient`](crate::RemoteBuildClient)
//!
//! Jobs and ccache implement the ports from `remotebuild-core`; user
//! operations are inherent methods.

pub mod ccache;
pub mod jobs;
pub mod user;

pub use jobs::LogStream;
