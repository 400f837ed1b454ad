//! # RemoteBuild Core
//!
//! Port interfaces and job assembly - no transport dependencies.
//!
//! This crate contains:
//! - The job queue and compiler cache ports (traits)
//! - Per-job-type job builders producing typed submissions
//!
//! ## Architecture Principles
//! - Only depends on `remotebuild-domain`
//! - No HTTP or file-system code
//! - Transport implementations live in `remotebuild-infra`

pub mod ccache_ports;
pub mod jobs;

pub use ccache_ports::CcacheStore;
pub use jobs::{AurBuild, JobQueue};
