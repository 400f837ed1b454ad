//! # RemoteBuild Infrastructure
//!
//! reqwest-backed implementation of the RemoteBuild client.
//!
//! This crate contains:
//! - The HTTP transport, request builder and status-header decoder
//! - [`RemoteBuildClient`] with the job, ccache and user services
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements the ports defined in `remotebuild-core`
//! - Depends on `remotebuild-domain` for every public type
//! - Contains all I/O; `reqwest` types only surface where a caller asked for
//!   a raw body ([`RestResponse::into_body`]) or provides one ([`Payload::Stream`])

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod services;

// Re-export commonly used items
pub use client::RemoteBuildClient;
pub use http::{Decoded, HttpClient, HttpClientBuilder, Payload, Request, RestResponse};
pub use remotebuild_core::{AurBuild, CcacheStore, JobQueue};
pub use services::LogStream;
