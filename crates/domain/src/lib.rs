//! # RemoteBuild Domain
//!
//! Vocabulary and data model of the RemoteBuild client.
//!
//! This crate contains:
//! - Status vocabulary (`JobType`, `JobState`, `UploadType`, `ResponseStatus`)
//! - Wire DTOs and the server's job snapshot (`JobInfo`)
//! - Client configuration (`ClientConfig`)
//! - The unified error type (`ResponseErr`)
//!
//! ## Architecture
//! - No dependencies on other RemoteBuild crates
//! - No I/O crates; serde/chrono only

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
