//! HTTP plumbing: transport client, request builder and response decoder

pub mod client;
pub mod request;
pub mod response;

pub use client::{HttpClient, HttpClientBuilder};
pub use request::{Payload, Request};
pub use response::{Decoded, RestResponse};
