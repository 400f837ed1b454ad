//! Job lifecycle: queue port and per-job-type job builders
//!
//! A job type is added by declaring a new `JobType`/`JobArgs` variant in the
//! domain crate and a builder here that fills the submission and delegates to
//! [`JobQueue::submit`].

pub mod aur;
pub mod ports;

pub use aur::AurBuild;
pub use ports::JobQueue;
