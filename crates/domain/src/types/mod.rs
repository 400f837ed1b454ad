//! Domain types: protocol vocabulary, job model and wire DTOs

pub mod dto;
pub mod job;
pub mod protocol;

pub use dto::{
    AddJobRequest, AddJobResponse, CredentialsRequest, JobLogsRequest, JobRequest,
    ListJobsResponse, LoginResponse, PingRequest, StringResponse,
};
pub use job::{
    sort_jobs, DataManagerTarget, JobArgMap, JobArgs, JobInfo, JobState, JobSubmission, JobType,
    UploadDestination, UploadType,
};
pub use protocol::{
    AuthScheme, Authorization, ContentType, Endpoint, Method, RequestType, ResponseMeta,
    ResponseStatus,
};
