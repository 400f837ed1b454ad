//! Port interface for the remote job queue

use async_trait::async_trait;
use remotebuild_domain::{
    AddJobResponse, JobArgMap, JobInfo, JobState, JobSubmission, JobType, Result, UploadType,
};

/// Job lifecycle operations offered by the build server
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Create a job from its flat wire arguments
    async fn add_job(
        &self,
        job_type: JobType,
        upload_type: UploadType,
        args: JobArgMap,
        disable_ccache: bool,
    ) -> Result<AddJobResponse>;

    /// Create a job from a typed submission
    async fn submit(&self, submission: &JobSubmission) -> Result<AddJobResponse> {
        self.add_job(
            submission.job_type(),
            submission.upload_type(),
            submission.flat_args(),
            submission.disable_ccache,
        )
        .await
    }

    /// All jobs visible to the session, ascending by id
    async fn list_jobs(&self) -> Result<Vec<JobInfo>>;

    /// Ask the server to cancel a job
    async fn cancel_job(&self, job_id: u64) -> Result<()>;

    /// Pause or resume a job; other target states are rejected locally
    async fn set_job_state(&self, job_id: u64, state: JobState) -> Result<()>;
}
