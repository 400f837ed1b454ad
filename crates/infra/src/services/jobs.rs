//! Job queue operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use remotebuild_core::JobQueue;
use remotebuild_domain::{
    sort_jobs, AddJobRequest, AddJobResponse, Endpoint, ErrorCause, JobArgMap, JobInfo,
    JobLogsRequest, JobRequest, JobState, JobType, ListJobsResponse, Method, ResponseErr,
    ResponseMeta, Result, UploadType,
};
use tracing::{debug, instrument};

use crate::client::RemoteBuildClient;
use crate::errors::IntoTransportFailure;
use crate::http::Payload;

#[async_trait]
impl JobQueue for RemoteBuildClient {
    #[instrument(skip(self, args), fields(arg_count = args.len()))]
    async fn add_job(
        &self,
        job_type: JobType,
        upload_type: UploadType,
        args: JobArgMap,
        disable_ccache: bool,
    ) -> Result<AddJobResponse> {
        let body = AddJobRequest { job_type, args, upload_type, disable_ccache };

        let created: AddJobResponse = self
            .request(Endpoint::JobCreate, Payload::json(&body))
            .with_method(Method::Put)
            .with_auth_from_config()
            .fetch()
            .await?;

        debug!(job_id = created.id, position = created.position, "job created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_jobs(&self) -> Result<Vec<JobInfo>> {
        let response: ListJobsResponse = self
            .request(Endpoint::Jobs, Payload::Empty)
            .with_method(Method::Get)
            .with_auth_from_config()
            .fetch()
            .await?;

        let mut jobs = response.jobs;
        sort_jobs(&mut jobs);
        Ok(jobs)
    }

    #[instrument(skip(self))]
    async fn cancel_job(&self, job_id: u64) -> Result<()> {
        self.request(Endpoint::JobCancel, Payload::json(&JobRequest { job_id }))
            .with_auth_from_config()
            .send_checked()
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_job_state(&self, job_id: u64, state: JobState) -> Result<()> {
        if !state.is_settable() {
            return Err(ResponseErr::from_cause(ErrorCause::InvalidJobState(state)));
        }
        let endpoint =
            if state == JobState::Paused { Endpoint::JobPause } else { Endpoint::JobResume };

        self.request(endpoint, Payload::json(&JobRequest { job_id }))
            .with_method(Method::Put)
            .with_auth_from_config()
            .send_checked()
            .await?;
        Ok(())
    }
}

impl RemoteBuildClient {
    /// Stream the log output of a job written after `since`.
    #[instrument(skip(self))]
    pub async fn job_logs(&self, job_id: u64, since: DateTime<Utc>) -> Result<LogStream> {
        let response = self
            .request(Endpoint::JobLogs, Payload::json(&JobLogsRequest { job_id, since }))
            .with_method(Method::Get)
            .with_auth_from_config()
            .with_no_body_close()
            .send_checked()
            .await?;

        let (meta, body) = response.into_parts();
        let body = body.ok_or_else(|| {
            ResponseErr::from_response(
                Some(meta.clone()),
                Some(ErrorCause::Decode("log response has no body".into())),
            )
        })?;

        Ok(LogStream { meta, body })
    }
}

/// Open log body of a job
///
/// Dropping the stream closes the connection.
#[derive(Debug)]
pub struct LogStream {
    meta: ResponseMeta,
    body: reqwest::Response,
}

impl LogStream {
    /// Status headers of the log response.
    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    /// Next chunk of log output, `None` once the server closed the stream.
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let chunk = self
            .body
            .chunk()
            .await
            .map_err(|err| ResponseErr::from_cause(err.into_transport_failure()))?;
        Ok(chunk.map(|bytes| bytes.to_vec()))
    }

    /// Read the remaining log output.
    pub async fn read_to_end(self) -> Result<Vec<u8>> {
        let bytes = self
            .body
            .bytes()
            .await
            .map_err(|err| ResponseErr::from_cause(err.into_transport_failure()))?;
        Ok(bytes.to_vec())
    }
}
