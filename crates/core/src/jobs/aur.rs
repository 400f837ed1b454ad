//! AUR package build assembler

use remotebuild_domain::{
    AddJobResponse, DataManagerTarget, JobArgMap, JobArgs, JobSubmission, Result,
    UploadDestination, UploadType,
};
use tracing::debug;

use super::ports::JobQueue;

/// Fluent builder for an AUR package build
///
/// ```no_run
/// # use remotebuild_core::{AurBuild, JobQueue};
/// # async fn example(queue: &impl JobQueue) -> remotebuild_domain::Result<()> {
/// let created = AurBuild::new(queue, "yay")
///     .without_ccache()
///     .with_data_manager("bob", "token", "dm.example.org")
///     .create_job()
///     .await?;
/// println!("job {} queued at {}", created.id, created.position);
/// # Ok(())
/// # }
/// ```
pub struct AurBuild<'a, Q: JobQueue + ?Sized> {
    queue: &'a Q,
    submission: JobSubmission,
}

impl<'a, Q: JobQueue + ?Sized> AurBuild<'a, Q> {
    /// Start a build of the named AUR package.
    pub fn new(queue: &'a Q, package: impl Into<String>) -> Self {
        Self { queue, submission: JobSubmission::new(JobArgs::aur(package)) }
    }

    /// Build without the server's compiler cache.
    pub fn without_ccache(mut self) -> Self {
        self.submission.disable_ccache = true;
        self
    }

    /// Upload the built package to a DataManager instance.
    pub fn with_data_manager(
        mut self,
        username: impl Into<String>,
        token: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        self.submission.upload = UploadDestination::DataManager(DataManagerTarget {
            user: username.into(),
            token: token.into(),
            host: host.into(),
            namespace: None,
        });
        self
    }

    /// DataManager namespace for the upload. No effect for other destinations.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        if let UploadDestination::DataManager(target) = &mut self.submission.upload {
            target.namespace = Some(namespace.into());
        }
        self
    }

    /// Keep the built package in the server's local storage.
    pub fn with_local_storage(mut self) -> Self {
        self.submission.upload = UploadDestination::LocalStorage;
        self
    }

    /// Flat argument map that will be sent.
    pub fn args(&self) -> JobArgMap {
        self.submission.flat_args()
    }

    /// Destination chosen so far.
    pub fn upload_type(&self) -> UploadType {
        self.submission.upload_type()
    }

    /// Submit the build to the queue.
    pub async fn create_job(self) -> Result<AddJobResponse> {
        debug!(
            job_type = %self.submission.job_type(),
            upload_type = %self.submission.upload_type(),
            disable_ccache = self.submission.disable_ccache,
            "submitting AUR build"
        );
        self.queue.submit(&self.submission).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use remotebuild_domain::{ErrorCause, JobInfo, JobState, JobType, ResponseErr};

    use super::*;

    type AddJobCall = (JobType, UploadType, JobArgMap, bool);

    #[derive(Default)]
    struct RecordingQueue {
        calls: Mutex<Vec<AddJobCall>>,
    }

    #[async_trait]
    impl JobQueue for RecordingQueue {
        async fn add_job(
            &self,
            job_type: JobType,
            upload_type: UploadType,
            args: JobArgMap,
            disable_ccache: bool,
        ) -> Result<AddJobResponse> {
            self.calls.lock().unwrap().push((job_type, upload_type, args, disable_ccache));
            Ok(AddJobResponse { id: 42, position: 3 })
        }

        async fn list_jobs(&self) -> Result<Vec<JobInfo>> {
            Ok(Vec::new())
        }

        async fn cancel_job(&self, _job_id: u64) -> Result<()> {
            Ok(())
        }

        async fn set_job_state(&self, _job_id: u64, state: JobState) -> Result<()> {
            Err(ResponseErr::from_cause(ErrorCause::InvalidJobState(state)))
        }
    }

    fn map(pairs: &[(&str, &str)]) -> JobArgMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn data_manager_build_submits_flat_args() {
        let queue = RecordingQueue::default();

        let created = AurBuild::new(&queue, "yay")
            .without_ccache()
            .with_data_manager("bob", "t123", "h")
            .create_job()
            .await
            .unwrap();

        assert_eq!(created, AddJobResponse { id: 42, position: 3 });

        let calls = queue.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (job_type, upload_type, args, disable_ccache) = &calls[0];
        assert_eq!(*job_type, JobType::Aur);
        assert_eq!(*upload_type, UploadType::DataManager);
        assert!(*disable_ccache);
        assert_eq!(
            *args,
            map(&[("REPO", "yay"), ("DM_USER", "bob"), ("DM_Token", "t123"), ("DM_HOST", "h")])
        );
    }

    #[tokio::test]
    async fn plain_build_keeps_ccache_and_no_upload() {
        let queue = RecordingQueue::default();

        AurBuild::new(&queue, "paru").create_job().await.unwrap();

        let calls = queue.calls.lock().unwrap();
        let (_, upload_type, args, disable_ccache) = &calls[0];
        assert_eq!(*upload_type, UploadType::None);
        assert!(!*disable_ccache);
        assert_eq!(*args, map(&[("REPO", "paru")]));
    }

    #[test]
    fn namespace_applies_to_data_manager_only() {
        let queue = RecordingQueue::default();

        let build = AurBuild::new(&queue, "yay").with_data_manager("u", "t", "h").with_namespace("ns");
        assert_eq!(build.args().get("DM_NAMESPACE").map(String::as_str), Some("ns"));

        let build = AurBuild::new(&queue, "yay").with_local_storage().with_namespace("ns");
        assert_eq!(build.upload_type(), UploadType::LocalStorage);
        assert_eq!(build.args(), map(&[("REPO", "yay")]));
    }

    #[test]
    fn later_destination_replaces_earlier_one() {
        let queue = RecordingQueue::default();

        let build = AurBuild::new(&queue, "yay").with_data_manager("u", "t", "h").with_local_storage();

        assert_eq!(build.upload_type(), UploadType::LocalStorage);
        assert!(!build.args().contains_key("DM_Token"));
    }
}
