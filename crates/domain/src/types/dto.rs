//! Wire DTOs for request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::job::{JobArgMap, JobInfo, JobSubmission, JobType, UploadType};

/// Body of a ping request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingRequest {
    #[serde(rename = "Payload")]
    pub payload: String,
}

/// Login and registration credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsRequest {
    #[serde(rename = "mid", default, skip_serializing_if = "String::is_empty")]
    pub machine_id: String,
    pub username: String,
    #[serde(rename = "pass")]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("machine_id", &self.machine_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a job creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddJobRequest {
    #[serde(rename = "buildtype")]
    pub job_type: JobType,
    pub args: JobArgMap,
    #[serde(rename = "uploadtype")]
    pub upload_type: UploadType,
    #[serde(rename = "disableccache")]
    pub disable_ccache: bool,
}

impl From<&JobSubmission> for AddJobRequest {
    fn from(submission: &JobSubmission) -> Self {
        Self {
            job_type: submission.job_type(),
            args: submission.flat_args(),
            upload_type: submission.upload_type(),
            disable_ccache: submission.disable_ccache,
        }
    }
}

/// Request addressing a single job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(rename = "id")]
    pub job_id: u64,
}

/// Request for a job's log tail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLogsRequest {
    #[serde(rename = "id")]
    pub job_id: u64,
    pub since: DateTime<Utc>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse").field("token", &"<redacted>").finish()
    }
}

/// Response carrying a single string
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringResponse {
    #[serde(rename = "content", default)]
    pub content: String,
}

/// Identifier and queue position of a newly created job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddJobResponse {
    pub id: u64,
    #[serde(rename = "pos")]
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListJobsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub jobs: Vec<JobInfo>,
}

/// The server encodes an empty list as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{DataManagerTarget, JobArgs, UploadDestination};

    #[test]
    fn add_job_request_wire_shape() {
        let submission = JobSubmission {
            args: JobArgs::aur("yay"),
            upload: UploadDestination::DataManager(DataManagerTarget {
                user: "bob".into(),
                token: "t123".into(),
                host: "h".into(),
                namespace: None,
            }),
            disable_ccache: true,
        };

        let body = serde_json::to_value(AddJobRequest::from(&submission)).unwrap();

        assert_eq!(body["buildtype"], json!(1));
        assert_eq!(body["uploadtype"], json!(1));
        assert_eq!(body["disableccache"], json!(true));
        assert_eq!(body["args"]["REPO"], json!("yay"));
        assert_eq!(body["args"]["DM_Token"], json!("t123"));
    }

    #[test]
    fn credentials_omit_empty_machine_id() {
        let body = serde_json::to_value(CredentialsRequest {
            machine_id: String::new(),
            username: "alice".into(),
            password: "secret".into(),
        })
        .unwrap();

        assert_eq!(body, json!({"username": "alice", "pass": "secret"}));
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = CredentialsRequest {
            machine_id: "m".into(),
            username: "alice".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn null_job_list_decodes_as_empty() {
        let parsed: ListJobsResponse = serde_json::from_value(json!({"jobs": null})).unwrap();
        assert!(parsed.jobs.is_empty());

        let parsed: ListJobsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.jobs.is_empty());
    }

    #[test]
    fn logs_request_encodes_since_as_rfc3339() {
        let since = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z").unwrap().with_timezone(&Utc);
        let body = serde_json::to_value(JobLogsRequest { job_id: 9, since }).unwrap();
        assert_eq!(body, json!({"id": 9, "since": "2024-01-02T03:04:05Z"}));
    }
}
