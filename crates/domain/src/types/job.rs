//! Job vocabulary: types, states, upload destinations and server snapshots

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{AUR_PACKAGE_KEY, DM_HOST_KEY, DM_NAMESPACE_KEY, DM_TOKEN_KEY, DM_USER_KEY};
use crate::errors::ParseEnumError;

/// Flat job argument map as sent on the wire
pub type JobArgMap = HashMap<String, String>;

/// Kind of build a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum JobType {
    /// Sentinel for "no build"
    #[default]
    NoBuild,
    /// Build an AUR package
    Aur,
}

crate::impl_wire_enum!(JobType {
    NoBuild => ("NoJob", 0),
    Aur => ("buildAUR", 1),
});

impl JobType {
    /// Parse a job type name, mapping unknown input to [`JobType::NoBuild`].
    ///
    /// Use `str::parse` instead when unknown names must be rejected.
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }
}

impl From<u8> for JobType {
    fn from(code: u8) -> Self {
        Self::from_code(code).unwrap_or_default()
    }
}

/// Lifecycle state of a job, in order of conceptual progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum JobState {
    Waiting,
    Cancelled,
    Failed,
    Running,
    Done,
    Paused,
}

crate::impl_wire_enum!(JobState {
    Waiting => ("Waiting", 0),
    Cancelled => ("Cancelled", 1),
    Failed => ("Failed", 2),
    Running => ("Running", 3),
    Done => ("Done", 4),
    Paused => ("Paused", 5),
});

impl JobState {
    /// States a client may request through pause/resume.
    pub const fn is_settable(self) -> bool {
        matches!(self, Self::Paused | Self::Running)
    }
}

impl TryFrom<u8> for JobState {
    type Error = ParseEnumError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| ParseEnumError::new("JobState", code.to_string()))
    }
}

/// Where a finished build artifact is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum UploadType {
    #[default]
    None,
    DataManager,
    LocalStorage,
}

crate::impl_wire_enum!(UploadType {
    None => ("no upload", 0),
    DataManager => ("DataManager", 1),
    LocalStorage => ("LocalStorage", 2),
});

impl UploadType {
    /// Parse an upload type name, mapping unknown input to [`UploadType::None`].
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }
}

impl From<u8> for UploadType {
    fn from(code: u8) -> Self {
        Self::from_code(code).unwrap_or_default()
    }
}

/// Job-type specific arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobArgs {
    Aur { package: String },
}

impl JobArgs {
    pub fn aur(package: impl Into<String>) -> Self {
        Self::Aur { package: package.into() }
    }

    pub const fn job_type(&self) -> JobType {
        match self {
            Self::Aur { .. } => JobType::Aur,
        }
    }

    /// Write the wire keys of these arguments into `map`.
    pub fn write_into(&self, map: &mut JobArgMap) {
        match self {
            Self::Aur { package } => {
                map.insert(AUR_PACKAGE_KEY.to_string(), package.clone());
            }
        }
    }
}

/// Connection details of a DataManager upload target
#[derive(Clone, PartialEq, Eq)]
pub struct DataManagerTarget {
    pub user: String,
    pub token: String,
    pub host: String,
    pub namespace: Option<String>,
}

impl std::fmt::Debug for DataManagerTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataManagerTarget")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field("host", &self.host)
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// Typed upload destination; flattened into the job argument map on submit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadDestination {
    #[default]
    None,
    DataManager(DataManagerTarget),
    LocalStorage,
}

impl UploadDestination {
    pub const fn upload_type(&self) -> UploadType {
        match self {
            Self::None => UploadType::None,
            Self::DataManager(_) => UploadType::DataManager,
            Self::LocalStorage => UploadType::LocalStorage,
        }
    }

    pub fn write_into(&self, map: &mut JobArgMap) {
        if let Self::DataManager(target) = self {
            map.insert(DM_TOKEN_KEY.to_string(), target.token.clone());
            map.insert(DM_USER_KEY.to_string(), target.user.clone());
            map.insert(DM_HOST_KEY.to_string(), target.host.clone());
            if let Some(namespace) = &target.namespace {
                map.insert(DM_NAMESPACE_KEY.to_string(), namespace.clone());
            }
        }
    }
}

/// A complete, strongly typed job submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    pub args: JobArgs,
    pub upload: UploadDestination,
    pub disable_ccache: bool,
}

impl JobSubmission {
    pub fn new(args: JobArgs) -> Self {
        Self { args, upload: UploadDestination::None, disable_ccache: false }
    }

    pub const fn job_type(&self) -> JobType {
        self.args.job_type()
    }

    pub const fn upload_type(&self) -> UploadType {
        self.upload.upload_type()
    }

    /// Flat wire form: job arguments and upload arguments in one map.
    pub fn flat_args(&self) -> JobArgMap {
        let mut map = JobArgMap::new();
        self.args.write_into(&mut map);
        self.upload.write_into(&mut map);
        map
    }
}

/// Server-reported snapshot of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub id: u64,
    #[serde(default)]
    pub info: String,
    /// Queue position; see [`JobInfo::queue_position`]
    #[serde(rename = "pos", default)]
    pub position: u64,
    #[serde(rename = "jobtype", default)]
    pub build_type: JobType,
    #[serde(rename = "uploadtype", default)]
    pub upload_type: UploadType,
    #[serde(rename = "state")]
    pub status: JobState,
    #[serde(rename = "rs", default, with = "zero_time_as_none")]
    pub running_since: Option<DateTime<Utc>>,
    #[serde(rename = "dr", default, with = "duration_nanos")]
    pub duration: Duration,
}

impl JobInfo {
    /// Queue position, only meaningful while the job is waiting.
    pub fn queue_position(&self) -> Option<u64> {
        (self.status == JobState::Waiting).then_some(self.position)
    }
}

/// Sort jobs ascending by identifier.
pub fn sort_jobs(jobs: &mut [JobInfo]) {
    jobs.sort_by_key(|job| job.id);
}

/// Durations travel as signed nanoseconds; negative values clamp to zero.
mod duration_nanos {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = i64::try_from(value.as_nanos()).unwrap_or(i64::MAX);
        serializer.serialize_i64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = i64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(u64::try_from(nanos).unwrap_or(0)))
    }
}

/// The server writes an unset timestamp as `0001-01-01T00:00:00Z`.
mod zero_time_as_none {
    use chrono::Datelike;

    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => ts.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
        Ok(value.filter(|ts| ts.year() > 1))
    }
}
