use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

pub const DEFAULT_STACK_NAME: &str = "assignment-1-s3-sync";
pub const DEFAULT_SOURCE_DIR: &str = "Lambda_Function";
pub const DEFAULT_ARTIFACT_KEY: &str = "lambda_artifact.zip";
pub const DEFAULT_TEMPLATE_PATH: &str = "template.yaml";
pub const DEFAULT_REGION: &str = "ap-south-1";
pub const DEFAULT_WAIT_DELAY_SECS: u64 = 30;
pub const DEFAULT_WAIT_MAX_ATTEMPTS: u32 = 120;

pub const BUCKET_NAME_PARAMETER: &str = "DeploymentBucketName";
pub const OBJECT_KEY_PARAMETER: &str = "DeploymentObjectKey";
pub const OBJECT_VERSION_PARAMETER: &str = "DeploymentObjectVersion";

pub const NAMED_IAM_CAPABILITY: &str = "CAPABILITY_NAMED_IAM";

pub fn default_bucket_name(stack_name: &str) -> String {
    format!("{stack_name}-artifacts")
}

/// How an existence probe reads a service error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProbeMode {
    /// Any service error means the resource is absent.
    #[default]
    Faithful,
    /// Only a not-found error means absent; other service errors propagate.
    Strict,
}

impl ProbeMode {
    pub fn treats_as_absent(self, error: &crate::error::BackendError) -> bool {
        match self {
            Self::Faithful => error.is_service(),
            Self::Strict => error.is_not_found(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(DEFAULT_WAIT_DELAY_SECS),
            max_attempts: DEFAULT_WAIT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub stack_name: String,
    pub bucket: String,
    pub source_dir: PathBuf,
    pub artifact_key: String,
    pub artifact_path: PathBuf,
    pub template_path: PathBuf,
    pub parameters_file: Option<PathBuf>,
    pub region: String,
    pub enable_versioning: bool,
    pub include_version_parameter: bool,
    pub probe_mode: ProbeMode,
    pub wait_policy: WaitPolicy,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            bucket: default_bucket_name(DEFAULT_STACK_NAME),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            artifact_key: DEFAULT_ARTIFACT_KEY.to_string(),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_KEY),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            parameters_file: None,
            region: DEFAULT_REGION.to_string(),
            enable_versioning: true,
            include_version_parameter: true,
            probe_mode: ProbeMode::Faithful,
            wait_policy: WaitPolicy::default(),
        }
    }
}

impl DeployConfig {
    /// The version id is only demanded when the bucket is versioned and the
    /// template expects it.
    pub fn requires_object_version(&self) -> bool {
        self.enable_versioning && self.include_version_parameter
    }
}

/// One entry of the ordered parameter list handed to the stack backend.
///
/// Serializes in the provider's CLI parameter-file shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackParameter {
    #[serde(rename = "ParameterKey")]
    pub key: String,
    #[serde(rename = "ParameterValue")]
    pub value: String,
}

impl StackParameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    pub stack_name: String,
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
    pub capabilities: Vec<String>,
}

impl StackRequest {
    pub fn new(
        stack_name: impl Into<String>,
        template_body: impl Into<String>,
        parameters: Vec<StackParameter>,
    ) -> Self {
        Self {
            stack_name: stack_name.into(),
            template_body: template_body.into(),
            parameters,
            capabilities: vec![NAMED_IAM_CAPABILITY.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StackStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDescription {
    pub stack_id: Option<String>,
    pub status: StackStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Created,
    Updated,
    UpToDate,
}

impl ReconcileAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::UpToDate => "up_to_date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub action: ReconcileAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_status: Option<StackStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub stack_name: String,
    pub bucket: String,
    pub bucket_created: bool,
    pub object_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_version: Option<String>,
    pub artifact_sha256: String,
    pub artifact_members: usize,
    pub parameters: Vec<StackParameter>,
    pub stack: ReconcileOutcome,
    pub completed_at: String,
}

/// Builds the ordered parameter list: bucket, key, the optional object
/// version, then any extra parameters in their given order.
pub fn build_stack_parameters(
    bucket: &str,
    object_key: &str,
    object_version: Option<&str>,
    extra: &[StackParameter],
) -> Vec<StackParameter> {
    let mut parameters = Vec::with_capacity(3 + extra.len());
    parameters.push(StackParameter::new(BUCKET_NAME_PARAMETER, bucket));
    parameters.push(StackParameter::new(OBJECT_KEY_PARAMETER, object_key));
    if let Some(version) = object_version {
        parameters.push(StackParameter::new(OBJECT_VERSION_PARAMETER, version));
    }
    parameters.extend(extra.iter().cloned());
    parameters
}

pub fn parse_parameter_file(path: &Path, contents: &str) -> DeployResult<Vec<StackParameter>> {
    serde_json::from_str(contents).map_err(|error| DeployError::InvalidParameterFile {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

pub fn load_parameter_file(path: &Path) -> DeployResult<Vec<StackParameter>> {
    let contents = fs::read_to_string(path).map_err(|error| {
        DeployError::io(
            format!("failed to read parameter file '{}'", path.display()),
            error,
        )
    })?;
    parse_parameter_file(path, &contents)
}

pub fn read_template(path: &Path) -> DeployResult<String> {
    fs::read_to_string(path).map_err(|error| {
        DeployError::io(
            format!("failed to read template '{}'", path.display()),
            error,
        )
    })
}
