use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use stack_deploy_core::contract::{
    default_bucket_name, DeployConfig, ProbeMode, WaitPolicy, DEFAULT_ARTIFACT_KEY,
    DEFAULT_REGION, DEFAULT_SOURCE_DIR, DEFAULT_STACK_NAME, DEFAULT_TEMPLATE_PATH,
    DEFAULT_WAIT_DELAY_SECS, DEFAULT_WAIT_MAX_ATTEMPTS,
};
use stack_deploy_core::observability::LogTarget;

#[derive(Debug, Parser)]
#[command(
    name = "deploy_stack",
    about = "Package a Lambda function, upload it to S3 and create or update its CloudFormation stack",
    long_about = "Zips the function source directory, ensures the versioned deployment bucket\n\
                  exists, uploads the artifact and creates or updates the stack from the\n\
                  template. Every option falls back to an environment variable and then to\n\
                  the fixed deployment defaults, so a bare invocation deploys the default stack."
)]
pub struct Cli {
    /// Name of the stack to create or update
    #[arg(long, env = "DEPLOY_STACK_NAME", default_value = DEFAULT_STACK_NAME)]
    pub stack_name: String,
    /// Deployment bucket [default: <stack-name>-artifacts]
    #[arg(long, env = "DEPLOY_BUCKET")]
    pub bucket: Option<String>,
    /// Directory holding the function source
    #[arg(long, env = "DEPLOY_SOURCE_DIR", default_value = DEFAULT_SOURCE_DIR)]
    pub source_dir: PathBuf,
    /// Object key the artifact is uploaded under
    #[arg(long, env = "DEPLOY_ARTIFACT_KEY", default_value = DEFAULT_ARTIFACT_KEY)]
    pub artifact_key: String,
    /// Local path the archive is written to [default: the artifact key]
    #[arg(long, env = "DEPLOY_ARTIFACT_PATH")]
    pub artifact_path: Option<PathBuf>,
    /// Stack template file
    #[arg(long, env = "DEPLOY_TEMPLATE", default_value = DEFAULT_TEMPLATE_PATH)]
    pub template: PathBuf,
    /// JSON file of extra parameters ([{"ParameterKey": .., "ParameterValue": ..}])
    #[arg(long, env = "DEPLOY_PARAMETERS_FILE")]
    pub parameters_file: Option<PathBuf>,
    /// Region for the SDK clients and the bucket location
    #[arg(long, env = "DEPLOY_REGION", default_value = DEFAULT_REGION)]
    pub region: String,
    /// Do not enable bucket versioning
    #[arg(long, env = "DEPLOY_NO_VERSIONING")]
    pub no_versioning: bool,
    /// Do not pass DeploymentObjectVersion to the stack
    #[arg(long, env = "DEPLOY_NO_VERSION_PARAMETER")]
    pub no_version_parameter: bool,
    /// Only treat not-found errors as a missing bucket or stack
    #[arg(long, env = "DEPLOY_STRICT_PROBE")]
    pub strict_probe: bool,
    /// Seconds between stack status polls
    #[arg(long, env = "DEPLOY_WAIT_DELAY_SECS", default_value_t = DEFAULT_WAIT_DELAY_SECS)]
    pub wait_delay_secs: u64,
    /// Polls before giving up on the stack operation
    #[arg(long, env = "DEPLOY_WAIT_MAX_ATTEMPTS", default_value_t = DEFAULT_WAIT_MAX_ATTEMPTS)]
    pub wait_max_attempts: u32,
    /// Append log lines to this file instead of stderr
    #[arg(long, env = "DEPLOY_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn deploy_config(&self) -> DeployConfig {
        DeployConfig {
            stack_name: self.stack_name.clone(),
            bucket: self
                .bucket
                .clone()
                .unwrap_or_else(|| default_bucket_name(&self.stack_name)),
            source_dir: self.source_dir.clone(),
            artifact_key: self.artifact_key.clone(),
            artifact_path: self
                .artifact_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(&self.artifact_key)),
            template_path: self.template.clone(),
            parameters_file: self.parameters_file.clone(),
            region: self.region.clone(),
            enable_versioning: !self.no_versioning,
            include_version_parameter: !self.no_version_parameter,
            probe_mode: if self.strict_probe {
                ProbeMode::Strict
            } else {
                ProbeMode::Faithful
            },
            wait_policy: WaitPolicy {
                delay: Duration::from_secs(self.wait_delay_secs),
                max_attempts: self.wait_max_attempts,
            },
        }
    }

    pub fn log_target(&self) -> LogTarget {
        self.log_file
            .clone()
            .map(LogTarget::File)
            .unwrap_or_default()
    }
}
