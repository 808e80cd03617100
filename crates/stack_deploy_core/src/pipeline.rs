use chrono::Utc;

use crate::bucket::{ensure_bucket, BucketState};
use crate::contract::{
    build_stack_parameters, load_parameter_file, read_template, DeployConfig, DeploymentReport,
    StackRequest,
};
use crate::error::DeployResult;
use crate::observability::deployment_span;
use crate::packaging::package_directory;
use crate::ports::{ArtifactStore, Sleeper, StackBackend};
use crate::reconcile::reconcile_stack;
use crate::upload::upload_artifact;
use crate::waiter::StackWaiter;

/// Runs one deployment: package, ensure bucket, upload, read template,
/// reconcile. Stops at the first failing step without undoing earlier ones.
pub fn run_deployment(
    config: &DeployConfig,
    store: &impl ArtifactStore,
    stacks: &impl StackBackend,
    sleeper: &(impl Sleeper + ?Sized),
) -> DeployResult<DeploymentReport> {
    let span = deployment_span(&config.stack_name, &config.bucket);
    let _guard = span.enter();

    let artifact = package_directory(&config.source_dir, &config.artifact_path)?;

    let bucket_state = ensure_bucket(
        store,
        &config.bucket,
        &config.region,
        config.enable_versioning,
        config.probe_mode,
    )?;

    let uploaded = upload_artifact(
        store,
        &config.bucket,
        &config.artifact_key,
        &artifact.path,
        config.requires_object_version(),
    )?;

    let template_body = read_template(&config.template_path)?;
    let extra_parameters = match &config.parameters_file {
        Some(path) => load_parameter_file(path)?,
        None => Vec::new(),
    };
    let object_version = if config.include_version_parameter {
        uploaded.version_id.as_deref()
    } else {
        None
    };
    let parameters = build_stack_parameters(
        &uploaded.bucket,
        &uploaded.key,
        object_version,
        &extra_parameters,
    );
    tracing::debug!(count = parameters.len(), "built stack parameters");

    let request = StackRequest::new(&config.stack_name, template_body, parameters.clone());
    let waiter = StackWaiter::new(sleeper, config.wait_policy);
    let outcome = reconcile_stack(stacks, &waiter, &request, config.probe_mode)?;
    tracing::info!(
        action = outcome.action.as_str(),
        artifact_sha256 = %artifact.sha256,
        "deployment finished"
    );

    Ok(DeploymentReport {
        stack_name: config.stack_name.clone(),
        bucket: uploaded.bucket,
        bucket_created: bucket_state == BucketState::Created,
        object_key: uploaded.key,
        object_version: uploaded.version_id,
        artifact_sha256: artifact.sha256,
        artifact_members: artifact.members.len(),
        parameters,
        stack: outcome,
        completed_at: Utc::now().to_rfc3339(),
    })
}
