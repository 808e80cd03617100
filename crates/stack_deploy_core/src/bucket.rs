use crate::contract::ProbeMode;
use crate::error::DeployResult;
use crate::ports::ArtifactStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketState {
    Existing,
    Created,
}

/// Makes sure `bucket` exists, creating it in `region` when the probe says it
/// does not, then turns on versioning when asked to.
pub fn ensure_bucket(
    store: &impl ArtifactStore,
    bucket: &str,
    region: &str,
    enable_versioning: bool,
    probe_mode: ProbeMode,
) -> DeployResult<BucketState> {
    let state = match store.head_bucket(bucket) {
        Ok(()) => {
            tracing::info!(bucket, "Bucket {bucket} already exists");
            BucketState::Existing
        }
        Err(error) if probe_mode.treats_as_absent(&error) => {
            tracing::debug!(bucket, probe_error = %error, "bucket probe failed");
            tracing::info!(bucket, region, "Bucket {bucket} does not exist, creating...");
            store.create_bucket(bucket, region)?;
            tracing::info!(bucket, "Bucket {bucket} created successfully");
            BucketState::Created
        }
        Err(error) => return Err(error.into()),
    };

    if enable_versioning {
        tracing::info!(bucket, "Enabling bucket versioning on {bucket}");
        store.enable_versioning(bucket)?;
    }

    Ok(state)
}
