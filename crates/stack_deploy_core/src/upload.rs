use std::path::Path;

use crate::error::{DeployError, DeployResult};
use crate::ports::ArtifactStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifact {
    pub bucket: String,
    pub key: String,
    pub version_id: Option<String>,
}

/// Uploads `path` to `bucket/key`, replacing whatever object was there, and
/// reads back the version id the store assigned.
pub fn upload_artifact(
    store: &impl ArtifactStore,
    bucket: &str,
    key: &str,
    path: &Path,
    require_version: bool,
) -> DeployResult<UploadedArtifact> {
    tracing::info!(bucket, key, "Uploading {} to S3", path.display());
    store.upload_file(bucket, key, path)?;
    tracing::info!(bucket, key, "Uploaded successfully");

    let version_id = store.object_version(bucket, key)?;
    match version_id.as_deref() {
        Some(version) => tracing::info!(bucket, key, "Uploaded S3 Object Version: {version}"),
        None if require_version => {
            return Err(DeployError::MissingObjectVersion {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        None => tracing::debug!(bucket, key, "object has no version id"),
    }

    Ok(UploadedArtifact {
        bucket: bucket.to_string(),
        key: key.to_string(),
        version_id,
    })
}
