use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
    VersioningConfiguration,
};
use stack_deploy_core::ports::ArtifactStore;
use stack_deploy_core::BackendError;

use super::{backend_error, block_on};

/// Region where S3 rejects an explicit location constraint.
const DEFAULT_S3_REGION: &str = "us-east-1";

pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
}

impl S3ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl ArtifactStore for S3ArtifactStore {
    fn head_bucket(&self, bucket: &str) -> Result<(), BackendError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();

        block_on(async move {
            client
                .head_bucket()
                .bucket(bucket)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| backend_error("HeadBucket", error))
        })
    }

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), BackendError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let configuration = location_configuration(region);

        block_on(async move {
            client
                .create_bucket()
                .bucket(bucket)
                .set_create_bucket_configuration(configuration)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| backend_error("CreateBucket", error))
        })
    }

    fn enable_versioning(&self, bucket: &str) -> Result<(), BackendError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();

        block_on(async move {
            client
                .put_bucket_versioning()
                .bucket(bucket)
                .versioning_configuration(
                    VersioningConfiguration::builder()
                        .status(BucketVersioningStatus::Enabled)
                        .build(),
                )
                .send()
                .await
                .map(|_| ())
                .map_err(|error| backend_error("PutBucketVersioning", error))
        })
    }

    fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), BackendError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let path = path.to_path_buf();

        block_on(async move {
            let body = ByteStream::from_path(&path).await.map_err(|error| {
                BackendError::transport(
                    "PutObject",
                    format!("failed to read '{}': {error}", path.display()),
                )
            })?;
            client
                .put_object()
                .bucket(bucket)
                .key(object_key)
                .body(body)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| backend_error("PutObject", error))
        })
    }

    fn object_version(&self, bucket: &str, key: &str) -> Result<Option<String>, BackendError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let object_key = key.to_string();

        block_on(async move {
            client
                .head_object()
                .bucket(bucket)
                .key(object_key)
                .send()
                .await
                .map(|output| output.version_id().map(str::to_string))
                .map_err(|error| backend_error("HeadObject", error))
        })
    }
}

fn location_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_S3_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}
