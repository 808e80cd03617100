use std::path::Path;
use std::time::Duration;

use crate::contract::{StackDescription, StackRequest};
use crate::error::BackendError;

/// Object storage operations the deployment needs.
pub trait ArtifactStore {
    /// Metadata probe; `Ok` means the bucket exists and is reachable.
    fn head_bucket(&self, bucket: &str) -> Result<(), BackendError>;
    fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), BackendError>;
    fn enable_versioning(&self, bucket: &str) -> Result<(), BackendError>;
    fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), BackendError>;
    /// Version id the backend assigned to the current object, if any.
    fn object_version(&self, bucket: &str, key: &str) -> Result<Option<String>, BackendError>;
}

/// Infrastructure orchestration operations against a named stack.
pub trait StackBackend {
    fn describe_stack(&self, stack_name: &str) -> Result<StackDescription, BackendError>;
    /// Returns the stack id reported by the backend.
    fn create_stack(&self, request: &StackRequest) -> Result<Option<String>, BackendError>;
    fn update_stack(&self, request: &StackRequest) -> Result<Option<String>, BackendError>;
}

/// Clock seam the stack waiter sleeps through between polls.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}
