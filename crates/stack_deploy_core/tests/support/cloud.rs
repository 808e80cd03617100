#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use stack_deploy_core::contract::{StackDescription, StackParameter, StackRequest, StackStatus};
use stack_deploy_core::ports::{ArtifactStore, Sleeper, StackBackend};
use stack_deploy_core::BackendError;

#[derive(Debug, Clone, Default)]
pub struct StoredBucket {
    pub region: String,
    pub versioned: bool,
    /// Every upload per key, oldest first: (version id, bytes).
    pub objects: BTreeMap<String, Vec<(Option<String>, Vec<u8>)>>,
}

#[derive(Debug, Clone)]
pub struct DeployedStack {
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
    pub status: String,
}

#[derive(Default)]
struct CloudState {
    buckets: BTreeMap<String, StoredBucket>,
    stack: Option<DeployedStack>,
    next_version: u64,
    /// Describes left that report the last operation as still running.
    pending_polls: usize,
    calls: Vec<String>,
}

/// In-memory storage and orchestration backend.
///
/// Stack operations settle after `polls_until_settled` describes: create
/// lands in `CREATE_COMPLETE` (or `create_outcome` when set), update in
/// `UPDATE_COMPLETE`. Updating with an unchanged template and parameters is
/// rejected the way the real backend rejects it.
#[derive(Default)]
pub struct InMemoryCloud {
    state: Mutex<CloudState>,
    pub create_outcome: Option<String>,
    pub update_failure: Option<BackendError>,
    /// Describes after a create or update that still report `*_IN_PROGRESS`.
    pub polls_until_settled: usize,
}

impl InMemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, name: &str, versioned: bool) -> Self {
        self.state.lock().expect("poisoned mutex").buckets.insert(
            name.to_string(),
            StoredBucket {
                region: "ap-south-1".to_string(),
                versioned,
                objects: BTreeMap::new(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("poisoned mutex").calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn bucket(&self, name: &str) -> Option<StoredBucket> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .buckets
            .get(name)
            .cloned()
    }

    pub fn stack(&self) -> Option<DeployedStack> {
        self.state.lock().expect("poisoned mutex").stack.clone()
    }

    fn record(state: &mut CloudState, call: String) {
        state.calls.push(call);
    }
}

fn not_found(operation: &str) -> BackendError {
    BackendError::service(operation, Some("NotFound".to_string()), "Not Found").with_http_status(404)
}

impl ArtifactStore for InMemoryCloud {
    fn head_bucket(&self, bucket: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("head_bucket:{bucket}"));
        if state.buckets.contains_key(bucket) {
            Ok(())
        } else {
            Err(not_found("HeadBucket"))
        }
    }

    fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("create_bucket:{bucket}:{region}"));
        if state.buckets.contains_key(bucket) {
            return Err(BackendError::service(
                "CreateBucket",
                Some("BucketAlreadyOwnedByYou".to_string()),
                "Your previous request to create the named bucket succeeded",
            )
            .with_http_status(409));
        }
        state.buckets.insert(
            bucket.to_string(),
            StoredBucket {
                region: region.to_string(),
                ..StoredBucket::default()
            },
        );
        Ok(())
    }

    fn enable_versioning(&self, bucket: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("enable_versioning:{bucket}"));
        let stored = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| not_found("PutBucketVersioning"))?;
        stored.versioned = true;
        Ok(())
    }

    fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), BackendError> {
        let body = fs::read(path)
            .map_err(|error| BackendError::transport("PutObject", error.to_string()))?;
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("upload:{bucket}/{key}"));
        state.next_version += 1;
        let version = state.next_version;
        let stored = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| not_found("PutObject"))?;
        let version_id = stored.versioned.then(|| format!("v{version}"));
        stored
            .objects
            .entry(key.to_string())
            .or_default()
            .push((version_id, body));
        Ok(())
    }

    fn object_version(&self, bucket: &str, key: &str) -> Result<Option<String>, BackendError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("head_object:{bucket}/{key}"));
        let stored = state
            .buckets
            .get(bucket)
            .ok_or_else(|| not_found("HeadObject"))?;
        let latest = stored
            .objects
            .get(key)
            .and_then(|versions| versions.last())
            .ok_or_else(|| not_found("HeadObject"))?;
        Ok(latest.0.clone())
    }
}

impl StackBackend for InMemoryCloud {
    fn describe_stack(&self, stack_name: &str) -> Result<StackDescription, BackendError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("describe_stack:{stack_name}"));
        let still_running = state.pending_polls > 0;
        if still_running {
            state.pending_polls -= 1;
        }
        match &state.stack {
            Some(stack) => {
                let status = if still_running {
                    in_progress_status(&stack.status)
                } else {
                    stack.status.clone()
                };
                Ok(StackDescription {
                    stack_id: Some(format!("arn:aws:cloudformation:stack/{stack_name}")),
                    status: StackStatus::new(status),
                })
            }
            None => Err(BackendError::service(
                "DescribeStacks",
                Some("ValidationError".to_string()),
                format!("Stack with id {stack_name} does not exist"),
            )),
        }
    }

    fn create_stack(&self, request: &StackRequest) -> Result<Option<String>, BackendError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("create_stack:{}", request.stack_name));
        state.stack = Some(DeployedStack {
            template_body: request.template_body.clone(),
            parameters: request.parameters.clone(),
            status: self
                .create_outcome
                .clone()
                .unwrap_or_else(|| "CREATE_COMPLETE".to_string()),
        });
        state.pending_polls = self.polls_until_settled;
        Ok(Some(format!(
            "arn:aws:cloudformation:stack/{}",
            request.stack_name
        )))
    }

    fn update_stack(&self, request: &StackRequest) -> Result<Option<String>, BackendError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        Self::record(&mut state, format!("update_stack:{}", request.stack_name));
        if let Some(error) = &self.update_failure {
            return Err(error.clone());
        }
        let stack = state
            .stack
            .as_mut()
            .ok_or_else(|| not_found("UpdateStack"))?;
        if stack.template_body == request.template_body && stack.parameters == request.parameters {
            return Err(BackendError::service(
                "UpdateStack",
                Some("ValidationError".to_string()),
                "No updates are to be performed.",
            ));
        }
        stack.template_body = request.template_body.clone();
        stack.parameters = request.parameters.clone();
        stack.status = "UPDATE_COMPLETE".to_string();
        state.pending_polls = self.polls_until_settled;
        Ok(Some(format!(
            "arn:aws:cloudformation:stack/{}",
            request.stack_name
        )))
    }
}

fn in_progress_status(settled: &str) -> String {
    let operation = settled.split('_').next().unwrap_or("CREATE");
    format!("{operation}_IN_PROGRESS")
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("poisoned mutex").push(duration);
    }
}
