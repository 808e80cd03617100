use std::path::PathBuf;

use thiserror::Error;

pub type DeployResult<T> = Result<T, DeployError>;

/// Marker the orchestration backend puts in an update rejection when the
/// submitted template and parameters match the deployed stack.
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// The backend answered with an error response.
    Service,
    /// The request never produced a service response (network, credentials,
    /// request construction).
    Transport,
}

/// Error returned by a storage or orchestration backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    operation: String,
    kind: BackendErrorKind,
    code: Option<String>,
    http_status: Option<u16>,
    message: String,
}

impl BackendError {
    pub fn service(
        operation: impl Into<String>,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            kind: BackendErrorKind::Service,
            code,
            http_status: None,
            message: message.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            kind: BackendErrorKind::Transport,
            code: None,
            http_status: None,
            message: message.into(),
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_service(&self) -> bool {
        self.kind == BackendErrorKind::Service
    }

    /// True when the backend reported the probed resource as missing.
    ///
    /// Storage answers a missing bucket with a bare 404 (`NotFound`), while
    /// the orchestration backend uses a `ValidationError` whose message ends
    /// in "does not exist".
    pub fn is_not_found(&self) -> bool {
        if !self.is_service() {
            return false;
        }
        if self.http_status == Some(404) {
            return true;
        }
        match self.code.as_deref() {
            Some("NotFound" | "NoSuchBucket" | "NoSuchKey" | "404") => true,
            Some("ValidationError") => self.message.contains("does not exist"),
            _ => false,
        }
    }

    pub fn is_no_updates(&self) -> bool {
        self.is_service() && self.message.contains(NO_UPDATES_MESSAGE)
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed", self.operation)?;
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("source directory '{path}' is not a readable directory")]
    SourceDirectory { path: PathBuf },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("object s3://{bucket}/{key} has no version id; is bucket versioning enabled?")]
    MissingObjectVersion { bucket: String, key: String },

    #[error("invalid parameter file '{path}': {message}")]
    InvalidParameterFile { path: PathBuf, message: String },

    #[error("stack {stack_name} reached {status}{}", reason_suffix(.reason))]
    StackFailed {
        stack_name: String,
        status: String,
        reason: Option<String>,
    },

    #[error("stack {stack_name} did not reach {target} after {attempts} attempts")]
    WaiterTimedOut {
        stack_name: String,
        target: &'static str,
        attempts: u32,
    },
}

impl DeployError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|value| format!(" ({value})"))
        .unwrap_or_default()
}
