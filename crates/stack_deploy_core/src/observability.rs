//! Logging setup for a deployment run.
//!
//! Nothing here installs a global subscriber. The caller builds one with
//! [`build_subscriber`] and scopes it around the run with
//! `tracing::subscriber::with_default`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Span;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::{DeployError, DeployResult};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where human-readable log lines go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTarget {
    #[default]
    Stderr,
    /// Appends to the given file.
    File(PathBuf),
}

/// Builds a timestamped fmt subscriber writing to `target`.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn build_subscriber(
    target: &LogTarget,
) -> DeployResult<impl tracing::Subscriber + Send + Sync + 'static> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|error| {
                    DeployError::io(
                        format!("failed to open log file '{}'", path.display()),
                        error,
                    )
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .finish())
}

/// Span every pipeline event is recorded under.
#[must_use]
pub fn deployment_span(stack_name: &str, bucket: &str) -> Span {
    tracing::info_span!("deployment", stack = stack_name, bucket = bucket)
}
