//! Deployment primitives for packaging a function artifact and reconciling
//! its infrastructure stack.
//!
//! This crate owns the deployment sequence and the create-or-update logic.
//! It has no cloud SDK dependency: storage and orchestration calls go through
//! the traits in [`ports`], which `stack_deploy_aws` implements.

pub mod bucket;
pub mod contract;
pub mod error;
pub mod observability;
pub mod packaging;
pub mod pipeline;
pub mod ports;
pub mod reconcile;
pub mod upload;
pub mod waiter;

pub use error::{BackendError, DeployError, DeployResult};
pub use pipeline::run_deployment;
