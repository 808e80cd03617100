//! AWS adapters and the command-line entry point for stack deployments.
//!
//! The deployment sequence itself lives in `stack_deploy_core`; this crate
//! binds its storage and orchestration ports to S3 and CloudFormation.

pub mod adapters;
pub mod cli;
