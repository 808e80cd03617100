use anyhow::Context;
use aws_config::{BehaviorVersion, Region};
use clap::Parser;
use stack_deploy_aws::adapters::cloudformation::CloudFormationStacks;
use stack_deploy_aws::adapters::s3::S3ArtifactStore;
use stack_deploy_aws::adapters::sleeper::TokioSleeper;
use stack_deploy_aws::cli::Cli;
use stack_deploy_core::observability::build_subscriber;
use stack_deploy_core::run_deployment;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.deploy_config();
    let subscriber = build_subscriber(&cli.log_target()).context("failed to set up logging")?;

    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;
    let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&aws_config));
    let stacks = CloudFormationStacks::new(aws_sdk_cloudformation::Client::new(&aws_config));

    let report = tracing::subscriber::with_default(subscriber, || {
        run_deployment(&config, &store, &stacks, &TokioSleeper).map_err(|error| {
            tracing::error!(error = %error, "deployment failed");
            error
        })
    })
    .with_context(|| format!("deployment of stack {} failed", config.stack_name))?;

    println!(
        "{}",
        serde_json::to_string(&report).context("failed to serialize deployment report")?
    );
    Ok(())
}
