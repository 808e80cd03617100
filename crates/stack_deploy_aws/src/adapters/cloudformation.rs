use aws_sdk_cloudformation::types::{Capability, Parameter};
use stack_deploy_core::contract::{StackDescription, StackParameter, StackRequest, StackStatus};
use stack_deploy_core::ports::StackBackend;
use stack_deploy_core::BackendError;

use super::{backend_error, block_on};

pub struct CloudFormationStacks {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationStacks {
    pub fn new(client: aws_sdk_cloudformation::Client) -> Self {
        Self { client }
    }
}

impl StackBackend for CloudFormationStacks {
    fn describe_stack(&self, stack_name: &str) -> Result<StackDescription, BackendError> {
        let client = self.client.clone();
        let name = stack_name.to_string();

        let output = block_on(async move {
            client
                .describe_stacks()
                .stack_name(name)
                .send()
                .await
                .map_err(|error| backend_error("DescribeStacks", error))
        })?;

        let stack = output.stacks().first().ok_or_else(|| {
            BackendError::service(
                "DescribeStacks",
                Some("ValidationError".to_string()),
                format!("Stack with id {stack_name} does not exist"),
            )
        })?;
        let mut status = StackStatus::new(
            stack
                .stack_status()
                .map(|value| value.as_str())
                .unwrap_or("UNKNOWN"),
        );
        if let Some(reason) = stack.stack_status_reason() {
            status = status.with_reason(reason);
        }

        Ok(StackDescription {
            stack_id: stack.stack_id().map(str::to_string),
            status,
        })
    }

    fn create_stack(&self, request: &StackRequest) -> Result<Option<String>, BackendError> {
        let client = self.client.clone();
        let request = request.clone();

        block_on(async move {
            client
                .create_stack()
                .stack_name(request.stack_name)
                .template_body(request.template_body)
                .set_parameters(Some(to_sdk_parameters(&request.parameters)))
                .set_capabilities(Some(to_sdk_capabilities(&request.capabilities)))
                .send()
                .await
                .map(|output| output.stack_id().map(str::to_string))
                .map_err(|error| backend_error("CreateStack", error))
        })
    }

    fn update_stack(&self, request: &StackRequest) -> Result<Option<String>, BackendError> {
        let client = self.client.clone();
        let request = request.clone();

        block_on(async move {
            client
                .update_stack()
                .stack_name(request.stack_name)
                .template_body(request.template_body)
                .set_parameters(Some(to_sdk_parameters(&request.parameters)))
                .set_capabilities(Some(to_sdk_capabilities(&request.capabilities)))
                .send()
                .await
                .map(|output| output.stack_id().map(str::to_string))
                .map_err(|error| backend_error("UpdateStack", error))
        })
    }
}

fn to_sdk_parameters(parameters: &[StackParameter]) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|parameter| {
            Parameter::builder()
                .parameter_key(&parameter.key)
                .parameter_value(&parameter.value)
                .build()
        })
        .collect()
}

fn to_sdk_capabilities(capabilities: &[String]) -> Vec<Capability> {
    capabilities
        .iter()
        .map(|capability| Capability::from(capability.as_str()))
        .collect()
}
