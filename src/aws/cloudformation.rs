//! CloudFormation implementation of the provisioning engine.

use crate::aws::{load_sdk_config, to_chrono, EngineEndpoint};
use crate::credentials::CredentialSource;
use crate::error::EngineError;
use crate::stack::{
    Capability, ChangeRequest, DescribeOutcome, EngineFactory, ProvisioningEngine,
    StackEventRecord, StackOutput, StackSnapshot, StackStatus, UpdateOutcome,
};
use async_trait::async_trait;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudformation::primitives::DateTime;
use aws_sdk_cloudformation::types::{self as cfn, Parameter};
use aws_sdk_cloudformation::Client;
use tracing::debug;

/// CloudFormation reports a missing stack as a `ValidationError` whose
/// message says the stack "does not exist". Nothing else counts as absent.
pub fn is_missing_stack(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some("ValidationError") && message.is_some_and(|m| m.contains("does not exist"))
}

/// An update whose template and parameters match the deployed stack.
pub fn is_no_op_update(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some("ValidationError")
        && message.is_some_and(|m| m.contains("No updates are to be performed"))
}

fn engine_error<E>(operation: &str, err: &E) -> EngineError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(err).to_string());
    let error = EngineError::new(operation, message);
    match err.code() {
        Some(code) => error.with_code(code),
        None => error,
    }
}

fn capability(c: Capability) -> cfn::Capability {
    match c {
        Capability::Iam => cfn::Capability::CapabilityIam,
        Capability::NamedIam => cfn::Capability::CapabilityNamedIam,
    }
}

fn parameters(request: &ChangeRequest<'_>) -> Option<Vec<Parameter>> {
    let params = request.descriptor.parameters();
    if params.is_empty() {
        return None;
    }
    Some(
        params
            .iter()
            .map(|(key, value)| {
                Parameter::builder()
                    .parameter_key(key)
                    .parameter_value(value)
                    .build()
            })
            .collect(),
    )
}

fn snapshot(name: &str, stack: &cfn::Stack) -> Result<StackSnapshot, EngineError> {
    // Required members are plain references in some SDK releases and options in others.
    let status: Option<&cfn::StackStatus> = Option::from(stack.stack_status());
    let stack_name: Option<&str> = Option::from(stack.stack_name());
    let status = status
        .map(|s| StackStatus::parse(s.as_str()))
        .ok_or_else(|| EngineError::new("DescribeStacks", "stack has no status"))?;
    Ok(StackSnapshot {
        name: stack_name.unwrap_or(name).to_string(),
        status,
        status_reason: stack.stack_status_reason().map(str::to_string),
        outputs: stack
            .outputs()
            .iter()
            .filter_map(|output| {
                Some(StackOutput {
                    key: output.output_key()?.to_string(),
                    value: output.output_value()?.to_string(),
                    description: output.description().map(str::to_string),
                })
            })
            .collect(),
    })
}

/// Engine transport for one region and credential source.
#[derive(Clone)]
pub struct CloudFormationEngine {
    client: Client,
}

impl CloudFormationEngine {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(
        region: &str,
        source: &CredentialSource,
        endpoint: &EngineEndpoint,
    ) -> Self {
        let config = load_sdk_config(region, source, endpoint).await;
        Self::new(Client::new(&config))
    }
}

/// Opens [`CloudFormationEngine`]s against one endpoint.
#[derive(Debug, Clone)]
pub struct CloudFormationConnector {
    endpoint: EngineEndpoint,
}

impl CloudFormationConnector {
    pub fn new(endpoint: EngineEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl EngineFactory for CloudFormationConnector {
    type Engine = CloudFormationEngine;

    async fn connect(
        &self,
        region: &str,
        source: &CredentialSource,
    ) -> Result<CloudFormationEngine, EngineError> {
        Ok(CloudFormationEngine::connect(region, source, &self.endpoint).await)
    }
}

#[async_trait]
impl ProvisioningEngine for CloudFormationEngine {
    async fn describe_stack(&self, name: &str) -> Result<DescribeOutcome, EngineError> {
        match self.client.describe_stacks().stack_name(name).send().await {
            Ok(output) => match output.stacks().first() {
                Some(stack) => Ok(DescribeOutcome::Found(snapshot(name, stack)?)),
                None => Ok(DescribeOutcome::NotFound),
            },
            Err(err) if is_missing_stack(err.code(), err.message()) => {
                debug!(stack = name, "Stack does not exist");
                Ok(DescribeOutcome::NotFound)
            }
            Err(err) => Err(engine_error("DescribeStacks", &err)),
        }
    }

    async fn create_stack(&self, request: ChangeRequest<'_>) -> Result<(), EngineError> {
        self.client
            .create_stack()
            .stack_name(request.descriptor.name())
            .template_body(request.descriptor.template_body())
            .set_parameters(parameters(&request))
            .set_capabilities(Some(
                request.capabilities.iter().copied().map(capability).collect(),
            ))
            .send()
            .await
            .map(|_| ())
            .map_err(|err| engine_error("CreateStack", &err))
    }

    async fn update_stack(
        &self,
        request: ChangeRequest<'_>,
    ) -> Result<UpdateOutcome, EngineError> {
        let result = self
            .client
            .update_stack()
            .stack_name(request.descriptor.name())
            .template_body(request.descriptor.template_body())
            .set_parameters(parameters(&request))
            .set_capabilities(Some(
                request.capabilities.iter().copied().map(capability).collect(),
            ))
            .send()
            .await;
        match result {
            Ok(_) => Ok(UpdateOutcome::Started),
            Err(err) if is_no_op_update(err.code(), err.message()) => {
                Ok(UpdateOutcome::NoChanges)
            }
            Err(err) => Err(engine_error("UpdateStack", &err)),
        }
    }

    async fn delete_stack(&self, name: &str) -> Result<(), EngineError> {
        self.client
            .delete_stack()
            .stack_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| engine_error("DeleteStack", &err))
    }

    async fn list_stack_events(&self, name: &str) -> Result<Vec<StackEventRecord>, EngineError> {
        let output = self
            .client
            .describe_stack_events()
            .stack_name(name)
            .send()
            .await
            .map_err(|err| engine_error("DescribeStackEvents", &err))?;
        Ok(output
            .stack_events()
            .iter()
            .map(|event| {
                let timestamp: Option<&DateTime> = Option::from(event.timestamp());
                StackEventRecord {
                    logical_resource_id: event.logical_resource_id().map(str::to_string),
                    resource_status: event.resource_status().map(|s| s.as_str().to_string()),
                    resource_status_reason: event.resource_status_reason().map(str::to_string),
                    timestamp: timestamp.and_then(to_chrono),
                }
            })
            .collect())
    }
}
