//! Provisioning engine seam.
//!
//! The orchestrator only needs five operation shapes from the remote engine:
//! describe, create, update, delete and list-events. Wire details live in
//! `crate::aws::cloudformation`; tests substitute scripted engines.

use crate::credentials::CredentialSource;
use crate::error::EngineError;
use crate::stack::{StackDescriptor, StackStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Acknowledgements the engine requires before it creates IAM resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    Iam,
    NamedIam,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
        }
    }
}

/// A stack output value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackOutput {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// What a successful describe call reported about an existing stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSnapshot {
    pub name: String,
    pub status: StackStatus,
    pub status_reason: Option<String>,
    pub outputs: Vec<StackOutput>,
}

impl StackSnapshot {
    pub fn new(name: impl Into<String>, status: StackStatus) -> Self {
        Self {
            name: name.into(),
            status,
            status_reason: None,
            outputs: Vec::new(),
        }
    }
}

/// Result of a describe call. Transport failures are `Err(EngineError)` and
/// are never conflated with `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeOutcome {
    Found(StackSnapshot),
    NotFound,
}

/// One entry of a stack's event history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackEventRecord {
    pub logical_resource_id: Option<String>,
    pub resource_status: Option<String>,
    pub resource_status_reason: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A create or update call.
#[derive(Debug, Clone, Copy)]
pub struct ChangeRequest<'a> {
    pub descriptor: &'a StackDescriptor,
    pub capabilities: &'a [Capability],
}

/// How the engine answered an update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Started,
    /// The template and parameters already match the deployed stack.
    NoChanges,
}

#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    async fn describe_stack(&self, name: &str) -> Result<DescribeOutcome, EngineError>;

    async fn create_stack(&self, request: ChangeRequest<'_>) -> Result<(), EngineError>;

    async fn update_stack(
        &self,
        request: ChangeRequest<'_>,
    ) -> Result<UpdateOutcome, EngineError>;

    async fn delete_stack(&self, name: &str) -> Result<(), EngineError>;

    async fn list_stack_events(&self, name: &str) -> Result<Vec<StackEventRecord>, EngineError>;

    /// Release the underlying transport.
    async fn shutdown(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Opens engine transports for a region and credential source.
#[async_trait]
pub trait EngineFactory: Send + Sync {
    type Engine: ProvisioningEngine;

    async fn connect(
        &self,
        region: &str,
        source: &CredentialSource,
    ) -> Result<Self::Engine, EngineError>;
}
