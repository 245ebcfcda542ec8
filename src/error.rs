//! Error types for stack orchestration and cross-account federation.

use crate::stack::{ResourceFailure, StackStatus};
use thiserror::Error;

/// A remote engine call failed for a reason other than "stack does not exist".
#[derive(Debug, Clone, Error)]
#[error("{operation} failed: {message}")]
pub struct EngineError {
    /// Engine operation that failed (e.g. `DescribeStacks`)
    pub operation: String,
    /// Error code reported by the engine, if any
    pub code: Option<String>,
    pub message: String,
}

impl EngineError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Stack lifecycle errors
#[derive(Debug, Error)]
pub enum StackError {
    #[error("Stack not found: {0}")]
    StackNotFound(String),

    #[error("Stack operation failed for {name}: {status}")]
    StackOperationFailed {
        name: String,
        status: StackStatus,
        diagnostics: Vec<ResourceFailure>,
    },

    #[error("Timeout waiting for stack operation to complete: {0}")]
    Timeout(String),

    #[error("Invalid stack descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Engine error: {0}")]
    Transport(#[from] EngineError),
}

impl StackError {
    /// The run gave up waiting; the remote operation may still finish.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StackError::Timeout(_))
    }

    /// The engine rejected or rolled back the operation.
    pub fn is_rejected(&self) -> bool {
        matches!(self, StackError::StackOperationFailed { .. })
    }

    /// Resource-level failure reasons collected before the error was raised.
    pub fn diagnostics(&self) -> &[ResourceFailure] {
        match self {
            StackError::StackOperationFailed { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

/// An identity (STS) call failed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct IdentityError {
    pub code: Option<String>,
    pub message: String,
}

impl IdentityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// Credential federation errors
#[derive(Debug, Error)]
pub enum FederationError {
    #[error("Failed to assume role: {0}")]
    AssumeRoleFailed(#[source] IdentityError),

    #[error("STS AssumeRole response did not contain credentials")]
    MissingCredentials,
}

/// Application-level errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Federation(#[from] FederationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Aborted: {0}")]
    Aborted(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}
