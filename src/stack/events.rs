//! Lifecycle events emitted while a stack run progresses, and the observers
//! that consume them.

use crate::stack::{ResourceFailure, StackStatus};
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Upsert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    RunStarted {
        stack: String,
        operation: Operation,
        region: String,
    },
    RecoveryStarted {
        stack: String,
        status: StackStatus,
    },
    CreateIssued {
        stack: String,
    },
    UpdateIssued {
        stack: String,
        changes: bool,
    },
    DeleteIssued {
        stack: String,
    },
    AlreadyAbsent {
        stack: String,
    },
    Polled {
        stack: String,
        status: StackStatus,
        attempt: u32,
    },
    Completed {
        stack: String,
        status: StackStatus,
    },
    Deleted {
        stack: String,
    },
    Failed {
        stack: String,
        status: StackStatus,
        diagnostics: Vec<ResourceFailure>,
    },
    DiagnosticsUnavailable {
        stack: String,
        error: String,
    },
    TimedOut {
        stack: String,
        attempts: u32,
    },
}

impl LifecycleEvent {
    pub fn stack(&self) -> &str {
        match self {
            LifecycleEvent::RunStarted { stack, .. }
            | LifecycleEvent::RecoveryStarted { stack, .. }
            | LifecycleEvent::CreateIssued { stack }
            | LifecycleEvent::UpdateIssued { stack, .. }
            | LifecycleEvent::DeleteIssued { stack }
            | LifecycleEvent::AlreadyAbsent { stack }
            | LifecycleEvent::Polled { stack, .. }
            | LifecycleEvent::Completed { stack, .. }
            | LifecycleEvent::Deleted { stack }
            | LifecycleEvent::Failed { stack, .. }
            | LifecycleEvent::DiagnosticsUnavailable { stack, .. }
            | LifecycleEvent::TimedOut { stack, .. } => stack,
        }
    }
}

pub trait LifecycleObserver: Send + Sync {
    fn on_event(&self, event: &LifecycleEvent);
}

/// Reports lifecycle events as structured `tracing` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn on_event(&self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::RunStarted {
                stack,
                operation,
                region,
            } => info!(stack = %stack, ?operation, region = %region, "Stack run started"),
            LifecycleEvent::RecoveryStarted { stack, status } => warn!(
                stack = %stack,
                status = %status,
                "Stack is in an unrecoverable state, deleting before create"
            ),
            LifecycleEvent::CreateIssued { stack } => {
                info!(stack = %stack, "Stack creation initiated")
            }
            LifecycleEvent::UpdateIssued { stack, changes } => {
                if *changes {
                    info!(stack = %stack, "Stack update initiated")
                } else {
                    info!(stack = %stack, "No updates to perform")
                }
            }
            LifecycleEvent::DeleteIssued { stack } => {
                info!(stack = %stack, "Stack deletion initiated")
            }
            LifecycleEvent::AlreadyAbsent { stack } => {
                info!(stack = %stack, "Stack does not exist, nothing to delete")
            }
            LifecycleEvent::Polled {
                stack,
                status,
                attempt,
            } => debug!(stack = %stack, status = %status, attempt, "Stack status"),
            LifecycleEvent::Completed { stack, status } => {
                info!(stack = %stack, status = %status, "Stack operation completed")
            }
            LifecycleEvent::Deleted { stack } => info!(stack = %stack, "Stack deleted"),
            LifecycleEvent::Failed {
                stack,
                status,
                diagnostics,
            } => {
                warn!(
                    stack = %stack,
                    status = %status,
                    failures = diagnostics.len(),
                    "Stack operation failed"
                );
                for failure in diagnostics {
                    warn!(
                        stack = %stack,
                        resource = %failure.logical_resource_id,
                        reason = %failure.reason,
                        "Resource failed"
                    );
                }
            }
            LifecycleEvent::DiagnosticsUnavailable { stack, error } => warn!(
                stack = %stack,
                error = %error,
                "Could not fetch stack events (stack may be deleted)"
            ),
            LifecycleEvent::TimedOut { stack, attempts } => {
                warn!(stack = %stack, attempts, "Timed out waiting for stack")
            }
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().clone()
    }
}

impl LifecycleObserver for RecordingObserver {
    fn on_event(&self, event: &LifecycleEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Writes one JSON object per event to the wrapped writer.
pub struct JsonLinesObserver {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesObserver {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }
}

impl LifecycleObserver for JsonLinesObserver {
    fn on_event(&self, event: &LifecycleEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize lifecycle event: {}", e);
                return;
            }
        };
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("Failed to write lifecycle event: {}", e);
        }
    }
}
