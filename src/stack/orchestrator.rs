//! Stack lifecycle orchestrator.
//!
//! Decides between create, update and delete-then-create for a stack, issues
//! the mutating call, then polls the engine on a fixed interval until the
//! stack reaches a terminal status or the attempt cap runs out. Every remote
//! call is issued sequentially; the only waits are the poll sleeps.

use crate::error::{EngineError, StackError};
use crate::stack::diagnostics::{failed_resources, ResourceFailure};
use crate::stack::engine::{
    Capability, ChangeRequest, DescribeOutcome, ProvisioningEngine, StackOutput, StackSnapshot,
    UpdateOutcome,
};
use crate::stack::events::{LifecycleEvent, LifecycleObserver, Operation, TracingObserver};
use crate::stack::{StackDescriptor, StackStatus, StatusClass};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Delay between two describe calls while waiting for a terminal status.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll cap. 180 × 5s is 15 minutes, enough for slow resources such as
/// database clusters.
pub const MAX_POLL_ATTEMPTS: u32 = 180;

/// Capabilities sent with every create and update.
pub const CAPABILITIES: [Capability; 2] = [Capability::Iam, Capability::NamedIam];

/// Which path an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    Created,
    Updated,
    Unchanged,
    Recreated,
}

/// Successful outcome of an upsert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackReport {
    pub stack_name: String,
    pub action: UpsertAction,
    pub status: StackStatus,
    pub outputs: Vec<StackOutput>,
}

/// A stack session bound to one engine transport and one region.
pub struct StackSession<E> {
    engine: E,
    region: String,
    observer: Arc<dyn LifecycleObserver>,
}

impl<E: ProvisioningEngine> StackSession<E> {
    pub fn new(engine: E, region: impl Into<String>) -> Self {
        Self {
            engine,
            region: region.into(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Create the stack if absent, update it if healthy, or delete and
    /// recreate it when its status forbids updates.
    #[instrument(skip(self, descriptor), fields(stack = %descriptor.name(), region = %self.region))]
    pub async fn upsert_stack(
        &mut self,
        descriptor: &StackDescriptor,
    ) -> Result<StackReport, StackError> {
        let name = descriptor.name();
        self.emit(LifecycleEvent::RunStarted {
            stack: name.to_string(),
            operation: Operation::Upsert,
            region: self.region.clone(),
        });

        let request = ChangeRequest {
            descriptor,
            capabilities: &CAPABILITIES,
        };

        let action = match self.engine.describe_stack(name).await? {
            DescribeOutcome::NotFound => {
                self.create(request).await?;
                UpsertAction::Created
            }
            DescribeOutcome::Found(snapshot) if snapshot.status.requires_recreate() => {
                self.emit(LifecycleEvent::RecoveryStarted {
                    stack: name.to_string(),
                    status: snapshot.status,
                });
                self.engine.delete_stack(name).await?;
                self.emit(LifecycleEvent::DeleteIssued {
                    stack: name.to_string(),
                });
                self.wait_for_deletion(name).await?;
                self.create(request).await?;
                UpsertAction::Recreated
            }
            DescribeOutcome::Found(snapshot) => {
                debug!(status = %snapshot.status, "Stack exists, updating");
                match self.engine.update_stack(request).await? {
                    UpdateOutcome::Started => {
                        self.emit(LifecycleEvent::UpdateIssued {
                            stack: name.to_string(),
                            changes: true,
                        });
                        UpsertAction::Updated
                    }
                    UpdateOutcome::NoChanges => {
                        // Nothing was started, so the entry status is final.
                        self.emit(LifecycleEvent::UpdateIssued {
                            stack: name.to_string(),
                            changes: false,
                        });
                        self.emit(LifecycleEvent::Completed {
                            stack: name.to_string(),
                            status: snapshot.status.clone(),
                        });
                        return Ok(StackReport {
                            stack_name: name.to_string(),
                            action: UpsertAction::Unchanged,
                            status: snapshot.status,
                            outputs: snapshot.outputs,
                        });
                    }
                }
            }
        };

        let snapshot = self.wait_for_completion(name).await?;
        Ok(StackReport {
            stack_name: name.to_string(),
            action,
            status: snapshot.status,
            outputs: snapshot.outputs,
        })
    }

    /// Delete the stack and wait until it is gone. Deleting a stack that does
    /// not exist succeeds without issuing a delete call.
    #[instrument(skip(self), fields(region = %self.region))]
    pub async fn delete_stack(&mut self, name: &str) -> Result<(), StackError> {
        self.emit(LifecycleEvent::RunStarted {
            stack: name.to_string(),
            operation: Operation::Delete,
            region: self.region.clone(),
        });

        match self.engine.describe_stack(name).await? {
            DescribeOutcome::NotFound => {
                self.emit(LifecycleEvent::AlreadyAbsent {
                    stack: name.to_string(),
                });
                return Ok(());
            }
            DescribeOutcome::Found(snapshot) if snapshot.status == StackStatus::DeleteComplete => {
                self.emit(LifecycleEvent::AlreadyAbsent {
                    stack: name.to_string(),
                });
                return Ok(());
            }
            DescribeOutcome::Found(_) => {}
        }

        self.engine.delete_stack(name).await?;
        self.emit(LifecycleEvent::DeleteIssued {
            stack: name.to_string(),
        });
        self.wait_for_deletion(name).await
    }

    /// Release the engine transport.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        self.engine.shutdown().await
    }

    async fn create(&self, request: ChangeRequest<'_>) -> Result<(), StackError> {
        let name = request.descriptor.name();
        self.engine.create_stack(request).await?;
        self.emit(LifecycleEvent::CreateIssued {
            stack: name.to_string(),
        });
        Ok(())
    }

    async fn wait_for_completion(&self, name: &str) -> Result<StackSnapshot, StackError> {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            let snapshot = match self.engine.describe_stack(name).await? {
                DescribeOutcome::Found(snapshot) => snapshot,
                DescribeOutcome::NotFound => {
                    return Err(StackError::StackNotFound(name.to_string()))
                }
            };

            match snapshot.status.class() {
                StatusClass::SuccessTerminal => {
                    self.emit(LifecycleEvent::Completed {
                        stack: name.to_string(),
                        status: snapshot.status.clone(),
                    });
                    return Ok(snapshot);
                }
                StatusClass::FailureTerminal => {
                    return Err(self.operation_failed(name, snapshot.status).await);
                }
                StatusClass::Transient => {
                    self.emit(LifecycleEvent::Polled {
                        stack: name.to_string(),
                        status: snapshot.status,
                        attempt,
                    });
                    if attempt < MAX_POLL_ATTEMPTS {
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                }
            }
        }

        Err(self.timed_out(name))
    }

    async fn wait_for_deletion(&self, name: &str) -> Result<(), StackError> {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            let status = match self.engine.describe_stack(name).await? {
                DescribeOutcome::NotFound => None,
                DescribeOutcome::Found(snapshot) => Some(snapshot.status),
            };

            match status {
                None | Some(StackStatus::DeleteComplete) => {
                    self.emit(LifecycleEvent::Deleted {
                        stack: name.to_string(),
                    });
                    return Ok(());
                }
                Some(StackStatus::DeleteFailed) => {
                    return Err(self.operation_failed(name, StackStatus::DeleteFailed).await);
                }
                Some(status) => {
                    self.emit(LifecycleEvent::Polled {
                        stack: name.to_string(),
                        status,
                        attempt,
                    });
                    if attempt < MAX_POLL_ATTEMPTS {
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                }
            }
        }

        Err(self.timed_out(name))
    }

    /// Collect diagnostics, then build the failure. A failing event fetch is
    /// reported to the observer and otherwise ignored.
    async fn operation_failed(&self, name: &str, status: StackStatus) -> StackError {
        let diagnostics = self.collect_diagnostics(name).await;
        self.emit(LifecycleEvent::Failed {
            stack: name.to_string(),
            status: status.clone(),
            diagnostics: diagnostics.clone(),
        });
        StackError::StackOperationFailed {
            name: name.to_string(),
            status,
            diagnostics,
        }
    }

    async fn collect_diagnostics(&self, name: &str) -> Vec<ResourceFailure> {
        match self.engine.list_stack_events(name).await {
            Ok(events) => failed_resources(&events),
            Err(e) => {
                self.emit(LifecycleEvent::DiagnosticsUnavailable {
                    stack: name.to_string(),
                    error: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    fn timed_out(&self, name: &str) -> StackError {
        self.emit(LifecycleEvent::TimedOut {
            stack: name.to_string(),
            attempts: MAX_POLL_ATTEMPTS,
        });
        StackError::Timeout(name.to_string())
    }

    fn emit(&self, event: LifecycleEvent) {
        self.observer.on_event(&event);
    }
}
