//! In-memory provisioning engine that walks stacks through their lifecycle.

use async_trait::async_trait;
use parking_lot::Mutex;
use stackwright::error::EngineError;
use stackwright::stack::{
    ChangeRequest, DescribeOutcome, ProvisioningEngine, StackEventRecord, StackOutput,
    StackSnapshot, StackStatus, UpdateOutcome,
};
use std::collections::HashMap;
use std::sync::Arc;

struct FakeStack {
    status: StackStatus,
    settles_as: StackStatus,
    polls_left: u32,
    outputs: Vec<StackOutput>,
    events: Vec<StackEventRecord>,
}

#[derive(Default)]
struct FakeState {
    stacks: HashMap<String, FakeStack>,
    failing_creates: HashMap<String, (String, String)>,
    parameters: HashMap<String, Vec<(String, String)>>,
    calls: Vec<String>,
    shutdowns: usize,
}

/// Cloneable handle; clones share one fake account.
#[derive(Clone, Default)]
pub struct FakeCloud {
    state: Arc<Mutex<FakeState>>,
    polls_per_operation: u32,
}

impl FakeCloud {
    pub fn new(polls_per_operation: u32) -> Self {
        Self {
            state: Arc::default(),
            polls_per_operation,
        }
    }

    /// Seed an existing stack in a settled status.
    pub fn seed(&self, name: &str, status: StackStatus) {
        self.state.lock().stacks.insert(
            name.to_string(),
            FakeStack {
                status: status.clone(),
                settles_as: status,
                polls_left: 0,
                outputs: Vec::new(),
                events: Vec::new(),
            },
        );
    }

    /// The next create of `name` rolls back, blaming `resource`.
    pub fn fail_create(&self, name: &str, resource: &str, reason: &str) {
        self.state.lock().failing_creates.insert(
            name.to_string(),
            (resource.to_string(), reason.to_string()),
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("describe") && !c.starts_with("events"))
            .collect()
    }

    pub fn parameters_sent(&self, name: &str) -> Option<Vec<(String, String)>> {
        self.state.lock().parameters.get(name).cloned()
    }

    pub fn status_of(&self, name: &str) -> Option<StackStatus> {
        self.state.lock().stacks.get(name).map(|s| s.status.clone())
    }

    pub fn shutdowns(&self) -> usize {
        self.state.lock().shutdowns
    }

    fn start(&self, name: &str, status: StackStatus, settles_as: StackStatus) {
        let mut state = self.state.lock();
        let polls_left = self.polls_per_operation;
        let stack = state.stacks.entry(name.to_string()).or_insert_with(|| FakeStack {
            status: status.clone(),
            settles_as: settles_as.clone(),
            polls_left,
            outputs: Vec::new(),
            events: Vec::new(),
        });
        stack.status = status;
        stack.settles_as = settles_as;
        stack.polls_left = polls_left;
    }
}

#[async_trait]
impl ProvisioningEngine for FakeCloud {
    async fn describe_stack(&self, name: &str) -> Result<DescribeOutcome, EngineError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.calls.push(format!("describe:{}", name));
        let Some(stack) = state.stacks.get_mut(name) else {
            return Ok(DescribeOutcome::NotFound);
        };
        if stack.polls_left > 0 {
            stack.polls_left -= 1;
        } else {
            stack.status = stack.settles_as.clone();
        }
        if stack.status == StackStatus::DeleteComplete {
            state.stacks.remove(name);
            return Ok(DescribeOutcome::NotFound);
        }
        let mut snapshot = StackSnapshot::new(name, stack.status.clone());
        snapshot.outputs = stack.outputs.clone();
        Ok(DescribeOutcome::Found(snapshot))
    }

    async fn create_stack(&self, request: ChangeRequest<'_>) -> Result<(), EngineError> {
        let name = request.descriptor.name().to_string();
        let failure = {
            let mut state = self.state.lock();
            state.calls.push(format!("create:{}", name));
            state.parameters.insert(
                name.clone(),
                request
                    .descriptor
                    .parameters()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
            state.failing_creates.remove(&name)
        };

        match failure {
            Some((resource, reason)) => {
                self.start(&name, StackStatus::CreateInProgress, StackStatus::RollbackComplete);
                let mut state = self.state.lock();
                if let Some(stack) = state.stacks.get_mut(&name) {
                    stack.events = vec![
                        StackEventRecord {
                            logical_resource_id: Some(name.clone()),
                            resource_status: Some("ROLLBACK_COMPLETE".to_string()),
                            resource_status_reason: None,
                            timestamp: None,
                        },
                        StackEventRecord {
                            logical_resource_id: Some(resource),
                            resource_status: Some("CREATE_FAILED".to_string()),
                            resource_status_reason: Some(reason),
                            timestamp: None,
                        },
                    ];
                }
            }
            None => {
                self.start(&name, StackStatus::CreateInProgress, StackStatus::CreateComplete);
                let mut state = self.state.lock();
                if let Some(stack) = state.stacks.get_mut(&name) {
                    stack.outputs = vec![StackOutput {
                        key: "StackName".to_string(),
                        value: name.clone(),
                        description: None,
                    }];
                    stack.events.clear();
                }
            }
        }
        Ok(())
    }

    async fn update_stack(&self, request: ChangeRequest<'_>) -> Result<UpdateOutcome, EngineError> {
        let name = request.descriptor.name();
        self.state.lock().calls.push(format!("update:{}", name));
        self.start(name, StackStatus::UpdateInProgress, StackStatus::UpdateComplete);
        Ok(UpdateOutcome::Started)
    }

    async fn delete_stack(&self, name: &str) -> Result<(), EngineError> {
        self.state.lock().calls.push(format!("delete:{}", name));
        self.start(name, StackStatus::DeleteInProgress, StackStatus::DeleteComplete);
        Ok(())
    }

    async fn list_stack_events(&self, name: &str) -> Result<Vec<StackEventRecord>, EngineError> {
        let mut state = self.state.lock();
        state.calls.push(format!("events:{}", name));
        Ok(state
            .stacks
            .get(name)
            .map(|s| s.events.clone())
            .unwrap_or_default())
    }

    async fn shutdown(&self) -> Result<(), EngineError> {
        self.state.lock().shutdowns += 1;
        Ok(())
    }
}
