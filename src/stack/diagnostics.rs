//! Resource-level failure reasons pulled from a stack's event history.

use crate::stack::engine::StackEventRecord;
use crate::stack::status::is_failed_resource_status;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFailure {
    pub logical_resource_id: String,
    pub reason: String,
}

/// Keep failed events that name both a resource and a reason, in engine order.
pub fn failed_resources(events: &[StackEventRecord]) -> Vec<ResourceFailure> {
    events
        .iter()
        .filter(|event| {
            event
                .resource_status
                .as_deref()
                .is_some_and(is_failed_resource_status)
        })
        .filter_map(|event| {
            Some(ResourceFailure {
                logical_resource_id: event.logical_resource_id.clone()?,
                reason: event.resource_status_reason.clone()?,
            })
        })
        .collect()
}
