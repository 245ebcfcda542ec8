//! Stack lifecycle: descriptors, engine seam, status classification and the
//! orchestrator that drives a stack to a terminal state.

pub mod descriptor;
pub mod diagnostics;
pub mod engine;
pub mod events;
pub mod orchestrator;
pub mod status;


pub use descriptor::{StackDescriptor, StackParameters};
pub use diagnostics::ResourceFailure;
pub use engine::{
    Capability, ChangeRequest, DescribeOutcome, EngineFactory, ProvisioningEngine,
    StackEventRecord, StackOutput, StackSnapshot, UpdateOutcome,
};
pub use events::{
    JsonLinesObserver, LifecycleEvent, LifecycleObserver, Operation, RecordingObserver,
    TracingObserver,
};
pub use orchestrator::{
    StackReport, StackSession, UpsertAction, CAPABILITIES, MAX_POLL_ATTEMPTS, POLL_INTERVAL,
};
pub use status::{StackStatus, StatusClass};
