//! End-to-end stack lifecycle runs against the in-memory engine.

use super::support::FakeCloud;
use stackwright::error::StackError;
use stackwright::stack::{
    LifecycleEvent, RecordingObserver, StackDescriptor, StackParameters, StackSession,
    StackStatus, UpsertAction,
};
use std::sync::Arc;

fn descriptor(name: &str) -> StackDescriptor {
    StackDescriptor::new(
        name,
        r#"{"Resources":{}}"#,
        StackParameters::new().with("ClassB", "10"),
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn fresh_stack_is_created_and_reports_outputs() {
    let cloud = FakeCloud::new(3);
    let mut session = StackSession::new(cloud.clone(), "us-west-2");

    let report = session.upsert_stack(&descriptor("network")).await.unwrap();

    assert_eq!(report.action, UpsertAction::Created);
    assert_eq!(report.status, StackStatus::CreateComplete);
    assert_eq!(report.outputs.len(), 1);
    assert_eq!(cloud.mutating_calls(), vec!["create:network"]);
    assert_eq!(
        cloud.parameters_sent("network").unwrap(),
        vec![("ClassB".to_string(), "10".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn second_apply_updates_the_same_stack() {
    let cloud = FakeCloud::new(1);
    let mut session = StackSession::new(cloud.clone(), "us-west-2");

    let first = session.upsert_stack(&descriptor("network")).await.unwrap();
    let second = session.upsert_stack(&descriptor("network")).await.unwrap();
    let third = session.upsert_stack(&descriptor("network")).await.unwrap();

    assert_eq!(first.action, UpsertAction::Created);
    assert_eq!(second.action, UpsertAction::Updated);
    assert_eq!(third.action, UpsertAction::Updated);
    assert_eq!(third.status, StackStatus::UpdateComplete);
    assert_eq!(
        cloud.mutating_calls(),
        vec!["create:network", "update:network", "update:network"]
    );
}

#[tokio::test(start_paused = true)]
async fn rolled_back_stack_is_recreated_without_update() {
    let cloud = FakeCloud::new(2);
    cloud.seed("database", StackStatus::RollbackComplete);
    let mut session = StackSession::new(cloud.clone(), "us-west-2");

    let report = session.upsert_stack(&descriptor("database")).await.unwrap();

    assert_eq!(report.action, UpsertAction::Recreated);
    assert_eq!(report.status, StackStatus::CreateComplete);
    assert_eq!(
        cloud.mutating_calls(),
        vec!["delete:database", "create:database"]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_create_surfaces_resource_reasons() {
    let cloud = FakeCloud::new(1);
    cloud.fail_create("queue", "DeadLetterQueue", "Queue name already taken");
    let mut session = StackSession::new(cloud.clone(), "us-west-2");

    let err = session.upsert_stack(&descriptor("queue")).await.unwrap_err();

    assert!(err.is_rejected());
    match &err {
        StackError::StackOperationFailed { name, status, .. } => {
            assert_eq!(name, "queue");
            assert_eq!(*status, StackStatus::RollbackComplete);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let diagnostics = err.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].logical_resource_id, "DeadLetterQueue");
    assert_eq!(diagnostics[0].reason, "Queue name already taken");

    // The next apply recovers by recreating the rolled-back stack.
    let report = session.upsert_stack(&descriptor("queue")).await.unwrap();
    assert_eq!(report.action, UpsertAction::Recreated);
}

#[tokio::test(start_paused = true)]
async fn delete_waits_until_gone_and_is_idempotent() {
    let cloud = FakeCloud::new(2);
    cloud.seed("legacy", StackStatus::UpdateComplete);
    let mut session = StackSession::new(cloud.clone(), "us-west-2");

    session.delete_stack("legacy").await.unwrap();
    assert_eq!(cloud.status_of("legacy"), None);

    session.delete_stack("legacy").await.unwrap();
    assert_eq!(cloud.mutating_calls(), vec!["delete:legacy"]);
}

#[tokio::test(start_paused = true)]
async fn observer_sees_run_from_start_to_completion() {
    let cloud = FakeCloud::new(1);
    let recorder = Arc::new(RecordingObserver::new());
    let mut session =
        StackSession::new(cloud.clone(), "eu-west-1").with_observer(recorder.clone());

    session.upsert_stack(&descriptor("cache")).await.unwrap();

    let events = recorder.events();
    assert!(matches!(
        events.first(),
        Some(LifecycleEvent::RunStarted { region, .. }) if region == "eu-west-1"
    ));
    assert!(events
        .iter()
        .any(|e| matches!(e, LifecycleEvent::CreateIssued { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, LifecycleEvent::Polled { attempt: 1, .. })));
    assert!(matches!(
        events.last(),
        Some(LifecycleEvent::Completed { status: StackStatus::CreateComplete, .. })
    ));
    assert!(events.iter().all(|e| e.stack() == "cache"));
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_engine_once() {
    let cloud = FakeCloud::new(0);
    let mut session = StackSession::new(cloud.clone(), "us-west-2");
    session.upsert_stack(&descriptor("tiny")).await.unwrap();

    session.shutdown().await.unwrap();
    assert_eq!(cloud.shutdowns(), 1);
}
