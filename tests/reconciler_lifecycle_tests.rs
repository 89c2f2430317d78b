//! # Registration Lifecycle Tests
//!
//! Create, read, update, delete and import against the in-memory registry.
//!
//! These tests verify:
//! - Removed targets are deregistered on update, before new ones are registered
//! - A missing target group is "already absent" for delete and update's remove step
//! - An absent describe payload is an error, an empty one is zero members
//! - Transient client errors are retried on create only, within the budget
//! - Server-assigned ports stay stable across plans

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::time::Duration;
use target_group_registration::controller::reconciler::{Action, ReconcilerError};
use target_group_registration::observability::metrics;
use target_group_registration::provider::memory::RegistryCall;
use target_group_registration::provider::MembershipMutator;
use target_group_registration::resource::{
    AttributeValue, Member, RegistrationSpec, RegistrationState, TargetSpec,
};

#[tokio::test]
async fn test_create_registers_targets_and_learns_ports() {
    let (registry, reconciler) = harness();
    let desired = RegistrationSpec::new(
        GROUP_ARN,
        vec![
            TargetSpec::new("i-1"),
            TargetSpec {
                port: Some(81),
                ..TargetSpec::new("i-2")
            },
        ],
    );

    let state = reconciler.create(&desired).await.unwrap();

    assert_eq!(state.id, GROUP_ARN);
    assert_eq!(state.targets.get("i-1").unwrap().port, AttributeValue::Known(80));
    assert_eq!(state.targets.get("i-2").unwrap().port, AttributeValue::Known(81));
    assert_eq!(
        registry.calls(),
        vec![
            RegistryCall::Add(ids(&["i-1", "i-2"])),
            RegistryCall::Describe(ids(&["i-1", "i-2"])),
        ]
    );
}

#[tokio::test]
async fn test_create_with_no_targets_makes_no_calls() {
    let (registry, reconciler) = harness();

    let state = reconciler.create(&spec(&[])).await.unwrap();

    assert_eq!(state, RegistrationState::from_identifier(group()));
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_desired_state_is_rejected_before_any_call() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1"])).await.unwrap();
    registry.clear_calls();

    let bad_arn = RegistrationSpec::new("arn:aws:s3:::bucket", vec![TargetSpec::new("i-1")]);
    let bad_port = RegistrationSpec::new(
        GROUP_ARN,
        vec![TargetSpec {
            port: Some(0),
            ..TargetSpec::new("i-1")
        }],
    );

    assert!(matches!(
        reconciler.create(&bad_arn).await,
        Err(ReconcilerError::Validation(_))
    ));
    assert!(matches!(
        reconciler.create(&spec(&["i-1", "i-1"])).await,
        Err(ReconcilerError::Validation(_))
    ));
    assert!(matches!(
        reconciler.update(&bad_port, &prior).await,
        Err(ReconcilerError::Validation(_))
    ));
    assert!(matches!(
        reconciler.import("not-an-arn").await,
        Err(ReconcilerError::Validation(_))
    ));
    assert!(registry.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_create_retries_transient_errors() {
    let (registry, reconciler) = harness();
    registry.fail_next_add(transient());
    registry.fail_next_add(transient());

    let state = reconciler.create(&spec(&["i-1"])).await.unwrap();

    assert_eq!(state.targets.len(), 1);
    assert_eq!(add_calls(&registry.calls()), 3);
    assert!(registry.registered(&group()).unwrap().contains("i-1"));
}

#[tokio::test(start_paused = true)]
async fn test_create_gives_up_when_retry_budget_is_spent() {
    let (registry, reconciler) = harness();
    for _ in 0..50 {
        registry.fail_next_add(transient());
    }

    let err = reconciler.create(&spec(&["i-1"])).await.unwrap_err();

    match err {
        ReconcilerError::RetryExhausted { elapsed, source, .. } => {
            assert!(elapsed >= Duration::from_secs(10), "elapsed {elapsed:?}");
            assert!(source.is_transient());
        }
        other => panic!("expected RetryExhausted, got {other:?}"),
    }
    assert!(add_calls(&registry.calls()) > 1);
    assert!(registry.registered(&group()).unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_zero_budget_tries_once() {
    let config = target_group_registration::config::ReconcilerConfig {
        create_retry_timeout_secs: 0,
        ..test_config()
    };
    let (registry, reconciler) = harness_with_config(config);
    registry.fail_next_add(transient());

    let err = reconciler.create(&spec(&["i-1"])).await.unwrap_err();

    assert!(matches!(err, ReconcilerError::RetryExhausted { .. }));
    assert_eq!(add_calls(&registry.calls()), 1);
}

#[tokio::test]
async fn test_create_fails_fast_on_other_errors() {
    let (registry, reconciler) = harness();
    registry.fail_next_add(api_error());

    let err = reconciler.create(&spec(&["i-1"])).await.unwrap_err();

    assert!(matches!(
        err,
        ReconcilerError::Remote {
            action: Action::Creating,
            ..
        }
    ));
    assert_eq!(add_calls(&registry.calls()), 1);
}

#[tokio::test]
async fn test_create_in_missing_group_is_an_error() {
    let (_registry, reconciler) = harness();
    let desired = RegistrationSpec::new(OTHER_GROUP_ARN, vec![TargetSpec::new("i-1")]);

    let err = reconciler.create(&desired).await.unwrap_err();

    match err {
        ReconcilerError::Remote { action, source, .. } => {
            assert_eq!(action, Action::Creating);
            assert!(source.is_group_not_found());
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_reflects_out_of_band_deregistration() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1", "i-2"])).await.unwrap();
    registry
        .remove_members(&group(), &[Member::new("i-2")])
        .await
        .unwrap();

    let state = reconciler.read(&prior).await.unwrap().unwrap();

    assert_eq!(state.targets.to_vec(), vec![Member::new("i-1").with_port(80)]);
}

#[tokio::test]
async fn test_read_skips_draining_targets() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1", "i-2"])).await.unwrap();
    registry.start_draining(&group(), "i-2");

    let state = reconciler.read(&prior).await.unwrap().unwrap();

    assert!(state.targets.contains("i-1"));
    assert!(!state.targets.contains("i-2"));
}

#[tokio::test]
async fn test_read_of_missing_group_signals_not_found() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1"])).await.unwrap();
    registry.delete_group(&group());

    assert_eq!(reconciler.read(&prior).await.unwrap(), None);
}

#[tokio::test]
async fn test_read_absent_payload_is_empty_result() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1"])).await.unwrap();
    registry.set_absent_payload(true);

    let err = reconciler.read(&prior).await.unwrap_err();

    assert!(matches!(
        err,
        ReconcilerError::EmptyResult {
            action: Action::Reading,
            ..
        }
    ));
}

#[tokio::test]
async fn test_read_empty_payload_is_zero_members() {
    let (_registry, reconciler) = harness();
    let prior = RegistrationState::from_identifier(group());

    let state = reconciler.read(&prior).await.unwrap().unwrap();

    assert!(state.targets.is_empty());
    assert_eq!(state.id, GROUP_ARN);
}

#[tokio::test]
async fn test_read_rejects_inconsistent_state() {
    let (registry, reconciler) = harness();
    let mut prior = RegistrationState::from_identifier(group());
    prior.id = OTHER_GROUP_ARN.to_string();

    assert!(matches!(
        reconciler.read(&prior).await,
        Err(ReconcilerError::State(_))
    ));
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_update_deregisters_removed_targets() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["A", "B"])).await.unwrap();
    registry.clear_calls();

    let state = reconciler.update(&spec(&["B", "C"]), &prior).await.unwrap();

    assert_eq!(
        registry.calls(),
        vec![
            RegistryCall::Remove(ids(&["A"])),
            RegistryCall::Add(ids(&["C"])),
            RegistryCall::Describe(ids(&["B", "C"])),
        ]
    );
    let registered = registry.registered(&group()).unwrap();
    assert_eq!(
        registered.ids().into_iter().collect::<Vec<_>>(),
        vec!["B", "C"]
    );
    assert_eq!(
        state.targets.to_vec(),
        vec![Member::new("B").with_port(80), Member::new("C").with_port(80)]
    );
}

#[tokio::test]
async fn test_update_to_empty_removes_everything() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["X"])).await.unwrap();
    registry.clear_calls();

    let state = reconciler.update(&spec(&[]), &prior).await.unwrap();

    assert!(state.targets.is_empty());
    assert!(registry.registered(&group()).unwrap().is_empty());
    assert_eq!(add_calls(&registry.calls()), 0);
}

#[tokio::test]
async fn test_update_tolerates_group_vanishing_during_remove() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["A", "B"])).await.unwrap();
    registry.clear_calls();
    registry.fail_next_remove(group_not_found());

    let state = reconciler.update(&spec(&["B", "C"]), &prior).await.unwrap();

    assert_eq!(registry.calls(), vec![RegistryCall::Remove(ids(&["A"]))]);
    assert_eq!(
        state.targets.ids().into_iter().collect::<Vec<_>>(),
        vec!["B", "C"]
    );
}

#[tokio::test]
async fn test_update_remove_failure_aborts_before_add() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["A", "B"])).await.unwrap();
    registry.clear_calls();
    registry.fail_next_remove(api_error());

    let err = reconciler.update(&spec(&["B", "C"]), &prior).await.unwrap_err();

    assert!(matches!(
        err,
        ReconcilerError::Remote {
            action: Action::Updating,
            ..
        }
    ));
    assert_eq!(registry.calls(), vec![RegistryCall::Remove(ids(&["A"]))]);
    assert!(registry.registered(&group()).unwrap().contains("A"));
}

#[tokio::test]
async fn test_update_does_not_retry_transient_errors() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["A"])).await.unwrap();
    registry.clear_calls();
    registry.fail_next_add(transient());

    let err = reconciler.update(&spec(&["A", "B"]), &prior).await.unwrap_err();

    assert!(matches!(
        err,
        ReconcilerError::Remote {
            action: Action::Updating,
            ..
        }
    ));
    assert_eq!(add_calls(&registry.calls()), 1);
}

#[tokio::test]
async fn test_update_keeps_server_assigned_port() {
    let (registry, reconciler) = harness();
    registry.seed(&group(), &[Member::new("i-1").with_port(8080)]);
    let prior = reconciler.import(GROUP_ARN).await.unwrap();
    registry.clear_calls();

    let unchanged = reconciler.update(&spec(&["i-1"]), &prior).await.unwrap();
    assert_eq!(unchanged.targets.get("i-1").unwrap().port, AttributeValue::Known(8080));
    assert!(registry.calls().is_empty());

    let grown = reconciler
        .update(&spec(&["i-1", "i-2"]), &unchanged)
        .await
        .unwrap();
    assert_eq!(grown.targets.get("i-1").unwrap().port, AttributeValue::Known(8080));
    assert_eq!(grown.targets.get("i-2").unwrap().port, AttributeValue::Known(80));
    assert_eq!(add_calls(&registry.calls()), 1);
}

#[tokio::test]
async fn test_update_ignores_zone_drift() {
    let (registry, reconciler) = harness();
    let zoned = |zone: &str| {
        RegistrationSpec::new(
            GROUP_ARN,
            vec![TargetSpec {
                availability_zone: Some(zone.to_string()),
                ..TargetSpec::new("10.0.0.1")
            }],
        )
    };
    let prior = reconciler.create(&zoned("us-west-2a")).await.unwrap();
    registry.clear_calls();

    reconciler.update(&zoned("us-west-2b"), &prior).await.unwrap();

    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_update_with_new_group_requires_replacement() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1"])).await.unwrap();
    registry.clear_calls();
    let desired = RegistrationSpec::new(OTHER_GROUP_ARN, vec![TargetSpec::new("i-1")]);

    let err = reconciler.update(&desired, &prior).await.unwrap_err();

    match err {
        ReconcilerError::RequiresReplacement { from, to } => {
            assert_eq!(from, group());
            assert_eq!(to, other_group());
        }
        other => panic!("expected RequiresReplacement, got {other:?}"),
    }
    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_delete_twice_succeeds() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1", "i-2"])).await.unwrap();

    reconciler.delete(&prior).await.unwrap();
    reconciler.delete(&prior).await.unwrap();

    assert!(registry.registered(&group()).unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_of_missing_group_succeeds() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1"])).await.unwrap();
    registry.delete_group(&group());

    assert!(reconciler.delete(&prior).await.is_ok());
}

#[tokio::test]
async fn test_delete_surfaces_other_errors() {
    let (registry, reconciler) = harness();
    let prior = reconciler.create(&spec(&["i-1"])).await.unwrap();
    registry.fail_next_remove(api_error());

    let err = reconciler.delete(&prior).await.unwrap_err();

    assert!(matches!(
        err,
        ReconcilerError::Remote {
            action: Action::Deleting,
            ..
        }
    ));
    assert!(err.to_string().starts_with("deleting ELBv2 Target Group Registration ("));
}

#[tokio::test]
async fn test_delete_without_targets_makes_no_calls() {
    let (registry, reconciler) = harness();

    reconciler
        .delete(&RegistrationState::from_identifier(group()))
        .await
        .unwrap();

    assert!(registry.calls().is_empty());
}

#[tokio::test]
async fn test_import_reads_every_registered_target() {
    let (registry, reconciler) = harness();
    registry.seed(
        &group(),
        &[Member::new("i-1").with_port(8080), Member::new("i-2")],
    );

    let state = reconciler.import(GROUP_ARN).await.unwrap();

    assert_eq!(state.id, GROUP_ARN);
    assert_eq!(
        state.targets.to_vec(),
        vec![Member::new("i-1").with_port(8080), Member::new("i-2").with_port(80)]
    );
    assert_eq!(registry.calls(), vec![RegistryCall::Describe(vec![])]);
}

#[tokio::test]
async fn test_import_of_missing_group_is_not_found() {
    let (_registry, reconciler) = harness();

    let err = reconciler.import(OTHER_GROUP_ARN).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_lifecycle_operations_are_counted() {
    metrics::register_metrics().unwrap();
    let (_registry, reconciler) = harness();

    reconciler.create(&spec(&["i-1"])).await.unwrap();

    let rendered = metrics::render_metrics().unwrap();
    assert!(rendered.contains("target_registration_operations_total{operation=\"create\"}"));
    assert!(rendered.contains("target_registration_targets_registered_total"));
}
