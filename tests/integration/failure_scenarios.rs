//! Failure tests for the pipeline
//!
//! These tests verify that the system handles failures gracefully:
//! - Too few participants abort before any role starts
//! - Broken records are counted but never stop a role
//! - A vanished peer fails the role that depended on it

use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use sensor_pipeline::{
    actors::{
        channel::link,
        generator::GeneratorActor,
        messages::{Role, RoleState, Topic},
        router::RouterActor,
    },
    clock::ManualClock,
    error::{PipelineError, TransportError},
    pipeline::ensure_roles,
    storage::PipelineSinks,
};

use crate::helpers::*;

#[test]
fn test_insufficient_roles_is_rejected() {
    for available in 0..Role::COUNT {
        assert_matches!(
            ensure_roles(available),
            Err(PipelineError::InsufficientRoles { required: 5, .. })
        );
    }
    assert!(ensure_roles(Role::COUNT).is_ok());
}

#[test]
fn test_insufficient_roles_message() {
    let err = ensure_roles(3).unwrap_err();
    assert!(err.to_string().contains('3'));
    assert!(err.to_string().contains('5'));
}

#[tokio::test]
async fn test_broken_records_do_not_stop_the_run() {
    let sinks = PipelineSinks {
        generator: Some(Arc::new(BrokenSink)),
        router: Some(Arc::new(BrokenSink)),
        alerts: Arc::new(BrokenSink),
        archive: Arc::new(BrokenSink),
        archive_log: Some(Arc::new(BrokenSink)),
        analysis: Some(Arc::new(BrokenSink)),
    };

    let report = scripted_pipeline(4, &[1], sinks).run().await.unwrap();

    assert!(report.all_stopped());
    assert_eq!(report.role(Role::Generator).unwrap().persist_failures, 4);
    assert_eq!(report.role(Role::Router).unwrap().persist_failures, 4);
    assert_eq!(report.role(Role::AlertSink).unwrap().persist_failures, 1);
    // archive record and archive log both fail for each normal reading
    assert_eq!(report.role(Role::ArchiveSink).unwrap().persist_failures, 6);
    assert_eq!(report.role(Role::Analyzer).unwrap().received, 1);
}

#[tokio::test]
async fn test_broken_alert_record_still_reaches_analyzer() {
    let records = MemoryRecords::new();
    let mut sinks = records.sinks();
    sinks.alerts = Arc::new(BrokenSink);

    let report = scripted_pipeline(5, &[0, 2], sinks).run().await.unwrap();

    assert_eq!(report.role(Role::Analyzer).unwrap().received, 2);
    assert_eq!(records.analysis.len().await, 2);
    assert_eq!(records.archive.len().await, 3);
}

#[tokio::test]
async fn test_generator_fails_when_router_is_gone() {
    let (tx, rx) = link(Topic::Readings, 1);
    drop(rx);

    let handle = GeneratorActor::new(
        3,
        Box::new(ScriptedReadings::with_anomalies(&[])),
        Box::new(ManualClock::new(0, 2)),
        tx,
        None,
    )
    .spawn();

    assert_matches!(
        handle.join().await,
        Err(PipelineError::Transport {
            role: Role::Generator,
            source: TransportError::Disconnected {
                topic: Topic::Readings
            }
        })
    );
}

#[tokio::test]
async fn test_router_fails_when_generator_vanishes() {
    let (readings_tx, readings_rx) = link(Topic::Readings, 4);
    let (alert_tx, _alert_rx) = link(Topic::ToAlert, 4);
    let (archive_tx, _archive_rx) = link(Topic::ToArchive, 4);

    let mut handle = RouterActor::new(readings_rx, alert_tx, archive_tx, None).spawn();
    drop(readings_tx);

    assert_eq!(handle.finished().await, RoleState::Failed);
    assert_eq!(handle.state(), RoleState::Failed);
    assert_matches!(
        handle.join().await,
        Err(PipelineError::Transport {
            role: Role::Router,
            ..
        })
    );
}
