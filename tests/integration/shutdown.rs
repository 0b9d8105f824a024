//! Shutdown sequence across the topology
//!
//! These tests verify that:
//! - Every role observes exactly one shutdown and ends `Stopped`
//! - An empty run still shuts down cleanly
//! - Pacing follows the configured interval

use std::time::Duration;

use pretty_assertions::assert_eq;
use sensor_pipeline::{
    actors::messages::{Role, RoleState},
    config::PipelineConfig,
    pipeline::Pipeline,
};

use crate::helpers::*;

#[tokio::test]
async fn test_zero_readings_shut_down_cleanly() {
    let records = MemoryRecords::new();

    let report = scripted_pipeline(0, &[], records.sinks())
        .run()
        .await
        .unwrap();

    assert!(report.all_stopped());
    for record in [
        &records.generator,
        &records.router,
        &records.alerts,
        &records.archive,
        &records.archive_log,
        &records.analysis,
    ] {
        assert!(record.is_empty().await);
    }

    for role in report.reports() {
        assert_eq!(role.received, 0, "{} received data", role.role);
        assert_eq!(role.shutdowns, 1, "{} shutdowns", role.role);
    }
}

#[tokio::test]
async fn test_every_role_sees_exactly_one_shutdown() {
    let records = MemoryRecords::new();

    let report = scripted_pipeline(8, &[3, 5], records.sinks())
        .run()
        .await
        .unwrap();

    assert_eq!(report.reports().len(), Role::COUNT);
    for role in Role::ALL {
        let role_report = report.role(role).unwrap();
        assert_eq!(role_report.shutdowns, 1);
        assert_eq!(role_report.state, RoleState::Stopped);
    }

    // shutdown is control flow only, never persisted
    for line in records.router.lines().await {
        assert!(line.ends_with("shutdown=0"));
    }
    assert_eq!(records.alerts.len().await, 2);
}

#[tokio::test]
async fn test_running_pipeline_reports_final_states() {
    let records = MemoryRecords::new();

    let running = scripted_pipeline(3, &[1], records.sinks()).spawn();
    let report = running.join().await.unwrap();

    let states: Vec<RoleState> = report.reports().iter().map(|r| r.state).collect();
    assert_eq!(states, vec![RoleState::Stopped; Role::COUNT]);
}

#[tokio::test(start_paused = true)]
async fn test_readings_are_paced_by_interval() {
    let records = MemoryRecords::new();
    let config = PipelineConfig {
        messages: 3,
        interval_ms: 2000,
        anomaly_probability: 0.0,
        seed: Some(1),
        ..Default::default()
    };

    let start = tokio::time::Instant::now();
    let report = Pipeline::new(&config, records.sinks()).run().await.unwrap();

    // first reading is immediate, the next two wait one interval each
    assert!(start.elapsed() >= Duration::from_millis(4000));
    assert!(report.all_stopped());
    assert_eq!(records.archive.len().await, 3);
}
