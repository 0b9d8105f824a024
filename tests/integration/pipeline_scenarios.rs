//! End-to-end runs over in-memory records
//!
//! These tests verify routing across the whole topology:
//! - Normal readings reach only the archive
//! - Anomalies reach only the alert record and the analyzer
//! - Per-link FIFO order is preserved

use pretty_assertions::assert_eq;
use sensor_pipeline::{
    actors::messages::{Role, RoleState},
    clock::ManualClock,
    config::PipelineConfig,
    pipeline::Pipeline,
};

use crate::helpers::*;

#[tokio::test]
async fn test_single_anomaly_in_five_readings() {
    let records = MemoryRecords::new();

    let report = scripted_pipeline(5, &[2], records.sinks())
        .run()
        .await
        .unwrap();

    assert!(report.all_stopped());

    assert_eq!(sequences(&records.archive.lines().await), vec![0, 1, 3, 4]);
    assert_eq!(sequences(&records.alerts.lines().await), vec![2]);

    let analyzer = report.role(Role::Analyzer).unwrap();
    assert_eq!(analyzer.received, 1);
    assert_eq!(analyzer.shutdowns, 1);

    let analysis = records.analysis.lines().await;
    assert_eq!(analysis.len(), 1);
    assert!(analysis[0].starts_with("ANALYZED seq=2, "));
}

#[tokio::test]
async fn test_router_log_lists_every_sequence_once() {
    let records = MemoryRecords::new();

    scripted_pipeline(10, &[0, 4, 9], records.sinks())
        .run()
        .await
        .unwrap();

    let lines = records.router.lines().await;
    assert_eq!(sequences(&lines), (0..10).collect::<Vec<_>>());

    let tags: Vec<&str> = lines
        .iter()
        .filter_map(|line| line.split(' ').next())
        .collect();
    assert_eq!(
        tags,
        vec![
            "ANOMALY", "NORMAL", "NORMAL", "NORMAL", "ANOMALY", "NORMAL", "NORMAL", "NORMAL",
            "NORMAL", "ANOMALY"
        ]
    );
}

#[tokio::test]
async fn test_archive_and_its_log_agree() {
    let records = MemoryRecords::new();

    scripted_pipeline(6, &[1], records.sinks())
        .run()
        .await
        .unwrap();

    let archive = records.archive.lines().await;
    assert_eq!(archive, records.archive_log.lines().await);
    assert!(archive.iter().all(|line| line.ends_with("shutdown=0")));
}

#[tokio::test]
async fn test_emission_log_matches_generated_readings() {
    let records = MemoryRecords::new();

    let report = scripted_pipeline(4, &[], records.sinks())
        .run()
        .await
        .unwrap();

    let emitted = records.generator.lines().await;
    assert_eq!(sequences(&emitted), vec![0, 1, 2, 3]);
    assert_eq!(
        emitted[1],
        "seq=1, ts=1700000002, temp=20.0, sal=33.0, pol=10.0, shutdown=0"
    );
    assert_eq!(report.role(Role::Generator).unwrap().forwarded, 4);
}

#[tokio::test]
async fn test_all_anomalies_leaves_archive_empty() {
    let records = MemoryRecords::new();

    let report = scripted_pipeline(3, &[0, 1, 2], records.sinks())
        .run()
        .await
        .unwrap();

    assert!(records.archive.is_empty().await);
    assert_eq!(records.alerts.len().await, 3);
    assert_eq!(report.role(Role::ArchiveSink).unwrap().state, RoleState::Stopped);
    assert_eq!(report.role(Role::ArchiveSink).unwrap().shutdowns, 1);
}

#[tokio::test]
async fn test_same_seed_same_classification() {
    let config = PipelineConfig {
        messages: 25,
        anomaly_probability: 0.4,
        seed: Some(2024),
        ..Default::default()
    };

    let first = MemoryRecords::new();
    let second = MemoryRecords::new();

    for records in [&first, &second] {
        Pipeline::new(&config, records.sinks())
            .with_clock(ManualClock::new(0, 2))
            .run()
            .await
            .unwrap();
    }

    assert_eq!(
        sequences(&first.alerts.lines().await),
        sequences(&second.alerts.lines().await)
    );
    assert_eq!(
        sequences(&first.archive.lines().await),
        sequences(&second.archive.lines().await)
    );
}

#[tokio::test]
async fn test_random_readings_are_partitioned() {
    let records = MemoryRecords::new();
    let config = PipelineConfig {
        messages: 40,
        anomaly_probability: 0.25,
        seed: Some(5),
        channel_capacity: 2,
        ..Default::default()
    };

    let report = Pipeline::new(&config, records.sinks())
        .with_clock(ManualClock::new(0, 2))
        .run()
        .await
        .unwrap();

    let mut all = sequences(&records.alerts.lines().await);
    all.extend(sequences(&records.archive.lines().await));
    all.sort();
    assert_eq!(all, (0..40).collect::<Vec<_>>());

    let router = report.role(Role::Router).unwrap();
    assert_eq!(router.anomalies + router.normals, 40);
    assert_eq!(
        report.role(Role::Analyzer).unwrap().received,
        router.anomalies
    );
}
