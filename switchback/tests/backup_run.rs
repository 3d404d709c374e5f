mod common;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use switchback::{BackupOrchestrator, BackupResult, RunConfig, parse_host_list};
use tokio::sync::mpsc;
use tokio_test::assert_ok;

use common::{ConnectFailure, MockConnector, MockDevice, host};

const DATE: &str = "2024-03-23";

const COMWARE_TRANSCRIPT: &str = "******************************************\n\
                                  * Copyright (c) 2004-2017 New H3C Technologies Co., Ltd. *\n\
                                  ******************************************\n\
                                  #\n version 7.1.070, Release 6126P20\n#\n sysname SW-ACCESS-1\n#\nreturn";

fn build(
    connector: MockConnector,
    output_dir: &Path,
    concurrency: usize,
) -> (BackupOrchestrator<MockConnector>, Arc<MockConnector>) {
    let config = RunConfig {
        output_dir: output_dir.to_path_buf(),
        concurrency,
        ..RunConfig::default()
    };
    let connector = Arc::new(connector);
    let orchestrator = BackupOrchestrator::new(connector.clone(), config).unwrap();
    (orchestrator, connector)
}

fn artifacts(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(root.join(DATE))
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn read_artifact(root: &Path, address: &str) -> String {
    std::fs::read_to_string(root.join(DATE).join(address)).unwrap()
}

#[tokio::test]
async fn test_reachable_and_unreachable_host() {
    let dir = tempfile::tempdir().unwrap();
    let connector = MockConnector::new()
        .device(
            "10.0.0.1",
            MockDevice::cisco_ios("hostname core-1\ninterface Gi0/1\nend"),
        )
        .device(
            "10.0.0.2",
            MockDevice::new().fail_connect(ConnectFailure::Timeout),
        );
    let (orchestrator, _) = build(connector, dir.path(), 8);

    let hosts = assert_ok!(parse_host_list(
        "10.0.0.1 admin secret\n10.0.0.2 admin secret2"
    ));
    let report = orchestrator.run_on(hosts, DATE).await;

    assert_eq!(
        report.to_string(),
        "10.0.0.1_success\n10.0.0.2_ConnectTimeout"
    );
    assert_eq!(artifacts(dir.path()), vec!["10.0.0.1".to_string()]);
    assert_eq!(
        read_artifact(dir.path(), "10.0.0.1"),
        "hostname core-1\ninterface Gi0/1\nend"
    );
}

#[tokio::test]
async fn test_report_keeps_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut connector = MockConnector::new();
    let mut hosts = Vec::new();
    for i in 0..6u64 {
        let address = format!("10.0.1.{i}");
        // Earlier hosts finish later.
        let device = MockDevice::cisco_ios(&format!("hostname sw{i}"))
            .delay(Duration::from_millis(60 - i * 10));
        connector = connector.device(&address, device);
        hosts.push(host(&address));
    }
    let (orchestrator, _) = build(connector, dir.path(), 8);

    let report = orchestrator.run_on(hosts, DATE).await;

    let addresses: Vec<&str> = report.results().iter().map(|r| r.address.as_str()).collect();
    assert_eq!(
        addresses,
        vec![
            "10.0.1.0", "10.0.1.1", "10.0.1.2", "10.0.1.3", "10.0.1.4", "10.0.1.5"
        ]
    );
    assert!(report.is_all_success());
    assert_eq!(read_artifact(dir.path(), "10.0.1.3"), "hostname sw3");
}

#[tokio::test]
async fn test_undetected_device_uses_comware_span() {
    let dir = tempfile::tempdir().unwrap();
    let connector = MockConnector::new().device(
        "10.0.2.1",
        MockDevice::new().respond("display current-configuration", COMWARE_TRANSCRIPT),
    );
    let (orchestrator, connector) = build(connector, dir.path(), 8);

    let report = orchestrator.run_on(vec![host("10.0.2.1")], DATE).await;

    assert!(report.is_all_success());
    assert_eq!(
        read_artifact(dir.path(), "10.0.2.1"),
        "#\n version 7.1.070, Release 6126P20\n#\n sysname SW-ACCESS-1\n#\nreturn"
    );
    let profiles: Vec<String> = connector
        .activity
        .sessions()
        .into_iter()
        .map(|(_, profile)| profile)
        .collect();
    assert_eq!(profiles, vec!["autodetect", "hp_comware"]);
}

#[tokio::test]
async fn test_comware_without_span_stores_raw_output() {
    let dir = tempfile::tempdir().unwrap();
    let connector = MockConnector::new().device(
        "10.0.2.2",
        MockDevice::new()
            .respond("display version", "H3C Comware Software, Version 7.1.045")
            .respond("display current-configuration", "sysname odd-box\nreturn"),
    );
    let (orchestrator, _) = build(connector, dir.path(), 8);

    let report = orchestrator.run_on(vec![host("10.0.2.2")], DATE).await;

    assert!(report.is_all_success());
    assert_eq!(
        read_artifact(dir.path(), "10.0.2.2"),
        "sysname odd-box\nreturn"
    );
}

#[tokio::test]
async fn test_huawei_keeps_full_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = "!Software Version V200R019C10SPC500\n#\nsysname CORE\n#\nreturn";
    let connector = MockConnector::new().device(
        "10.0.2.3",
        MockDevice::new()
            .respond(
                "display version",
                "Huawei Versatile Routing Platform Software\nVRP (R) software, Version 8.180",
            )
            .respond("display current-configuration", config),
    );
    let (orchestrator, connector) = build(connector, dir.path(), 8);

    let report = orchestrator.run_on(vec![host("10.0.2.3")], DATE).await;

    assert!(report.is_all_success());
    assert_eq!(read_artifact(dir.path(), "10.0.2.3"), config);
    assert_eq!(
        connector.activity.commands_for("10.0.2.3"),
        vec![
            "show version",
            "display version",
            "display current-configuration"
        ]
    );
}

#[tokio::test]
async fn test_failure_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let connector = MockConnector::new()
        .device(
            "auth-fail",
            MockDevice::new().fail_connect(ConnectFailure::AuthRejected),
        )
        .device(
            "slow-dump",
            MockDevice::cisco_ios("unused").time_out_on("show running-config"),
        )
        .device("empty", MockDevice::cisco_ios("   \n"))
        .device(
            "rejected",
            MockDevice::cisco_ios("% Invalid input detected at '^' marker."),
        );
    let (orchestrator, connector) = build(connector, dir.path(), 8);

    let hosts = vec![
        host("auth-fail"),
        host("slow-dump"),
        host("empty"),
        host("rejected"),
    ];
    let report = orchestrator.run_on(hosts, DATE).await;

    assert_eq!(
        report.to_string(),
        "auth-fail_AuthenticationFailed\nslow-dump_ReadTimeout\nempty_EmptyConfig\nrejected_CommandRejected"
    );
    assert!(artifacts(dir.path()).is_empty());
    // Every opened session was closed, including the failed retrievals.
    assert_eq!(connector.activity.open(), 0);
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let mut connector = MockConnector::new();
    let mut hosts = Vec::new();
    for i in 0..8 {
        let address = format!("10.0.3.{i}");
        connector = connector.device(
            &address,
            MockDevice::cisco_ios("hostname x").delay(Duration::from_millis(20)),
        );
        hosts.push(host(&address));
    }
    let (orchestrator, connector) = build(connector, dir.path(), 2);

    let report = orchestrator.run_on(hosts, DATE).await;

    assert!(report.is_all_success());
    assert!(connector.activity.max_open() <= 2);
    assert!(connector.activity.max_open() >= 1);
    assert_eq!(connector.activity.closed(), 16);
}

#[tokio::test]
async fn test_progress_reports_slow_host_last() {
    let dir = tempfile::tempdir().unwrap();
    let connector = MockConnector::new()
        .device(
            "slow",
            MockDevice::cisco_ios("hostname slow").delay(Duration::from_millis(300)),
        )
        .device("fast-1", MockDevice::cisco_ios("hostname fast-1"))
        .device("fast-2", MockDevice::cisco_ios("hostname fast-2"));
    let (orchestrator, _) = build(connector, dir.path(), 4);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let hosts = vec![host("slow"), host("fast-1"), host("fast-2")];
    let report = orchestrator.run_with_progress(hosts, DATE, tx).await;

    let mut seen: Vec<BackupResult> = Vec::new();
    while let Some(result) = rx.recv().await {
        seen.push(result);
    }
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[2].address, "slow");
    assert_eq!(report.results()[0].address, "slow");
    assert!(report.is_all_success());
}

#[tokio::test]
async fn test_panicking_host_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let connector = MockConnector::new()
        .device("10.0.4.1", MockDevice::cisco_ios("hostname a"))
        .device("10.0.4.2", MockDevice::new().panic_on_connect())
        .device("10.0.4.3", MockDevice::cisco_ios("hostname c"));
    let (orchestrator, _) = build(connector, dir.path(), 8);

    let hosts = vec![host("10.0.4.1"), host("10.0.4.2"), host("10.0.4.3")];
    let report = orchestrator.run_on(hosts, DATE).await;

    assert_eq!(
        report.to_string(),
        "10.0.4.1_success\n10.0.4.2_Panic\n10.0.4.3_success"
    );
    assert_eq!(
        artifacts(dir.path()),
        vec!["10.0.4.1".to_string(), "10.0.4.3".to_string()]
    );
}

#[tokio::test]
async fn test_rerun_overwrites_artifact() {
    let dir = tempfile::tempdir().unwrap();

    let first = MockConnector::new().device("10.0.5.1", MockDevice::cisco_ios("hostname old"));
    let (orchestrator, _) = build(first, dir.path(), 8);
    assert!(
        orchestrator
            .run_on(vec![host("10.0.5.1")], DATE)
            .await
            .is_all_success()
    );

    let second = MockConnector::new().device("10.0.5.1", MockDevice::cisco_ios("hostname new"));
    let (orchestrator, _) = build(second, dir.path(), 8);
    assert!(
        orchestrator
            .run_on(vec![host("10.0.5.1")], DATE)
            .await
            .is_all_success()
    );

    assert_eq!(artifacts(dir.path()), vec!["10.0.5.1".to_string()]);
    assert_eq!(read_artifact(dir.path(), "10.0.5.1"), "hostname new");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_address_both_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let alice_config = format!("hostname from-alice\n{}", "!\n".repeat(50_000));
    let bob_config = "hostname from-bob".to_string();
    let connector = MockConnector::new()
        .device_for_user("10.0.6.1", "alice", MockDevice::cisco_ios(&alice_config))
        .device_for_user("10.0.6.1", "bob", MockDevice::cisco_ios(&bob_config));
    let (orchestrator, _) = build(connector, dir.path(), 8);

    let hosts = assert_ok!(parse_host_list(
        "10.0.6.1 alice secret\n10.0.6.1 bob secret"
    ));
    let report = orchestrator.run_on(hosts, DATE).await;

    assert_eq!(report.to_string(), "10.0.6.1_success\n10.0.6.1_success");
    // Hidden temp files would show up here too.
    assert_eq!(artifacts(dir.path()), vec!["10.0.6.1".to_string()]);
    let stored = read_artifact(dir.path(), "10.0.6.1");
    assert!(stored == alice_config || stored == bob_config);
}

#[tokio::test]
async fn test_empty_host_list() {
    let dir = tempfile::tempdir().unwrap();
    let (orchestrator, connector) = build(MockConnector::new(), dir.path(), 8);

    let report = orchestrator.run_on(Vec::new(), DATE).await;

    assert!(report.is_empty());
    assert!(connector.activity.sessions().is_empty());
}

#[test]
fn test_zero_concurrency_rejected() {
    let config = RunConfig {
        concurrency: 0,
        ..RunConfig::default()
    };
    let err = BackupOrchestrator::new(Arc::new(MockConnector::new()), config)
        .err()
        .unwrap();
    assert_eq!(err.kind(), "InvalidConfig");
    assert_ok!(BackupOrchestrator::new(
        Arc::new(MockConnector::new()),
        RunConfig::default()
    ));
}
