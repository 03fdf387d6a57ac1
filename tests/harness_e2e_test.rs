mod common;

use common::settings;
use common::FakeCluster;
use common::RecordingNotifier;
use jepsen_harness::FailurePolicy;
use jepsen_harness::FailureReason;
use jepsen_harness::Harness;

#[tokio::test]
async fn healthy_cluster_passes_every_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        settings(dir.path()).validate().unwrap(),
        FakeCluster::new(0),
        RecordingNotifier::default(),
    );

    let summary = harness.run().await.unwrap();

    assert!(summary.all_passed());
    assert_eq!(summary.iterations, 2);
    assert_eq!(harness.runner().count("lein run test-all"), 2);
    assert_eq!(harness.runner().count("iptables -F"), 2 * 2 + 2);
    assert!(!dir.path().join("error_log").exists());
}

#[tokio::test]
async fn failing_workload_is_archived_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = settings(dir.path());
    config.run.on_failure = FailurePolicy::Continue;
    let notifier = RecordingNotifier::default();
    let harness = Harness::new(config, FakeCluster::new(1), notifier);

    let summary = harness.run().await.unwrap();

    assert_eq!(summary.failures.len(), 2);
    let archives: Vec<_> = std::fs::read_dir(dir.path().join("error_log"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(archives.len(), 2);
    for archive in &archives {
        let reason = std::fs::read_to_string(archive.join("REASON")).unwrap();
        assert!(!reason.is_empty());
        assert!(archive.join("a").is_dir());
        assert!(archive.join("b").is_dir());
    }
    assert_eq!(
        summary.failures[0].reason,
        FailureReason::WorkloadExit { code: Some(1) }
    );
}
