use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use jepsen_harness::CommandError;
use jepsen_harness::CommandOutput;
use jepsen_harness::CommandRunner;
use jepsen_harness::CommandSpec;
use jepsen_harness::FailureReport;
use jepsen_harness::HarnessConfig;
use jepsen_harness::Notifier;
use jepsen_harness::NotifyError;

/// Fake cluster: answers every command from a canned table and records the
/// rendered command lines.
pub struct FakeCluster {
    workload_exit: i32,
    calls: Mutex<Vec<String>>,
}

impl FakeCluster {
    pub fn new(workload_exit: i32) -> Self {
        Self {
            workload_exit,
            calls: Mutex::new(vec![]),
        }
    }

    pub fn count(
        &self,
        needle: &str,
    ) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.contains(needle))
            .count()
    }
}

#[async_trait]
impl CommandRunner for FakeCluster {
    async fn run(
        &self,
        spec: &CommandSpec,
    ) -> Result<CommandOutput, CommandError> {
        let line = spec.to_string();
        self.calls.lock().unwrap().push(line.clone());

        let (code, stdout) = if line.contains("status") {
            (0, "host=a, pid: 101\nhost=b, pid: 202\n")
        } else if line.contains(" info") {
            (0, "connected_clients:1\r\n")
        } else if line.contains("tail -n") {
            (0, "I1019 replay done\n")
        } else if spec.program == "lein" {
            (self.workload_exit, "")
        } else {
            (0, "")
        };

        Ok(CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }
}

/// Collects every report it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub reports: Mutex<Vec<FailureReport>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        report: &FailureReport,
    ) -> Result<(), NotifyError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

pub fn settings(root: &Path) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.cluster.nodes = vec!["a".into(), "b".into()];
    config.workload.work_dir = root.to_path_buf();
    config.evidence.root_dir = root.join("error_log");
    config.run.log_dir = root.join("logs");
    config.run.iterations = 2;
    config
}
