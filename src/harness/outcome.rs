use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::LogHit;

/// When a log tail was inspected relative to the workload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    BeforeRun,
    AfterRun,
}

impl fmt::Display for CheckPhase {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            CheckPhase::BeforeRun => write!(f, "before run"),
            CheckPhase::AfterRun => write!(f, "after run"),
        }
    }
}

/// Why an iteration was declared failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Workload runner finished with a nonzero or missing exit code
    WorkloadExit { code: Option<i32> },
    /// Workload runner could not be started or did not finish
    WorkloadError(String),
    /// A node's log tail contained a failure keyword
    SuspiciousLog {
        node: String,
        phase: CheckPhase,
        hit: LogHit,
    },
    /// Data reset exceeded its deadline
    ResetTimeout { node: String, timeout: Duration },
}

impl fmt::Display for FailureReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            FailureReason::WorkloadExit { code: Some(code) } => {
                write!(f, "workload exited with code {}", code)
            }
            FailureReason::WorkloadExit { code: None } => {
                write!(f, "workload terminated by signal")
            }
            FailureReason::WorkloadError(e) => write!(f, "workload did not complete: {}", e),
            FailureReason::SuspiciousLog { node, phase, hit } => write!(
                f,
                "suspicious log line on {} {} (keyword {:?}): {}",
                node, phase, hit.keyword, hit.line
            ),
            FailureReason::ResetTimeout { node, timeout } => {
                write!(f, "data reset on {} timed out after {:?}", node, timeout)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    Passed,
    Failed(FailureReason),
}

/// A failed iteration and where its evidence went.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub iteration: u32,
    pub reason: FailureReason,
    /// `None` when the archive directory could not be created
    pub archive: Option<PathBuf>,
    pub notified: bool,
}

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// Iterations that ran to a verdict
    pub iterations: u32,
    pub failures: Vec<FailureRecord>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}
