//! Failure alerts.

mod smtp;
pub use smtp::*;


use std::fmt::Write;
use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::FailureReason;
use crate::NotifyError;

/// Everything an alert needs to describe one failed iteration.
#[derive(Debug, Clone)]
pub struct FailureReport {
    pub iteration: u32,
    pub total_iterations: u32,
    pub cluster: String,
    pub reason: FailureReason,
    pub archive: Option<PathBuf>,
    pub missing: Vec<String>,
}

impl FailureReport {
    /// `<prefix> iteration <n> failed: <summary>`; the cluster name is in
    /// the body.
    pub fn subject(
        &self,
        prefix: &str,
    ) -> String {
        let summary = match &self.reason {
            FailureReason::WorkloadExit { .. } | FailureReason::WorkloadError(_) => "workload failed",
            FailureReason::SuspiciousLog { .. } => "suspicious log line",
            FailureReason::ResetTimeout { .. } => "data reset timed out",
        };
        format!("{} iteration {} failed: {}", prefix, self.iteration, summary)
        .trim_start()
        .to_string()
    }

    pub fn body(&self) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "Cluster: {}", self.cluster);
        let _ = writeln!(
            body,
            "Iteration: {} of {}",
            self.iteration, self.total_iterations
        );
        let _ = writeln!(body, "Reason: {}", self.reason);
        match &self.archive {
            Some(path) => {
                let _ = writeln!(body, "Evidence: {}", path.display());
            }
            None => {
                let _ = writeln!(body, "Evidence: not archived");
            }
        }
        if !self.missing.is_empty() {
            let _ = writeln!(body, "Not collected: {}", self.missing.join(", "));
        }
        body
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        report: &FailureReport,
    ) -> Result<(), NotifyError>;
}

/// Used when alerts are disabled.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(
        &self,
        report: &FailureReport,
    ) -> Result<(), NotifyError> {
        info!(
            "Alerts disabled; iteration {} failure not mailed",
            report.iteration
        );
        Ok(())
    }
}
