//! The soak loop: recover, start, reset, run the workload, validate, and
//! archive evidence on failure, for a fixed iteration budget.

mod outcome;
pub use outcome::*;


use tracing::error;
use tracing::info;
use tracing::warn;

use crate::check_clients;
use crate::check_logs;
use crate::cluster;
use crate::tools;
use crate::CommandRunner;
use crate::Error;
use crate::EvidenceCollector;
use crate::FailurePolicy;
use crate::FailureReport;
use crate::HarnessConfig;
use crate::LogCheck;
use crate::Notifier;
use crate::Result;

pub struct Harness<R, N> {
    config: HarnessConfig,
    runner: R,
    notifier: N,
    evidence: EvidenceCollector,
}

impl<R, N> Harness<R, N>
where
    R: CommandRunner,
    N: Notifier,
{
    pub fn new(
        config: HarnessConfig,
        runner: R,
        notifier: N,
    ) -> Self {
        let evidence = EvidenceCollector::new(
            config.cluster.clone(),
            config.workload.clone(),
            config.evidence.clone(),
        );
        Self {
            config,
            runner,
            notifier,
            evidence,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs every iteration and returns what happened.
    ///
    /// Each failed iteration is archived and reported exactly once. With
    /// `FailurePolicy::Halt` the loop stops at the first failure.
    ///
    /// # Errors
    /// `Error::ResetTimeout` after the timeout has been archived and
    /// reported; the cluster is recovered before returning.
    pub async fn run(&self) -> Result<RunSummary> {
        let total = self.config.run.iterations;
        let mut summary = RunSummary::default();

        for iteration in 1..=total {
            info!("Iteration {}/{} started", iteration, total);
            match self.run_iteration(iteration).await {
                Ok(IterationOutcome::Passed) => {
                    summary.iterations = iteration;
                    info!("Iteration {}/{} passed", iteration, total);
                }
                Ok(IterationOutcome::Failed(reason)) => {
                    summary.iterations = iteration;
                    error!("Iteration {}/{} failed: {}", iteration, total, reason);
                    let record = self.handle_failure(iteration, reason).await;
                    summary.failures.push(record);

                    if self.config.run.on_failure == FailurePolicy::Halt {
                        warn!("Halting after failure in iteration {}", iteration);
                        break;
                    }
                }
                Err(Error::ResetTimeout { node, timeout }) => {
                    let reason = FailureReason::ResetTimeout {
                        node: node.clone(),
                        timeout,
                    };
                    error!("Iteration {}/{} aborted: {}", iteration, total, reason);
                    self.handle_failure(iteration, reason).await;
                    cluster::recover(&self.runner, &self.config.cluster).await;
                    return Err(Error::ResetTimeout { node, timeout });
                }
                Err(e) => {
                    cluster::recover(&self.runner, &self.config.cluster).await;
                    return Err(e);
                }
            }
        }

        // leave the cluster resumed and reachable
        cluster::recover(&self.runner, &self.config.cluster).await;

        info!(
            "Finished {} iterations with {} failures",
            summary.iterations,
            summary.failures.len()
        );
        Ok(summary)
    }

    /// One pass of the loop up to a verdict.
    pub async fn run_iteration(
        &self,
        iteration: u32,
    ) -> Result<IterationOutcome> {
        let cfg = &self.config;

        cluster::recover(&self.runner, &cfg.cluster).await;
        cluster::start_cluster(&self.runner, &cfg.cluster).await;

        if cfg.checks.reset_before_run {
            cluster::reset_data(&self.runner, &cfg.cluster, &cfg.checks).await?;
        }

        // a crash left over from the previous run must not be blamed on this one
        if cfg.run.on_failure == FailurePolicy::Halt {
            if let LogCheck::Suspicious { node, hit } =
                check_logs(&self.runner, &cfg.cluster, &cfg.checks).await
            {
                return Ok(IterationOutcome::Failed(FailureReason::SuspiciousLog {
                    node,
                    phase: CheckPhase::BeforeRun,
                    hit,
                }));
            }
        }

        let workload = tools::workload(&cfg.workload);
        match self.runner.run(&workload).await {
            Ok(output) if output.success() => {
                info!("Workload passed in iteration {}", iteration);
            }
            Ok(output) => {
                return Ok(IterationOutcome::Failed(FailureReason::WorkloadExit {
                    code: output.code,
                }));
            }
            Err(e) => {
                return Ok(IterationOutcome::Failed(FailureReason::WorkloadError(
                    e.to_string(),
                )));
            }
        }

        if let LogCheck::Suspicious { node, hit } =
            check_logs(&self.runner, &cfg.cluster, &cfg.checks).await
        {
            return Ok(IterationOutcome::Failed(FailureReason::SuspiciousLog {
                node,
                phase: CheckPhase::AfterRun,
                hit,
            }));
        }

        let clients = check_clients(&self.runner, &cfg.cluster, &cfg.checks).await;
        if clients.has_leaks() {
            warn!(
                "Iteration {} left extra client connections on {:?}",
                iteration, clients.leaked
            );
        }

        Ok(IterationOutcome::Passed)
    }

    /// Archives evidence and sends the alert for one failure.
    async fn handle_failure(
        &self,
        iteration: u32,
        reason: FailureReason,
    ) -> FailureRecord {
        let (archive, missing) = match self.evidence.collect(&self.runner, &reason).await {
            Ok(archive) => {
                info!("Evidence archived at {}", archive.root.display());
                (Some(archive.root), archive.missing)
            }
            Err(e) => {
                error!("Failed to archive evidence: {}", e);
                (None, vec![])
            }
        };

        let report = FailureReport {
            iteration,
            total_iterations: self.config.run.iterations,
            cluster: self.config.cluster.name.clone(),
            reason: reason.clone(),
            archive: archive.clone(),
            missing,
        };
        let notified = match self.notifier.notify(&report).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failure alert not sent: {}", e);
                false
            }
        };

        FailureRecord {
            iteration,
            reason,
            archive,
            notified,
        }
    }
}
