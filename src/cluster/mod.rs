//! Cluster lifecycle steps: recovery after fault injection, startup and data
//! reset.
//!
//! All three are best-effort except the data reset deadline, which is the
//! one condition that ends the run.


use std::time::Duration;

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::parse_host_pids;
use crate::tools;
use crate::ChecksConfig;
use crate::ClusterConfig;
use crate::CommandRunner;
use crate::Error;
use crate::Result;

/// Undoes leftover fault injection on every server process.
///
/// Queries cluster status, then per reported host flushes firewall rules and
/// sends `SIGCONT` to the process. A failure on one host is logged and the
/// next host is still attempted.
///
/// Returns the number of hosts on which both commands succeeded.
pub async fn recover<R: CommandRunner + ?Sized>(
    runner: &R,
    cfg: &ClusterConfig,
) -> usize {
    let status_cmd = tools::cluster_status(cfg);
    let status = match runner.run(&status_cmd).await {
        Ok(output) if output.success() => output.stdout,
        Ok(output) => {
            warn!(
                "`{}` exited with {:?}, skipping recovery: {}",
                status_cmd,
                output.code,
                output.stderr.trim()
            );
            return 0;
        }
        Err(e) => {
            warn!("Cluster status unavailable, skipping recovery: {}", e);
            return 0;
        }
    };

    let parsed = parse_host_pids(&status);
    if parsed.is_mismatched() {
        warn!(
            "Status reported {} hosts but {} pids; pairing the first {} by position",
            parsed.hosts_found,
            parsed.pids_found,
            parsed.pairs.len()
        );
    }

    let mut recovered = 0;
    for pair in &parsed.pairs {
        info!("Host: {}, PID: {}", pair.host, pair.pid);

        let steps = [
            tools::flush_firewall(&pair.host),
            tools::resume_process(&pair.host, pair.pid),
        ];
        let mut ok = true;
        for step in &steps {
            let outcome = match runner.run(step).await {
                Ok(output) => step.require_success(output).map(|_| ()),
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                warn!("Failed to execute command on {}: {}", pair.host, e);
                ok = false;
            }
        }
        if ok {
            recovered += 1;
        }
    }
    recovered
}

/// Starts the cluster through the management CLI. Failure is logged only;
/// the workload run will surface a cluster that never came up.
pub async fn start_cluster<R: CommandRunner + ?Sized>(
    runner: &R,
    cfg: &ClusterConfig,
) -> bool {
    let spec = tools::cluster_start(cfg);
    match runner.run(&spec).await {
        Ok(output) if output.success() => true,
        Ok(output) => {
            warn!(
                "`{}` exited with {:?}: {}",
                spec,
                output.code,
                output.stderr.trim()
            );
            false
        }
        Err(e) => {
            warn!("Failed to start cluster {}: {}", cfg.name, e);
            false
        }
    }
}

/// Flushes the data store on the primary node.
///
/// # Errors
/// `Error::ResetTimeout` when the flush does not finish within
/// `checks.reset_timeout_ms`. Any other failure is logged and swallowed.
pub async fn reset_data<R: CommandRunner + ?Sized>(
    runner: &R,
    cluster: &ClusterConfig,
    checks: &ChecksConfig,
) -> Result<()> {
    let node = cluster.primary_node();
    let timeout = Duration::from_millis(checks.reset_timeout_ms);
    let spec = tools::kv_flushdb(cluster, node, timeout);

    match runner.run(&spec).await {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => {
            warn!(
                "`{}` exited with {:?}: {}",
                spec,
                output.code,
                output.stderr.trim()
            );
            Ok(())
        }
        Err(e) if e.is_timeout() => {
            error!("Data reset on {} timed out after {:?}", node, timeout);
            Err(Error::ResetTimeout {
                node: node.to_string(),
                timeout,
            })
        }
        Err(e) => {
            warn!("Data reset on {} failed: {}", node, e);
            Ok(())
        }
    }
}
