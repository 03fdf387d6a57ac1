//! Post-run validation of the cluster: log tails and open client sessions.


use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::parse_connected_clients;
use crate::scan_for_failure;
use crate::tail_lines;
use crate::tools;
use crate::ChecksConfig;
use crate::ClusterConfig;
use crate::CommandRunner;
use crate::LogHit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogCheck {
    Clean,
    Suspicious { node: String, hit: LogHit },
}

impl LogCheck {
    pub fn is_clean(&self) -> bool {
        matches!(self, LogCheck::Clean)
    }
}

/// Fetches the stdout log tail of every node and scans it for failure
/// keywords. The first hit ends the scan.
///
/// A node whose tail cannot be fetched is logged and skipped rather than
/// treated as a failure.
pub async fn check_logs<R: CommandRunner + ?Sized>(
    runner: &R,
    cluster: &ClusterConfig,
    checks: &ChecksConfig,
) -> LogCheck {
    let path = cluster.remote_stdout_log();
    for node in &cluster.nodes {
        let spec = tools::tail_remote(node, &path, checks.tail_lines);
        let text = match runner.run(&spec).await {
            Ok(output) if output.success() => output.stdout,
            Ok(output) => {
                warn!(
                    "Could not read log tail on {} (exit {:?}): {}",
                    node,
                    output.code,
                    output.stderr.trim()
                );
                continue;
            }
            Err(e) => {
                warn!("Could not read log tail on {}: {}", node, e);
                continue;
            }
        };

        // `tail` already bounds the output; trim again in case it was ignored
        let lines = tail_lines(&text, checks.tail_lines);
        if let Some(hit) = scan_for_failure(lines, &checks.failure_keywords) {
            warn!(
                "Suspicious log line on {} (keyword {:?}): {}",
                node, hit.keyword, hit.line
            );
            return LogCheck::Suspicious {
                node: node.clone(),
                hit,
            };
        }
        debug!("Log tail on {} is clean", node);
    }
    LogCheck::Clean
}

/// Per-node client connection counts after a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientCheck {
    pub counts: Vec<(String, u32)>,
    /// Nodes holding more connections than expected
    pub leaked: Vec<(String, u32)>,
}

impl ClientCheck {
    pub fn has_leaks(&self) -> bool {
        !self.leaked.is_empty()
    }
}

/// Verifies that no more than `expected_clients` connections remain open per
/// node. Extra connections point at unclosed transactions; they are reported
/// as warnings and never abort the run.
pub async fn check_clients<R: CommandRunner + ?Sized>(
    runner: &R,
    cluster: &ClusterConfig,
    checks: &ChecksConfig,
) -> ClientCheck {
    let mut result = ClientCheck::default();
    for node in &cluster.nodes {
        let spec = tools::kv_info(cluster, node);
        let info = match runner.run(&spec).await {
            Ok(output) if output.success() => output.stdout,
            Ok(output) => {
                warn!("`{}` exited with {:?}", spec, output.code);
                continue;
            }
            Err(e) => {
                warn!("Could not query clients on {}: {}", node, e);
                continue;
            }
        };

        let Some(count) = parse_connected_clients(&info) else {
            warn!("No connected_clients field in INFO reply from {}", node);
            continue;
        };
        info!("{} connected_clients:{}", node, count);

        if count > checks.expected_clients {
            warn!(
                "There are unclosed transactions on {}: {} clients connected, expected {}",
                node, count, checks.expected_clients
            );
            result.leaked.push((node.clone(), count));
        }
        result.counts.push((node.clone(), count));
    }
    result
}
