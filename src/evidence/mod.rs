//! Forensic evidence archiving.
//!
//! After a failure every node's logs and the workload's store directory are
//! copied into `<root_dir>/<YYYY-MM-DD_HH-MM-SS>/`. Archives are never
//! deleted by the harness.


use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Local;
use tracing::info;
use tracing::warn;

use crate::tools;
use crate::ClusterConfig;
use crate::CommandRunner;
use crate::CommandSpec;
use crate::Error;
use crate::EvidenceConfig;
use crate::FailureReason;
use crate::Result;
use crate::WorkloadConfig;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
pub(crate) const REASON_FILE: &str = "REASON";
pub(crate) const WORKLOAD_DIR: &str = "jepsen";

#[derive(Debug, Clone)]
pub struct EvidenceArchive {
    pub root: PathBuf,
    pub created_at: DateTime<Local>,
    /// Copies that failed; the archive is still kept
    pub missing: Vec<String>,
}

pub struct EvidenceCollector {
    cluster: ClusterConfig,
    workload: WorkloadConfig,
    evidence: EvidenceConfig,
}

impl EvidenceCollector {
    pub fn new(
        cluster: ClusterConfig,
        workload: WorkloadConfig,
        evidence: EvidenceConfig,
    ) -> Self {
        Self {
            cluster,
            workload,
            evidence,
        }
    }

    pub async fn collect<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        reason: &FailureReason,
    ) -> Result<EvidenceArchive> {
        self.collect_at(runner, reason, Local::now()).await
    }

    /// Only creating the archive directory can fail; every copy is
    /// best-effort and recorded in `EvidenceArchive::missing` on failure.
    pub async fn collect_at<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        reason: &FailureReason,
        now: DateTime<Local>,
    ) -> Result<EvidenceArchive> {
        let root = create_archive_dir(&self.evidence.root_dir, &now).await?;
        info!("Collecting evidence into {}", root.display());

        let mut archive = EvidenceArchive {
            root: root.clone(),
            created_at: now,
            missing: vec![],
        };

        let reason_text = format!("{}\n{}\n", now.to_rfc3339(), reason);
        if let Err(e) = tokio::fs::write(root.join(REASON_FILE), reason_text).await {
            warn!("Failed to write {} file: {}", REASON_FILE, e);
            archive.missing.push(REASON_FILE.to_string());
        }

        self.copy_workload_store(runner, &root, &mut archive).await;
        self.copy_node_logs(runner, &root, &mut archive).await;
        self.relay(runner, &root).await;

        Ok(archive)
    }

    async fn copy_workload_store<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        root: &Path,
        archive: &mut EvidenceArchive,
    ) {
        let link = self.workload.store_link_path();
        let source = match tokio::fs::canonicalize(&link).await {
            Ok(path) => path,
            Err(e) => {
                warn!("Cannot resolve workload store {}: {}", link.display(), e);
                archive.missing.push(WORKLOAD_DIR.to_string());
                return;
            }
        };
        let spec = tools::rsync_local(&source, &root.join(WORKLOAD_DIR));
        if !run_copy(runner, &spec).await {
            archive.missing.push(WORKLOAD_DIR.to_string());
        }
    }

    async fn copy_node_logs<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        root: &Path,
        archive: &mut EvidenceArchive,
    ) {
        let remote_logs = [
            self.cluster.remote_info_log(),
            self.cluster.remote_stdout_log(),
        ];
        for node in &self.cluster.nodes {
            let node_dir = root.join(node);
            if let Err(e) = tokio::fs::create_dir_all(&node_dir).await {
                warn!("Failed to create {}: {}", node_dir.display(), e);
                archive.missing.push(node.clone());
                continue;
            }
            for remote in &remote_logs {
                let file_name = remote.rsplit('/').next().unwrap_or(remote.as_str());
                let spec = tools::rsync_from_remote(
                    &self.cluster.ssh_user,
                    node,
                    remote,
                    &node_dir.join(file_name),
                );
                if !run_copy(runner, &spec).await {
                    archive.missing.push(format!("{}/{}", node, file_name));
                }
            }
        }
    }

    async fn relay<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        root: &Path,
    ) {
        let Some(relay) = &self.evidence.relay else {
            return;
        };
        let spec = tools::rsync_to_remote(root, &relay.user, &relay.host, &relay.dest_dir);
        if run_copy(runner, &spec).await {
            info!("Relayed {} to {}", root.display(), relay.host);
        }
    }
}

/// Runs one copy and reports whether it succeeded.
async fn run_copy<R: CommandRunner + ?Sized>(
    runner: &R,
    spec: &CommandSpec,
) -> bool {
    match runner.run(spec).await {
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
            warn!("`{}` failed: {}", spec, e);
            false
        }
    }
}

/// Creates `<parent>/<timestamp>`, appending `-1`, `-2`, ... when a
/// directory for the same second already exists.
async fn create_archive_dir(
    parent: &Path,
    now: &DateTime<Local>,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| Error::Evidence {
            path: parent.to_path_buf(),
            source,
        })?;

    let stamp = now.format(TIMESTAMP_FORMAT).to_string();
    let mut suffix = 0u32;
    loop {
        let name = if suffix == 0 {
            stamp.clone()
        } else {
            format!("{}-{}", stamp, suffix)
        };
        let candidate = parent.join(name);
        match tokio::fs::create_dir(&candidate).await {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
            Err(source) => {
                return Err(Error::Evidence {
                    path: candidate,
                    source,
                })
            }
        }
    }
}
