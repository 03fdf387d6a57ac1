//! Command lines for the external tools the harness drives.
//!
//! Nothing here executes anything; every function returns a `CommandSpec`
//! for a `CommandRunner`.


use std::path::Path;
use std::time::Duration;

use crate::ClusterConfig;
use crate::CommandSpec;
use crate::WorkloadConfig;

/// `<ctl> status <cluster>`
pub fn cluster_status(cfg: &ClusterConfig) -> CommandSpec {
    CommandSpec::new(&cfg.ctl_program).args(["status", cfg.name.as_str()])
}

/// `<ctl> start <cluster>`
pub fn cluster_start(cfg: &ClusterConfig) -> CommandSpec {
    CommandSpec::new(&cfg.ctl_program).args(["start", cfg.name.as_str()])
}

fn kv_command(
    cfg: &ClusterConfig,
    node: &str,
    command: &str,
) -> CommandSpec {
    CommandSpec::new(&cfg.kv_client_program).args([
        "-h".to_string(),
        node.to_string(),
        "-p".to_string(),
        cfg.kv_port.to_string(),
        command.to_string(),
    ])
}

/// `redis-cli -h <node> -p <port> info`
pub fn kv_info(
    cfg: &ClusterConfig,
    node: &str,
) -> CommandSpec {
    kv_command(cfg, node, "info")
}

/// `redis-cli -h <node> -p <port> flushdb`, bounded by `timeout`
pub fn kv_flushdb(
    cfg: &ClusterConfig,
    node: &str,
    timeout: Duration,
) -> CommandSpec {
    kv_command(cfg, node, "flushdb").timeout(timeout)
}

/// Runs `remote_cmd` on `host` through the remote shell.
pub fn ssh(
    host: &str,
    remote_cmd: impl Into<String>,
) -> CommandSpec {
    CommandSpec::new("ssh").arg(host).arg(remote_cmd)
}

pub fn flush_firewall(host: &str) -> CommandSpec {
    ssh(host, "sudo iptables -F")
}

pub fn resume_process(
    host: &str,
    pid: u32,
) -> CommandSpec {
    ssh(host, format!("kill -CONT {}", pid))
}

pub fn tail_remote(
    host: &str,
    path: &str,
    lines: usize,
) -> CommandSpec {
    ssh(host, format!("tail -n {} {}", lines, path))
}

/// `rsync -azL <src>/ <dst>`: copies the contents of `src`, following links.
pub fn rsync_local(
    src: &Path,
    dst: &Path,
) -> CommandSpec {
    let src = format!("{}/", src.display().to_string().trim_end_matches('/'));
    CommandSpec::new("rsync").args([
        "-azL".to_string(),
        src,
        dst.display().to_string(),
    ])
}

/// `rsync -azL -e ssh <user>@<node>:<src> <dst>`
pub fn rsync_from_remote(
    user: &str,
    node: &str,
    src: &str,
    dst: &Path,
) -> CommandSpec {
    CommandSpec::new("rsync").args([
        "-azL".to_string(),
        "-e".to_string(),
        "ssh".to_string(),
        format!("{}@{}:{}", user, node, src),
        dst.display().to_string(),
    ])
}

/// `rsync -az -e ssh <src> <user>@<host>:<dst>/`
pub fn rsync_to_remote(
    src: &Path,
    user: &str,
    host: &str,
    dst: &str,
) -> CommandSpec {
    let target = if user.is_empty() {
        format!("{}:{}/", host, dst.trim_end_matches('/'))
    } else {
        format!("{}@{}:{}/", user, host, dst.trim_end_matches('/'))
    };
    CommandSpec::new("rsync").args([
        "-az".to_string(),
        "-e".to_string(),
        "ssh".to_string(),
        src.display().to_string(),
        target,
    ])
}

/// The correctness-test invocation, run from the workload directory.
pub fn workload(cfg: &WorkloadConfig) -> CommandSpec {
    let spec = CommandSpec::new(&cfg.program)
        .args(cfg.args.iter().cloned())
        .work_dir(&cfg.work_dir);
    if cfg.timeout_ms > 0 {
        spec.timeout(Duration::from_millis(cfg.timeout_ms))
    } else {
        spec
    }
}
