use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// How the external correctness test is invoked.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkloadConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Directory the runner is started from
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Symlink (relative to `work_dir`) to the latest run's store directory
    #[serde(default = "default_store_link")]
    pub store_link: PathBuf,

    /// Upper bound on one workload run (0 means unbounded)
    #[serde(default)]
    pub timeout_ms: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            work_dir: default_work_dir(),
            store_link: default_store_link(),
            timeout_ms: 0,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "workload.program cannot be empty".into(),
            ));
        }
        if self.store_link.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "workload.store_link cannot be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn store_link_path(&self) -> PathBuf {
        self.work_dir.join(&self.store_link)
    }
}

fn default_program() -> String {
    "lein".to_string()
}

fn default_args() -> Vec<String> {
    [
        "run",
        "test-all",
        "--node",
        "compute-6",
        "--node",
        "store-1",
        "--node",
        "store-2",
        "--username",
        "eloq",
        "--password",
        "eloq",
        "--time-limit",
        "6000",
        "--nemesis",
        "none",
        "--workload",
        "append",
        "--nemesis-interval",
        "20",
        "--max-writes-per-key",
        "16",
        "--max-txn-length",
        "4",
        "--test-count",
        "1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_store_link() -> PathBuf {
    PathBuf::from("store/current")
}
