use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Thresholds for the validation that follows each workload run.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChecksConfig {
    /// Number of trailing log lines inspected per node
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,

    /// Case-insensitive substrings that mark a log tail as failed
    #[serde(default = "default_failure_keywords")]
    pub failure_keywords: Vec<String>,

    /// Client connections expected to remain open per node after a run
    #[serde(default = "default_expected_clients")]
    pub expected_clients: u32,

    /// Flush the data store before every workload run
    #[serde(default = "default_reset_before_run")]
    pub reset_before_run: bool,

    /// Deadline for the data reset (unit: milliseconds)
    #[serde(default = "default_reset_timeout_ms")]
    pub reset_timeout_ms: u64,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            tail_lines: default_tail_lines(),
            failure_keywords: default_failure_keywords(),
            expected_clients: default_expected_clients(),
            reset_before_run: default_reset_before_run(),
            reset_timeout_ms: default_reset_timeout_ms(),
        }
    }
}

impl ChecksConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tail_lines == 0 {
            return Err(Error::InvalidConfig(
                "checks.tail_lines must be greater than 0".into(),
            ));
        }
        if self.failure_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "checks.failure_keywords cannot contain empty entries".into(),
            ));
        }
        if self.reset_before_run && self.reset_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "checks.reset_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_tail_lines() -> usize {
    50
}
fn default_failure_keywords() -> Vec<String> {
    [
        "segmentation fault",
        "core dumped",
        "terminate called",
        "assertion",
        "aborted",
        "fatal",
        "panic",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_expected_clients() -> u32 {
    1
}
fn default_reset_before_run() -> bool {
    true
}
fn default_reset_timeout_ms() -> u64 {
    10_000
}
