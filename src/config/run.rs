use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// What the loop does after an iteration fails.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure; log tails are also checked before each run
    #[default]
    Halt,
    /// Archive the failure and carry on with the next iteration
    Continue,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "halt" => Ok(FailurePolicy::Halt),
            "continue" => Ok(FailurePolicy::Continue),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RunConfig {
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Directory of the harness's own log file
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            on_failure: FailurePolicy::default(),
            log_dir: default_log_dir(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig(
                "run.iterations must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_iterations() -> u32 {
    99
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
