//! Configuration management for the soak-test harness.
//!
//! Provides hierarchical configuration loading with priority:
//! 1. Default values (hardcoded)
//! 2. Main file `config/harness.toml` (if present)
//! 3. Explicit override file (`--config` on the command line)
//! 4. Configuration file from `CONFIG_PATH` (if set)
//! 5. Environment variables prefixed `HARNESS__` (highest priority)
mod checks;
mod cluster;
mod evidence;
mod notify;
mod run;
mod workload;
pub use checks::*;
pub use cluster::*;
pub use evidence::*;
pub use notify::*;
pub use run::*;
pub use workload::*;


use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Main configuration container for one harness process
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HarnessConfig {
    /// Cluster roster and the tools used to manage it
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// External workload runner invocation
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// Post-run validation thresholds
    #[serde(default)]
    pub checks: ChecksConfig,
    /// Where failure evidence is archived
    #[serde(default)]
    pub evidence: EvidenceConfig,
    /// Failure alert delivery
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Loop budget and failure policy
    #[serde(default)]
    pub run: RunConfig,
}

fn env_source() -> Environment {
    Environment::with_prefix("HARNESS")
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cluster.nodes")
        .with_list_parse_key("notify.to")
        .with_list_parse_key("checks.failure_keywords")
}

/// Main settings file, looked up relative to the working directory.
pub const MAIN_CONFIG_FILE: &str = "config/harness";

impl HarnessConfig {
    /// Loads configuration without a command-line override file.
    pub fn new() -> Result<Self> {
        Self::load(None)
    }

    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Merge order (later sources override earlier):
    /// 1. Type defaults
    /// 2. `config/harness.toml` if it exists
    /// 3. `override_path` (required when given)
    /// 4. Configuration file from `CONFIG_PATH` (if set)
    /// 5. Environment variables with `HARNESS__` prefix
    ///
    /// Callers must call `validate()` once all overrides are applied.
    pub fn load(override_path: Option<&str>) -> Result<Self> {
        Self::load_from(MAIN_CONFIG_FILE, override_path)
    }

    pub(crate) fn load_from(
        main_file: &str,
        override_path: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(main_file).required(false));

        if let Some(path) = override_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validates every section and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.cluster.validate()?;
        self.workload.validate()?;
        self.checks.validate()?;
        self.evidence.validate()?;
        self.notify.validate()?;
        self.run.validate()?;
        Ok(self)
    }
}
