use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Where failure evidence is archived.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EvidenceConfig {
    /// Parent of the per-failure timestamped directories
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Central server that receives a copy of every archive
    #[serde(default)]
    pub relay: Option<RelayConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub user: String,
    pub dest_dir: String,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            relay: None,
        }
    }
}

impl EvidenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "evidence.root_dir cannot be empty".into(),
            ));
        }
        if let Some(relay) = &self.relay {
            if relay.host.is_empty() || relay.dest_dir.is_empty() {
                return Err(Error::InvalidConfig(
                    "evidence.relay requires both host and dest_dir".into(),
                ));
            }
        }
        Ok(())
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("error_log")
}
