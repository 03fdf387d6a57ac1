use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Cluster roster and the tools used to manage it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterConfig {
    /// Cluster name passed to the management CLI
    #[serde(default = "default_cluster_name")]
    pub name: String,

    /// Cluster management CLI (`<ctl> status|start <name>`)
    #[serde(default = "default_ctl_program")]
    pub ctl_program: String,

    /// Node host names; the first one receives the data reset
    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    /// Remote login used for ssh and rsync
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,

    /// Key-value client program (redis protocol)
    #[serde(default = "default_kv_client_program")]
    pub kv_client_program: String,

    #[serde(default = "default_kv_port")]
    pub kv_port: u16,

    /// Install directory on every node
    #[serde(default = "default_remote_root")]
    pub remote_root: String,

    /// Server info log, relative to `remote_root`
    #[serde(default = "default_info_log")]
    pub info_log: String,

    /// Server stdout log, relative to `remote_root`
    #[serde(default = "default_stdout_log")]
    pub stdout_log: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: default_cluster_name(),
            ctl_program: default_ctl_program(),
            nodes: default_nodes(),
            ssh_user: default_ssh_user(),
            kv_client_program: default_kv_client_program(),
            kv_port: default_kv_port(),
            remote_root: default_remote_root(),
            info_log: default_info_log(),
            stdout_log: default_stdout_log(),
        }
    }
}

impl ClusterConfig {
    /// # Errors
    /// Returns `Error::InvalidConfig` if the roster is unusable
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::InvalidConfig(
                "cluster.nodes must contain at least one node".into(),
            ));
        }

        if let Some(node) = self.nodes.iter().find(|n| n.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "cluster.nodes contains an empty host name: {:?}",
                node
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node) {
                return Err(Error::InvalidConfig(format!(
                    "Duplicate node {} in cluster.nodes",
                    node
                )));
            }
        }

        if self.name.is_empty() {
            return Err(Error::InvalidConfig("cluster.name cannot be empty".into()));
        }

        if self.kv_port == 0 {
            return Err(Error::InvalidConfig(
                "cluster.kv_port must be non-zero".into(),
            ));
        }

        Ok(())
    }

    /// Node that receives `flushdb`
    pub fn primary_node(&self) -> &str {
        self.nodes.first().map(String::as_str).unwrap_or_default()
    }

    pub fn remote_info_log(&self) -> String {
        join_remote(&self.remote_root, &self.info_log)
    }

    pub fn remote_stdout_log(&self) -> String {
        join_remote(&self.remote_root, &self.stdout_log)
    }
}

/// Joins remote paths textually; `~` must survive for the remote shell.
fn join_remote(
    root: &str,
    rel: &str,
) -> String {
    format!("{}/{}", root.trim_end_matches('/'), rel.trim_start_matches('/'))
}

fn default_cluster_name() -> String {
    "eloqkv-cluster".to_string()
}
fn default_ctl_program() -> String {
    "eloqctl".to_string()
}
fn default_nodes() -> Vec<String> {
    vec![
        "store-1".to_string(),
        "store-2".to_string(),
        "compute-6".to_string(),
    ]
}
fn default_ssh_user() -> String {
    "eloq".to_string()
}
fn default_kv_client_program() -> String {
    "redis-cli".to_string()
}
fn default_kv_port() -> u16 {
    6389
}
fn default_remote_root() -> String {
    "~/eloqkv-cluster/EloqKV".to_string()
}
fn default_info_log() -> String {
    "logs/tx-6389/eloqkv.log.INFO".to_string()
}
fn default_stdout_log() -> String {
    "logs/std-out-6389".to_string()
}
