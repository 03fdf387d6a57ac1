mod scripted_runner;
pub use scripted_runner::*;

use crate::HarnessConfig;

/// Settings pointing every local path into `root` and keeping loops short.
pub fn test_config(root: &std::path::Path) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.cluster.nodes = vec!["n1".into(), "n2".into()];
    config.workload.work_dir = root.to_path_buf();
    config.evidence.root_dir = root.join("error_log");
    config.run.log_dir = root.join("logs");
    config.run.iterations = 3;
    config
}

pub fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
