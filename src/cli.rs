use clap::Parser;

use crate::FailurePolicy;
use crate::HarnessConfig;

#[derive(Parser, Debug, Default)]
#[command(name = "jepsen-harness")]
#[command(version)]
#[command(about = "Repeatedly runs a Jepsen workload against a key-value cluster and archives evidence on failure", long_about = None)]
pub struct Args {
    /// Settings file layered over `config/harness.toml`; `CONFIG_PATH` and
    /// `HARNESS__*` variables still win
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of iterations to run
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// What to do after a failed iteration: halt or continue
    #[arg(long)]
    pub on_failure: Option<FailurePolicy>,

    /// Do not send failure emails even if enabled in the config
    #[arg(long, default_value_t = false)]
    pub no_notify: bool,
}

impl Args {
    /// Applies command-line overrides; these win over every config source.
    pub fn apply(
        &self,
        mut config: HarnessConfig,
    ) -> HarnessConfig {
        if let Some(iterations) = self.iterations {
            config.run.iterations = iterations;
        }
        if let Some(policy) = self.on_failure {
            config.run.on_failure = policy;
        }
        if self.no_notify {
            config.notify.enabled = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "jepsen-harness",
            "--config",
            "soak.toml",
            "--iterations",
            "5",
            "--on-failure",
            "continue",
            "--no-notify",
        ])
        .unwrap();

        assert_eq!(args.config.as_deref(), Some("soak.toml"));
        assert_eq!(args.iterations, Some(5));
        assert_eq!(args.on_failure, Some(FailurePolicy::Continue));
        assert!(args.no_notify);
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Args::try_parse_from(["jepsen-harness", "--on-failure", "retry"]).is_err());
    }

    #[test]
    fn flags_override_loaded_config() {
        let mut config = HarnessConfig::default();
        config.notify.enabled = true;
        let args = Args {
            iterations: Some(2),
            on_failure: Some(FailurePolicy::Continue),
            no_notify: true,
            ..Default::default()
        };

        let config = args.apply(config);

        assert_eq!(config.run.iterations, 2);
        assert_eq!(config.run.on_failure, FailurePolicy::Continue);
        assert!(!config.notify.enabled);
    }

    #[test]
    fn absent_flags_keep_config() {
        let config = Args::default().apply(HarnessConfig::default());

        assert_eq!(config.run.iterations, 99);
        assert_eq!(config.run.on_failure, FailurePolicy::Halt);
    }
}
