use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use jepsen_harness::cli::Args;
use jepsen_harness::CommandRunner;
use jepsen_harness::Harness;
use jepsen_harness::HarnessConfig;
use jepsen_harness::NoopNotifier;
use jepsen_harness::Notifier;
use jepsen_harness::ProcessRunner;
use jepsen_harness::Result;
use jepsen_harness::RunSummary;
use jepsen_harness::SmtpNotifier;
use tracing::error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

/// Every iteration passed
const EXIT_PASSED: u8 = 0;
/// At least one iteration failed and was archived
const EXIT_FAILED: u8 = 1;
/// Configuration problem or data-reset timeout
const EXIT_FATAL: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    // Initializing Logs
    let _guard = match init_observability(&settings.run.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    info!(
        "Starting {} iterations against {} ({:?} on failure)",
        settings.run.iterations, settings.cluster.name, settings.run.on_failure
    );

    let result = if settings.notify.enabled {
        let notifier = SmtpNotifier::new(settings.notify.clone());
        run(settings, ProcessRunner, notifier).await
    } else {
        run(settings, ProcessRunner, NoopNotifier).await
    };

    match &result {
        Ok(summary) if summary.all_passed() => {
            info!("All {} iterations passed", summary.iterations);
        }
        Ok(summary) => {
            error!(
                "{} of {} iterations failed",
                summary.failures.len(),
                summary.iterations
            );
        }
        Err(e) => {
            error!("Harness stopped: {}", e);
        }
    }
    ExitCode::from(exit_code(&result))
}

/// 0 when every iteration passed, 1 when any failed, 2 when the run aborted.
fn exit_code(result: &Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) if summary.all_passed() => EXIT_PASSED,
        Ok(_) => EXIT_FAILED,
        Err(_) => EXIT_FATAL,
    }
}

fn load_settings(args: &Args) -> Result<HarnessConfig> {
    let settings = HarnessConfig::load(args.config.as_deref())?;
    args.apply(settings).validate()
}

async fn run<R: CommandRunner, N: Notifier>(
    settings: HarnessConfig,
    runner: R,
    notifier: N,
) -> Result<RunSummary> {
    Harness::new(settings, runner, notifier).run().await
}

/// Logs go to the console and to a daily-rotated file under `log_dir`.
pub fn init_observability(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "harness.log");

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(env_filter());
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(env_filter());
    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jepsen_harness::Error;
    use jepsen_harness::FailureReason;
    use jepsen_harness::FailureRecord;

    use super::*;

    #[test]
    fn clean_summary_exits_zero() {
        let summary = RunSummary {
            iterations: 3,
            failures: vec![],
        };

        assert_eq!(exit_code(&Ok(summary)), 0);
    }

    #[test]
    fn failed_iteration_exits_one() {
        let summary = RunSummary {
            iterations: 3,
            failures: vec![FailureRecord {
                iteration: 2,
                reason: FailureReason::WorkloadExit { code: Some(1) },
                archive: None,
                notified: true,
            }],
        };

        assert_eq!(exit_code(&Ok(summary)), 1);
    }

    #[test]
    fn reset_timeout_exits_two() {
        let result = Err(Error::ResetTimeout {
            node: "store-1".into(),
            timeout: Duration::from_secs(10),
        });

        assert_eq!(exit_code(&result), 2);
    }

    #[test]
    fn config_error_exits_two() {
        let result = Err(Error::InvalidConfig("cluster.nodes cannot be empty".into()));

        assert_eq!(exit_code(&result), 2);
    }
}
