use std::time::Duration;
use std::time::Instant;

use super::*;

#[test]
fn display_should_quote_arguments_with_spaces() {
    let spec = CommandSpec::new("ssh")
        .arg("store-1")
        .arg("sudo iptables -F");

    assert_eq!(spec.to_string(), "ssh store-1 'sudo iptables -F'");
}

#[test]
fn require_success_should_reject_nonzero_exit() {
    let spec = CommandSpec::new("lein").args(["run", "test-all"]);
    let output = CommandOutput {
        code: Some(2),
        stdout: String::new(),
        stderr: "boom\n".into(),
    };

    match spec.require_success(output) {
        Err(CommandError::NonZeroExit { command, code, stderr }) => {
            assert_eq!(command, "lein run test-all");
            assert_eq!(code, Some(2));
            assert_eq!(stderr, "boom");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn signal_terminated_output_is_not_success() {
    let output = CommandOutput {
        code: None,
        ..Default::default()
    };
    assert!(!output.success());
}

#[tokio::test]
async fn process_runner_should_capture_stdout_and_exit_code() {
    let spec = CommandSpec::new("sh").args(["-c", "echo hello; exit 3"]);

    let output = ProcessRunner.run(&spec).await.unwrap();

    assert_eq!(output.code, Some(3));
    assert!(output.stdout.contains("hello"));
}

#[tokio::test]
async fn process_runner_should_honor_work_dir() {
    let dir = tempfile::tempdir().unwrap();
    let spec = CommandSpec::new("pwd").work_dir(dir.path());

    let output = ProcessRunner.run(&spec).await.unwrap();

    let reported = std::fs::canonicalize(output.stdout.trim()).unwrap();
    assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
}

#[tokio::test]
async fn process_runner_should_report_missing_program() {
    let spec = CommandSpec::new("nonexistent_command_12345");

    let result = ProcessRunner.run(&spec).await;

    assert!(matches!(result, Err(CommandError::Spawn { .. })));
}

#[tokio::test]
async fn process_runner_should_time_out_slow_commands() {
    let spec = CommandSpec::new("sleep")
        .arg("5")
        .timeout(Duration::from_millis(100));

    let start = Instant::now();
    let result = ProcessRunner.run(&spec).await;

    assert!(matches!(result, Err(ref e) if e.is_timeout()));
    assert!(start.elapsed() < Duration::from_secs(4));
}
