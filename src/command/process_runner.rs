use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::CommandOutput;
use super::CommandRunner;
use super::CommandSpec;
use crate::CommandError;

/// `CommandRunner` backed by real child processes.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
    ) -> Result<CommandOutput, CommandError> {
        info!("{}", spec);

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &spec.work_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| CommandError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let output = match spec.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(result) => result.map_err(CommandError::Wait)?,
                Err(_) => {
                    // dropping the future drops the child, which kills it
                    warn!("`{}` timed out after {:?}", spec, timeout);
                    return Err(CommandError::Timeout {
                        command: spec.to_string(),
                        timeout,
                    });
                }
            },
            None => child.wait_with_output().await.map_err(CommandError::Wait)?,
        };

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("`{}` exited with {:?}", spec.program, result.code);
        Ok(result)
    }
}
