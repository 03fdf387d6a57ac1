//! External process execution.
//!
//! Every piece of work the harness does is a child process. `CommandRunner`
//! is the seam between the orchestration logic and the OS so the loop can be
//! driven by a scripted runner in tests.

mod process_runner;
pub use process_runner::*;

#[cfg(test)]
mod command_test;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::CommandError;

/// A program invocation. Arguments are passed verbatim, never through a
/// local shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            work_dir: None,
            timeout: None,
        }
    }

    pub fn arg(
        mut self,
        arg: impl Into<String>,
    ) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(
        mut self,
        args: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn work_dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Turns a nonzero exit into `CommandError::NonZeroExit`.
    pub fn require_success(
        &self,
        output: CommandOutput,
    ) -> Result<CommandOutput, CommandError> {
        if output.success() {
            Ok(output)
        } else {
            Err(CommandError::NonZeroExit {
                command: self.to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs one command to completion. A nonzero exit is reported through
/// `CommandOutput::code`, not as an error; callers decide what it means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        spec: &CommandSpec,
    ) -> Result<CommandOutput, CommandError>;
}
