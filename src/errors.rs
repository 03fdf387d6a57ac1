//! Harness Error Hierarchy
//!
//! Failures are grouped by the layer that produced them: spawning external
//! commands, loading settings, archiving evidence and sending alerts.

use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// External process could not be run or did not finish
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Settings could not be loaded or merged
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Settings were loaded but violate a rule
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Failure alert could not be delivered
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Local filesystem failures
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Evidence archive could not be created
    #[error("Evidence archive failed at {path}: {source}")]
    Evidence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data reset exceeded its deadline; unrecoverable for the run
    #[error("Data reset on {node} did not finish within {timeout:?}")]
    ResetTimeout { node: String, timeout: Duration },
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Program could not be started (missing binary, permissions)
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Program was killed after exceeding its deadline
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// Waiting on a running child failed
    #[error("Failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),

    /// Program ran but reported failure
    #[error("`{command}` exited with {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl CommandError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CommandError::Timeout { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Credential environment variable is unset or not unicode
    #[error("Missing SMTP credential in environment variable {0}")]
    MissingCredential(String),

    /// Sender or recipient could not be parsed as a mailbox
    #[error("Invalid mailbox {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// SMTP submission failed
    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}
