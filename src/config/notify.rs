use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// SMTP alert settings. Credentials never live in the file: only the names
/// of the environment variables holding them do.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotifyConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// Submission port (STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub to: Vec<String>,

    #[serde(default = "default_username_env")]
    pub username_env: String,

    #[serde(default = "default_password_env")]
    pub password_env: String,

    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            from: String::new(),
            to: vec![],
            username_env: default_username_env(),
            password_env: default_password_env(),
            subject_prefix: default_subject_prefix(),
        }
    }
}

impl NotifyConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.smtp_host.is_empty() {
            return Err(Error::InvalidConfig(
                "notify.smtp_host is required when notify is enabled".into(),
            ));
        }
        if self.from.is_empty() {
            return Err(Error::InvalidConfig(
                "notify.from is required when notify is enabled".into(),
            ));
        }
        if self.to.is_empty() {
            return Err(Error::InvalidConfig(
                "notify.to must name at least one recipient".into(),
            ));
        }
        Ok(())
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_username_env() -> String {
    "SMTP_USERNAME".to_string()
}
fn default_password_env() -> String {
    "SMTP_PASSWORD".to_string()
}
fn default_subject_prefix() -> String {
    "[jepsen-harness]".to_string()
}
