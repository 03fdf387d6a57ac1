use std::env;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;
use tracing::info;

use super::FailureReport;
use super::Notifier;
use crate::NotifyConfig;
use crate::NotifyError;

/// Sends alerts through an SMTP submission endpoint (STARTTLS).
///
/// Credentials are read from the environment on every send so they can be
/// rotated without restarting a long soak run.
pub struct SmtpNotifier {
    config: NotifyConfig,
}

impl SmtpNotifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    pub(crate) fn credentials(&self) -> Result<Credentials, NotifyError> {
        let username = read_env(&self.config.username_env)?;
        let password = read_env(&self.config.password_env)?;
        Ok(Credentials::new(username, password))
    }

    pub(crate) fn build_message(
        &self,
        report: &FailureReport,
    ) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.config.from)?)
            .subject(report.subject(&self.config.subject_prefix))
            .header(ContentType::TEXT_PLAIN);
        for to in &self.config.to {
            builder = builder.to(parse_mailbox(to)?);
        }
        builder
            .body(report.body())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        report: &FailureReport,
    ) -> Result<(), NotifyError> {
        let message = self.build_message(report)?;
        let credentials = self.credentials()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        info!(
            "Failure alert for iteration {} sent to {}",
            report.iteration,
            self.config.to.join(", ")
        );
        Ok(())
    }
}

fn read_env(name: &str) -> Result<String, NotifyError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(NotifyError::MissingCredential(name.to_string())),
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
