pub mod templates;

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{SmtpConfig, TlsMode};
use crate::models::Submission;

/// Outbound channel that tells the operator about a new submission.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &Submission) -> Result<(), String>;
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig) -> Result<Self, String> {
        let transport = build_smtp_transport(&config)?;
        Ok(Self { transport, config })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, submission: &Submission) -> Result<(), String> {
        let message = compose(&self.config, submission)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}

/// Build the plain-text operator notification for one submission.
pub fn compose(config: &SmtpConfig, submission: &Submission) -> Result<Message, String> {
    let from_address: Address = config
        .from
        .parse()
        .map_err(|e| format!("Invalid from address: {e}"))?;
    let from = Mailbox::new(Some(config.from_name.clone()), from_address);

    let to: Mailbox = config
        .notify_email
        .parse()
        .map_err(|e| format!("Invalid to address: {e}"))?;

    let mut builder = Message::builder().from(from).to(to).subject(&config.subject);

    // Visitors can type anything into the email field; only reply to real mailboxes.
    match submission.email().parse::<Mailbox>() {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(e) => tracing::debug!(
            submission_id = %submission.id(),
            "Skipping Reply-To, visitor email does not parse: {e}"
        ),
    }

    builder
        .header(ContentType::TEXT_PLAIN)
        .body(templates::render_notification(submission))
        .map_err(|e| format!("Failed to build email: {e}"))
}

pub fn build_smtp_transport(
    config: &SmtpConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, String> {
    let creds = Credentials::new(config.user.clone(), config.pass.clone());
    let timeout = Some(Duration::from_secs(30));

    let transport = match config.tls {
        TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| format!("SMTP relay error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .timeout(timeout)
            .build(),
        TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .credentials(creds)
            .timeout(timeout)
            .build(),
        TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP starttls error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .timeout(timeout)
            .build(),
    };

    Ok(transport)
}
