use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use reqwest::Client;
use serde_json::json;
use tracing::warn;

use super::domain::LeadRecord;
use crate::config::SmtpConfig;

/// Outbound announcement hook invoked after a lead is stored.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn lead_captured(&self, lead: &LeadRecord) -> Result<(), NotificationError>;
}

/// Delivery failure on one of the outbound channels.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("email delivery failed: {0}")]
    Email(String),
    #[error("webhook delivery failed: {0}")]
    Webhook(String),
}

/// Emails each captured lead to the sales inbox over SMTP. The
/// blocking transport runs off the async runtime.
pub struct SmtpLeadNotifier {
    config: SmtpConfig,
}

impl SmtpLeadNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, lead: &LeadRecord) -> Result<Message, NotificationError> {
        let from: Mailbox = self
            .config
            .from_address
            .parse()
            .map_err(|err| NotificationError::Email(format!("bad sender address: {err}")))?;
        let to: Mailbox = self
            .config
            .to_address
            .parse()
            .map_err(|err| NotificationError::Email(format!("bad inbox address: {err}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email_subject(lead))
            .body(email_body(lead))
            .map_err(|err| NotificationError::Email(err.to_string()))
    }
}

#[async_trait]
impl LeadNotifier for SmtpLeadNotifier {
    async fn lead_captured(&self, lead: &LeadRecord) -> Result<(), NotificationError> {
        let message = self.build_message(lead)?;
        let config = self.config.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let credentials = Credentials::new(config.username, config.password);
            let mailer = SmtpTransport::relay(&config.host)
                .map_err(|err| NotificationError::Email(err.to_string()))?
                .credentials(credentials)
                .build();

            mailer
                .send(&message)
                .map(|_| ())
                .map_err(|err| NotificationError::Email(err.to_string()))
        })
        .await;

        match outcome {
            Ok(result) => result,
            Err(join_error) => Err(NotificationError::Email(join_error.to_string())),
        }
    }
}

/// Posts a one-line summary of each lead to a chat incoming webhook.
pub struct ChatWebhookNotifier {
    client: Client,
    url: String,
}

impl ChatWebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl LeadNotifier for ChatWebhookNotifier {
    async fn lead_captured(&self, lead: &LeadRecord) -> Result<(), NotificationError> {
        let payload = json!({ "text": webhook_text(lead) });

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotificationError::Webhook(err.to_string()))?
            .error_for_status()
            .map_err(|err| NotificationError::Webhook(err.to_string()))?;

        Ok(())
    }
}

/// Fans a captured lead out to whichever channels are configured.
/// Channel failures are logged and swallowed; the caller never sees
/// them.
#[derive(Default)]
pub struct NotificationFanout {
    email: Option<SmtpLeadNotifier>,
    webhook: Option<ChatWebhookNotifier>,
}

impl NotificationFanout {
    pub fn new(email: Option<SmtpLeadNotifier>, webhook: Option<ChatWebhookNotifier>) -> Self {
        Self { email, webhook }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadNotifier for NotificationFanout {
    async fn lead_captured(&self, lead: &LeadRecord) -> Result<(), NotificationError> {
        if let Some(email) = &self.email {
            if let Err(error) = email.lead_captured(lead).await {
                warn!(lead_id = lead.id, %error, "lead email notification failed");
            }
        }

        if let Some(webhook) = &self.webhook {
            if let Err(error) = webhook.lead_captured(lead).await {
                warn!(lead_id = lead.id, %error, "lead webhook notification failed");
            }
        }

        Ok(())
    }
}

fn email_subject(lead: &LeadRecord) -> String {
    format!("New {} lead: {}", lead.form_type.as_str(), lead.name)
}

fn email_body(lead: &LeadRecord) -> String {
    let mut lines = vec![
        format!("Name: {}", lead.name),
        format!("Email: {}", lead.email),
        format!("Form: {}", lead.form_type.as_str()),
        format!("Source page: {}", lead.source_page),
    ];

    if let Some(company) = &lead.company {
        lines.push(format!("Company: {company}"));
    }
    if let Some(phone) = &lead.phone {
        lines.push(format!("Phone: {phone}"));
    }
    if let Some(message) = &lead.message {
        lines.push(format!("Message: {message}"));
    }

    lines.join("\n")
}

fn webhook_text(lead: &LeadRecord) -> String {
    let company = lead.company.as_deref().unwrap_or("-");
    format!(
        "New {} lead: {} <{}> ({}) via {}",
        lead.form_type.as_str(),
        lead.name,
        lead.email,
        company,
        lead.source_page
    )
}
