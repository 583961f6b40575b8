//! SMTP transport via lettre (STARTTLS relay).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use medtrack_core::config::NotifyConfig;
use medtrack_core::error::{MedTrackError, Result};
use medtrack_core::traits::Notifier;

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &NotifyConfig) -> Result<Self> {
        let smtp = &config.smtp;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| MedTrackError::notify(format!("SMTP relay {}: {e}", smtp.host)))?
            .port(smtp.port);
        if !smtp.username.is_empty() {
            builder = builder.credentials(Credentials::new(smtp.username.clone(), smtp.password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            from: mailbox(&config.from_name, &config.from_email)?,
            to: mailbox(&config.to_name, &config.to_email)?,
        })
    }

    fn message(&self, subject: &str, body: &str) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MedTrackError::notify(format!("Invalid email: {e}")))
    }
}

fn mailbox(name: &str, email: &str) -> Result<Mailbox> {
    let address: Address = email
        .trim()
        .parse()
        .map_err(|e| MedTrackError::config(format!("invalid email address '{email}': {e}")))?;
    let name = Some(name.trim()).filter(|n| !n.is_empty()).map(String::from);
    Ok(Mailbox::new(name, address))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = self.message(subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MedTrackError::notify(format!("SMTP send failed: {e}")))?;
        tracing::info!("Email sent via SMTP: {subject}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_parsing() {
        let mb = mailbox("Medicine Tracker", "tracker@example.org").unwrap();
        assert_eq!(mb.email.to_string(), "tracker@example.org");
        assert_eq!(mb.name.as_deref(), Some("Medicine Tracker"));
        assert!(mailbox("", "care@example.org").unwrap().name.is_none());
        assert!(matches!(mailbox("x", "not-an-address"), Err(MedTrackError::Config(_))));
    }

    #[tokio::test]
    async fn test_builds_plain_text_message() {
        let config = NotifyConfig {
            backend: "smtp".into(),
            from_email: "tracker@example.org".into(),
            to_email: "care@example.org".into(),
            smtp: medtrack_core::config::SmtpConfig { host: "mail.example.org".into(), ..Default::default() },
            ..Default::default()
        };
        let notifier = SmtpNotifier::new(&config).unwrap();
        let raw = String::from_utf8(notifier.message("Hello", "Body text").unwrap().formatted()).unwrap();
        assert!(raw.contains("Subject: Hello"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("Body text"));
    }
}
