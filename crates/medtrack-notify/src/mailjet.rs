//! Mailjet transport: transactional send API v3.1.

use async_trait::async_trait;
use medtrack_core::config::NotifyConfig;
use medtrack_core::error::{MedTrackError, Result};
use medtrack_core::traits::Notifier;
use serde::Serialize;

const SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

pub struct MailjetNotifier {
    config: NotifyConfig,
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    #[serde(rename = "Messages")]
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Message<'a> {
    from: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    text_part: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Contact<'a> {
    email: &'a str,
    name: &'a str,
}

impl MailjetNotifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config, client: reqwest::Client::new(), url: SEND_URL.into() }
    }

    /// Point at another endpoint (sandbox or test server).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn payload<'a>(&'a self, subject: &'a str, body: &'a str) -> SendRequest<'a> {
        let to_name = if self.config.to_name.is_empty() {
            self.config.to_email.as_str()
        } else {
            self.config.to_name.as_str()
        };
        SendRequest {
            messages: [Message {
                from: Contact { email: &self.config.from_email, name: &self.config.from_name },
                to: [Contact { email: &self.config.to_email, name: to_name }],
                subject,
                text_part: body,
            }],
        }
    }
}

#[async_trait]
impl Notifier for MailjetNotifier {
    fn name(&self) -> &str {
        "mailjet"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.config.mailjet.api_key, Some(&self.config.mailjet.api_secret))
            .json(&self.payload(subject, body))
            .send()
            .await
            .map_err(|e| MedTrackError::notify(format!("Mailjet request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("Mailjet rejected '{subject}': {status}: {text}");
            return Err(MedTrackError::notify(format!("Mailjet API error {status}: {text}")));
        }

        tracing::info!("Email sent via Mailjet: {subject}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NotifyConfig {
        NotifyConfig {
            from_email: "tracker@example.org".into(),
            to_email: "care@example.org".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_shape() {
        let notifier = MailjetNotifier::new(config());
        let json = serde_json::to_value(notifier.payload("Subject", "Body")).unwrap();
        let msg = &json["Messages"][0];
        assert_eq!(msg["From"]["Email"], "tracker@example.org");
        assert_eq!(msg["From"]["Name"], "Medicine Tracker");
        // recipient name falls back to the address
        assert_eq!(msg["To"][0]["Name"], "care@example.org");
        assert_eq!(msg["Subject"], "Subject");
        assert_eq!(msg["TextPart"], "Body");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_notify_error() {
        let notifier = MailjetNotifier::new(config()).with_url("http://127.0.0.1:1/v3.1/send");
        let err = notifier.send("s", "b").await.unwrap_err();
        assert!(matches!(err, MedTrackError::Notify(_)));
    }
}
