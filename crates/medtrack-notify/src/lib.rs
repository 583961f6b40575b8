//! # MedTrack Notify
//! Delivery transports behind the [`Notifier`] trait.

pub mod log;
pub mod mailjet;
pub mod noop;
pub mod smtp;

use medtrack_core::config::NotifyConfig;
use medtrack_core::traits::Notifier;
use std::sync::Arc;

pub use log::LogNotifier;
pub use mailjet::MailjetNotifier;
pub use noop::NoopNotifier;
pub use smtp::SmtpNotifier;

/// Build the transport named by `config.backend`.
///
/// A backend that is missing credentials or addresses falls back to
/// [`NoopNotifier`], so reminders fail loudly instead of disappearing.
pub fn create_notifier(config: &NotifyConfig) -> Arc<dyn Notifier> {
    let addressed = !config.from_email.trim().is_empty() && !config.to_email.trim().is_empty();
    match config.backend.trim().to_lowercase().as_str() {
        "mailjet" => {
            let creds = &config.mailjet;
            if !addressed || creds.api_key.is_empty() || creds.api_secret.is_empty() {
                tracing::warn!(
                    "Mailjet not configured (need MAILJET_API_KEY, MAILJET_API_SECRET, FROM_EMAIL, TO_EMAIL)"
                );
                return Arc::new(NoopNotifier::new("mailjet"));
            }
            Arc::new(MailjetNotifier::new(config.clone()))
        }
        "smtp" => {
            if !addressed || config.smtp.host.is_empty() {
                tracing::warn!("SMTP not configured (need smtp.host, FROM_EMAIL, TO_EMAIL)");
                return Arc::new(NoopNotifier::new("smtp"));
            }
            match SmtpNotifier::new(config) {
                Ok(n) => Arc::new(n),
                Err(e) => {
                    tracing::warn!("SMTP transport unavailable: {e}");
                    Arc::new(NoopNotifier::new("smtp"))
                }
            }
        }
        "log" => Arc::new(LogNotifier),
        "none" | "" => Arc::new(NoopNotifier::new("none")),
        other => {
            tracing::warn!("Unknown notify backend '{other}', reminders will not be delivered");
            Arc::new(NoopNotifier::new("none"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addressed() -> NotifyConfig {
        NotifyConfig {
            from_email: "tracker@example.org".into(),
            to_email: "care@example.org".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mailjet_without_credentials_is_noop() {
        let notifier = create_notifier(&addressed());
        assert_eq!(notifier.name(), "noop");
    }

    #[test]
    fn test_mailjet_with_credentials() {
        let mut config = addressed();
        config.mailjet.api_key = "key".into();
        config.mailjet.api_secret = "secret".into();
        assert_eq!(create_notifier(&config).name(), "mailjet");

        config.to_email.clear();
        assert_eq!(create_notifier(&config).name(), "noop");
    }

    #[test]
    fn test_log_and_unknown_backends() {
        let mut config = NotifyConfig { backend: "log".into(), ..Default::default() };
        assert_eq!(create_notifier(&config).name(), "log");
        config.backend = "carrier-pigeon".into();
        assert_eq!(create_notifier(&config).name(), "noop");
    }

    #[tokio::test]
    async fn test_smtp_builds_transport() {
        let mut config = addressed();
        config.backend = "smtp".into();
        config.smtp.host = "mail.example.org".into();
        assert_eq!(create_notifier(&config).name(), "smtp");
    }
}
