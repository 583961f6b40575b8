//! Notification transport trait.

use async_trait::async_trait;

use crate::error::Result;

/// Delivers a plain-text message to the configured recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Transport name for logs ("mailjet", "smtp", ...).
    fn name(&self) -> &str;

    /// Send one message. A transport failure is an `Err`; callers decide
    /// whether to surface or log it. Nothing is retried here.
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}
