//! Log-only transport for development.

use async_trait::async_trait;
use medtrack_core::error::Result;
use medtrack_core::traits::Notifier;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        tracing::info!("📧 {subject}\n{body}");
        Ok(())
    }
}
