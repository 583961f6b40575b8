//! Stand-in for an unconfigured transport.

use async_trait::async_trait;
use medtrack_core::error::{MedTrackError, Result};
use medtrack_core::traits::Notifier;

/// Every send fails, naming the backend that was left unconfigured.
pub struct NoopNotifier {
    backend: String,
}

impl NoopNotifier {
    pub fn new(backend: impl Into<String>) -> Self {
        Self { backend: backend.into() }
    }
}

#[async_trait]
impl Notifier for NoopNotifier {
    fn name(&self) -> &str {
        "noop"
    }

    async fn send(&self, subject: &str, _body: &str) -> Result<()> {
        tracing::warn!("Skipping '{subject}': {} transport not configured", self.backend);
        Err(MedTrackError::notify(format!("{} transport not configured", self.backend)))
    }
}
