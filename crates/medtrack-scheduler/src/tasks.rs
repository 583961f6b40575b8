//! Trigger identities and outcomes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Weekly pill-box setup reminder.
    Weekly,
    /// Daily low-supply check.
    Reorder,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 2] = [TriggerKind::Weekly, TriggerKind::Reorder];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Weekly => "weekly",
            TriggerKind::Reorder => "reorder",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one trigger run. Failures are reported as `Err` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TriggerOutcome {
    /// A reminder went out covering `drugs` medicines.
    Sent { drugs: usize },
    /// Nothing to report.
    Skipped,
}

impl TriggerOutcome {
    pub fn was_sent(&self) -> bool {
        matches!(self, TriggerOutcome::Sent { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json() {
        let sent = serde_json::to_value(TriggerOutcome::Sent { drugs: 2 }).unwrap();
        assert_eq!(sent, serde_json::json!({"status": "sent", "drugs": 2}));
        let skipped = serde_json::to_value(TriggerOutcome::Skipped).unwrap();
        assert_eq!(skipped, serde_json::json!({"status": "skipped"}));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TriggerKind::Weekly.to_string(), "weekly");
        assert_eq!(TriggerKind::Reorder.to_string(), "reorder");
    }
}
