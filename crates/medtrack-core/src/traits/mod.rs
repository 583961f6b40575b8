//! Collaborator traits consumed by the scheduler and gateway.

pub mod notifier;
pub mod store;

pub use notifier::Notifier;
pub use store::{MedicationStore, Page};
