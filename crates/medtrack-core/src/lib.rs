//! # MedTrack Core
//!
//! Record types, the pure supply model and the collaborator traits.
//!
//! ```text
//! dosage: consumption, days/weeks remaining, reorder flag, week parity
//! window: doctor vacation status (current / upcoming / past)
//! reorder: reorder subset, first order of the quarter
//! traits: MedicationStore, Notifier
//! clock: SystemClock, FixedClock
//! ```

pub mod clock;
pub mod config;
pub mod dosage;
pub mod error;
pub mod reorder;
pub mod traits;
pub mod types;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::MedTrackConfig;
pub use dosage::{DosageSummary, WeekParity, REORDER_THRESHOLD_WEEKS};
pub use error::{MedTrackError, Result};
pub use window::VacationStatus;
