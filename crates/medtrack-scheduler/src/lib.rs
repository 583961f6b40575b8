//! # MedTrack Scheduler
//!
//! Two reminder triggers on tokio timers, sharing one engine.
//!
//! ```text
//! ReminderEngine
//!   ├── weekly  (Sun 09:00): setup reminder over every drug
//!   ├── reorder (daily 10:00): drugs under 3 weeks of supply,
//!   │                          + doctor vacation, + quarter note
//!   └── Notifier (mailjet / smtp / log)
//! ```
//!
//! Each trigger holds its own async lock, so a manual run and a timer
//! firing of the same trigger never overlap. The weekly and reorder
//! triggers may run at the same time.

pub mod content;
pub mod cron;
pub mod engine;
pub mod tasks;

pub use content::{ReminderMessage, ReorderContext};
pub use cron::{ReminderSchedules, TriggerSchedule};
pub use engine::{ReminderEngine, SchedulerHandle};
pub use tasks::{TriggerKind, TriggerOutcome};
