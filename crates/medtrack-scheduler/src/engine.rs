//! Reminder engine: runs the triggers on demand or on their timers.

use medtrack_core::clock::Clock;
use medtrack_core::config::ReminderConfig;
use medtrack_core::error::Result;
use medtrack_core::traits::{MedicationStore, Notifier, Page};
use medtrack_core::{reorder, window};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::content::{self, ReminderMessage, ReorderContext};
use crate::cron::{self, ReminderSchedules, TriggerSchedule};
use crate::tasks::{TriggerKind, TriggerOutcome};

pub struct ReminderEngine {
    store: Arc<dyn MedicationStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    reminder: ReminderConfig,
    weekly_lock: Mutex<()>,
    reorder_lock: Mutex<()>,
}

impl ReminderEngine {
    pub fn new(
        store: Arc<dyn MedicationStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        reminder: ReminderConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            reminder,
            weekly_lock: Mutex::new(()),
            reorder_lock: Mutex::new(()),
        }
    }

    pub fn notifier_name(&self) -> &str {
        self.notifier.name()
    }

    fn lock(&self, kind: TriggerKind) -> &Mutex<()> {
        match kind {
            TriggerKind::Weekly => &self.weekly_lock,
            TriggerKind::Reorder => &self.reorder_lock,
        }
    }

    /// Whether a run of `kind` is in progress.
    pub fn is_running(&self, kind: TriggerKind) -> bool {
        self.lock(kind).try_lock().is_err()
    }

    /// Run one trigger now. Waits for an in-flight run of the same trigger.
    pub async fn trigger(&self, kind: TriggerKind) -> Result<TriggerOutcome> {
        let _running = self.lock(kind).lock().await;
        match kind {
            TriggerKind::Weekly => self.weekly().await,
            TriggerKind::Reorder => self.reorder().await,
        }
    }

    pub async fn run_weekly(&self) -> Result<TriggerOutcome> {
        self.trigger(TriggerKind::Weekly).await
    }

    pub async fn run_reorder(&self) -> Result<TriggerOutcome> {
        self.trigger(TriggerKind::Reorder).await
    }

    /// Send a test message through the configured transport.
    pub async fn send_test(&self) -> Result<()> {
        self.deliver(&content::test_message()).await
    }

    async fn weekly(&self) -> Result<TriggerOutcome> {
        let drugs = self.store.list_drugs(Page::all()).await?;
        let message = content::weekly_setup(&drugs, self.clock.today());
        self.deliver(&message).await?;
        tracing::info!("Weekly reminder sent for {} drug(s)", drugs.len());
        Ok(TriggerOutcome::Sent { drugs: drugs.len() })
    }

    async fn reorder(&self) -> Result<TriggerOutcome> {
        let today = self.clock.today();
        let drugs = self.store.list_drugs(Page::all()).await?;
        let low = reorder::needing_reorder(&drugs);
        if low.is_empty() {
            tracing::info!("No drugs need reordering");
            return Ok(TriggerOutcome::Skipped);
        }

        let vacations = self.store.list_vacations(Page::all()).await?;
        let ctx = ReorderContext {
            vacation: window::find_current(&vacations, today),
            first_order_of_quarter: reorder::is_first_order_of_quarter(&drugs, &self.clock.now()),
            patient: self.reminder.patient.as_deref(),
            signature: self.reminder.signature.as_deref(),
        };
        let message = content::reorder(&low, &ctx, today);
        self.deliver(&message).await?;
        tracing::info!("Reorder reminder sent for {} drug(s)", low.len());
        Ok(TriggerOutcome::Sent { drugs: low.len() })
    }

    async fn deliver(&self, message: &ReminderMessage) -> Result<()> {
        self.notifier.send(&message.subject, &message.body).await.inspect_err(|e| {
            tracing::warn!("[{}] failed to send '{}': {e}", self.notifier.name(), message.subject);
        })
    }

    /// Start both timer loops.
    pub fn spawn(self: Arc<Self>, schedules: ReminderSchedules) -> SchedulerHandle {
        tracing::info!(
            "⏰ Reminders scheduled: weekly {}, reorder {}",
            schedules.weekly,
            schedules.reorder
        );
        let tasks = vec![
            tokio::spawn(Arc::clone(&self).run_loop(TriggerKind::Weekly, schedules.weekly)),
            tokio::spawn(self.run_loop(TriggerKind::Reorder, schedules.reorder)),
        ];
        SchedulerHandle { tasks }
    }

    async fn run_loop(self: Arc<Self>, kind: TriggerKind, schedule: TriggerSchedule) {
        let mut last_fired = None;
        loop {
            let now = self.clock.now();
            // never recompute a firing we just ran, even if the wall clock lags the timer
            let from = match last_fired {
                Some(fired) if fired > now.naive_local() => fired,
                _ => now.naive_local(),
            };
            let next = schedule.next_after(from);
            let delay = cron::delay_until(next, now);
            tracing::debug!("{kind} reminder next at {next} (in {}s)", delay.as_secs());
            tokio::time::sleep(delay).await;
            last_fired = Some(next);

            match self.trigger(kind).await {
                Ok(TriggerOutcome::Sent { drugs }) => {
                    tracing::debug!("{kind} trigger sent ({drugs} drug(s))");
                }
                Ok(TriggerOutcome::Skipped) => tracing::debug!("{kind} trigger skipped"),
                Err(e) => tracing::error!("{kind} reminder failed: {e}"),
            }
        }
    }
}

/// Running timer loops. Dropping the handle leaves them running.
pub struct SchedulerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        tracing::info!("Reminder scheduler stopped");
    }
}
