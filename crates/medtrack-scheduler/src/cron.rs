//! Firing times for the reminder triggers, in local wall-clock time.

use chrono::{DateTime, Datelike, Local, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Weekday};
use medtrack_core::config::ScheduleConfig;
use medtrack_core::error::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSchedule {
    /// Once a week on `weekday` at `time`.
    Weekly { weekday: Weekday, time: NaiveTime },
    /// Every day at `time`.
    Daily { time: NaiveTime },
}

impl TriggerSchedule {
    /// Next firing strictly after `now`.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        match *self {
            TriggerSchedule::Daily { time } => {
                let candidate = now.date().and_time(time);
                if candidate > now { candidate } else { candidate + TimeDelta::days(1) }
            }
            TriggerSchedule::Weekly { weekday, time } => {
                let ahead = (i64::from(weekday.num_days_from_monday())
                    - i64::from(now.weekday().num_days_from_monday()))
                .rem_euclid(7);
                let candidate = (now.date() + TimeDelta::days(ahead)).and_time(time);
                if candidate > now { candidate } else { candidate + TimeDelta::days(7) }
            }
        }
    }
}

impl std::fmt::Display for TriggerSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerSchedule::Weekly { weekday, time } => write!(f, "every {weekday} at {}", time.format("%H:%M")),
            TriggerSchedule::Daily { time } => write!(f, "daily at {}", time.format("%H:%M")),
        }
    }
}

/// Both trigger schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSchedules {
    pub weekly: TriggerSchedule,
    pub reorder: TriggerSchedule,
}

impl Default for ReminderSchedules {
    fn default() -> Self {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            weekly: TriggerSchedule::Weekly { weekday: Weekday::Sun, time: at(9) },
            reorder: TriggerSchedule::Daily { time: at(10) },
        }
    }
}

impl ReminderSchedules {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Ok(Self {
            weekly: TriggerSchedule::Weekly { weekday: config.weekly_weekday()?, time: config.weekly_at()? },
            reorder: TriggerSchedule::Daily { time: config.daily_at()? },
        })
    }
}

/// How long to sleep from `now` until the local wall-clock time `next`.
///
/// A `next` that falls into a DST gap fires an hour later.
pub fn delay_until(next: NaiveDateTime, now: DateTime<Local>) -> Duration {
    let target = Local
        .from_local_datetime(&next)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(next + TimeDelta::hours(1))).earliest());
    match target {
        Some(target) => (target - now).to_std().unwrap_or(Duration::ZERO),
        None => Duration::from_secs(3600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use medtrack_core::FixedClock;
    use medtrack_core::Clock;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_daily_next() {
        let daily = TriggerSchedule::Daily { time: time(10, 0) };
        assert_eq!(daily.next_after(at(2025, 3, 4, 8, 0)), at(2025, 3, 4, 10, 0));
        // exactly at the firing time moves to tomorrow
        assert_eq!(daily.next_after(at(2025, 3, 4, 10, 0)), at(2025, 3, 5, 10, 0));
        assert_eq!(daily.next_after(at(2025, 12, 31, 23, 0)), at(2026, 1, 1, 10, 0));
    }

    #[test]
    fn test_weekly_next() {
        let weekly = TriggerSchedule::Weekly { weekday: Weekday::Sun, time: time(9, 0) };
        // Friday → the coming Sunday
        assert_eq!(weekly.next_after(at(2026, 10, 16, 12, 0)), at(2026, 10, 18, 9, 0));
        // Sunday before 09:00 → same day
        assert_eq!(weekly.next_after(at(2026, 10, 18, 8, 59)), at(2026, 10, 18, 9, 0));
        // Sunday after 09:00 → a week later
        assert_eq!(weekly.next_after(at(2026, 10, 18, 9, 0)), at(2026, 10, 25, 9, 0));
        // Monday → six days ahead
        assert_eq!(weekly.next_after(at(2026, 10, 19, 0, 0)), at(2026, 10, 25, 9, 0));
    }

    #[test]
    fn test_from_config() {
        let schedules = ReminderSchedules::from_config(&ScheduleConfig::default()).unwrap();
        assert_eq!(schedules, ReminderSchedules::default());

        let custom = ScheduleConfig { weekly_day: "sat".into(), daily_time: "07:30".into(), ..Default::default() };
        let schedules = ReminderSchedules::from_config(&custom).unwrap();
        assert_eq!(schedules.weekly, TriggerSchedule::Weekly { weekday: Weekday::Sat, time: time(9, 0) });
        assert_eq!(schedules.reorder, TriggerSchedule::Daily { time: time(7, 30) });

        let broken = ScheduleConfig { weekly_time: "noon".into(), ..Default::default() };
        assert!(ReminderSchedules::from_config(&broken).is_err());
    }

    #[test]
    fn test_delay_until() {
        let now = FixedClock::at(at(2025, 6, 10, 9, 0)).now();
        assert_eq!(delay_until(at(2025, 6, 10, 10, 0), now), Duration::from_secs(3600));
        // past targets do not underflow
        assert_eq!(delay_until(at(2025, 6, 10, 8, 0), now), Duration::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(ReminderSchedules::default().weekly.to_string(), "every Sun at 09:00");
        assert_eq!(ReminderSchedules::default().reorder.to_string(), "daily at 10:00");
    }
}
