//! Dosage model. Turns a drug's dosing configuration into consumption and
//! remaining-supply figures.
//!
//! Everything here is pure: the as-of date for the even/odd week decision is
//! passed in, never read from a clock.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{Drug, ScheduleKind};

/// Reorder when less than this many weeks of supply remain.
pub const REORDER_THRESHOLD_WEEKS: f64 = 3.0;

/// Length of one alternating cycle (even week + odd week).
const ALTERNATING_CYCLE_DAYS: f64 = 14.0;

/// Parity of the ISO week number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekParity {
    Even,
    Odd,
}

impl WeekParity {
    pub fn of(date: NaiveDate) -> Self {
        if date.iso_week().week() % 2 == 0 {
            WeekParity::Even
        } else {
            WeekParity::Odd
        }
    }
}

impl std::fmt::Display for WeekParity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekParity::Even => write!(f, "even"),
            WeekParity::Odd => write!(f, "odd"),
        }
    }
}

/// Derived supply figures for one drug. Computed on read, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DosageSummary {
    pub daily_consumption: f64,
    pub days_remaining: f64,
    pub weeks_remaining: f64,
    pub needs_reorder: bool,
    pub current_week_type: WeekParity,
    pub current_week_pills: f64,
}

/// Average pills per day.
///
/// Alternating schedules average both week totals over the 14-day cycle and
/// contribute nothing if either total is missing.
pub fn daily_consumption(drug: &Drug) -> f64 {
    match drug.schedule_type {
        ScheduleKind::WeeklyAlternating => match (drug.even_week_pills, drug.odd_week_pills) {
            (Some(even), Some(odd)) => (even + odd) / ALTERNATING_CYCLE_DAYS,
            _ => 0.0,
        },
        ScheduleKind::Daily => drug.doses.total(),
    }
}

/// Days of supply left; zero when nothing is consumed.
pub fn days_remaining(drug: &Drug) -> f64 {
    let per_day = daily_consumption(drug);
    if per_day > 0.0 {
        drug.current_amount / per_day
    } else {
        0.0
    }
}

pub fn needs_reorder(drug: &Drug) -> bool {
    days_remaining(drug) / 7.0 < REORDER_THRESHOLD_WEEKS
}

/// Pills scheduled for the week containing `as_of`.
pub fn current_week_pills(drug: &Drug, as_of: NaiveDate) -> f64 {
    if drug.schedule_type != ScheduleKind::WeeklyAlternating {
        return 0.0;
    }
    let pills = match WeekParity::of(as_of) {
        WeekParity::Even => drug.even_week_pills,
        WeekParity::Odd => drug.odd_week_pills,
    };
    pills.unwrap_or(0.0)
}

pub fn compute(drug: &Drug, as_of: NaiveDate) -> DosageSummary {
    let daily_consumption = daily_consumption(drug);
    let days_remaining = days_remaining(drug);
    let weeks_remaining = days_remaining / 7.0;
    DosageSummary {
        daily_consumption,
        days_remaining,
        weeks_remaining,
        needs_reorder: weeks_remaining < REORDER_THRESHOLD_WEEKS,
        current_week_type: WeekParity::of(as_of),
        current_week_pills: current_week_pills(drug, as_of),
    }
}
