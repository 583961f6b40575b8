//! Vacation window: where a doctor vacation sits relative to a given day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DoctorVacation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VacationStatus {
    Current,
    Upcoming,
    Past,
}

impl VacationStatus {
    pub fn is_current(&self) -> bool {
        matches!(self, VacationStatus::Current)
    }

    pub fn is_upcoming(&self) -> bool {
        matches!(self, VacationStatus::Upcoming)
    }

    pub fn is_past(&self) -> bool {
        matches!(self, VacationStatus::Past)
    }
}

/// Classify a vacation against `today`. Both ends of the range are inclusive.
pub fn classify(vacation: &DoctorVacation, today: NaiveDate) -> VacationStatus {
    if today < vacation.start_date {
        VacationStatus::Upcoming
    } else if today > vacation.end_date {
        VacationStatus::Past
    } else {
        VacationStatus::Current
    }
}

/// The vacation covering `today`, if any.
///
/// Overlapping vacations are a data error; the first one in input order wins.
pub fn find_current(vacations: &[DoctorVacation], today: NaiveDate) -> Option<&DoctorVacation> {
    let mut current = vacations.iter().filter(|v| classify(v, today).is_current());
    let first = current.next()?;
    let extra = current.count();
    if extra > 0 {
        tracing::warn!(
            "{} overlapping doctor vacations cover {today}; using #{}",
            extra + 1,
            first.id
        );
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vacation(id: i64, start: NaiveDate, end: NaiveDate) -> DoctorVacation {
        DoctorVacation {
            id,
            start_date: start,
            end_date: end,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_classify_boundaries() {
        let v = vacation(1, date(2024, 12, 24), date(2025, 1, 1));
        assert_eq!(classify(&v, date(2024, 12, 23)), VacationStatus::Upcoming);
        assert_eq!(classify(&v, date(2024, 12, 24)), VacationStatus::Current);
        assert_eq!(classify(&v, date(2024, 12, 28)), VacationStatus::Current);
        assert_eq!(classify(&v, date(2025, 1, 1)), VacationStatus::Current);
        assert_eq!(classify(&v, date(2025, 1, 2)), VacationStatus::Past);
    }

    #[test]
    fn test_flags_exactly_one_true() {
        let v = vacation(1, date(2025, 3, 10), date(2025, 3, 12));
        let mut day = date(2025, 3, 1);
        while day <= date(2025, 3, 20) {
            let status = classify(&v, day);
            let flags = [status.is_current(), status.is_upcoming(), status.is_past()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "day {day}");
            day = day.checked_add_days(Days::new(1)).unwrap();
        }
    }

    #[test]
    fn test_single_day_vacation() {
        let v = vacation(1, date(2025, 5, 1), date(2025, 5, 1));
        assert!(classify(&v, date(2025, 5, 1)).is_current());
        assert!(classify(&v, date(2025, 4, 30)).is_upcoming());
        assert!(classify(&v, date(2025, 5, 2)).is_past());
    }

    #[test]
    fn test_find_current() {
        let vacations = vec![
            vacation(1, date(2025, 1, 1), date(2025, 1, 5)),
            vacation(2, date(2025, 2, 1), date(2025, 2, 10)),
            vacation(3, date(2025, 3, 1), date(2025, 3, 2)),
        ];
        assert_eq!(find_current(&vacations, date(2025, 2, 3)).map(|v| v.id), Some(2));
        assert!(find_current(&vacations, date(2025, 1, 20)).is_none());
        assert!(find_current(&[], date(2025, 1, 20)).is_none());
    }

    #[test]
    fn test_find_current_overlap_returns_first() {
        let vacations = vec![
            vacation(4, date(2025, 6, 1), date(2025, 6, 30)),
            vacation(5, date(2025, 6, 10), date(2025, 6, 12)),
        ];
        assert_eq!(find_current(&vacations, date(2025, 6, 11)).map(|v| v.id), Some(4));
    }
}
