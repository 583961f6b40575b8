//! Doctor vacation periods.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MedTrackError, Result};

/// A period during which the doctor cannot issue prescriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorVacation {
    pub id: i64,
    /// First day of the vacation.
    pub start_date: NaiveDate,
    /// Last day of the vacation (inclusive).
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DoctorVacation {
    pub fn apply(&mut self, update: VacationUpdate) -> Result<()> {
        if let Some(v) = update.start_date {
            self.start_date = v;
        }
        if let Some(v) = update.end_date {
            self.end_date = v;
        }
        if let Some(v) = update.notes {
            self.notes = v;
        }
        check_range(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVacation {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewVacation {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self { start_date, end_date, notes: None }
    }

    pub fn validate(&self) -> Result<()> {
        check_range(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VacationUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(MedTrackError::validation(format!(
            "start_date {start} is after end_date {end}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_vacation_range() {
        assert!(NewVacation::new(date(2024, 12, 24), date(2025, 1, 1)).validate().is_ok());
        assert!(NewVacation::new(date(2025, 1, 1), date(2025, 1, 1)).validate().is_ok());
        assert!(NewVacation::new(date(2025, 1, 2), date(2025, 1, 1)).validate().is_err());
    }

    #[test]
    fn test_apply_keeps_range_valid() {
        let mut vacation = DoctorVacation {
            id: 1,
            start_date: date(2025, 7, 1),
            end_date: date(2025, 7, 14),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        vacation
            .apply(VacationUpdate { end_date: Some(date(2025, 7, 21)), ..Default::default() })
            .unwrap();
        assert_eq!(vacation.end_date, date(2025, 7, 21));

        let err = vacation
            .apply(VacationUpdate { start_date: Some(date(2025, 8, 1)), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, MedTrackError::Validation(_)));
    }

    #[test]
    fn test_update_null_clears_notes() {
        let mut vacation = DoctorVacation {
            id: 1,
            start_date: date(2025, 7, 1),
            end_date: date(2025, 7, 14),
            notes: Some("summer".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let keep: VacationUpdate = serde_json::from_str(r#"{"end_date": "2025-07-15"}"#).unwrap();
        vacation.apply(keep).unwrap();
        assert_eq!(vacation.notes.as_deref(), Some("summer"));

        let clear: VacationUpdate = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        vacation.apply(clear).unwrap();
        assert!(vacation.notes.is_none());
        assert_eq!(vacation.end_date, date(2025, 7, 15));
    }

    #[test]
    fn test_vacation_json_dates() {
        let json = r#"{"start_date":"2024-12-24","end_date":"2025-01-01","notes":"Christmas"}"#;
        let new: NewVacation = serde_json::from_str(json).unwrap();
        assert_eq!(new.start_date, date(2024, 12, 24));
        assert_eq!(new.notes.as_deref(), Some("Christmas"));
    }
}
