//! Drug records and their create/update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{MedTrackError, Result};

/// How a drug is dosed over time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Same four dose slots every day.
    #[default]
    Daily,
    /// Alternates between an even-week and an odd-week pill total.
    WeeklyAlternating,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Daily => "daily",
            ScheduleKind::WeeklyAlternating => "weekly_alternating",
        }
    }
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = MedTrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "daily" => Ok(Self::Daily),
            "weekly_alternating" => Ok(Self::WeeklyAlternating),
            other => Err(MedTrackError::validation(format!(
                "unknown schedule type '{other}' (expected 'daily' or 'weekly_alternating')"
            ))),
        }
    }
}

/// Pills taken per day, split by time of day and relation to food.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DoseSlots {
    pub morning_pre_food: f64,
    pub morning_post_food: f64,
    pub evening_pre_food: f64,
    pub evening_post_food: f64,
}

impl DoseSlots {
    pub fn total(&self) -> f64 {
        self.morning_pre_food + self.morning_post_food + self.evening_pre_food + self.evening_post_food
    }

    fn values(&self) -> [(&'static str, f64); 4] {
        [
            ("morning_pre_food", self.morning_pre_food),
            ("morning_post_food", self.morning_post_food),
            ("evening_pre_food", self.evening_pre_food),
            ("evening_post_food", self.evening_post_food),
        ]
    }
}

/// A medicine in the household plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    pub id: i64,
    pub name: String,
    /// Label such as "75µg" or "100mg".
    pub dosage_strength: Option<String>,
    /// Pills per package.
    pub package_size: u32,
    pub schedule_type: ScheduleKind,
    #[serde(flatten)]
    pub doses: DoseSlots,
    pub even_week_pills: Option<f64>,
    pub odd_week_pills: Option<f64>,
    /// Pills on hand; half pills are allowed.
    pub current_amount: f64,
    pub notes: Option<String>,
    pub last_refilled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Drug {
    /// Apply a partial update, then re-validate the whole record.
    pub fn apply(&mut self, update: DrugUpdate) -> Result<()> {
        if let Some(v) = update.name {
            self.name = v.trim().to_string();
        }
        if let Some(v) = update.dosage_strength {
            self.dosage_strength = v;
        }
        if let Some(v) = update.package_size {
            self.package_size = v;
        }
        if let Some(v) = update.schedule_type {
            self.schedule_type = v;
        }
        if let Some(v) = update.morning_pre_food {
            self.doses.morning_pre_food = v;
        }
        if let Some(v) = update.morning_post_food {
            self.doses.morning_post_food = v;
        }
        if let Some(v) = update.evening_pre_food {
            self.doses.evening_pre_food = v;
        }
        if let Some(v) = update.evening_post_food {
            self.doses.evening_post_food = v;
        }
        if let Some(v) = update.even_week_pills {
            self.even_week_pills = v;
        }
        if let Some(v) = update.odd_week_pills {
            self.odd_week_pills = v;
        }
        if let Some(v) = update.current_amount {
            self.current_amount = v;
        }
        if let Some(v) = update.notes {
            self.notes = v;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        check_fields(
            &self.name,
            self.package_size,
            &self.doses,
            self.even_week_pills,
            self.odd_week_pills,
            self.current_amount,
        )
    }
}

/// Payload for creating a drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDrug {
    pub name: String,
    #[serde(default)]
    pub dosage_strength: Option<String>,
    pub package_size: u32,
    #[serde(default)]
    pub schedule_type: ScheduleKind,
    #[serde(flatten)]
    pub doses: DoseSlots,
    #[serde(default)]
    pub even_week_pills: Option<f64>,
    #[serde(default)]
    pub odd_week_pills: Option<f64>,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewDrug {
    /// A daily-schedule drug with empty dose slots.
    pub fn daily(name: impl Into<String>, package_size: u32) -> Self {
        Self {
            name: name.into(),
            dosage_strength: None,
            package_size,
            schedule_type: ScheduleKind::Daily,
            doses: DoseSlots::default(),
            even_week_pills: None,
            odd_week_pills: None,
            current_amount: 0.0,
            notes: None,
        }
    }

    /// An alternating-week drug.
    pub fn weekly_alternating(name: impl Into<String>, package_size: u32, even: f64, odd: f64) -> Self {
        Self {
            schedule_type: ScheduleKind::WeeklyAlternating,
            even_week_pills: Some(even),
            odd_week_pills: Some(odd),
            ..Self::daily(name, package_size)
        }
    }

    pub fn with_doses(mut self, doses: DoseSlots) -> Self {
        self.doses = doses;
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.current_amount = amount;
        self
    }

    pub fn with_strength(mut self, strength: impl Into<String>) -> Self {
        self.dosage_strength = Some(strength.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_fields(
            &self.name,
            self.package_size,
            &self.doses,
            self.even_week_pills,
            self.odd_week_pills,
            self.current_amount,
        )
    }
}

/// Partial update; only the provided fields change. `null` clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrugUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub dosage_strength: Option<Option<String>>,
    pub package_size: Option<u32>,
    pub schedule_type: Option<ScheduleKind>,
    pub morning_pre_food: Option<f64>,
    pub morning_post_food: Option<f64>,
    pub evening_pre_food: Option<f64>,
    pub evening_post_food: Option<f64>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub even_week_pills: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub odd_week_pills: Option<Option<f64>>,
    pub current_amount: Option<f64>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

fn check_fields(
    name: &str,
    package_size: u32,
    doses: &DoseSlots,
    even: Option<f64>,
    odd: Option<f64>,
    amount: f64,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MedTrackError::validation("name must not be empty"));
    }
    if package_size == 0 {
        return Err(MedTrackError::validation("package_size must be greater than 0"));
    }

    let mut quantities: Vec<(&str, f64)> = doses.values().to_vec();
    quantities.push(("current_amount", amount));
    if let Some(v) = even {
        quantities.push(("even_week_pills", v));
    }
    if let Some(v) = odd {
        quantities.push(("odd_week_pills", v));
    }
    for (field, value) in quantities {
        if !value.is_finite() || value < 0.0 {
            return Err(MedTrackError::validation(format!(
                "{field} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}
