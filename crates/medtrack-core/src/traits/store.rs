//! Record store trait: persistence for drugs and doctor vacations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{DoctorVacation, Drug, DrugUpdate, NewDrug, NewVacation, VacationUpdate};

/// Offset/limit paging for list calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 100;

    /// Everything, for scheduler jobs.
    pub fn all() -> Self {
        Self { skip: 0, limit: u32::MAX }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: Self::DEFAULT_LIMIT }
    }
}

/// CRUD over the household's records.
///
/// Drugs list in id order, vacations by start date then id. Point lookups
/// return `None` and deletes return `false` for unknown ids; updates and
/// refills return `None`.
#[async_trait]
pub trait MedicationStore: Send + Sync {
    async fn create_drug(&self, drug: NewDrug) -> Result<Drug>;
    async fn get_drug(&self, id: i64) -> Result<Option<Drug>>;
    async fn list_drugs(&self, page: Page) -> Result<Vec<Drug>>;
    async fn update_drug(&self, id: i64, update: DrugUpdate) -> Result<Option<Drug>>;
    async fn delete_drug(&self, id: i64) -> Result<bool>;

    /// Add `packages * package_size` pills and stamp `last_refilled_at`.
    async fn refill_drug(&self, id: i64, packages: u32, at: DateTime<Utc>) -> Result<Option<Drug>>;

    async fn create_vacation(&self, vacation: NewVacation) -> Result<DoctorVacation>;
    async fn get_vacation(&self, id: i64) -> Result<Option<DoctorVacation>>;
    async fn list_vacations(&self, page: Page) -> Result<Vec<DoctorVacation>>;
    async fn update_vacation(&self, id: i64, update: VacationUpdate) -> Result<Option<DoctorVacation>>;
    async fn delete_vacation(&self, id: i64) -> Result<bool>;
}
