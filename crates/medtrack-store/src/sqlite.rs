//! SQLite record store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use medtrack_core::error::{MedTrackError, Result};
use medtrack_core::traits::{MedicationStore, Page};
use medtrack_core::types::{
    DoctorVacation, DoseSlots, Drug, DrugUpdate, NewDrug, NewVacation, ScheduleKind, VacationUpdate,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS drugs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        dosage_strength TEXT,
        package_size INTEGER NOT NULL CHECK (package_size > 0),
        schedule_type TEXT NOT NULL DEFAULT 'daily',
        morning_pre_food REAL NOT NULL DEFAULT 0,
        morning_post_food REAL NOT NULL DEFAULT 0,
        evening_pre_food REAL NOT NULL DEFAULT 0,
        evening_post_food REAL NOT NULL DEFAULT 0,
        even_week_pills REAL,
        odd_week_pills REAL,
        current_amount REAL NOT NULL DEFAULT 0,
        notes TEXT,
        last_refilled_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_drugs_name ON drugs(name);

    CREATE TABLE IF NOT EXISTS doctor_vacations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

const DRUG_COLUMNS: &str = "id, name, dosage_strength, package_size, schedule_type, \
    morning_pre_food, morning_post_food, evening_pre_food, evening_post_food, \
    even_week_pills, odd_week_pills, current_amount, notes, last_refilled_at, created_at, updated_at";

const VACATION_COLUMNS: &str = "id, start_date, end_date, notes, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(store_err)?;
        tracing::debug!("Opened medicine database: {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory().map_err(store_err)?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| MedTrackError::store(e.to_string()))
    }
}

fn store_err(e: rusqlite::Error) -> MedTrackError {
    MedTrackError::Store(e.to_string())
}

fn conversion_err<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

fn date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_err(idx, e))
}

fn row_to_drug(row: &Row<'_>) -> rusqlite::Result<Drug> {
    let schedule: String = row.get(4)?;
    // unknown schedule kinds fail loudly instead of falling back to the daily formula
    let schedule_type = schedule.parse::<ScheduleKind>().map_err(|e| conversion_err(4, e))?;
    let last_refilled_at = match row.get::<_, Option<String>>(13)? {
        Some(_) => Some(timestamp(row, 13)?),
        None => None,
    };
    Ok(Drug {
        id: row.get(0)?,
        name: row.get(1)?,
        dosage_strength: row.get(2)?,
        package_size: row.get(3)?,
        schedule_type,
        doses: DoseSlots {
            morning_pre_food: row.get(5)?,
            morning_post_food: row.get(6)?,
            evening_pre_food: row.get(7)?,
            evening_post_food: row.get(8)?,
        },
        even_week_pills: row.get(9)?,
        odd_week_pills: row.get(10)?,
        current_amount: row.get(11)?,
        notes: row.get(12)?,
        last_refilled_at,
        created_at: timestamp(row, 14)?,
        updated_at: timestamp(row, 15)?,
    })
}

fn row_to_vacation(row: &Row<'_>) -> rusqlite::Result<DoctorVacation> {
    Ok(DoctorVacation {
        id: row.get(0)?,
        start_date: date(row, 1)?,
        end_date: date(row, 2)?,
        notes: row.get(3)?,
        created_at: timestamp(row, 4)?,
        updated_at: timestamp(row, 5)?,
    })
}

fn fetch_drug(conn: &Connection, id: i64) -> Result<Option<Drug>> {
    conn.query_row(
        &format!("SELECT {DRUG_COLUMNS} FROM drugs WHERE id = ?1"),
        params![id],
        row_to_drug,
    )
    .optional()
    .map_err(store_err)
}

fn fetch_vacation(conn: &Connection, id: i64) -> Result<Option<DoctorVacation>> {
    conn.query_row(
        &format!("SELECT {VACATION_COLUMNS} FROM doctor_vacations WHERE id = ?1"),
        params![id],
        row_to_vacation,
    )
    .optional()
    .map_err(store_err)
}

/// Write every mutable column of an existing drug row.
fn write_drug(conn: &Connection, drug: &Drug) -> Result<()> {
    conn.execute(
        "UPDATE drugs SET name = ?2, dosage_strength = ?3, package_size = ?4, schedule_type = ?5,
            morning_pre_food = ?6, morning_post_food = ?7, evening_pre_food = ?8, evening_post_food = ?9,
            even_week_pills = ?10, odd_week_pills = ?11, current_amount = ?12, notes = ?13,
            last_refilled_at = ?14, updated_at = ?15
         WHERE id = ?1",
        params![
            drug.id,
            drug.name,
            drug.dosage_strength,
            drug.package_size,
            drug.schedule_type.as_str(),
            drug.doses.morning_pre_food,
            drug.doses.morning_post_food,
            drug.doses.evening_pre_food,
            drug.doses.evening_post_food,
            drug.even_week_pills,
            drug.odd_week_pills,
            drug.current_amount,
            drug.notes,
            drug.last_refilled_at.map(|t| t.to_rfc3339()),
            drug.updated_at.to_rfc3339(),
        ],
    )
    .map_err(store_err)?;
    Ok(())
}

#[async_trait]
impl MedicationStore for SqliteStore {
    async fn create_drug(&self, drug: NewDrug) -> Result<Drug> {
        drug.validate()?;
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO drugs (name, dosage_strength, package_size, schedule_type,
                morning_pre_food, morning_post_food, evening_pre_food, evening_post_food,
                even_week_pills, odd_week_pills, current_amount, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                drug.name.trim(),
                drug.dosage_strength,
                drug.package_size,
                drug.schedule_type.as_str(),
                drug.doses.morning_pre_food,
                drug.doses.morning_post_food,
                drug.doses.evening_pre_food,
                drug.doses.evening_post_food,
                drug.even_week_pills,
                drug.odd_week_pills,
                drug.current_amount,
                drug.notes,
                now,
            ],
        )
        .map_err(store_err)?;
        let id = conn.last_insert_rowid();
        tracing::info!("Added drug #{id} '{}'", drug.name.trim());
        fetch_drug(&conn, id)?.ok_or_else(|| MedTrackError::drug_not_found(id))
    }

    async fn get_drug(&self, id: i64) -> Result<Option<Drug>> {
        let conn = self.conn()?;
        fetch_drug(&conn, id)
    }

    async fn list_drugs(&self, page: Page) -> Result<Vec<Drug>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {DRUG_COLUMNS} FROM drugs ORDER BY id LIMIT ?1 OFFSET ?2"))
            .map_err(store_err)?;
        let rows = stmt
            .query_map(params![i64::from(page.limit), i64::from(page.skip)], row_to_drug)
            .map_err(store_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(store_err)
    }

    async fn update_drug(&self, id: i64, update: DrugUpdate) -> Result<Option<Drug>> {
        let conn = self.conn()?;
        let Some(mut drug) = fetch_drug(&conn, id)? else {
            return Ok(None);
        };
        drug.apply(update)?;
        drug.updated_at = Utc::now();
        write_drug(&conn, &drug)?;
        fetch_drug(&conn, id)
    }

    async fn delete_drug(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn
            .execute("DELETE FROM drugs WHERE id = ?1", params![id])
            .map_err(store_err)?;
        Ok(deleted > 0)
    }

    async fn refill_drug(&self, id: i64, packages: u32, at: DateTime<Utc>) -> Result<Option<Drug>> {
        if packages == 0 {
            return Err(MedTrackError::validation("packages must be greater than 0"));
        }
        let conn = self.conn()?;
        let Some(mut drug) = fetch_drug(&conn, id)? else {
            return Ok(None);
        };
        let added = f64::from(packages) * f64::from(drug.package_size);
        drug.current_amount += added;
        drug.last_refilled_at = Some(at);
        drug.updated_at = Utc::now();
        write_drug(&conn, &drug)?;
        tracing::info!(
            "Refilled drug #{id} '{}' with {packages} package(s): +{added} → {}",
            drug.name,
            drug.current_amount
        );
        fetch_drug(&conn, id)
    }

    async fn create_vacation(&self, vacation: NewVacation) -> Result<DoctorVacation> {
        vacation.validate()?;
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO doctor_vacations (start_date, end_date, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![
                vacation.start_date.format(DATE_FORMAT).to_string(),
                vacation.end_date.format(DATE_FORMAT).to_string(),
                vacation.notes,
                now,
            ],
        )
        .map_err(store_err)?;
        let id = conn.last_insert_rowid();
        fetch_vacation(&conn, id)?.ok_or_else(|| MedTrackError::vacation_not_found(id))
    }

    async fn get_vacation(&self, id: i64) -> Result<Option<DoctorVacation>> {
        let conn = self.conn()?;
        fetch_vacation(&conn, id)
    }

    async fn list_vacations(&self, page: Page) -> Result<Vec<DoctorVacation>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {VACATION_COLUMNS} FROM doctor_vacations ORDER BY start_date, id LIMIT ?1 OFFSET ?2"
            ))
            .map_err(store_err)?;
        let rows = stmt
            .query_map(params![i64::from(page.limit), i64::from(page.skip)], row_to_vacation)
            .map_err(store_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(store_err)
    }

    async fn update_vacation(&self, id: i64, update: VacationUpdate) -> Result<Option<DoctorVacation>> {
        let conn = self.conn()?;
        let Some(mut vacation) = fetch_vacation(&conn, id)? else {
            return Ok(None);
        };
        vacation.apply(update)?;
        conn.execute(
            "UPDATE doctor_vacations SET start_date = ?2, end_date = ?3, notes = ?4, updated_at = ?5 WHERE id = ?1",
            params![
                id,
                vacation.start_date.format(DATE_FORMAT).to_string(),
                vacation.end_date.format(DATE_FORMAT).to_string(),
                vacation.notes,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(store_err)?;
        fetch_vacation(&conn, id)
    }

    async fn delete_vacation(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn
            .execute("DELETE FROM doctor_vacations WHERE id = ?1", params![id])
            .map_err(store_err)?;
        Ok(deleted > 0)
    }
}
