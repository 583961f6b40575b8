//! Record types shared by the store, scheduler and gateway.

pub mod drug;
pub mod vacation;

pub use drug::{DoseSlots, Drug, DrugUpdate, NewDrug, ScheduleKind};
pub use vacation::{DoctorVacation, NewVacation, VacationUpdate};

use serde::{Deserialize, Deserializer};

/// Field of a partial update that may be cleared.
///
/// Absent keeps the stored value (`None`), `null` clears it (`Some(None)`).
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
