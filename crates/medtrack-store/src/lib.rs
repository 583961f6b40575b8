//! # MedTrack Store
//! SQLite persistence for drugs and doctor vacations.

pub mod sqlite;

pub use sqlite::SqliteStore;

use medtrack_core::config::DatabaseConfig;
use medtrack_core::error::Result;

/// Open the store described by the configuration. `:memory:` opens a
/// throwaway in-memory database.
pub fn open_store(config: &DatabaseConfig) -> Result<SqliteStore> {
    if config.path.trim() == ":memory:" {
        return SqliteStore::open_in_memory();
    }
    let path = config.resolved_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteStore::open(&path)
}
