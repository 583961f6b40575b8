//! MedTrack configuration: `~/.medtrack/config.toml`.
//!
//! ```toml
//! [database]
//! path = "~/.medtrack/medicine.db"
//!
//! [gateway]
//! host = "127.0.0.1"
//! port = 8000
//!
//! [schedule]
//! enabled = true
//! weekly_day = "sun"
//! weekly_time = "09:00"
//! daily_time = "10:00"
//!
//! [notify]
//! backend = "mailjet"          # mailjet | smtp | log | none
//! from_email = "tracker@example.org"
//! to_email = "caretaker@example.org"
//!
//! [notify.mailjet]
//! api_key = "..."
//! api_secret = "..."
//!
//! [reminder]
//! patient = "Dora L."
//! signature = "Jan"
//! ```
//!
//! Secrets and addresses may also come from the environment (`MAILJET_API_KEY`,
//! `FROM_EMAIL`, `TO_EMAIL`, `SMTP_PASSWORD`, ...), which wins over the file.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MedTrackError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedTrackConfig {
    pub database: DatabaseConfig,
    pub gateway: GatewayConfig,
    pub schedule: ScheduleConfig,
    pub notify: NotifyConfig,
    pub reminder: ReminderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "~/.medtrack/medicine.db".into() }
    }
}

impl DatabaseConfig {
    /// Database path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000 }
    }
}

/// When the two reminder triggers fire, in local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub weekly_day: String,
    pub weekly_time: String,
    pub daily_time: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weekly_day: "sun".into(),
            weekly_time: "09:00".into(),
            daily_time: "10:00".into(),
        }
    }
}

impl ScheduleConfig {
    pub fn weekly_weekday(&self) -> Result<Weekday> {
        self.weekly_day
            .parse::<Weekday>()
            .map_err(|_| MedTrackError::config(format!("invalid schedule.weekly_day '{}'", self.weekly_day)))
    }

    pub fn weekly_at(&self) -> Result<NaiveTime> {
        parse_time("schedule.weekly_time", &self.weekly_time)
    }

    pub fn daily_at(&self) -> Result<NaiveTime> {
        parse_time("schedule.daily_time", &self.daily_time)
    }
}

fn parse_time(key: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| MedTrackError::config(format!("invalid {key} '{value}' (expected HH:MM): {e}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// `mailjet`, `smtp`, `log` or `none`.
    pub backend: String,
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub to_name: String,
    pub mailjet: MailjetConfig,
    pub smtp: SmtpConfig,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            backend: "mailjet".into(),
            from_email: String::new(),
            from_name: "Medicine Tracker".into(),
            to_email: String::new(),
            to_name: String::new(),
            mailjet: MailjetConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailjetConfig {
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self { host: String::new(), port: 587, username: String::new(), password: String::new() }
    }
}

/// Text personalisation for reorder reminders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Whose prescriptions are requested.
    pub patient: Option<String>,
    /// Closing line of the reorder message.
    pub signature: Option<String>,
}

impl MedTrackConfig {
    /// `~/.medtrack`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".medtrack")
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load from the default path; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MedTrackError::config(format!("read {}: {e}", path.display())))?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Write a default config to `path`; an existing file is kept unless `force`.
    /// Returns whether the file was written.
    pub fn init_at(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    /// Environment variables override file values when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let targets: [(&str, &mut String); 10] = [
            ("MEDTRACK_DB", &mut self.database.path),
            ("MAILJET_API_KEY", &mut self.notify.mailjet.api_key),
            ("MAILJET_API_SECRET", &mut self.notify.mailjet.api_secret),
            ("FROM_EMAIL", &mut self.notify.from_email),
            ("FROM_NAME", &mut self.notify.from_name),
            ("TO_EMAIL", &mut self.notify.to_email),
            ("TO_NAME", &mut self.notify.to_name),
            ("SMTP_HOST", &mut self.notify.smtp.host),
            ("SMTP_USERNAME", &mut self.notify.smtp.username),
            ("SMTP_PASSWORD", &mut self.notify.smtp.password),
        ];
        for (key, field) in targets {
            if let Some(value) = get(key) {
                *field = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = MedTrackConfig::default();
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.notify.backend, "mailjet");
        assert_eq!(config.schedule.weekly_weekday().unwrap(), Weekday::Sun);
        assert_eq!(config.schedule.weekly_at().unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(config.schedule.daily_at().unwrap(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: MedTrackConfig = toml::from_str(
            r#"
            [schedule]
            daily_time = "07:45"

            [notify]
            backend = "smtp"

            [notify.smtp]
            host = "mail.example.org"
            "#,
        )
        .unwrap();
        assert_eq!(config.schedule.daily_at().unwrap(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
        assert_eq!(config.schedule.weekly_day, "sun");
        assert_eq!(config.notify.smtp.host, "mail.example.org");
        assert_eq!(config.notify.smtp.port, 587);
        assert_eq!(config.gateway.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_schedule_values() {
        let schedule = ScheduleConfig {
            weekly_day: "someday".into(),
            daily_time: "25:99".into(),
            ..Default::default()
        };
        assert!(matches!(schedule.weekly_weekday(), Err(MedTrackError::Config(_))));
        assert!(matches!(schedule.daily_at(), Err(MedTrackError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("MAILJET_API_KEY", "key-123"),
            ("TO_EMAIL", "care@example.org"),
            ("FROM_NAME", "   "),
        ]);
        let mut config = MedTrackConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.notify.mailjet.api_key, "key-123");
        assert_eq!(config.notify.to_email, "care@example.org");
        // blank values are ignored
        assert_eq!(config.notify.from_name, "Medicine Tracker");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = MedTrackConfig::default();
        config.gateway.port = 9123;
        config.reminder.patient = Some("Dora L.".into());
        config.save_to(&path).unwrap();

        let loaded = MedTrackConfig::load_from(&path).unwrap();
        assert_eq!(loaded.gateway.port, 9123);
        assert_eq!(loaded.reminder.patient.as_deref(), Some("Dora L."));
    }

    #[test]
    fn test_init_at_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom").join("medtrack.toml");
        assert!(MedTrackConfig::load_from(&path).is_err());

        assert!(MedTrackConfig::init_at(&path, false).unwrap());
        let loaded = MedTrackConfig::load_from(&path).unwrap();
        assert_eq!(loaded.gateway.port, MedTrackConfig::default().gateway.port);

        std::fs::write(&path, "[gateway]\nport = 9001\n").unwrap();
        assert!(!MedTrackConfig::init_at(&path, false).unwrap());
        assert_eq!(MedTrackConfig::load_from(&path).unwrap().gateway.port, 9001);

        assert!(MedTrackConfig::init_at(&path, true).unwrap());
        assert_ne!(MedTrackConfig::load_from(&path).unwrap().gateway.port, 9001);
    }

    #[test]
    fn test_resolved_db_path_expands_tilde() {
        let db = DatabaseConfig::default();
        assert!(!db.resolved_path().to_string_lossy().starts_with('~'));
    }
}
