//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};

use umlkit_core::db::Database;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EVENT_LOG: usize = 256;

#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite file holding the saved-model registry (from UMLKIT_DB_PATH).
    pub db_path: PathBuf,
    /// Port for the HTTP API (from UMLKIT_PORT).
    pub port: u16,
    /// How many recent model events the API keeps (from UMLKIT_EVENT_LOG).
    pub event_log_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match var("UMLKIT_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => Database::default_path()?,
        };

        let port = match var("UMLKIT_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("Invalid UMLKIT_PORT: {}", port))?,
            None => DEFAULT_PORT,
        };

        let event_log_capacity = match var("UMLKIT_EVENT_LOG") {
            Some(capacity) => capacity
                .parse()
                .with_context(|| format!("Invalid UMLKIT_EVENT_LOG: {}", capacity))?,
            None => DEFAULT_EVENT_LOG,
        };

        Ok(Self {
            db_path,
            port,
            event_log_capacity,
        })
    }

    pub fn open_database(&self) -> Result<Database> {
        let db = Database::open(self.db_path.clone())?;
        db.migrate()?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_vars(vars(&[("UMLKIT_DB_PATH", "/tmp/umlkit.db")])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/umlkit.db"));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.event_log_capacity, DEFAULT_EVENT_LOG);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_vars(vars(&[
            ("UMLKIT_DB_PATH", "/tmp/umlkit.db"),
            ("UMLKIT_PORT", "8080"),
            ("UMLKIT_EVENT_LOG", "16"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.event_log_capacity, 16);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = Config::from_vars(vars(&[
            ("UMLKIT_DB_PATH", "/tmp/umlkit.db"),
            ("UMLKIT_PORT", "http"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("UMLKIT_PORT"));
    }

    #[test]
    fn invalid_event_log_capacity_is_an_error() {
        let err = Config::from_vars(vars(&[
            ("UMLKIT_DB_PATH", "/tmp/umlkit.db"),
            ("UMLKIT_EVENT_LOG", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("UMLKIT_EVENT_LOG: lots"));
    }
}
