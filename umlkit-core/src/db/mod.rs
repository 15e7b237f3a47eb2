//! Persistence gateway: the saved-model registry.
//!
//! Each saved model is a named [`Snapshot`] stored as JSON, plus an
//! on/off flag. Saving or loading a model makes it the single active entry.
//! The store itself never touches this module; presentation code moves
//! snapshots between the two.

mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::ModelError;
use crate::models::{SavedModel, RESERVED_SAVE_NAME};
use crate::snapshot::Snapshot;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Default location in the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "umlkit")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("umlkit.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Saved models
    // ============================================================

    /// Store `snapshot` under `name`, overwriting any previous save, and
    /// make it the active entry.
    pub fn save_snapshot(&self, name: &str, snapshot: &Snapshot) -> Result<SavedModel> {
        check_name(name)?;
        let body = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
        let now = Utc::now().to_rfc3339();

        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        tx.execute("UPDATE saved_models SET is_active = 0 WHERE is_active = 1", [])?;
        tx.execute(
            "INSERT INTO saved_models (name, body, is_active, saved_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?3)
             ON CONFLICT(name) DO UPDATE SET
                body = excluded.body,
                is_active = 1,
                updated_at = excluded.updated_at",
            (name, &body, &now),
        )?;
        let saved = tx.query_row(
            "SELECT name, is_active, saved_at, updated_at FROM saved_models WHERE name = ?",
            [name],
            saved_from_row,
        )?;
        tx.commit()?;

        tracing::info!(
            "Saved model {} ({} classes, {} relationships)",
            name,
            snapshot.classes.len(),
            snapshot.relationships.len()
        );
        Ok(saved)
    }

    /// Fetch a saved snapshot and make it the active entry.
    ///
    /// Returns `None` if nothing is saved under `name`.
    pub fn load_snapshot(&self, name: &str) -> Result<Option<Snapshot>> {
        check_name(name)?;
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let body: Option<String> = tx
            .query_row(
                "SELECT body FROM saved_models WHERE name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        let Some(body) = body else {
            return Ok(None);
        };
        let snapshot = Snapshot::from_json(&body)?;

        tx.execute("UPDATE saved_models SET is_active = 0 WHERE is_active = 1", [])?;
        tx.execute(
            "UPDATE saved_models SET is_active = 1 WHERE name = ?",
            [name],
        )?;
        tx.commit()?;

        tracing::info!("Loaded model {}", name);
        Ok(Some(snapshot))
    }

    /// Read a saved snapshot without changing which entry is active.
    pub fn get_snapshot(&self, name: &str) -> Result<Option<Snapshot>> {
        check_name(name)?;
        let conn = self.conn.lock().expect("database lock poisoned");
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM saved_models WHERE name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        body.map(|body| Snapshot::from_json(&body).map_err(anyhow::Error::from))
            .transpose()
    }

    pub fn delete_snapshot(&self, name: &str) -> Result<bool> {
        check_name(name)?;
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM saved_models WHERE name = ?", [name])?;
        Ok(rows > 0)
    }

    /// Registry entries ordered by name.
    pub fn list_saves(&self) -> Result<Vec<SavedModel>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT name, is_active, saved_at, updated_at FROM saved_models ORDER BY name",
        )?;
        let saves = stmt
            .query_map([], saved_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(saves)
    }

    pub fn active_save(&self) -> Result<Option<SavedModel>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let saved = conn
            .query_row(
                "SELECT name, is_active, saved_at, updated_at FROM saved_models WHERE is_active = 1",
                [],
                saved_from_row,
            )
            .optional()?;
        Ok(saved)
    }

    /// Turn every entry off, e.g. when the working model is discarded.
    pub fn deactivate_all(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute("UPDATE saved_models SET is_active = 0 WHERE is_active = 1", [])?;
        Ok(())
    }
}

fn check_name(name: &str) -> Result<()> {
    if name == RESERVED_SAVE_NAME {
        return Err(ModelError::ReservedName(name.to_string()).into());
    }
    Ok(())
}

fn saved_from_row(row: &Row<'_>) -> rusqlite::Result<SavedModel> {
    Ok(SavedModel {
        name: row.get(0)?,
        active: row.get::<_, i32>(1)? != 0,
        saved_at: parse_datetime(row.get::<_, String>(2)?),
        updated_at: parse_datetime(row.get::<_, String>(3)?),
    })
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
