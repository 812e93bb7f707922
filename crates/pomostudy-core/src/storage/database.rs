//! SQLite-based storage.
//!
//! Provides persistent storage for:
//! - The append-only period log
//! - Named timer profiles
//! - A key-value table for miscellaneous settings (window geometry, theme)
//!
//! The `try_*` methods report failures; their plain counterparts follow the
//! "never break the caller" contract: they log the failure and return a
//! default or empty result.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::migrations;
use super::period_log::PeriodEntry;
use crate::error::{DatabaseError, Result, ValidationError};
use crate::timer::{Profile, DEFAULT_PROFILE_NAME};

pub const DATABASE_FILE: &str = "pomostudy.db";

/// SQLite database for the period log, profiles and settings.
pub struct Database {
    conn: Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish()
    }
}

/// Fixed-width UTC timestamps so that string comparison matches time order.
fn iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_iso(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

impl Database {
    /// Open the database at `~/.config/pomostudy/pomostudy.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DATABASE_FILE);
        Self::open_at(&path)
    }

    /// Open (creating if needed) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests and dry runs).
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Period log ───────────────────────────────────────────────────

    /// Append one entry to the period log.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn append_period_entry(&self, entry: &PeriodEntry) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO period_entry (start_time, duration_secs, is_studying, is_paused)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                iso(entry.start_time),
                entry.duration_secs.max(0),
                entry.is_studying,
                entry.is_paused,
            ],
        )?;
        Ok(())
    }

    /// Append several entries in one transaction.
    ///
    /// # Errors
    /// Returns an error if any insert fails; nothing is written in that case.
    pub fn append_period_entries(&self, entries: &[PeriodEntry]) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO period_entry (start_time, duration_secs, is_studying, is_paused)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in entries {
                stmt.execute(params![
                    iso(entry.start_time),
                    entry.duration_secs.max(0),
                    entry.is_studying,
                    entry.is_paused,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Entries with `from <= start_time < to`, oldest first.
    ///
    /// # Errors
    /// Returns an error if `to` is before `from` or the query fails.
    pub fn try_load_period_entries(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PeriodEntry>> {
        if to < from {
            return Err(ValidationError::InvalidTimeRange {
                start: from,
                end: to,
            }
            .into());
        }
        let mut stmt = self.conn.prepare(
            "SELECT start_time, duration_secs, is_studying, is_paused
             FROM period_entry
             WHERE start_time >= ?1 AND start_time < ?2
             ORDER BY start_time, id",
        )?;
        let rows = stmt.query_map(params![iso(from), iso(to)], |row| {
            Ok(PeriodEntry {
                start_time: parse_iso(&row.get::<_, String>(0)?)?,
                duration_secs: row.get(1)?,
                is_studying: row.get(2)?,
                is_paused: row.get(3)?,
            })
        })?;
        let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Like [`Self::try_load_period_entries`], empty on failure.
    pub fn load_period_entries(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<PeriodEntry> {
        self.try_load_period_entries(from, to).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load period entries");
            Vec::new()
        })
    }

    // ── Profiles ─────────────────────────────────────────────────────

    /// # Errors
    /// Returns an error if the query fails.
    pub fn try_load_profile(&self, name: &str) -> Result<Option<Profile>, DatabaseError> {
        let profile = self
            .conn
            .query_row(
                "SELECT name, duration_studying, duration_short_break, duration_long_break,
                        cycles_until_long_break, auto_switch_mode_after_end
                 FROM profile WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Profile {
                        name: row.get(0)?,
                        duration_studying: row.get(1)?,
                        duration_short_break: row.get(2)?,
                        duration_long_break: row.get(3)?,
                        cycles_until_long_break: row.get(4)?,
                        auto_switch_mode_after_end: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    /// The named profile, or the built-in default when it is missing or
    /// cannot be read.
    pub fn load_profile(&self, name: &str) -> Profile {
        match self.try_load_profile(name) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!(profile = name, "profile not found, using default");
                Profile::default()
            }
            Err(e) => {
                tracing::warn!(profile = name, error = %e, "failed to load profile, using default");
                Profile::default()
            }
        }
    }

    /// Insert or update the profile with the same name.
    ///
    /// # Errors
    /// Returns a validation error for an invalid profile, or the database error.
    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        profile.validate()?;
        self.conn.execute(
            "INSERT INTO profile (
                name, duration_studying, duration_short_break, duration_long_break,
                cycles_until_long_break, auto_switch_mode_after_end
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(name) DO UPDATE SET
                duration_studying = excluded.duration_studying,
                duration_short_break = excluded.duration_short_break,
                duration_long_break = excluded.duration_long_break,
                cycles_until_long_break = excluded.cycles_until_long_break,
                auto_switch_mode_after_end = excluded.auto_switch_mode_after_end",
            params![
                profile.name,
                profile.duration_studying,
                profile.duration_short_break,
                profile.duration_long_break,
                profile.cycles_until_long_break,
                profile.auto_switch_mode_after_end,
            ],
        )?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub fn profile_names(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT name FROM profile ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Delete a profile. Returns whether a row was removed.
    ///
    /// # Errors
    /// The default profile cannot be deleted.
    pub fn delete_profile(&self, name: &str) -> Result<bool> {
        if name == DEFAULT_PROFILE_NAME {
            return Err(ValidationError::invalid("name", "the default profile cannot be deleted").into());
        }
        let removed = self
            .conn
            .execute("DELETE FROM profile WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }

    // ── Parameters ───────────────────────────────────────────────────

    /// Raw value of a setting.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn try_load_raw_parameter(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_setting WHERE property = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// A setting parsed as `T`, or `T::default()` when it is missing,
    /// unparsable or cannot be read.
    pub fn load_parameter<T>(&self, key: &str) -> T
    where
        T: FromStr + Default,
    {
        match self.try_load_raw_parameter(key) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "unparsable setting, using default");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to load setting, using default");
                T::default()
            }
        }
    }

    /// Store a setting using its `Display` form.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub fn save_parameter<T>(&self, key: &str, value: &T) -> Result<(), DatabaseError>
    where
        T: ToString + ?Sized,
    {
        self.conn.execute(
            "INSERT INTO app_setting (property, value) VALUES (?1, ?2)
             ON CONFLICT(property) DO UPDATE SET value = excluded.value",
            params![key, value.to_string()],
        )?;
        Ok(())
    }
}
