//! Database schema migrations for pomostudy.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{params, Connection, Result as SqliteResult};

use crate::timer::Profile;

/// Schema version after all migrations below have run.
pub const CURRENT_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (fresh database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: settings, period log and profile tables.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS app_setting (
            property TEXT PRIMARY KEY,
            value    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS period_entry (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time    TEXT NOT NULL,
            duration_secs INTEGER NOT NULL CHECK (duration_secs >= 0),
            is_studying   INTEGER NOT NULL,
            is_paused     INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS profile (
            name                       TEXT PRIMARY KEY,
            duration_studying          INTEGER NOT NULL CHECK (duration_studying > 0),
            duration_short_break       INTEGER NOT NULL CHECK (duration_short_break > 0),
            duration_long_break        INTEGER NOT NULL CHECK (duration_long_break > 0),
            cycles_until_long_break    INTEGER NOT NULL CHECK (cycles_until_long_break >= 1),
            auto_switch_mode_after_end INTEGER NOT NULL
        );",
    )?;

    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: index the period log by start time and seed the default profile.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_period_entry_start_time ON period_entry(start_time);",
    )?;

    let p = Profile::default();
    tx.execute(
        "INSERT OR IGNORE INTO profile (
            name, duration_studying, duration_short_break, duration_long_break,
            cycles_until_long_break, auto_switch_mode_after_end
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            p.name,
            p.duration_studying,
            p.duration_short_break,
            p.duration_long_break,
            p.cycles_until_long_break,
            p.auto_switch_mode_after_end,
        ],
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), CURRENT_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        let profiles: i64 = conn
            .query_row("SELECT COUNT(*) FROM profile", [], |row| row.get(0))
            .unwrap();
        assert_eq!(profiles, 1);
    }

    #[test]
    fn period_entry_rejects_negative_duration() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO period_entry (start_time, duration_secs, is_studying, is_paused)
             VALUES ('2024-01-01T00:00:00.000Z', -1, 1, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
