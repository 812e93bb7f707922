//! Append-only log of period spans.
//!
//! The timer writes one [`PeriodEntry`] per span (the wall-clock interval
//! between two transitions or pause toggles) into a [`PeriodLog`]. Entries
//! are never updated or deleted once written.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::database::Database;
use crate::error::DatabaseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEntry {
    pub start_time: DateTime<Utc>,
    /// Elapsed wall-clock time in whole seconds, never negative.
    pub duration_secs: i64,
    pub is_studying: bool,
    pub is_paused: bool,
}

impl PeriodEntry {
    /// Build the entry for a span that ends at `now`.
    ///
    /// A span without a recorded start is logged as starting `now` with a
    /// zero duration.
    pub fn span(
        started_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        is_studying: bool,
        is_paused: bool,
    ) -> Self {
        let (start_time, duration_secs) = match started_at {
            Some(start) => (start, round_to_secs(now - start)),
            None => (now, 0),
        };
        Self {
            start_time,
            duration_secs,
            is_studying,
            is_paused,
        }
    }
}

/// Nearest whole second, half away from zero, clamped at zero.
fn round_to_secs(elapsed: Duration) -> i64 {
    let ms = elapsed.num_milliseconds().max(0);
    (ms + 500) / 1000
}

/// Sink the period timer writes finished spans to.
pub trait PeriodLog: Send {
    fn append(&self, entry: &PeriodEntry) -> Result<(), DatabaseError>;

    fn append_batch(&self, entries: &[PeriodEntry]) -> Result<(), DatabaseError> {
        for entry in entries {
            self.append(entry)?;
        }
        Ok(())
    }
}

impl PeriodLog for Database {
    fn append(&self, entry: &PeriodEntry) -> Result<(), DatabaseError> {
        self.append_period_entry(entry)
    }

    fn append_batch(&self, entries: &[PeriodEntry]) -> Result<(), DatabaseError> {
        self.append_period_entries(entries)
    }
}

/// In-memory log; clones share the same entries.
#[derive(Debug, Default, Clone)]
pub struct MemoryPeriodLog {
    entries: Arc<Mutex<Vec<PeriodEntry>>>,
}

impl MemoryPeriodLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<PeriodEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PeriodLog for MemoryPeriodLog {
    fn append(&self, entry: &PeriodEntry) -> Result<(), DatabaseError> {
        self.entries
            .lock()
            .map_err(|_| DatabaseError::QueryFailed("memory log poisoned".into()))?
            .push(entry.clone());
        Ok(())
    }
}

/// Hands entries to a blocking writer task that owns the database, so
/// appending never waits on disk I/O.
#[derive(Debug, Clone)]
pub struct QueuedPeriodLog {
    tx: mpsc::UnboundedSender<PeriodEntry>,
}

impl QueuedPeriodLog {
    /// Spawn the writer on the current tokio runtime.
    ///
    /// The writer drains the queue and exits once every `QueuedPeriodLog`
    /// clone has been dropped; await the handle to make sure everything was
    /// flushed.
    pub fn spawn(db: Database) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PeriodEntry>();
        let handle = tokio::task::spawn_blocking(move || {
            while let Some(entry) = rx.blocking_recv() {
                if let Err(e) = db.append_period_entry(&entry) {
                    tracing::warn!(error = %e, start = %entry.start_time, "failed to write period entry");
                }
            }
            tracing::debug!("period log writer finished");
        });
        (Self { tx }, handle)
    }
}

impl PeriodLog for QueuedPeriodLog {
    fn append(&self, entry: &PeriodEntry) -> Result<(), DatabaseError> {
        self.tx
            .send(entry.clone())
            .map_err(|_| DatabaseError::WriterClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn span_rounds_to_nearest_second() {
        let start = at(0);
        let now = start + Duration::milliseconds(2_499);
        assert_eq!(PeriodEntry::span(Some(start), now, true, false).duration_secs, 2);
        let now = start + Duration::milliseconds(2_500);
        assert_eq!(PeriodEntry::span(Some(start), now, true, false).duration_secs, 3);
    }

    #[test]
    fn span_without_start_is_empty() {
        let entry = PeriodEntry::span(None, at(10), false, true);
        assert_eq!(entry.start_time, at(10));
        assert_eq!(entry.duration_secs, 0);
    }

    #[test]
    fn span_never_negative() {
        let entry = PeriodEntry::span(Some(at(5)), at(0), true, false);
        assert_eq!(entry.duration_secs, 0);
    }

    #[test]
    fn memory_log_clones_share_entries() {
        let log = MemoryPeriodLog::new();
        let handle = log.clone();
        log.append(&PeriodEntry::span(None, at(0), true, true)).unwrap();
        assert_eq!(handle.len(), 1);
    }

    #[tokio::test]
    async fn queued_log_flushes_on_drop() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let db = Database::open_at(file.path()).unwrap();
        let (log, handle) = QueuedPeriodLog::spawn(db);
        log.append(&PeriodEntry::span(Some(at(0)), at(60), true, false)).unwrap();
        log.append(&PeriodEntry::span(Some(at(60)), at(90), true, true)).unwrap();
        drop(log);
        handle.await.unwrap();

        let reader = Database::open_at(file.path()).unwrap();
        let entries = reader.try_load_period_entries(at(0), at(120)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].duration_secs, 60);
        assert!(entries[1].is_paused);
    }
}
