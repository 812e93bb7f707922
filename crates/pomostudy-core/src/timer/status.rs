//! State of the currently active period.
//!
//! Every setter records which observable fields it touched, derived ones
//! included. The engine drains those records after each operation and
//! republishes them as [`crate::Event::StatusChanged`].

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::period::PeriodType;

/// Observable field of [`Status`], including the derived ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusField {
    PeriodType,
    IsStudying,
    IsShortBreak,
    IsLongBreak,
    IsTakingBreak,
    PeriodLabel,
    IsPaused,
    TimeRemaining,
    TimeRemainingText,
    IsPeriodComplete,
    CyclesDone,
}

const PERIOD_TYPE_FIELDS: [StatusField; 6] = [
    StatusField::PeriodType,
    StatusField::IsStudying,
    StatusField::IsShortBreak,
    StatusField::IsLongBreak,
    StatusField::IsTakingBreak,
    StatusField::PeriodLabel,
];

const TIME_FIELDS: [StatusField; 3] = [
    StatusField::TimeRemaining,
    StatusField::TimeRemainingText,
    StatusField::IsPeriodComplete,
];

#[derive(Debug, Clone)]
pub struct Status {
    period_type: PeriodType,
    is_paused: bool,
    time_remaining: Duration,
    cycles_done: u32,
    changes: Vec<StatusField>,
}

/// Serializable view of a [`Status`] with the derived values filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub period_type: PeriodType,
    pub period_label: String,
    pub is_paused: bool,
    pub time_remaining_ms: i64,
    pub time_remaining_text: String,
    pub is_period_complete: bool,
    pub cycles_done: u32,
}

impl Default for Status {
    fn default() -> Self {
        Self::new(PeriodType::Studying, Duration::zero())
    }
}

impl Status {
    /// A paused status with no completed cycles.
    pub fn new(period_type: PeriodType, time_remaining: Duration) -> Self {
        Self {
            period_type,
            is_paused: true,
            time_remaining,
            cycles_done: 0,
            changes: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn period_type(&self) -> PeriodType {
        self.period_type
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    pub fn cycles_done(&self) -> u32 {
        self.cycles_done
    }

    pub fn is_studying(&self) -> bool {
        self.period_type == PeriodType::Studying
    }

    pub fn is_short_break(&self) -> bool {
        self.period_type == PeriodType::ShortBreak
    }

    pub fn is_long_break(&self) -> bool {
        self.period_type == PeriodType::LongBreak
    }

    pub fn is_taking_break(&self) -> bool {
        !self.is_studying()
    }

    pub fn is_period_complete(&self) -> bool {
        self.time_remaining <= Duration::zero()
    }

    pub fn period_label(&self) -> &'static str {
        if self.is_studying() {
            "Studying"
        } else {
            "Taking a break"
        }
    }

    /// `MM:SS`, clamped to `00:00` once the period has run out.
    pub fn time_remaining_text(&self) -> String {
        let secs = self.time_remaining.num_seconds().max(0);
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            period_type: self.period_type,
            period_label: self.period_label().to_string(),
            is_paused: self.is_paused,
            time_remaining_ms: self.time_remaining.num_milliseconds(),
            time_remaining_text: self.time_remaining_text(),
            is_period_complete: self.is_period_complete(),
            cycles_done: self.cycles_done,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Subtract `amount` without clamping; the remaining time may go negative.
    pub fn decrease_time(&mut self, amount: Duration) {
        self.time_remaining = self.time_remaining - amount;
        self.changes.extend_from_slice(&TIME_FIELDS);
    }

    pub fn set_time_remaining(&mut self, time_remaining: Duration) {
        self.time_remaining = time_remaining;
        self.changes.extend_from_slice(&TIME_FIELDS);
    }

    pub fn set_period_type(&mut self, period_type: PeriodType) {
        self.period_type = period_type;
        self.changes.extend_from_slice(&PERIOD_TYPE_FIELDS);
    }

    pub fn set_paused(&mut self, is_paused: bool) {
        self.is_paused = is_paused;
        self.changes.push(StatusField::IsPaused);
    }

    pub fn set_cycles_done(&mut self, cycles_done: u32) {
        self.cycles_done = cycles_done;
        self.changes.push(StatusField::CyclesDone);
    }

    /// Fields touched since the last call, in order, duplicates removed.
    pub fn take_changes(&mut self) -> Vec<StatusField> {
        let mut seen = Vec::with_capacity(self.changes.len());
        for field in self.changes.drain(..) {
            if !seen.contains(&field) {
                seen.push(field);
            }
        }
        seen
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "period: {}, paused: {}, remaining: {}",
            self.period_type,
            self.is_paused,
            self.time_remaining_text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_status_starts_paused() {
        let status = Status::new(PeriodType::Studying, Duration::minutes(25));
        assert!(status.is_paused());
        assert_eq!(status.cycles_done(), 0);
        assert!(!status.is_period_complete());
    }

    #[test]
    fn decrease_time_can_go_negative() {
        let mut status = Status::new(PeriodType::ShortBreak, Duration::milliseconds(100));
        status.decrease_time(Duration::milliseconds(300));
        assert_eq!(status.time_remaining(), Duration::milliseconds(-200));
        assert!(status.is_period_complete());
        assert_eq!(status.time_remaining_text(), "00:00");
    }

    #[test]
    fn zero_remaining_counts_as_complete() {
        let status = Status::new(PeriodType::Studying, Duration::zero());
        assert!(status.is_period_complete());
    }

    #[test]
    fn decrease_time_reports_time_fields() {
        let mut status = Status::default();
        status.decrease_time(Duration::seconds(1));
        assert_eq!(status.take_changes(), TIME_FIELDS.to_vec());
        assert!(status.take_changes().is_empty());
    }

    #[test]
    fn set_period_type_reports_derived_fields() {
        let mut status = Status::default();
        status.set_period_type(PeriodType::LongBreak);
        let changes = status.take_changes();
        assert!(changes.contains(&StatusField::IsTakingBreak));
        assert!(changes.contains(&StatusField::PeriodLabel));
        assert!(!changes.contains(&StatusField::TimeRemaining));
        assert!(status.is_long_break());
        assert_eq!(status.period_label(), "Taking a break");
    }

    #[test]
    fn repeated_changes_are_collapsed() {
        let mut status = Status::default();
        status.set_paused(false);
        status.set_paused(true);
        assert_eq!(status.take_changes(), vec![StatusField::IsPaused]);
    }

    #[test]
    fn text_uses_total_minutes() {
        let status = Status::new(PeriodType::Studying, Duration::seconds(90 * 60 + 7));
        assert_eq!(status.time_remaining_text(), "90:07");
    }

    #[test]
    fn snapshot_carries_derived_values() {
        let status = Status::new(PeriodType::Studying, Duration::seconds(65));
        let snap = status.snapshot();
        assert_eq!(snap.time_remaining_ms, 65_000);
        assert_eq!(snap.time_remaining_text, "01:05");
        assert_eq!(snap.period_label, "Studying");
        assert!(snap.is_paused);
    }
}
