//! Per-day study statistics over the period log.
//!
//! Only spans spent running count; paused spans are ignored. Days are UTC
//! calendar days of an entry's start time, so a span crossing midnight is
//! attributed to the day it started on.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::PeriodEntry;

/// Number of days shown by [`week_overview`], today included.
pub const WEEK_DAYS: u64 = 7;

const SECS_PER_HOUR: f64 = 3600.0;

/// Hours spent studying and on breaks during one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStatistic {
    pub date: NaiveDate,
    pub study_hours: f64,
    pub break_hours: f64,
}

impl DayStatistic {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            study_hours: 0.0,
            break_hours: 0.0,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.study_hours + self.break_hours
    }

    fn add(&mut self, entry: &PeriodEntry) {
        if entry.is_paused {
            return;
        }
        let hours = entry.duration_secs as f64 / SECS_PER_HOUR;
        if entry.is_studying {
            self.study_hours += hours;
        } else {
            self.break_hours += hours;
        }
    }
}

/// `[start of date, start of the next day)` in UTC.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let next = date
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
        .and_utc();
    (start, next)
}

/// Statistic for `date`, zero when nothing was logged that day.
pub fn day_statistic(entries: &[PeriodEntry], date: NaiveDate) -> DayStatistic {
    let mut stat = DayStatistic::empty(date);
    for entry in entries
        .iter()
        .filter(|e| e.start_time.date_naive() == date)
    {
        stat.add(entry);
    }
    stat
}

/// One statistic per day in `from..=to` that has at least one entry,
/// ordered by date. The last day is fully included.
pub fn daily_statistics(entries: &[PeriodEntry], from: NaiveDate, to: NaiveDate) -> Vec<DayStatistic> {
    let mut days: BTreeMap<NaiveDate, DayStatistic> = BTreeMap::new();
    for entry in entries {
        let date = entry.start_time.date_naive();
        if date < from || date > to {
            continue;
        }
        days.entry(date)
            .or_insert_with(|| DayStatistic::empty(date))
            .add(entry);
    }
    days.into_values().collect()
}

/// The last [`WEEK_DAYS`] days ending with `today`, oldest first. Days
/// without entries are present with zero hours.
pub fn week_overview(entries: &[PeriodEntry], today: NaiveDate) -> Vec<DayStatistic> {
    let first = week_start(today);
    let by_day = daily_statistics(entries, first, today);

    first
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|date| {
            by_day
                .iter()
                .find(|s| s.date == date)
                .cloned()
                .unwrap_or_else(|| DayStatistic::empty(date))
        })
        .collect()
}

/// First day covered by [`week_overview`] for `today`.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(WEEK_DAYS - 1))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn entry(day: u32, hour: u32, minutes: i64, is_studying: bool, is_paused: bool) -> PeriodEntry {
        PeriodEntry {
            start_time: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            duration_secs: minutes * 60,
            is_studying,
            is_paused,
        }
    }

    #[test]
    fn day_statistic_splits_study_and_break() {
        let entries = vec![
            entry(10, 9, 60, true, false),
            entry(10, 10, 30, false, false),
            entry(10, 11, 90, true, false),
            entry(11, 9, 45, true, false),
        ];
        let stat = day_statistic(&entries, date(10));
        assert_eq!(stat.study_hours, 2.5);
        assert_eq!(stat.break_hours, 0.5);
        assert_eq!(stat.total_hours(), 3.0);
    }

    #[test]
    fn paused_spans_are_ignored() {
        let entries = vec![entry(10, 9, 60, true, true), entry(10, 10, 30, false, true)];
        assert_eq!(day_statistic(&entries, date(10)), DayStatistic::empty(date(10)));
    }

    #[test]
    fn daily_statistics_include_last_day() {
        let entries = vec![
            entry(12, 23, 60, true, false),
            entry(9, 8, 60, true, false),
            entry(10, 8, 30, false, false),
            entry(13, 0, 60, true, false),
        ];
        let stats = daily_statistics(&entries, date(10), date(12));
        let dates: Vec<NaiveDate> = stats.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(10), date(12)]);
        assert_eq!(stats[0].break_hours, 0.5);
    }

    #[test]
    fn reversed_range_is_empty() {
        let entries = vec![entry(10, 8, 30, true, false)];
        assert!(daily_statistics(&entries, date(11), date(9)).is_empty());
    }

    #[test]
    fn week_overview_is_zero_filled() {
        let entries = vec![entry(4, 9, 60, true, false), entry(1, 9, 60, true, false)];
        let week = week_overview(&entries, date(7));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(1));
        assert_eq!(week[6].date, date(7));
        assert_eq!(week[0].study_hours, 1.0);
        assert_eq!(week[3].study_hours, 1.0);
        assert_eq!(week[6], DayStatistic::empty(date(7)));
    }

    #[test]
    fn day_bounds_span_one_day() {
        let (start, end) = day_bounds(date(10));
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(end - start, chrono::Duration::days(1));
    }
}
