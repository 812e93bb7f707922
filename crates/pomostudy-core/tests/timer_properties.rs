//! Property tests for the period timer's countdown and period sequence.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pomostudy_core::notify::RecordingNotifier;
use pomostudy_core::storage::MemoryPeriodLog;
use pomostudy_core::timer::DurationUnit;
use pomostudy_core::{Event, PeriodTimer, PeriodType, Profile, TimerOptions};
use proptest::prelude::*;

const TICK_MS: i64 = 200;

fn at(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::milliseconds(ms)
}

fn timer(studying_secs: u32, auto_switch: bool) -> PeriodTimer {
    let profile = Profile {
        name: "prop".into(),
        duration_studying: studying_secs,
        duration_short_break: 3,
        duration_long_break: 4,
        cycles_until_long_break: 2,
        auto_switch_mode_after_end: auto_switch,
    };
    let options = TimerOptions {
        unit: DurationUnit::Seconds,
        ..TimerOptions::default()
    };
    PeriodTimer::new_at(
        profile,
        options,
        Box::new(MemoryPeriodLog::new()),
        Box::new(RecordingNotifier::new()),
        at(0),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn ticks_decrease_exactly_while_running(ops in proptest::collection::vec(any::<bool>(), 0..300)) {
        let mut t = timer(30, false);
        let mut now = 0;
        for is_tick in ops {
            now += TICK_MS;
            let before = t.status().time_remaining();
            if is_tick {
                let paused = t.status().is_paused();
                t.tick_at(at(now));
                let expected = if paused { before } else { before - Duration::milliseconds(TICK_MS) };
                prop_assert_eq!(t.status().time_remaining(), expected);
            } else {
                t.toggle_start_pause_at(at(now));
                prop_assert_eq!(t.status().time_remaining(), before);
            }
        }
    }

    #[test]
    fn completion_fires_once_per_period(studying in 1u32..8, ticks in 0i64..120) {
        let notifier = RecordingNotifier::new();
        let profile = Profile {
            duration_studying: studying,
            auto_switch_mode_after_end: false,
            ..Profile::new("prop")
        };
        let options = TimerOptions { unit: DurationUnit::Seconds, ..TimerOptions::default() };
        let mut t = PeriodTimer::new_at(
            profile,
            options,
            Box::new(MemoryPeriodLog::new()),
            Box::new(notifier.clone()),
            at(0),
        )
        .unwrap();
        t.toggle_start_pause_at(at(0));

        let overs = (1..=ticks)
            .filter_map(|i| t.tick_at(at(i * TICK_MS)))
            .filter(|e| matches!(e, Event::PeriodOver { .. }))
            .count();

        let crossed = ticks * TICK_MS >= i64::from(studying) * 1000;
        prop_assert_eq!(overs, usize::from(crossed));
        prop_assert_eq!(notifier.sent().len(), usize::from(crossed));
        prop_assert_eq!(t.status().cycles_done(), u32::from(crossed));
    }

    #[test]
    fn long_break_exactly_on_threshold(threshold in 1u32..8, cycles in 1u32..50) {
        let next = PeriodType::Studying.following(cycles, threshold);
        if cycles % threshold == 0 {
            prop_assert_eq!(next, PeriodType::LongBreak);
        } else {
            prop_assert_eq!(next, PeriodType::ShortBreak);
        }
        prop_assert_eq!(PeriodType::ShortBreak.following(cycles, threshold), PeriodType::Studying);
        prop_assert_eq!(PeriodType::LongBreak.following(cycles, threshold), PeriodType::Studying);
    }

    #[test]
    fn auto_switch_alternates_study_and_breaks(periods in 1usize..12) {
        let mut t = timer(2, true);
        t.toggle_start_pause_at(at(0));
        let mut now = 0;
        let mut finished = Vec::new();
        while finished.len() < periods {
            now += TICK_MS;
            if let Some(Event::PeriodOver { finished: f, .. }) = t.tick_at(at(now)) {
                finished.push(f);
            }
        }
        for (i, f) in finished.iter().enumerate() {
            prop_assert_eq!(f.is_break(), i % 2 == 1);
        }
        let studies = finished.iter().filter(|f| !f.is_break()).count() as u32;
        prop_assert_eq!(t.status().cycles_done(), studies);
    }
}
