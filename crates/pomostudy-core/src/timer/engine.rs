//! Period timer engine.
//!
//! The engine is a fixed-step state machine over
//! `{Studying, ShortBreak, LongBreak} x {Paused, Running}`. It does not own a
//! thread: the caller (usually [`super::Ticker`]) is responsible for calling
//! `tick()` every `tick_interval`.
//!
//! Every transition and every start/pause toggle closes the current span and
//! appends it to the [`PeriodLog`]. Log failures are reported through
//! `tracing` and never stop the timer.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PeriodTimer::new(profile, options, Box::new(log), Box::new(TracingNotifier))?;
//! timer.toggle_start_pause();
//! // Every options.tick_interval:
//! timer.tick(); // Returns Some(Event::PeriodOver { .. }) once per period
//! ```

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::broadcast;

use super::period::PeriodType;
use super::profile::{DurationUnit, Profile};
use super::status::Status;
use crate::error::ValidationError;
use crate::events::Event;
use crate::notify::{Notification, Notifier};
use crate::storage::{PeriodEntry, PeriodLog};

const EVENT_CAPACITY: usize = 256;

/// Construction-time settings of a [`PeriodTimer`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimerOptions {
    /// Amount subtracted from the remaining time on each tick.
    pub tick_interval: std::time::Duration,
    pub unit: DurationUnit,
    pub notification_title: String,
    pub notification_expiry: std::time::Duration,
    pub notifications_enabled: bool,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            tick_interval: std::time::Duration::from_millis(200),
            unit: DurationUnit::Minutes,
            notification_title: "pomostudy".into(),
            notification_expiry: std::time::Duration::from_secs(10),
            notifications_enabled: true,
        }
    }
}

impl TimerOptions {
    fn tick_step(&self) -> Duration {
        Duration::from_std(self.tick_interval)
            .unwrap_or_else(|_| Duration::milliseconds(i64::MAX))
    }
}

pub struct PeriodTimer {
    profile: Profile,
    status: Status,
    options: TimerOptions,
    log: Box<dyn PeriodLog>,
    notifier: Box<dyn Notifier>,
    /// Start of the span that will be logged by the next transition.
    span_started_at: Option<DateTime<Utc>>,
    is_timer_reset: bool,
    events: broadcast::Sender<Event>,
}

impl fmt::Debug for PeriodTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodTimer")
            .field("profile", &self.profile)
            .field("status", &self.status)
            .field("options", &self.options)
            .field("span_started_at", &self.span_started_at)
            .field("is_timer_reset", &self.is_timer_reset)
            .finish_non_exhaustive()
    }
}

impl PeriodTimer {
    /// Create a stopped timer at the start of a study period.
    ///
    /// # Errors
    /// Returns an error if the profile is invalid.
    pub fn new(
        profile: Profile,
        options: TimerOptions,
        log: Box<dyn PeriodLog>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, ValidationError> {
        Self::new_at(profile, options, log, notifier, Utc::now())
    }

    /// [`PeriodTimer::new`] with the first span starting at `now`.
    ///
    /// # Errors
    /// Returns an error if the profile is invalid.
    pub fn new_at(
        profile: Profile,
        options: TimerOptions,
        log: Box<dyn PeriodLog>,
        notifier: Box<dyn Notifier>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        profile.validate()?;
        let remaining = profile.period_duration(PeriodType::Studying, options.unit);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            profile,
            status: Status::new(PeriodType::Studying, remaining),
            options,
            log,
            notifier,
            span_started_at: Some(now),
            is_timer_reset: true,
            events,
        })
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn options(&self) -> &TimerOptions {
        &self.options
    }

    /// True until the first tick after a reset.
    pub fn is_timer_reset(&self) -> bool {
        self.is_timer_reset
    }

    pub fn span_started_at(&self) -> Option<DateTime<Utc>> {
        self.span_started_at
    }

    /// Configured length of `period_type` under the active profile.
    pub fn period_duration(&self, period_type: PeriodType) -> Duration {
        self.profile.period_duration(period_type, self.options.unit)
    }

    /// Period that follows the current one, see [`PeriodType::following`].
    ///
    /// When a study period finishes, this is read after the finished period
    /// has been added to the completed cycles.
    pub fn next_period_type(&self) -> PeriodType {
        self.status.period_type().following(
            self.status.cycles_done(),
            self.profile.cycles_until_long_break,
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    /// Advance the countdown by one tick interval.
    ///
    /// Does nothing while paused. Returns `Event::PeriodOver` on the tick
    /// where the remaining time first reaches zero.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.status.is_paused() {
            return None;
        }

        self.is_timer_reset = false;
        let was_complete = self.status.is_period_complete();
        self.status.decrease_time(self.options.tick_step());

        if !self.status.is_period_complete() || was_complete {
            self.publish_changes();
            return None;
        }

        let finished = self.status.period_type();
        if self.status.is_studying() {
            self.status.set_cycles_done(self.status.cycles_done() + 1);
        }
        if self.profile.auto_switch_mode_after_end {
            let next = self.next_period_type();
            // The PeriodChanged event is published by the switch itself.
            self.change_period_type_at(next, now);
        }

        tracing::info!(
            finished = %finished,
            current = %self.status.period_type(),
            cycles_done = self.status.cycles_done(),
            "period over"
        );
        self.notify_period_over(finished.is_break());

        let event = Event::PeriodOver {
            finished,
            was_break: finished.is_break(),
            current: self.status.period_type(),
            cycles_done: self.status.cycles_done(),
            at: now,
        };
        self.publish_changes();
        self.publish(event.clone());
        Some(event)
    }

    pub fn toggle_start_pause(&mut self) -> Event {
        self.toggle_start_pause_at(Utc::now())
    }

    /// Flip between running and paused, logging the span that just ended.
    pub fn toggle_start_pause_at(&mut self, now: DateTime<Utc>) -> Event {
        self.log_span(now);
        self.span_started_at = Some(now);
        let is_paused = !self.status.is_paused();
        self.status.set_paused(is_paused);

        let period_type = self.status.period_type();
        let remaining_ms = self.status.time_remaining().num_milliseconds();
        tracing::debug!(%period_type, remaining_ms, is_paused, "toggled start/pause");

        let event = if is_paused {
            Event::Paused {
                period_type,
                remaining_ms,
                at: now,
            }
        } else {
            Event::Started {
                period_type,
                remaining_ms,
                at: now,
            }
        };
        self.publish_changes();
        self.publish(event.clone());
        event
    }

    pub fn reset(&mut self) -> Event {
        self.reset_at(Utc::now())
    }

    /// Put the full duration of the current period back on the clock.
    /// Period type, pausedness and cycles are left alone.
    pub fn reset_at(&mut self, now: DateTime<Utc>) -> Event {
        self.is_timer_reset = true;
        let period_type = self.status.period_type();
        self.status.set_time_remaining(self.period_duration(period_type));

        let event = Event::Reset {
            period_type,
            at: now,
        };
        self.publish_changes();
        self.publish(event.clone());
        event
    }

    pub fn stop(&mut self) -> Event {
        self.stop_at(Utc::now())
    }

    /// Pause and reset the current period. A running span is logged first,
    /// unlike the desktop app this replaces, so quitting never drops time.
    /// Calling it again on a stopped timer only restarts the span.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Event {
        if !self.status.is_paused() {
            self.log_span(now);
            self.status.set_paused(true);
        }
        self.reset_at(now);
        self.span_started_at = Some(now);
        tracing::debug!(period_type = %self.status.period_type(), "timer stopped");

        let event = Event::Stopped { at: now };
        self.publish_changes();
        self.publish(event.clone());
        event
    }

    pub fn change_period_type(&mut self, period_type: PeriodType) -> Option<Event> {
        self.change_period_type_at(period_type, Utc::now())
    }

    /// Switch to `period_type` with its full duration on the clock.
    ///
    /// Switching to the current type is a no-op: nothing is logged and the
    /// span keeps running.
    pub fn change_period_type_at(
        &mut self,
        period_type: PeriodType,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        let from = self.status.period_type();
        if from == period_type {
            return None;
        }

        self.log_span(now);
        self.span_started_at = Some(now);
        self.status.set_period_type(period_type);
        let duration = self.period_duration(period_type);
        self.status.set_time_remaining(duration);
        tracing::debug!(%from, to = %period_type, "period changed");

        let event = Event::PeriodChanged {
            from,
            to: period_type,
            duration_secs: duration.num_seconds(),
            at: now,
        };
        self.publish_changes();
        self.publish(event.clone());
        Some(event)
    }

    /// # Errors
    /// Returns an error if the profile is invalid; the timer is untouched.
    pub fn change_profile(&mut self, profile: &Profile) -> Result<Event, ValidationError> {
        self.change_profile_at(profile, Utc::now())
    }

    /// Adopt `profile` and start over: the timer is stopped, the completed
    /// cycles are cleared and a fresh study period is put on the clock.
    ///
    /// # Errors
    /// Returns an error if the profile is invalid; the timer is untouched.
    pub fn change_profile_at(
        &mut self,
        profile: &Profile,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        profile.validate()?;

        self.stop_at(now);
        self.profile.copy_from(profile);
        self.status.set_cycles_done(0);
        if self.change_period_type_at(PeriodType::Studying, now).is_none() {
            // Already studying: the stop above used the old duration.
            self.reset_at(now);
        }
        tracing::debug!(profile = %self.profile.name, "profile changed");

        let event = Event::ProfileChanged {
            name: self.profile.name.clone(),
            at: now,
        };
        self.publish_changes();
        self.publish(event.clone());
        Ok(event)
    }

    /// Edit the active profile in place. The edit only takes effect if the
    /// result is valid, and it restarts the timer like
    /// [`PeriodTimer::change_profile`].
    ///
    /// # Errors
    /// Returns an error if the edited profile is invalid.
    pub fn edit_profile<F>(&mut self, edit: F) -> Result<Event, ValidationError>
    where
        F: FnOnce(&mut Profile),
    {
        let mut edited = self.profile.clone();
        edit(&mut edited);
        self.change_profile(&edited)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn log_span(&mut self, now: DateTime<Utc>) {
        let entry = PeriodEntry::span(
            self.span_started_at,
            now,
            self.status.is_studying(),
            self.status.is_paused(),
        );
        if let Err(e) = self.log.append(&entry) {
            tracing::warn!(
                error = %e,
                start = %entry.start_time,
                duration_secs = entry.duration_secs,
                "failed to log period span"
            );
        }
    }

    fn notify_period_over(&self, finished_was_break: bool) {
        if !self.options.notifications_enabled {
            return;
        }
        let notification = Notification::period_over(
            &self.options.notification_title,
            finished_was_break,
            self.options.notification_expiry,
        );
        self.notifier.notify(&notification);
    }

    fn publish_changes(&mut self) {
        for field in self.status.take_changes() {
            self.publish(Event::StatusChanged { field });
        }
    }

    fn publish(&self, event: Event) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
