//! Named timer profiles.
//!
//! A profile carries the three period durations, the long-break threshold
//! and the auto-switch flag. Durations are plain integers; the unit they are
//! counted in is a [`DurationUnit`] chosen by the timer, not by the profile.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::period::PeriodType;
use crate::error::ValidationError;

pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Unit a profile's durations are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Minutes,
    /// Fast mode for trying out a profile without waiting whole minutes.
    Seconds,
}

impl DurationUnit {
    pub fn to_duration(self, amount: u32) -> Duration {
        match self {
            DurationUnit::Minutes => Duration::minutes(i64::from(amount)),
            DurationUnit::Seconds => Duration::seconds(i64::from(amount)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default = "default_studying")]
    pub duration_studying: u32,
    #[serde(default = "default_short_break")]
    pub duration_short_break: u32,
    #[serde(default = "default_long_break")]
    pub duration_long_break: u32,
    #[serde(default = "default_cycles_until_long_break")]
    pub cycles_until_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_switch_mode_after_end: bool,
}

fn default_studying() -> u32 {
    40
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_cycles_until_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            duration_studying: default_studying(),
            duration_short_break: default_short_break(),
            duration_long_break: default_long_break(),
            cycles_until_long_break: default_cycles_until_long_break(),
            auto_switch_mode_after_end: true,
        }
    }
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Configured length of `period_type`, in the profile's own integer unit.
    pub fn duration_of(&self, period_type: PeriodType) -> u32 {
        match period_type {
            PeriodType::Studying => self.duration_studying,
            PeriodType::ShortBreak => self.duration_short_break,
            PeriodType::LongBreak => self.duration_long_break,
        }
    }

    pub fn period_duration(&self, period_type: PeriodType, unit: DurationUnit) -> Duration {
        unit.to_duration(self.duration_of(period_type))
    }

    /// Rejects profiles that would produce an empty countdown or a
    /// long-break rule that divides by zero.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "must not be empty"));
        }
        let durations = [
            ("duration_studying", self.duration_studying),
            ("duration_short_break", self.duration_short_break),
            ("duration_long_break", self.duration_long_break),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(ValidationError::invalid(field, "must be greater than zero"));
            }
        }
        if self.cycles_until_long_break == 0 {
            return Err(ValidationError::invalid(
                "cycles_until_long_break",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Overwrite every field with the values of `other`, keeping this
    /// instance (and whoever holds it) in place.
    pub fn copy_from(&mut self, other: &Profile) {
        self.name.clone_from(&other.name);
        self.duration_studying = other.duration_studying;
        self.duration_short_break = other.duration_short_break;
        self.duration_long_break = other.duration_long_break;
        self.cycles_until_long_break = other.cycles_until_long_break;
        self.auto_switch_mode_after_end = other.auto_switch_mode_after_end;
    }
}
