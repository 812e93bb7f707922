use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    #[default]
    Studying,
    ShortBreak,
    LongBreak,
}

impl PeriodType {
    pub fn is_break(self) -> bool {
        !matches!(self, PeriodType::Studying)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Studying => "studying",
            PeriodType::ShortBreak => "short_break",
            PeriodType::LongBreak => "long_break",
        }
    }

    /// Period that follows `self` once `cycles_done` study periods are
    /// complete.
    ///
    /// Any break is followed by studying. Studying is followed by a long
    /// break whenever `cycles_done` is a multiple of
    /// `cycles_until_long_break`, and by a short break otherwise. A threshold
    /// of zero is treated as one.
    pub fn following(self, cycles_done: u32, cycles_until_long_break: u32) -> PeriodType {
        if self.is_break() {
            return PeriodType::Studying;
        }
        if cycles_done % cycles_until_long_break.max(1) == 0 {
            PeriodType::LongBreak
        } else {
            PeriodType::ShortBreak
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "studying" | "study" => Ok(PeriodType::Studying),
            "short_break" | "short" => Ok(PeriodType::ShortBreak),
            "long_break" | "long" => Ok(PeriodType::LongBreak),
            other => Err(ValidationError::invalid(
                "period_type",
                format!("unknown period type '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_studying_is_not_a_break() {
        assert!(!PeriodType::Studying.is_break());
        assert!(PeriodType::ShortBreak.is_break());
        assert!(PeriodType::LongBreak.is_break());
    }

    #[test]
    fn breaks_are_followed_by_studying() {
        assert_eq!(PeriodType::ShortBreak.following(3, 4), PeriodType::Studying);
        assert_eq!(PeriodType::LongBreak.following(4, 4), PeriodType::Studying);
    }

    #[test]
    fn long_break_on_multiples_of_threshold() {
        assert_eq!(PeriodType::Studying.following(1, 2), PeriodType::ShortBreak);
        assert_eq!(PeriodType::Studying.following(2, 2), PeriodType::LongBreak);
        assert_eq!(PeriodType::Studying.following(3, 1), PeriodType::LongBreak);
        assert_eq!(PeriodType::Studying.following(5, 0), PeriodType::LongBreak);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("short-break".parse::<PeriodType>().unwrap(), PeriodType::ShortBreak);
        assert_eq!("LONG".parse::<PeriodType>().unwrap(), PeriodType::LongBreak);
        assert!("lunch".parse::<PeriodType>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&PeriodType::LongBreak).unwrap();
        assert_eq!(json, "\"long_break\"");
    }
}
