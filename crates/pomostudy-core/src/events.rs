use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{PeriodType, StatusField};

/// Every state change of the period timer produces an Event.
/// Frontends subscribe to them instead of binding to the status directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// One observable status field changed.
    StatusChanged { field: StatusField },
    Started {
        period_type: PeriodType,
        remaining_ms: i64,
        at: DateTime<Utc>,
    },
    Paused {
        period_type: PeriodType,
        remaining_ms: i64,
        at: DateTime<Utc>,
    },
    /// The countdown of `finished` crossed zero.
    PeriodOver {
        finished: PeriodType,
        was_break: bool,
        /// Period the timer is on after any automatic switch.
        current: PeriodType,
        cycles_done: u32,
        at: DateTime<Utc>,
    },
    PeriodChanged {
        from: PeriodType,
        to: PeriodType,
        duration_secs: i64,
        at: DateTime<Utc>,
    },
    Reset {
        period_type: PeriodType,
        at: DateTime<Utc>,
    },
    Stopped {
        at: DateTime<Utc>,
    },
    ProfileChanged {
        name: String,
        at: DateTime<Utc>,
    },
}
