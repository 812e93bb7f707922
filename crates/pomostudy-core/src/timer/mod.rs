mod engine;
mod period;
mod profile;
mod status;
mod ticker;

pub use engine::{PeriodTimer, TimerOptions};
pub use period::PeriodType;
pub use profile::{DurationUnit, Profile, DEFAULT_PROFILE_NAME};
pub use status::{Status, StatusField, StatusSnapshot};
pub use ticker::{shared, SharedTimer, Ticker};
