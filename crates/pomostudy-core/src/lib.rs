//! # Pomostudy Core Library
//!
//! Core logic of the pomostudy study timer: a countdown that alternates
//! study periods with short and long breaks, logs every span of time it ran
//! or sat paused, and aggregates that log into per-day statistics.
//!
//! ## Architecture
//!
//! - **Timer**: [`PeriodTimer`], a fixed-step state machine the caller ticks,
//!   plus a tokio [`timer::Ticker`] that ticks a shared timer in the background
//! - **Storage**: SQLite for the period log, profiles and settings; TOML for
//!   the application configuration
//! - **Notifications**: the [`Notifier`] trait the timer reports finished
//!   periods to
//! - **Stats**: per-day study and break hours
//!
//! ## Key Components
//!
//! - [`PeriodTimer`]: Period state machine
//! - [`Database`]: Period log, profile and settings persistence
//! - [`Config`]: Application configuration management
//! - [`Event`]: Everything the timer publishes to subscribers

pub mod error;
pub mod events;
pub mod notify;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use notify::{Notification, NotificationKind, Notifier, TracingNotifier};
pub use storage::{Config, Database, PeriodEntry, PeriodLog};
pub use timer::{PeriodTimer, PeriodType, Profile, Status, TimerOptions};
