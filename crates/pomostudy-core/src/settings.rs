//! Front-end settings kept in the key-value table of the database.
//!
//! The core does not interpret these values; it only stores them for
//! whichever front end draws the window.

use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::storage::Database;

const KEY_WINDOW_TOP: &str = "window_top";
const KEY_WINDOW_LEFT: &str = "window_left";
const KEY_WINDOW_HEIGHT: &str = "window_height";
const KEY_WINDOW_WIDTH: &str = "window_width";
const KEY_WINDOW_STATE: &str = "window_state";
const KEY_THEME: &str = "selected_theme_index";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

impl WindowState {
    fn index(self) -> i32 {
        match self {
            WindowState::Normal => 0,
            WindowState::Minimized => 1,
            WindowState::Maximized => 2,
        }
    }

    fn from_index(index: i32) -> Self {
        match index {
            1 => WindowState::Minimized,
            2 => WindowState::Maximized,
            _ => WindowState::Normal,
        }
    }
}

/// Last known position and size of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
    pub state: WindowState,
}

impl WindowGeometry {
    /// Missing or unreadable values come back as zero / `Normal`.
    pub fn load(db: &Database) -> Self {
        Self {
            top: db.load_parameter(KEY_WINDOW_TOP),
            left: db.load_parameter(KEY_WINDOW_LEFT),
            height: db.load_parameter(KEY_WINDOW_HEIGHT),
            width: db.load_parameter(KEY_WINDOW_WIDTH),
            state: WindowState::from_index(db.load_parameter(KEY_WINDOW_STATE)),
        }
    }

    /// # Errors
    /// Returns the first failed write.
    pub fn save(&self, db: &Database) -> Result<(), DatabaseError> {
        db.save_parameter(KEY_WINDOW_TOP, &self.top)?;
        db.save_parameter(KEY_WINDOW_LEFT, &self.left)?;
        db.save_parameter(KEY_WINDOW_HEIGHT, &self.height)?;
        db.save_parameter(KEY_WINDOW_WIDTH, &self.width)?;
        db.save_parameter(KEY_WINDOW_STATE, &self.state.index())?;
        Ok(())
    }

    /// State to restore the window in. A window is never restored minimized.
    pub fn restored_state(&self) -> WindowState {
        match self.state {
            WindowState::Minimized => WindowState::Normal,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn load(db: &Database) -> Self {
        match db.load_parameter::<i32>(KEY_THEME) {
            1 => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// # Errors
    /// Returns an error if the write fails.
    pub fn save(self, db: &Database) -> Result<(), DatabaseError> {
        let index = match self {
            Theme::Light => 0,
            Theme::Dark => 1,
        };
        db.save_parameter(KEY_THEME, &index)
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}
