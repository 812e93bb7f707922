use clap::Subcommand;
use pomostudy_core::settings::{Theme, WindowGeometry};
use pomostudy_core::Config;

use super::{open_database, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the selected theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Show the stored window geometry as JSON
    Window,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Switch between light and dark
    Toggle,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open_database(&config)?;

    match action {
        SettingsAction::Theme { action: None } => {
            print_json(&Theme::load(&db))?;
        }
        SettingsAction::Theme {
            action: Some(ThemeAction::Toggle),
        } => {
            let theme = Theme::load(&db).toggle();
            theme.save(&db)?;
            print_json(&theme)?;
        }
        SettingsAction::Window => {
            print_json(&WindowGeometry::load(&db))?;
        }
    }
    Ok(())
}
