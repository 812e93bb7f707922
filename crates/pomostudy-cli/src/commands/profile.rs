//! Timer profile commands.
//!
//! Profiles live in the database; the active one is named by
//! `active_profile` in the config file.

use clap::Subcommand;
use pomostudy_core::{Config, Profile};

use super::{open_database, print_json};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// List stored profiles
    List,

    /// Show a profile as JSON
    Show {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },

    /// Create or update a profile
    Save {
        name: String,
        /// Study period length
        #[arg(long)]
        studying: Option<u32>,
        /// Short break length
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break length
        #[arg(long)]
        long_break: Option<u32>,
        /// Completed study periods before a long break
        #[arg(long)]
        cycles: Option<u32>,
        /// Switch to the next period automatically when one ends
        #[arg(long)]
        auto_switch: Option<bool>,
    },

    /// Make a profile the active one
    Use { name: String },

    /// Delete a profile
    Delete { name: String },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open_database(&config)?;

    match action {
        ProfileAction::List => {
            for name in db.profile_names()? {
                let marker = if name == config.active_profile { " [ACTIVE]" } else { "" };
                println!("{name}{marker}");
            }
        }
        ProfileAction::Show { name } => {
            let name = name.unwrap_or_else(|| config.active_profile.clone());
            match db.try_load_profile(&name)? {
                Some(profile) => print_json(&profile)?,
                None => return Err(format!("profile not found: {name}").into()),
            }
        }
        ProfileAction::Save {
            name,
            studying,
            short_break,
            long_break,
            cycles,
            auto_switch,
        } => {
            let mut profile = db
                .try_load_profile(&name)?
                .unwrap_or_else(|| Profile::new(name.as_str()));
            if let Some(v) = studying {
                profile.duration_studying = v;
            }
            if let Some(v) = short_break {
                profile.duration_short_break = v;
            }
            if let Some(v) = long_break {
                profile.duration_long_break = v;
            }
            if let Some(v) = cycles {
                profile.cycles_until_long_break = v;
            }
            if let Some(v) = auto_switch {
                profile.auto_switch_mode_after_end = v;
            }
            db.save_profile(&profile)?;
            print_json(&profile)?;
        }
        ProfileAction::Use { name } => {
            if db.try_load_profile(&name)?.is_none() {
                return Err(format!("profile not found: {name}").into());
            }
            let mut config = config;
            config.set("active_profile", &name)?;
            println!("active profile: {name}");
        }
        ProfileAction::Delete { name } => {
            if db.delete_profile(&name)? {
                println!("deleted: {name}");
            } else {
                return Err(format!("profile not found: {name}").into());
            }
        }
    }
    Ok(())
}
