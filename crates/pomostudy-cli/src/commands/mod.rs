pub mod config;
pub mod history;
pub mod profile;
pub mod settings;
pub mod stats;
pub mod timer;

use pomostudy_core::{Config, Database};

/// Open the database the configuration points at.
pub fn open_database(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    let path = config.database_path()?;
    Ok(Database::open_at(&path)?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
