use chrono::{NaiveDate, Utc};
use clap::Args;
use pomostudy_core::stats::day_bounds;
use pomostudy_core::Config;

use super::{open_database, print_json};

#[derive(Args)]
pub struct HistoryArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,
    /// Last day, included (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    to: Option<NaiveDate>,
}

/// Print the logged spans between two days as JSON.
pub fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open_database(&config)?;

    let to = args.to.unwrap_or_else(|| Utc::now().date_naive());
    let (start, _) = day_bounds(args.from);
    let (_, end) = day_bounds(to);
    let entries = db.try_load_period_entries(start, end)?;
    print_json(&entries)
}
