use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use pomostudy_core::stats;
use pomostudy_core::Config;

use super::{open_database, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Study and break hours for today
    Today,
    /// The last seven days, today included
    Week,
    /// Every day with logged time in a date range
    Days {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day, included (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open_database(&config)?;
    let today = Utc::now().date_naive();

    match action {
        StatsAction::Today => {
            let (start, end) = stats::day_bounds(today);
            let entries = db.try_load_period_entries(start, end)?;
            print_json(&stats::day_statistic(&entries, today))?;
        }
        StatsAction::Week => {
            let (start, _) = stats::day_bounds(stats::week_start(today));
            let (_, end) = stats::day_bounds(today);
            let entries = db.try_load_period_entries(start, end)?;
            print_json(&stats::week_overview(&entries, today))?;
        }
        StatsAction::Days { from, to } => {
            let to = to.unwrap_or(today);
            if to < from {
                return Err(format!("--to ({to}) is before --from ({from})").into());
            }
            let (start, _) = stats::day_bounds(from);
            let (_, end) = stats::day_bounds(to);
            let entries = db.try_load_period_entries(start, end)?;
            print_json(&stats::daily_statistics(&entries, from, to))?;
        }
    }
    Ok(())
}
