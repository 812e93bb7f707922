//! Foreground timer driven from stdin.

use std::time::Duration;

use clap::Subcommand;
use pomostudy_core::notify::{Notification, NotificationKind, Notifier};
use pomostudy_core::storage::QueuedPeriodLog;
use pomostudy_core::timer::{self, DurationUnit, PeriodType, Ticker};
use pomostudy_core::{
    Config, Database, Event, PeriodTimer, Profile, TimerOptions, TracingNotifier,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use super::{open_database, print_json};

const HELP: &str = "commands: t = start/pause, r = reset, s = study, b = short break, \
l = long break, n = next period, u NAME = use profile, p = print status, q = quit";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, controlled by line commands on stdin
    Run {
        /// Profile to use (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
        /// Count profile durations in seconds instead of minutes
        #[arg(long)]
        seconds: bool,
        /// Send period-over notifications to the log instead of stdout
        #[arg(long)]
        quiet: bool,
    },
    /// Print the period that follows a given one
    Next {
        /// Current period type
        #[arg(long, default_value = "studying")]
        current: PeriodType,
        /// Completed study periods, the one just finished included
        #[arg(long, default_value_t = 1)]
        cycles: u32,
        /// Profile to take the long-break threshold from
        #[arg(long)]
        profile: Option<String>,
    },
}

/// Prints notifications to the terminal.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        let marker = match notification.kind {
            NotificationKind::Info => "i",
            NotificationKind::Success => "*",
        };
        println!("[{marker}] {}: {}", notification.title, notification.message);
    }
}

enum Command {
    Toggle,
    Reset,
    Change(PeriodType),
    Next,
    UseProfile(String),
    Print,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(name) = line.strip_prefix("u ") {
            let name = name.trim();
            return (!name.is_empty()).then(|| Command::UseProfile(name.to_string()));
        }
        match line {
            "t" => Some(Command::Toggle),
            "r" => Some(Command::Reset),
            "s" => Some(Command::Change(PeriodType::Studying)),
            "b" => Some(Command::Change(PeriodType::ShortBreak)),
            "l" => Some(Command::Change(PeriodType::LongBreak)),
            "n" => Some(Command::Next),
            "p" => Some(Command::Print),
            "h" | "?" => Some(Command::Help),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TimerAction::Run {
            profile,
            seconds,
            quiet,
        } => {
            let db = open_database(&config)?;
            // The period log takes ownership of `db`; profiles are read
            // through a second connection.
            let profiles = open_database(&config)?;
            let profile = load_profile(&db, &config, profile);
            let mut options = config.timer_options();
            if seconds {
                options.unit = DurationUnit::Seconds;
            }
            let notifier: Box<dyn Notifier> = if quiet {
                Box::new(TracingNotifier)
            } else {
                Box::new(TerminalNotifier)
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_foreground(db, profiles, profile, options, notifier))
        }
        TimerAction::Next {
            current,
            cycles,
            profile,
        } => {
            let db = open_database(&config)?;
            let profile = load_profile(&db, &config, profile);
            let next = current.following(cycles, profile.cycles_until_long_break);
            print_json(&next)
        }
    }
}

fn load_profile(db: &Database, config: &Config, name: Option<String>) -> Profile {
    let name = name.unwrap_or_else(|| config.active_profile.clone());
    db.load_profile(&name)
}

async fn run_foreground(
    db: Database,
    profiles: Database,
    profile: Profile,
    options: TimerOptions,
    notifier: Box<dyn Notifier>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (log, writer) = QueuedPeriodLog::spawn(db);
    let tick_interval = options.tick_interval;
    let period_timer = PeriodTimer::new(profile, options, Box::new(log), notifier)?;
    let mut events = period_timer.subscribe();
    let shared = timer::shared(period_timer);
    let ticker = Ticker::spawn(shared.clone(), tick_interval);

    println!("profile: {}", shared.lock().await.profile().name);
    println!("{HELP}");
    println!("{}", shared.lock().await.status());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut display = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                // End of input behaves like `q`.
                let Some(line) = line? else { break };
                let Some(command) = Command::parse(&line) else {
                    if !line.trim().is_empty() {
                        println!("unknown command: {}", line.trim());
                    }
                    continue;
                };
                let mut t = shared.lock().await;
                match command {
                    Command::Toggle => {
                        t.toggle_start_pause();
                    }
                    Command::Reset => {
                        t.reset();
                    }
                    Command::Change(period_type) => {
                        t.change_period_type(period_type);
                    }
                    Command::Next => {
                        let next = t.next_period_type();
                        t.change_period_type(next);
                    }
                    Command::UseProfile(name) => match profiles.try_load_profile(&name) {
                        Ok(Some(profile)) => match t.change_profile(&profile) {
                            Ok(_) => println!("profile: {}", t.profile().name),
                            Err(e) => println!("cannot use profile {name}: {e}"),
                        },
                        Ok(None) => println!("unknown profile: {name}"),
                        Err(e) => println!("cannot load profile {name}: {e}"),
                    },
                    Command::Print => {}
                    Command::Help => println!("{HELP}"),
                    Command::Quit => break,
                }
                println!("{}", t.status());
            }
            _ = display.tick() => {
                let t = shared.lock().await;
                if !t.status().is_paused() {
                    println!("{}", t.status());
                }
            }
            event = events.recv() => match event {
                Ok(Event::PeriodOver { finished, current, cycles_done, .. }) => {
                    println!("{finished} over, now {current} (cycles done: {cycles_done})");
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "event subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    ticker.shutdown().await;
    shared.lock().await.stop();
    drop(events);
    drop(shared);

    // The writer exits once the timer, and with it the log, is gone.
    writer.await?;
    Ok(())
}
