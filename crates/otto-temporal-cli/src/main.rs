mod logging;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use otto_temporal::{
    prepare_event, resolve_date, resolve_time, spoken_reply, BackendOutcome, ScheduleRequest,
    ToolContext, DEFAULT_DURATION_MINUTES,
};

/// otto-resolve — turn spoken date/time phrases into calendar values
#[derive(Parser, Debug)]
#[command(name = "otto-resolve", version, about)]
struct Cli {
    /// Log resolution steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a date phrase (e.g., `tomorrow`, `friday`, `Jan 3rd`, `01/20/2026`)
    Date {
        #[arg(required = true, num_args = 1..)]
        phrase: Vec<String>,
        /// Date treated as today, as YYYY-MM-DD. Defaults to the local date.
        #[arg(long, env = "OTTO_TODAY")]
        today: Option<String>,
    },
    /// Resolve a time phrase (e.g., `3pm`, `11:30 pm`, `14:00`)
    Time {
        #[arg(required = true, num_args = 1..)]
        phrase: Vec<String>,
    },
    /// Build the calendar backend payload for a create-event request
    Event {
        #[arg(long)]
        title: String,
        /// Date phrase
        #[arg(long)]
        date: String,
        /// Time phrase
        #[arg(long)]
        time: String,
        /// Meeting length in minutes
        #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
        duration: u32,
        /// Comma-separated attendee emails
        #[arg(long)]
        attendees: Option<String>,
        /// User the event is created for
        #[arg(long, env = "OTTO_USER_ID")]
        user: Option<String>,
        /// Date treated as today, as YYYY-MM-DD. Defaults to the local date.
        #[arg(long, env = "OTTO_TODAY")]
        today: Option<String>,
        /// Print the reply that would be spoken for this backend HTTP status
        /// instead of the payload
        #[arg(long)]
        status: Option<u16>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("otto-resolve: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Date { phrase, today } => {
            let reference = reference_date(today.as_deref())?;
            println!("{}", resolve_date(&phrase.join(" "), reference));
        }
        Command::Time { phrase } => {
            println!("{}", resolve_time(&phrase.join(" ")));
        }
        Command::Event {
            title,
            date,
            time,
            duration,
            attendees,
            user,
            today,
            status,
        } => {
            let request = ScheduleRequest {
                title,
                date,
                time,
                duration_minutes: duration,
                attendees,
            };
            let context = ToolContext {
                user_id: user,
                reference: reference_instant(today.as_deref())?,
            };

            let prepared = match prepare_event(&request, &context) {
                Ok(prepared) => prepared,
                Err(e) => {
                    tracing::warn!(error = %e, "event request rejected");
                    eprintln!("{}", e.spoken());
                    return Ok(ExitCode::FAILURE);
                }
            };

            match status {
                Some(code) => {
                    println!(
                        "{}",
                        spoken_reply(&prepared.payload, &BackendOutcome::Status(code))
                    );
                }
                None => {
                    let json = serde_json::to_string_pretty(&prepared.payload)
                        .context("failed to serialize event payload")?;
                    println!("{json}");
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// The reference date: `--today` if given, otherwise the local calendar date.
fn reference_date(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid --today '{s}', expected YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}

/// The reference instant: midnight of `--today` if given, otherwise now.
fn reference_instant(today: Option<&str>) -> Result<NaiveDateTime> {
    match today {
        Some(_) => Ok(reference_date(today)?.and_time(NaiveTime::MIN)),
        None => Ok(Local::now().naive_local()),
    }
}
