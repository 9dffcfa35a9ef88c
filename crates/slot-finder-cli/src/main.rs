//! `slots` CLI: search bookable time slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Search slots for a week, blocking the events of an iCal feed
//! slots search --config config.json --calendar agenda.ics \
//!     --from 2020-10-12T00:00:00+02:00 --to 2020-10-19T00:00:00+02:00
//!
//! # Pin "now" for reproducible output and write to a file
//! slots search --config config.json --from ... --to ... \
//!     --now 2020-10-10T08:00:00Z -o slots.json
//!
//! # Check a configuration
//! slots validate --config config.json
//!
//! # Show every busy interval the search would avoid
//! slots busy --config config.json --calendar agenda.ics
//!
//! # Debug logs on stderr
//! slots -v search ...
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use slot_finder::{
    collect_busy_intervals, find_available_slots, validate_configuration, CalendarFormat,
    SearchRequest, SlotConfiguration,
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable time-slot search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logs (written to stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search bookable slots and print them as JSON
    Search {
        /// Slot configuration (JSON file)
        #[arg(short, long)]
        config: String,
        /// Calendar whose events block time
        #[arg(long)]
        calendar: Option<String>,
        /// Format of the calendar file
        #[arg(long, default_value = "ical")]
        calendar_format: CalendarFormat,
        /// Start of the searched range (RFC 3339)
        #[arg(long)]
        from: DateTime<Utc>,
        /// End of the searched range (RFC 3339)
        #[arg(long)]
        to: DateTime<Utc>,
        /// Current time (RFC 3339); defaults to the system clock
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate a slot configuration
    Validate {
        /// Slot configuration (JSON file)
        #[arg(short, long)]
        config: String,
    },
    /// Print the resolved busy intervals as JSON
    Busy {
        /// Slot configuration (JSON file)
        #[arg(short, long)]
        config: String,
        /// Calendar whose events block time
        #[arg(long)]
        calendar: Option<String>,
        /// Format of the calendar file
        #[arg(long, default_value = "ical")]
        calendar_format: CalendarFormat,
        /// Current time (RFC 3339); defaults to the system clock
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("slot_finder={level},slots={level}", level = log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Search {
            config,
            calendar,
            calendar_format,
            from,
            to,
            now,
            output,
        } => {
            let config = load_config(&config)?;
            let calendar = calendar.as_deref().map(read_file).transpose()?;
            let now = now.unwrap_or_else(Utc::now);
            debug!(%from, %to, %now, "searching slots");

            let mut request = SearchRequest::new(&config, from, to);
            if let Some(data) = calendar.as_deref() {
                request = request.with_calendar(data, calendar_format);
            }

            let slots = find_available_slots(&request, now).context("Slot search failed")?;
            info!(count = slots.len(), "slots found");

            let json = serde_json::to_string_pretty(&slots)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Validate { config } => {
            let parsed = load_config(&config)?;
            validate_configuration(&parsed)
                .with_context(|| format!("Invalid configuration: {}", config))?;
            println!("Configuration is valid");
        }
        Commands::Busy {
            config,
            calendar,
            calendar_format,
            now,
        } => {
            let config = load_config(&config)?;
            let calendar = calendar.as_deref().map(read_file).transpose()?;
            let now = now.unwrap_or_else(Utc::now);

            let busy = collect_busy_intervals(&config, calendar.as_deref(), calendar_format, now)
                .context("Failed to resolve busy intervals")?;
            let json = serde_json::to_string_pretty(&busy)?;
            write_output(None, &json)?;
        }
    }

    Ok(())
}

fn load_config(path: &str) -> Result<SlotConfiguration> {
    let json = read_file(path)?;
    SlotConfiguration::from_json(&json).with_context(|| format!("Failed to parse configuration: {}", path))
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
