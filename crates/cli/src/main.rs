// EventDeck CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Every invocation loads a fresh in-memory deck; nothing persists.

mod commands;
mod output;

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use eventdeck_core::input::{DEFAULT_CAPACITY, DEFAULT_CATEGORY};
use eventdeck_core::seed::SEED_HOST_JOHN;
use eventdeck_core::telemetry::{init_tracing, TelemetryConfig};
use eventdeck_core::CreateEventInput;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "eventdeck")]
#[command(about = "EventDeck CLI - Browse events, host them, and RSVP")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    /// YAML file with deck configuration (defaults to EVENTDECK_* variables)
    #[arg(long, env = "EVENTDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the simulated load latency
    #[arg(long)]
    pub no_delay: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse public events
    Browse {
        /// Search title, description and location
        #[arg(long, short, default_value = "")]
        search: String,

        /// Category filter
        #[arg(long, short, default_value = "all")]
        category: String,

        /// Location filter (city or venue substring)
        #[arg(long, short, default_value = "all")]
        location: String,

        /// Sort order
        #[arg(long, default_value = "date", value_parser = ["date", "popularity", "capacity"])]
        sort: String,
    },

    /// Show a host's dashboard
    Dashboard {
        /// Host user ID
        #[arg(long, default_value_t = SEED_HOST_JOHN)]
        host: Uuid,

        /// Reference date for upcoming/active counts (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show event details
    Show {
        /// Event ID
        event_id: Uuid,
    },

    /// List event categories
    Categories,

    /// List location filter options
    Locations,

    /// Create an event
    Create {
        /// Host user ID
        #[arg(long, default_value_t = SEED_HOST_JOHN)]
        host: Uuid,

        /// Event title
        #[arg(long)]
        title: String,

        /// Event description
        #[arg(long)]
        description: String,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Start time (HH:MM:SS)
        #[arg(long)]
        time: NaiveTime,

        /// End time (HH:MM:SS)
        #[arg(long)]
        end_time: Option<NaiveTime>,

        /// Venue or "Online"
        #[arg(long)]
        location: String,

        /// Category
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,

        /// Maximum confirmed attendees
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: u32,

        /// Cover image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Tags (repeatable)
        #[arg(long, short)]
        tag: Vec<String>,

        /// Hide from public browsing
        #[arg(long)]
        private: bool,
    },

    /// RSVP to an event
    Rsvp {
        /// Event ID
        event_id: Uuid,

        /// User ID (a fresh one if omitted)
        #[arg(long, short)]
        user: Option<Uuid>,
    },

    /// Run a scripted capacity and waitlist scenario
    Demo {
        /// Seats on the demo event
        #[arg(long, default_value_t = 2)]
        capacity: u32,

        /// Number of attendees trying to RSVP
        #[arg(long, default_value_t = 4)]
        attendees: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::from_env();
    let telemetry = match (cli.quiet, telemetry.log_filter.is_some()) {
        (true, _) => telemetry.with_log_filter("error"),
        (false, false) => telemetry.with_log_filter("warn"),
        (false, true) => telemetry,
    };
    init_tracing(telemetry);

    let output_format = output::OutputFormat::from_str(&cli.output);
    let config = commands::deck_config(cli.config.as_deref(), cli.no_delay)?;

    match cli.command {
        Commands::Browse {
            search,
            category,
            location,
            sort,
        } => {
            let deck = commands::load_deck(config).await?;
            commands::browse::run(&deck, output_format, search, category, location, &sort)
        }
        Commands::Dashboard { host, today } => {
            let deck = commands::load_deck(config).await?;
            commands::dashboard::run(&deck, output_format, host, today)
        }
        Commands::Show { event_id } => {
            let deck = commands::load_deck(config).await?;
            commands::browse::show(&deck, output_format, event_id)
        }
        Commands::Categories => commands::browse::categories(output_format),
        Commands::Locations => {
            let deck = commands::load_deck(config).await?;
            commands::browse::locations(&deck, output_format)
        }
        Commands::Create {
            host,
            title,
            description,
            date,
            time,
            end_time,
            location,
            category,
            capacity,
            image_url,
            tag,
            private,
        } => {
            let mut input =
                CreateEventInput::new(host, title, description, date, time, location)
                    .with_category(category)
                    .with_capacity(capacity)
                    .with_visibility(!private)
                    .with_tags(tag);
            if let Some(end_time) = end_time {
                input = input.with_end_time(end_time);
            }
            if let Some(image_url) = image_url {
                input = input.with_image_url(image_url);
            }
            let deck = commands::load_deck(config).await?;
            commands::manage::create(&deck, output_format, cli.quiet, input).await
        }
        Commands::Rsvp { event_id, user } => {
            let user = user.unwrap_or_else(Uuid::now_v7);
            let deck = commands::load_deck(config).await?;
            commands::manage::rsvp(&deck, output_format, cli.quiet, event_id, user).await
        }
        Commands::Demo {
            capacity,
            attendees,
        } => commands::demo::run(config, output_format, capacity, attendees).await,
    }
}
