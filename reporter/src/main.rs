//! Weekboard Reporter - weekly board activity report generator.
//!
//! This binary pulls board activity from a Trello-compatible API and writes
//! two CSV reports covering the selected day window.
//!
//! # Commands
//!
//! - `weekboard-reporter report`: Generate the weekly reports
//! - `weekboard-reporter boards`: List boards visible to the credentials
//!
//! # Environment Variables
//!
//! See the [`config`](weekboard_reporter::config) module for available
//! configuration options.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use weekboard_reporter::actions::ReportWindow;
use weekboard_reporter::client::BoardClient;
use weekboard_reporter::config::Config;
use weekboard_reporter::pipeline::{self, RunOptions};
use weekboard_reporter::progress::ChecklistScope;
use weekboard_reporter::summary::{flat_report, summary_report};
use weekboard_reporter::writer::write_report;

/// Default day offset for the report window.
const DEFAULT_DAY_OFFSET: u32 = 7;

/// Weekboard Reporter - weekly board activity report generator.
///
/// Fetches cards, checklists, and activity events from the configured
/// boards and writes a flat per-event listing plus a per-item summary.
#[derive(Parser, Debug)]
#[command(name = "weekboard-reporter")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    WEEKBOARD_API_KEY          API key (required)
    WEEKBOARD_API_TOKEN        API token (required)
    WEEKBOARD_BASE_URL         API base URL (default: https://api.trello.com/1)
    WEEKBOARD_BOARDS           Comma-separated board allow-list (required)
    WEEKBOARD_EXCLUDE_LABELS   Labels excluding a card (default: canceled,pending,done)

EXAMPLES:
    # List boards visible to the credentials
    weekboard-reporter boards

    # Generate this week's reports
    export WEEKBOARD_BOARDS=\"newmedia.projects,newmedia.r&d\"
    weekboard-reporter report

    # Cover the last 14 days, comments included
    weekboard-reporter report --days 14 --include-comments
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the weekly reports.
    ///
    /// Requires WEEKBOARD_API_KEY, WEEKBOARD_API_TOKEN, and
    /// WEEKBOARD_BOARDS environment variables.
    Report(ReportArgs),

    /// List all boards visible to the credentials.
    ///
    /// Useful for populating WEEKBOARD_BOARDS.
    Boards,
}

/// Arguments for the report command.
#[derive(clap::Args, Debug)]
struct ReportArgs {
    /// Day offset: events newer than this many days ago are reported.
    #[arg(long, default_value_t = DEFAULT_DAY_OFFSET)]
    days: u32,

    /// Include card comments in the report.
    #[arg(long)]
    include_comments: bool,

    /// Checklist-selection policy for progress computation.
    #[arg(long, value_enum, default_value = "union")]
    scope: ScopeArg,

    /// Path of the flat report.
    #[arg(long, default_value = "output.csv")]
    output: PathBuf,

    /// Path of the rolled-up summary report.
    #[arg(long, default_value = "output-summary.csv")]
    summary_output: PathBuf,
}

/// Checklist-selection policy, as exposed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    /// Count Main- and Todo-checklist items together.
    Union,

    /// Count Main-checklist items; use Todo checklists only when no Main
    /// checklist exists.
    MainFirst,
}

impl From<ScopeArg> for ChecklistScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Union => ChecklistScope::Union,
            ScopeArg::MainFirst => ChecklistScope::MainFirst,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    match cli.command {
        Command::Report(args) => runtime.block_on(run_report(args)),
        Command::Boards => runtime.block_on(run_boards()),
    }
}

/// Runs the report command: collect, aggregate, write.
async fn run_report(args: ReportArgs) -> Result<()> {
    info!("Starting weekboard reporter");

    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        base_url = %config.base_url,
        boards = ?config.boards,
        exclude_labels = ?config.exclude_labels,
        days = args.days,
        "Configuration loaded"
    );

    let client = BoardClient::new(&config.base_url, &config.api_key, &config.api_token)
        .context("Failed to create API client")?;

    let today = Utc::now().date_naive();
    let opts = RunOptions {
        window: ReportWindow::ending_today(today, args.days),
        include_comments: args.include_comments,
        scope: args.scope.into(),
        today,
    };

    let data = pipeline::collect(&client, &config, &opts)
        .await
        .context("Failed to fetch board data")?;

    let flat = flat_report(&data.actions, &data.todos);
    info!(path = %args.output.display(), rows = flat.len(), "Writing flat report");
    write_report(&args.output, &flat).context("Failed to write flat report")?;

    let summary = summary_report(&data.actions, &data.todos);
    let summary_rows: Vec<_> = summary
        .iter()
        .flat_map(|container| container.rows.iter())
        .collect();
    info!(
        path = %args.summary_output.display(),
        rows = summary_rows.len(),
        "Writing summary report"
    );
    write_report(&args.summary_output, summary_rows.iter().copied())
        .context("Failed to write summary report")?;

    info!("Finished");
    Ok(())
}

/// Runs the boards command: print every board the credentials can see.
async fn run_boards() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let client = BoardClient::new(&config.base_url, &config.api_key, &config.api_token)
        .context("Failed to create API client")?;

    let boards = client
        .member_boards()
        .await
        .context("Failed to list boards")?;

    for board in boards {
        let marker = if config.board_selected(&board.name) {
            " (selected)"
        } else {
            ""
        };
        println!("{}  {}{}", board.id, board.name, marker);
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}
