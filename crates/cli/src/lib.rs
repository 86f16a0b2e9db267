//! `shelfcast` command-line front end.
//!
//! Loads a session from JSON files, runs one report, prints a JSON payload.

pub mod collab;
pub mod commands;
pub mod config;
pub mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use shelfcast_observability::LogFormat;

use crate::collab::{JsonExportSink, LogNotifier};
use crate::commands::{CommandResult, deliver, input, report};
use crate::config::Settings;

#[derive(Debug, Parser)]
#[command(
    name = "shelfcast",
    about = "Demand forecasts and reorder advice for a small shop",
    long_about = "Load recorded sales and current stock, then forecast demand, summarize stock health, export tables or send low-stock notices.",
    after_help = "Examples:\n  shelfcast --sales sales.json --stock stock.json forecast\n  shelfcast --sales sales.json dashboard --today 2024-03-31\n  shelfcast --sales sales.json chart --product Milk"
)]
pub struct Cli {
    #[arg(long, global = true, help = "JSON array of sales: {date, product, quantity}")]
    sales: Option<PathBuf>,

    #[arg(long, global = true, help = "JSON object mapping product to units on hand")]
    stock: Option<PathBuf>,

    #[arg(long, global = true, help = "Forecast horizon in days (3-60)")]
    horizon: Option<u32>,

    #[arg(long, global = true, help = "Supplier lead time in days (1-14)")]
    lead_time: Option<u32>,

    #[arg(long, global = true, help = "Recent-sales window in days (7-90)")]
    window: Option<u32>,

    #[arg(long, global = true, help = "Always use the moving-average forecast")]
    no_trend: bool,

    #[arg(long, global = true, default_value = "json", help = "Log format: json or pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Forecast demand and reorder advice per product")]
    Forecast {
        #[arg(long, help = "Only this product")]
        product: Option<String>,
    },
    #[command(about = "Totals, recent sales and stock health for every product")]
    Dashboard {
        #[arg(long, help = "End of the recent window (default: today)")]
        today: Option<NaiveDate>,
    },
    #[command(about = "History tail and forecast for one product's sales chart")]
    Chart {
        #[arg(long)]
        product: String,
        #[arg(long, default_value_t = 30, help = "Days of history to include")]
        history_days: usize,
    },
    #[command(about = "Write the SalesRaw and Summary tables to a JSON file")]
    Export {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, help = "End of the recent window (default: today)")]
        today: Option<NaiveDate>,
    },
    #[command(about = "Send low-stock notices for products below their reorder point")]
    Notify,
}

impl Cli {
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Environment settings with command-line overrides applied.
    pub fn settings(&self, base: Settings) -> Settings {
        Settings {
            forecast_horizon_days: self.horizon.unwrap_or(base.forecast_horizon_days),
            lead_time_days: self.lead_time.unwrap_or(base.lead_time_days),
            recent_window_days: self.window.unwrap_or(base.recent_window_days),
            trend_enabled: base.trend_enabled && !self.no_trend,
            costs: base.costs,
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    shelfcast_observability::init_with(cli.log_format());

    let result = execute(&cli, Settings::from_env());
    if result.exit_code != 0 {
        tracing::error!(exit_code = result.exit_code, "command failed");
    }
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Run one parsed command against settings read from the environment.
pub fn execute(cli: &Cli, env_settings: Settings) -> CommandResult {
    let name = cli.command.name();
    let settings = cli.settings(env_settings);
    if let Err(e) = settings.validate() {
        return CommandResult::failure(name, "config_validation", e.to_string(), 2);
    }

    let session = match input::open_session(settings, cli.sales.as_deref(), cli.stock.as_deref()) {
        Ok(session) => session,
        Err(e) => return CommandResult::failure(name, "input", format!("{e:#}"), 2),
    };

    match &cli.command {
        Command::Forecast { product } => report::forecast(&session, product.as_deref()),
        Command::Dashboard { today } => report::dashboard(&session, today.unwrap_or_else(local_today)),
        Command::Chart {
            product,
            history_days,
        } => report::chart(&session, product, *history_days),
        Command::Export { out, today } => deliver::export(
            &session,
            &JsonExportSink::new(out),
            today.unwrap_or_else(local_today),
        ),
        Command::Notify => deliver::notify(&session, &LogNotifier),
    }
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Forecast { .. } => "forecast",
            Command::Dashboard { .. } => "dashboard",
            Command::Chart { .. } => "chart",
            Command::Export { .. } => "export",
            Command::Notify => "notify",
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
