use std::{io, path::PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weather_analyzer::{
    report::{DEFAULT_MONTH, DEFAULT_THRESHOLD},
    OutputFormat, ReportOptions, Source,
};

/// Summarise daily weather observations
#[derive(Debug, Parser)]
#[command(name = "weather-analyzer")]
#[command(version, about = "Summarise daily weather observations from a CSV file")]
#[command(long_about = None)]
struct Cli {
    /// CSV file with a header and `date,temperature,humidity,precipitation` rows.
    /// Uses the bundled sample when omitted.
    input: Option<PathBuf>,

    /// Month (date prefix) to average the temperature over
    #[arg(short, long, default_value = DEFAULT_MONTH)]
    month: String,

    /// Days strictly above this temperature are reported as hot
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    threshold: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also list the temperature category of every day
    #[arg(long)]
    categories: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(cli.verbose)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let source = cli.input.map_or(Source::Bundled, Source::File);
    let options = ReportOptions {
        month: cli.month,
        threshold: cli.threshold,
        include_categories: cli.categories,
    };

    weather_analyzer::run(&source, &options, cli.format, io::stdout().lock())?;
    Ok(())
}
