use std::{
    fmt,
    io::{self, Write},
};

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use time::{Date, Month};
use tracing::info;

use crate::{
    category::{categorize, Category},
    dataset::{LoadError, Source, WeatherDataset},
};

pub const DEFAULT_MONTH: &str = "2023-08";
pub const DEFAULT_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Date prefix averaged over, normally `YYYY-MM`.
    pub month: String,
    pub threshold: f64,
    pub include_categories: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            month: String::from(DEFAULT_MONTH),
            threshold: DEFAULT_THRESHOLD,
            include_categories: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCategory {
    pub date: String,
    pub temperature: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub month: String,
    pub month_label: String,
    /// `NaN` when no observation falls in `month`, which serializes as `null`.
    pub average_temperature: f64,
    pub threshold: f64,
    pub hot_days: Vec<String>,
    pub rainy_days: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<DailyCategory>,
}

impl Summary {
    pub fn compute(dataset: &WeatherDataset, options: &ReportOptions) -> Self {
        let categories = if options.include_categories {
            dataset
                .iter()
                .map(|record| DailyCategory {
                    date: record.date.clone(),
                    temperature: record.temperature,
                    category: categorize(record.temperature),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            month: options.month.clone(),
            month_label: month_label(&options.month).unwrap_or_else(|| options.month.clone()),
            average_temperature: dataset.average_temperature(&options.month),
            threshold: options.threshold,
            hot_days: dataset
                .hot_days(options.threshold)
                .into_iter()
                .map(String::from)
                .collect(),
            rainy_days: dataset.count_rainy_days(),
            categories,
        }
    }

    pub fn write<W: Write>(&self, format: OutputFormat, mut out: W) -> io::Result<()> {
        match format {
            OutputFormat::Text => write!(out, "{self}"),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, self)?;
                writeln!(out)
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weather Data Analysis")?;
        writeln!(f, "---------------------")?;
        writeln!(f)?;
        writeln!(
            f,
            "Average Temperature ({}): {:.1}",
            self.month_label, self.average_temperature
        )?;
        writeln!(
            f,
            "Hot Days (>{:.1}°C): [{}]",
            self.threshold,
            self.hot_days.join(", ")
        )?;
        writeln!(f, "Rainy Days: {}", self.rainy_days)?;

        if !self.categories.is_empty() {
            writeln!(f)?;
            writeln!(f, "{:<12} {:>11}  Category", "Date", "Temperature")?;
            for day in &self.categories {
                writeln!(
                    f,
                    "{:<12} {:>11.1}  {}",
                    day.date, day.temperature, day.category
                )?;
            }
        }

        Ok(())
    }
}

/// Turns `2023-08` into `August 2023`. Anything that isn't a real month gives `None`.
pub fn month_label(prefix: &str) -> Option<String> {
    let (year, month) = prefix.split_once('-')?;
    if month.len() != 2 {
        return None;
    }
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let date = Date::from_calendar_date(year.parse().ok()?, month, 1).ok()?;
    Some(format!("{} {}", date.month(), date.year()))
}

#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write the report")]
    #[diagnostic(code(weather::output))]
    Output(#[from] io::Error),
}

/// Loads `source`, computes the summary and writes it to `out`.
///
/// Nothing is written when loading fails.
pub fn run<W: Write>(
    source: &Source,
    options: &ReportOptions,
    format: OutputFormat,
    out: W,
) -> Result<Summary, RunError> {
    let dataset = source.load()?;
    info!(
        source = %source,
        records = dataset.len(),
        month = %options.month,
        "analysing weather data"
    );

    let summary = Summary::compute(&dataset, options);
    summary.write(format, out)?;
    Ok(summary)
}
