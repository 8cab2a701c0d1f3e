use std::{
    fmt, fs,
    io::{self, Read},
    ops::Range,
    path::{Path, PathBuf},
    str::FromStr,
};

use logos::Logos;
use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use thiserror::Error;
use time::{Date, Month};
use tracing::{debug, warn};

const BUNDLED_CSV: &str = include_str!("../data/weatherdata.csv");

const COLUMNS: usize = 4;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r]+")] // Ignore this regex pattern between tokens
enum Token {
    #[token(",")]
    Comma,
    #[regex(r"[^, \t\r]+")]
    Field,
}

/// One daily observation. Never modified once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub date: String,
    pub temperature: f64,
    pub humidity: i32,
    pub precipitation: f64,
}

impl WeatherRecord {
    pub fn new(
        date: impl Into<String>,
        temperature: f64,
        humidity: i32,
        precipitation: f64,
    ) -> Self {
        Self {
            date: date.into(),
            temperature,
            humidity,
            precipitation,
        }
    }

    /// Reads `date` as a `YYYY-MM-DD` calendar date, if it is one.
    ///
    /// Queries never rely on this: they only match on the raw text.
    pub fn calendar_date(&self) -> Option<Date> {
        let mut parts = self.date.splitn(3, '-');
        let year = parts.next()?.parse().ok()?;
        let month = Month::try_from(parts.next()?.parse::<u8>().ok()?).ok()?;
        let day = parts.next()?.parse().ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }

    fn parse(line_number: usize, line: &str) -> Result<Self, ParseError> {
        let cells = split_row(line);
        let [date, temperature, humidity, precipitation] =
            <[Range<usize>; COLUMNS]>::try_from(cells).map_err(|cells| ParseError::FieldCount {
                line: line_number,
                found: cells.len(),
                row: line.to_owned(),
                span: (0..line.len()).into(),
            })?;

        Ok(Self {
            date: line[date].to_owned(),
            temperature: parse_field(line_number, line, Column::Temperature, temperature)?,
            humidity: parse_field(line_number, line, Column::Humidity, humidity)?,
            precipitation: parse_field(line_number, line, Column::Precipitation, precipitation)?,
        })
    }
}

/// Splits a row on commas and returns the byte range of every field.
///
/// The first field is everything before the first comma, blanks included.
/// The others are trimmed.
fn split_row(line: &str) -> Vec<Range<usize>> {
    let mut lexer = Token::lexer(line);
    let mut cells = Vec::with_capacity(COLUMNS);
    let mut current: Option<Range<usize>> = None;

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(Token::Comma) if cells.is_empty() => {
                current = None;
                cells.push(0..span.start);
            }
            Ok(Token::Comma) => cells.push(current.take().unwrap_or(span.start..span.start)),
            // Blanks inside a field split it into several tokens, glue them back.
            // `Field` and the skip rule match any character, so `Err` never shows up.
            Ok(Token::Field) | Err(()) => {
                current = Some(match current {
                    Some(previous) => previous.start..span.end,
                    None => span,
                })
            }
        }
    }

    if cells.is_empty() {
        cells.push(0..line.len());
    } else {
        cells.push(current.unwrap_or(line.len()..line.len()));
    }

    cells
}

fn parse_field<T>(
    line_number: usize,
    line: &str,
    column: Column,
    cell: Range<usize>,
) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = &line[cell.clone()];
    value.parse().map_err(|e: T::Err| ParseError::InvalidNumber {
        line: line_number,
        column,
        value: value.to_owned(),
        expected: column.expected(),
        row: line.to_owned(),
        span: cell.into(),
        source: Box::new(e),
    })
}

/// Numeric columns of a row. The date is taken as text and can't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Temperature,
    Humidity,
    Precipitation,
}

impl Column {
    fn expected(self) -> &'static str {
        match self {
            Self::Temperature | Self::Precipitation => "a decimal number",
            Self::Humidity => "an integer",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Precipitation => "precipitation",
        })
    }
}

/// A data row that can't be turned into a [`WeatherRecord`].
///
/// Line numbers are 1-based and count the header.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("line {line}: expected 4 comma-separated fields, found {found}")]
    #[diagnostic(
        code(weather::parse::field_count),
        help("rows look like `date,temperature,humidity,precipitation`")
    )]
    FieldCount {
        line: usize,
        found: usize,
        #[source_code]
        row: String,
        #[label("in this row")]
        span: SourceSpan,
    },
    #[error("line {line}: invalid {column} `{value}`")]
    #[diagnostic(code(weather::parse::invalid_number))]
    InvalidNumber {
        line: usize,
        column: Column,
        value: String,
        expected: &'static str,
        #[source_code]
        row: String,
        #[label("expected {expected}")]
        span: SourceSpan,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("cannot read weather data from `{name}`")]
    #[diagnostic(
        code(weather::data_source),
        help("the source must exist and contain UTF-8 text")
    )]
    DataSource {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// Observations in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherDataset {
    records: Vec<WeatherRecord>,
}

impl FromStr for WeatherDataset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The first line is a header and its content is never checked.
        let records = s
            .lines()
            .enumerate()
            .skip(1)
            .map(|(index, line)| WeatherRecord::parse(index + 1, line))
            .collect::<Result<Vec<_>, _>>()?;

        warn_if_unordered(&records);

        Ok(Self { records })
    }
}

fn warn_if_unordered(records: &[WeatherRecord]) {
    for (index, pair) in records.windows(2).enumerate() {
        let dates = (pair[0].calendar_date(), pair[1].calendar_date());
        if let (Some(previous), Some(current)) = dates {
            if current < previous {
                warn!(
                    line = index + 3,
                    date = %pair[1].date,
                    previous = %pair[0].date,
                    "observations are not ordered by date"
                );
            }
        }
    }
}

impl From<Vec<WeatherRecord>> for WeatherDataset {
    fn from(records: Vec<WeatherRecord>) -> Self {
        Self { records }
    }
}

impl WeatherDataset {
    /// Reads and parses a CSV file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| LoadError::DataSource {
            name: path.display().to_string(),
            source,
        })?;
        Self::from_reader(path.display().to_string(), file)
    }

    /// Reads the whole of `reader` before parsing it. `name` only shows up in errors and logs.
    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> Result<Self, LoadError> {
        let name = name.into();
        let mut text = String::new();
        if let Err(source) = reader.read_to_string(&mut text) {
            return Err(LoadError::DataSource { name, source });
        }

        let dataset: Self = text.parse()?;
        debug!(source = %name, records = dataset.len(), "loaded weather dataset");
        Ok(dataset)
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherRecord> {
        self.records.iter()
    }

    pub fn average_temperature(&self, month: &str) -> f64 {
        average_temperature(&self.records, month)
    }

    pub fn hot_days(&self, threshold: f64) -> Vec<&str> {
        hot_days(&self.records, threshold)
    }

    pub fn count_rainy_days(&self) -> usize {
        count_rainy_days(&self.records)
    }
}

/// Mean temperature of the records whose date starts with `month`.
///
/// Returns `NaN` when nothing matches.
pub fn average_temperature(records: &[WeatherRecord], month: &str) -> f64 {
    let (sum, count) = records
        .iter()
        .filter(|record| record.date.starts_with(month))
        .fold((0.0, 0_usize), |(sum, count), record| {
            (sum + record.temperature, count + 1)
        });

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Dates of the records strictly above `threshold`, in file order.
pub fn hot_days(records: &[WeatherRecord], threshold: f64) -> Vec<&str> {
    records
        .iter()
        .filter(|record| record.temperature > threshold)
        .map(|record| record.date.as_str())
        .collect()
}

pub fn count_rainy_days(records: &[WeatherRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.precipitation > 0.0)
        .count()
}

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    /// The sample CSV compiled into the crate.
    Bundled,
}

impl Source {
    pub fn load(&self) -> Result<WeatherDataset, LoadError> {
        match self {
            Self::File(path) => WeatherDataset::load(path),
            Self::Bundled => WeatherDataset::from_reader(self.to_string(), BUNDLED_CSV.as_bytes()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Bundled => f.write_str("<bundled weatherdata.csv>"),
        }
    }
}
