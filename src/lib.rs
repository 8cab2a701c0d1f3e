//! Aggregate statistics over daily weather observations stored as CSV.
//!
//! ```
//! use weather_analyzer::WeatherDataset;
//!
//! let dataset: WeatherDataset = "date,temperature,humidity,precipitation\n\
//!                                2023-08-01,31.0,48,0.0\n\
//!                                2023-08-02,24.5,72,12.0"
//!     .parse()
//!     .unwrap();
//!
//! assert_eq!(dataset.average_temperature("2023-08"), 27.75);
//! assert_eq!(dataset.hot_days(30.0), ["2023-08-01"]);
//! assert_eq!(dataset.count_rainy_days(), 1);
//! ```

pub mod category;
pub mod dataset;
pub mod report;

pub use category::{categorize, Category};
pub use dataset::{
    average_temperature, count_rainy_days, hot_days, Column, LoadError, ParseError, Source,
    WeatherDataset, WeatherRecord,
};
pub use report::{run, OutputFormat, ReportOptions, RunError, Summary};
