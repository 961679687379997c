//! Bar source trait, lookback period, and structured error types.
//!
//! The BarSource trait abstracts over where daily bars come from (CSV files,
//! synthetic generators, in-memory fixtures) so the pipeline never knows.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Series;
use crate::error::PipelineError;

/// How much history to request, counted back from the newest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[default]
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::Max => "max",
        }
    }

    /// Calendar months covered, or `None` for the full history.
    pub fn months(&self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::TwoYears => Some(24),
            Period::FiveYears => Some(60),
            Period::TenYears => Some(120),
            Period::Max => None,
        }
    }

    /// First date inside the period ending at `last_date`.
    ///
    /// `None` means no lower bound.
    pub fn start_from(&self, last_date: NaiveDate) -> Option<NaiveDate> {
        self.months()
            .and_then(|m| last_date.checked_sub_months(Months::new(m)))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SourceError::Parse(format!("unknown period '{s}'")))
    }
}

/// Structured error types for bar sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no data for ticker '{ticker}'")]
    NotFound { ticker: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("malformed series for '{ticker}': {source}")]
    Malformed {
        ticker: String,
        #[source]
        source: PipelineError,
    },
}

/// Trait for raw bar sources.
///
/// Implementations return a validated [`Series`] trimmed to `period`. Sources
/// never compute indicators or touch the pipeline.
pub trait BarSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch daily bars for `ticker` covering `period`.
    fn fetch(&self, ticker: &str, period: Period) -> Result<Series, SourceError>;
}

/// Keep only the bars inside `period`, counted back from the newest bar.
pub fn trim_to_period(series: Series, period: Period) -> Series {
    match series.last_date().and_then(|last| period.start_from(last)) {
        Some(start) => series.tail_since(start),
        None => series,
    }
}
