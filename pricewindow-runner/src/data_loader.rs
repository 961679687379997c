//! Bar loading and data resolution for the runner.
//!
//! Given a ticker and a [`BarSource`], returns a validated series trimmed to
//! the requested period. Implements the fallback policy:
//! 1. If the source has bars for the ticker → use them
//! 2. If the source has no such ticker and `synthetic` is set → generate
//!    synthetic bars (tagged)
//! 3. Otherwise → fail with a clear error
//!
//! Only a missing ticker falls back. A file that exists but is malformed is
//! an error, never silently replaced.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Months, NaiveDate};
use csv::ReaderBuilder;
use pricewindow_core::data::trim_to_period;
use pricewindow_core::{Bar, BarSource, Period, Series, SourceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data for '{ticker}' in {source_name} (enable synthetic for synthetic data)")]
    NoData { ticker: String, source_name: String },

    #[error("no bars for '{ticker}' within period {period}")]
    EmptyPeriod { ticker: String, period: Period },

    #[error("failed to load '{ticker}': {source}")]
    Source {
        ticker: String,
        #[source]
        source: SourceError,
    },
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// History to keep, counted back from the newest bar.
    pub period: Period,
    /// If true, generate synthetic bars when the source has no data.
    pub synthetic: bool,
    /// Last date of generated synthetic bars.
    pub synthetic_end: NaiveDate,
}

/// Where a loaded series came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum DataOrigin {
    /// A real source, by its `BarSource::name()`.
    Source(String),
    Synthetic,
}

impl DataOrigin {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataOrigin::Synthetic)
    }
}

/// Result of loading bars, including data provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub ticker: String,
    pub series: Series,
    pub origin: DataOrigin,
    /// Dataset hash for fingerprinting (BLAKE3 over all bar data).
    pub dataset_hash: String,
}

/// Load bars for one ticker, falling back to synthetic data when allowed.
///
/// This is the primary entry point for the runner to get bar data.
pub fn load_series(
    ticker: &str,
    source: &dyn BarSource,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    let (series, origin) = match source.fetch(ticker, opts.period) {
        Ok(series) => (series, DataOrigin::Source(source.name().to_string())),
        Err(SourceError::NotFound { .. }) if opts.synthetic => {
            warn!(
                ticker,
                source = source.name(),
                "generating synthetic data; results will be tagged as synthetic"
            );
            let synthetic = SyntheticSource::new(opts.synthetic_end);
            let series = synthetic
                .fetch(ticker, opts.period)
                .map_err(|source| LoadError::Source {
                    ticker: ticker.to_string(),
                    source,
                })?;
            (series, DataOrigin::Synthetic)
        }
        Err(SourceError::NotFound { .. }) => {
            return Err(LoadError::NoData {
                ticker: ticker.to_string(),
                source_name: source.name().to_string(),
            })
        }
        Err(source) => {
            return Err(LoadError::Source {
                ticker: ticker.to_string(),
                source,
            })
        }
    };

    if series.is_empty() {
        return Err(LoadError::EmptyPeriod {
            ticker: ticker.to_string(),
            period: opts.period,
        });
    }

    let dataset_hash = compute_dataset_hash(ticker, &series);
    debug!(
        ticker,
        bars = series.len(),
        synthetic = origin.is_synthetic(),
        %dataset_hash,
        "loaded series"
    );

    Ok(LoadedSeries {
        ticker: ticker.to_string(),
        series,
        origin,
        dataset_hash,
    })
}

/// Compute a deterministic BLAKE3 hash over a ticker's bar data.
///
/// The hash covers the ticker, dates and all OHLCV values in series order.
pub fn compute_dataset_hash(ticker: &str, series: &Series) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ticker.as_bytes());
    for bar in series.bars() {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

// ─── CSV source ─────────────────────────────────────────────────────

/// Raw CSV row. Empty cells deserialize to `None` and drop the row.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: Option<f64>,
    #[serde(alias = "Volume")]
    volume: Option<f64>,
}

impl CsvRow {
    fn into_bar(self) -> Option<Bar> {
        Some(Bar {
            date: parse_date(&self.date)?,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume?,
        })
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`2024-01-02 00:00:00-05:00`).
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// Daily bars from `<data_dir>/<TICKER>.csv`.
///
/// Header: `date,open,high,low,close,volume` (capitalized names accepted).
/// Rows with missing or unparseable cells are skipped, rows are sorted by
/// date, and for duplicate dates the last row wins.
#[derive(Debug, Clone)]
pub struct CsvBarSource {
    data_dir: PathBuf,
}

impl CsvBarSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", ticker.to_ascii_uppercase()))
    }

    /// Read every usable row of a CSV file, sorted and de-duplicated.
    pub fn read_bars(path: &Path) -> Result<Vec<Bar>, SourceError> {
        info!(path = %path.display(), "loading bars from CSV");

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_error)?;

        let mut bars = Vec::new();
        let mut skipped = 0usize;
        for (row_num, result) in reader.deserialize::<CsvRow>().enumerate() {
            match result.map(CsvRow::into_bar) {
                Ok(Some(bar)) => bars.push(bar),
                Ok(None) => {
                    debug!(row = row_num + 1, "skipping row with missing values");
                    skipped += 1;
                }
                Err(e) => {
                    debug!(row = row_num + 1, error = %e, "skipping unparseable row");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!(path = %path.display(), skipped, "skipped invalid CSV rows");
        }

        // Stable sort, then keep the last row of each date.
        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.reverse();
        bars.dedup_by_key(|b| b.date);
        bars.reverse();
        if bars.len() < before {
            warn!(
                path = %path.display(),
                duplicates = before - bars.len(),
                "removed duplicate dates"
            );
        }

        Ok(bars)
    }
}

fn csv_error(e: csv::Error) -> SourceError {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => SourceError::Io(io),
            other => SourceError::Parse(format!("{other:?}")),
        }
    } else {
        SourceError::Parse(e.to_string())
    }
}

impl BarSource for CsvBarSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, ticker: &str, period: Period) -> Result<Series, SourceError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(SourceError::NotFound {
                ticker: ticker.to_string(),
            });
        }

        let bars = Self::read_bars(&path)?;
        let series = Series::new(bars).map_err(|source| SourceError::Malformed {
            ticker: ticker.to_string(),
            source,
        })?;
        let series = trim_to_period(series, period);
        info!(ticker, bars = series.len(), %period, "loaded CSV bars");
        Ok(series)
    }
}

// ─── Synthetic source ───────────────────────────────────────────────

/// Synthetic history for [`Period::Max`].
const SYNTHETIC_MAX_MONTHS: u32 = 240;
const SYNTHETIC_START_PRICE: f64 = 100.0;
/// Mean daily change of the synthetic walk.
const SYNTHETIC_DRIFT: f64 = 0.0003;
const SYNTHETIC_BASE_VOLUME: f64 = 1_500_000.0;

/// Deterministic synthetic bars for testing/development.
///
/// Produces a random walk from a starting price of 100.0, seeded by the
/// ticker, on weekdays only. The same ticker and end date always give the
/// same bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticSource {
    end: NaiveDate,
}

impl SyntheticSource {
    pub fn new(end: NaiveDate) -> Self {
        Self { end }
    }

    fn start_for(&self, period: Period) -> NaiveDate {
        period
            .start_from(self.end)
            .or_else(|| self.end.checked_sub_months(Months::new(SYNTHETIC_MAX_MONTHS)))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl BarSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, ticker: &str, period: Period) -> Result<Series, SourceError> {
        let bars = generate_synthetic_bars(ticker, self.start_for(period), self.end);
        Series::new(bars).map_err(|source| SourceError::Malformed {
            ticker: ticker.to_string(),
            source,
        })
    }
}

fn generate_synthetic_bars(ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::from_seed(*blake3::hash(ticker.as_bytes()).as_bytes());
    let mut prev_close = SYNTHETIC_START_PRICE;

    weekdays(start, end)
        .map(|date| {
            let open = prev_close * (1.0 + rng.gen_range(-0.004..0.004));
            let change = SYNTHETIC_DRIFT + rng.gen_range(-0.025..0.025);
            let close = open * (1.0 + change);
            let (body_low, body_high) = (open.min(close), open.max(close));
            let high = body_high * (1.0 + rng.gen_range(0.0..0.008));
            let low = body_low * (1.0 - rng.gen_range(0.0..0.008));
            // Busier sessions on larger moves.
            let volume = (SYNTHETIC_BASE_VOLUME
                * (1.0 + 30.0 * change.abs())
                * rng.gen_range(0.75..1.25))
            .round();

            prev_close = close;
            Bar {
                date,
                open,
                high,
                low,
                close,
                volume,
            }
        })
        .collect()
}

/// Monday-to-Friday dates in `[start, end]`.
fn weekdays(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |d| *d <= end)
        .filter(|d| d.weekday().number_from_monday() <= 5)
}
