//! PriceWindow Runner: run configuration, bar loading, multi-ticker
//! preparation, and price-unit reporting.
//!
//! This crate builds on `pricewindow-core` to provide:
//! - TOML run configuration with content-addressed run IDs
//! - Bar loading from CSV files with a deterministic synthetic fallback
//! - Parallel, per-ticker independent preparation of a ticker universe
//! - Price-unit scoring of model predictions and JSON/CSV/Markdown artifacts

pub mod config;
pub mod data_loader;
pub mod report;
pub mod runner;

pub use config::{ConfigError, RunConfig, RunId};
pub use data_loader::{
    compute_dataset_hash, load_series, CsvBarSource, DataOrigin, LoadError, LoadOptions,
    LoadedSeries, SyntheticSource,
};
pub use report::{
    export_json, export_predictions_csv, import_json, load_report, price_report,
    render_markdown, save_report, PredictionRow, PriceReport,
};
pub use runner::{prepare_ticker, prepare_universe, PreparedTicker, RunError, TickerOutcome};
