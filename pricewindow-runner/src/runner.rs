//! Preparation runner: wires together bar loading and the core pipeline.
//!
//! Two entry points:
//! - `prepare_ticker()`: load one ticker and prepare it.
//! - `prepare_universe()`: every configured ticker on the rayon pool.
//!
//! Tickers are independent. Each gets its own scaler fitted on its own
//! training prefix, and a failure in one never aborts the others.

use pricewindow_core::{prepare_data, BarSource, PipelineConfig, PipelineError, PreparedData};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::data_loader::{load_series, DataOrigin, LoadError, LoadOptions};

/// Errors from preparing a single ticker.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// A successfully prepared ticker.
#[derive(Debug, Clone)]
pub struct PreparedTicker {
    pub ticker: String,
    pub origin: DataOrigin,
    pub dataset_hash: String,
    /// Bars loaded after period trimming.
    pub bar_count: usize,
    pub data: PreparedData,
}

/// The outcome of one ticker in a universe run.
#[derive(Debug)]
pub struct TickerOutcome {
    pub ticker: String,
    pub result: Result<PreparedTicker, RunError>,
}

impl TickerOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Load one ticker and run the pipeline on it.
pub fn prepare_ticker(
    ticker: &str,
    source: &dyn BarSource,
    opts: &LoadOptions,
    pipeline: &PipelineConfig,
) -> Result<PreparedTicker, RunError> {
    let loaded = load_series(ticker, source, opts)?;
    let data = prepare_data(&loaded.series, pipeline)?;
    Ok(PreparedTicker {
        ticker: loaded.ticker,
        origin: loaded.origin,
        dataset_hash: loaded.dataset_hash,
        bar_count: loaded.series.len(),
        data,
    })
}

/// Prepare every configured ticker in parallel.
///
/// Outcomes are returned in the configured ticker order.
pub fn prepare_universe(config: &RunConfig, source: &dyn BarSource) -> Vec<TickerOutcome> {
    let opts = config.load_options();

    let outcomes: Vec<TickerOutcome> = config
        .tickers
        .par_iter()
        .map(|ticker| {
            let result = prepare_ticker(ticker, source, &opts, &config.pipeline);
            match &result {
                Ok(p) => info!(
                    ticker = %ticker,
                    bars = p.bar_count,
                    train = p.data.y_train.len(),
                    val = p.data.y_val.len(),
                    test = p.data.y_test.len(),
                    "prepared ticker"
                ),
                Err(e) => warn!(ticker = %ticker, error = %e, "ticker failed"),
            }
            TickerOutcome {
                ticker: ticker.clone(),
                result,
            }
        })
        .collect();

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    info!(
        succeeded,
        failed = outcomes.len() - succeeded,
        total = outcomes.len(),
        "universe prepared"
    );
    outcomes
}
