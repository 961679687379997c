//! PriceWindow Core: leakage-free preparation of daily price series for
//! sequence forecasting.
//!
//! This crate contains the pure, synchronous pipeline:
//! - Domain types (bars, validated series)
//! - Indicator engine (SMA, EMA, RSI, MACD, Bollinger, returns)
//! - Fixed ten-column feature matrix
//! - Chronological split, prefix-fitted min-max scaler, sliding windows
//! - `prepare_data` orchestration and the error metrics / naive baseline
//! - The raw bar source contract (`BarSource`, `Period`)

pub mod data;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod frame;
pub mod indicators;
pub mod pipeline;
pub mod scaler;
pub mod split;
pub mod window;

pub use data::{BarSource, Period, SourceError};
pub use domain::{Bar, Series};
pub use error::PipelineError;
pub use evaluate::{evaluate, naive_baseline, Evaluation};
pub use features::{Feature, FeatureMatrix, FeatureRow, FEATURE_COUNT};
pub use frame::{compute_indicators, Column, IndicatorFrame, FEATURE_WARMUP};
pub use pipeline::{prepare_data, PipelineConfig, PreparedData, TargetDates};
pub use scaler::{Bounds, Scaler};
pub use split::SplitBoundaries;
pub use window::Windows;
