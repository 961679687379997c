//! Pipeline error taxonomy.
//!
//! Every stage raises synchronously at the point of detection. There are no
//! retries and no partial results: a failed stage aborts the whole
//! `prepare_data` invocation.

use thiserror::Error;

/// Errors raised by the preparation pipeline and the evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Invalid lookback/ratio combination, degenerate scaler fit, or
    /// mismatched sequence lengths handed to the evaluator.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Fewer rows than the longest indicator warm-up plus the lookback.
    #[error("insufficient data: {required} bars required, {available} available")]
    InsufficientData { required: usize, available: usize },

    /// Enough bars, but too few feature rows survive undefined-cell drops
    /// to form a single window.
    #[error("insufficient data: {required} usable feature rows required, {available} available")]
    InsufficientRows { required: usize, available: usize },

    /// The raw bar series violates its precondition (order, nulls, signs).
    #[error("malformed series at bar {index}: {reason}")]
    MalformedSeries { index: usize, reason: String },
}

impl PipelineError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
