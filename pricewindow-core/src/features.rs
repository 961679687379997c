//! Feature matrix: the indicator frame reduced to ten fixed columns.
//!
//! Column order is part of the contract. Position 0 is always the close
//! price because the training target is "column 0 at a future row".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::frame::{Column, IndicatorFrame, FEATURE_WARMUP};

/// Number of model input features.
pub const FEATURE_COUNT: usize = 10;

/// One fully-defined feature row.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// The model input features, in matrix column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Close,
    Volume,
    Sma10,
    Sma30,
    Rsi14,
    Macd,
    MacdSignal,
    BbUpper,
    BbLower,
    Returns,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Close,
        Feature::Volume,
        Feature::Sma10,
        Feature::Sma30,
        Feature::Rsi14,
        Feature::Macd,
        Feature::MacdSignal,
        Feature::BbUpper,
        Feature::BbLower,
        Feature::Returns,
    ];

    /// The prediction target.
    pub const TARGET: Feature = Feature::Close;

    /// Column position in a [`FeatureRow`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The frame column this feature is read from.
    pub fn column(self) -> Column {
        match self {
            Feature::Close => Column::Close,
            Feature::Volume => Column::Volume,
            Feature::Sma10 => Column::Sma10,
            Feature::Sma30 => Column::Sma30,
            Feature::Rsi14 => Column::Rsi14,
            Feature::Macd => Column::Macd,
            Feature::MacdSignal => Column::MacdSignal,
            Feature::BbUpper => Column::BbUpper,
            Feature::BbLower => Column::BbLower,
            Feature::Returns => Column::Returns,
        }
    }

    pub fn name(self) -> &'static str {
        self.column().name()
    }
}

/// Fixed-width feature rows with their bar dates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    dates: Vec<NaiveDate>,
    rows: Vec<FeatureRow>,
}

impl FeatureMatrix {
    /// Select the ten features from a frame.
    ///
    /// The first [`FEATURE_WARMUP`] rows are discarded, then any later row
    /// holding an undefined cell is dropped. For a clean series of B bars the
    /// result has exactly `B - FEATURE_WARMUP` rows.
    pub fn from_frame(frame: &IndicatorFrame) -> Self {
        let mut dates = Vec::with_capacity(frame.len().saturating_sub(FEATURE_WARMUP));
        let mut rows = Vec::with_capacity(dates.capacity());
        let mut dropped = Vec::new();

        for row in FEATURE_WARMUP..frame.len() {
            match feature_row(frame, row) {
                Some(values) => {
                    dates.push(frame.dates()[row]);
                    rows.push(values);
                }
                None => dropped.push(frame.dates()[row]),
            }
        }

        if !dropped.is_empty() {
            warn!(
                dropped = dropped.len(),
                first = %dropped[0],
                "dropping feature rows with undefined cells after warm-up"
            );
        }

        Self { dates, rows }
    }

    /// Build directly from rows, e.g. for already-prepared data.
    ///
    /// Returns `None` if the lengths differ.
    pub fn from_rows(dates: Vec<NaiveDate>, rows: Vec<FeatureRow>) -> Option<Self> {
        (dates.len() == rows.len()).then_some(Self { dates, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// All values of one feature, top to bottom.
    pub fn column(&self, feature: Feature) -> Vec<f64> {
        self.rows.iter().map(|r| r[feature.index()]).collect()
    }
}

fn feature_row(frame: &IndicatorFrame, row: usize) -> Option<FeatureRow> {
    let mut values = [0.0; FEATURE_COUNT];
    for feature in Feature::ALL {
        values[feature.index()] = frame.cell(feature.column(), row)?;
    }
    Some(values)
}
