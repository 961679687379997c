//! Bar: one trading day of OHLCV data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
///
/// Prices and volume are plain reals. A well-formed bar has every field
/// finite and non-negative; `Series::new` enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.fields().iter().any(|(_, v)| !v.is_finite())
    }

    /// Every field finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.invalid_field().is_none()
    }

    /// Name of the first field that is non-finite or negative, if any.
    pub fn invalid_field(&self) -> Option<&'static str> {
        self.fields()
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
            .map(|(name, _)| name)
    }

    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn bar_is_valid() {
        assert!(sample_bar().is_valid());
        assert!(!sample_bar().has_non_finite());
    }

    #[test]
    fn bar_detects_nan() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(bar.has_non_finite());
        assert_eq!(bar.invalid_field(), Some("close"));
    }

    #[test]
    fn bar_detects_negative_volume() {
        let mut bar = sample_bar();
        bar.volume = -1.0;
        assert!(!bar.has_non_finite());
        assert_eq!(bar.invalid_field(), Some("volume"));
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
