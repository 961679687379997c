//! Series: an ordered, validated run of daily bars.
//!
//! Index position is the authoritative temporal ordering used by every
//! downstream stage. Nothing after construction re-sorts or re-checks order.

use chrono::NaiveDate;
use serde::Serialize;

use super::Bar;
use crate::error::PipelineError;

/// Bars sorted strictly ascending by date, every field finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Validate and wrap a bar vector.
    ///
    /// Fails on the first bar with a non-finite or negative field, or whose
    /// date does not strictly follow its predecessor. Gaps between dates are
    /// fine.
    pub fn new(bars: Vec<Bar>) -> Result<Self, PipelineError> {
        for (index, bar) in bars.iter().enumerate() {
            if let Some(field) = bar.invalid_field() {
                return Err(PipelineError::MalformedSeries {
                    index,
                    reason: format!("{field} is not a finite non-negative number"),
                });
            }
            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(PipelineError::MalformedSeries {
                    index,
                    reason: format!(
                        "date {} does not follow {}",
                        bar.date,
                        bars[index - 1].date
                    ),
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// The suffix of bars dated on or after `start`.
    pub fn tail_since(&self, start: NaiveDate) -> Series {
        let from = self.bars.partition_point(|b| b.date < start);
        Series {
            bars: self.bars[from..].to_vec(),
        }
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_bars;

    #[test]
    fn accepts_strictly_increasing_dates() {
        let series = Series::new(test_bars(&[10.0, 11.0, 12.0])).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn accepts_empty() {
        let series = Series::new(vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first_date(), None);
    }

    #[test]
    fn rejects_duplicate_date() {
        let mut bars = test_bars(&[10.0, 11.0, 12.0]);
        bars[2].date = bars[1].date;
        let err = Series::new(bars).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedSeries { index: 2, .. }));
    }

    #[test]
    fn rejects_nan_price() {
        let mut bars = test_bars(&[10.0, 11.0, 12.0]);
        bars[1].high = f64::NAN;
        let err = Series::new(bars).unwrap_err();
        match err {
            PipelineError::MalformedSeries { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("high"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tail_since_keeps_suffix() {
        let series = Series::new(test_bars(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        let start = series.bars()[2].date;
        let tail = series.tail_since(start);
        assert_eq!(tail.closes(), vec![3.0, 4.0, 5.0]);

        let past_end = series.last_date().unwrap() + chrono::Duration::days(1);
        assert!(series.tail_since(past_end).is_empty());
    }
}
