//! Min-max scaler fitted on a historical prefix.
//!
//! The scaler is fitted exactly once, on the training rows only, and then
//! applied unchanged to validation and test rows. Transformed values are not
//! clamped: later rows may exceed the fitted extremes and map outside [0, 1].

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::features::{Feature, FeatureRow, FEATURE_COUNT};

/// Fitted (min, max) bound for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-feature min-max bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    bounds: [Bounds; FEATURE_COUNT],
}

impl Scaler {
    /// Fit bounds over exactly the supplied prefix rows.
    ///
    /// Non-finite values are ignored. Fails if any feature has fewer than two
    /// distinct finite values, since its scale would be degenerate.
    pub fn fit(prefix: &[FeatureRow]) -> Result<Self, PipelineError> {
        let mut bounds = [Bounds {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }; FEATURE_COUNT];

        for row in prefix {
            for (b, &v) in bounds.iter_mut().zip(row) {
                if v.is_finite() {
                    b.min = b.min.min(v);
                    b.max = b.max.max(v);
                }
            }
        }

        for feature in Feature::ALL {
            let b = bounds[feature.index()];
            if b.max <= b.min {
                return Err(PipelineError::config(format!(
                    "degenerate scale for {}: fewer than 2 distinct finite values in {} fit rows",
                    feature.name(),
                    prefix.len()
                )));
            }
        }

        Ok(Self { bounds })
    }

    pub fn bounds(&self, feature: Feature) -> Bounds {
        self.bounds[feature.index()]
    }

    /// Scale one value of a feature: (v - min) / (max - min).
    pub fn transform_value(&self, feature: Feature, v: f64) -> f64 {
        let b = self.bounds[feature.index()];
        (v - b.min) / b.range()
    }

    pub fn transform_row(&self, row: &FeatureRow) -> FeatureRow {
        let mut out = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            out[feature.index()] = self.transform_value(feature, row[feature.index()]);
        }
        out
    }

    pub fn transform(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }

    /// Map a scaled value back: v * (max - min) + min.
    pub fn inverse_transform(&self, feature: Feature, v: f64) -> f64 {
        let b = self.bounds[feature.index()];
        v * b.range() + b.min
    }

    /// Map a scaled close (model output or target) back to price units.
    pub fn inverse_close(&self, v: f64) -> f64 {
        self.inverse_transform(Feature::TARGET, v)
    }

    pub fn inverse_close_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.inverse_close(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[f64]) -> Vec<FeatureRow> {
        values
            .iter()
            .map(|&v| {
                let mut row = [0.0; FEATURE_COUNT];
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = v * (j + 1) as f64;
                }
                row
            })
            .collect()
    }

    #[test]
    fn fit_finds_min_max_per_column() {
        let scaler = Scaler::fit(&rows(&[2.0, 5.0, 3.0])).unwrap();
        assert_eq!(scaler.bounds(Feature::Close), Bounds { min: 2.0, max: 5.0 });
        assert_eq!(scaler.bounds(Feature::Returns), Bounds { min: 20.0, max: 50.0 });
    }

    #[test]
    fn prefix_extremes_map_to_exact_zero_and_one() {
        let data = rows(&[2.0, 5.0, 3.0]);
        let scaler = Scaler::fit(&data).unwrap();
        let scaled = scaler.transform(&data);
        for j in 0..FEATURE_COUNT {
            assert_eq!(scaled[0][j], 0.0);
            assert_eq!(scaled[1][j], 1.0);
            assert!((0.0..=1.0).contains(&scaled[2][j]));
        }
    }

    #[test]
    fn values_beyond_fit_range_are_not_clamped() {
        let scaler = Scaler::fit(&rows(&[0.0, 10.0])).unwrap();
        assert_eq!(scaler.transform_value(Feature::Close, 15.0), 1.5);
        assert_eq!(scaler.transform_value(Feature::Close, -5.0), -0.5);
    }

    #[test]
    fn inverse_close_round_trips() {
        let scaler = Scaler::fit(&rows(&[101.25, 187.5, 143.0])).unwrap();
        for v in [101.25, 120.0, 143.0, 187.5] {
            let back = scaler.inverse_close(scaler.transform_value(Feature::Close, v));
            assert!((back - v).abs() < 1e-9, "{v} came back as {back}");
        }
        assert_eq!(scaler.inverse_close_all(&[0.0, 1.0]), vec![101.25, 187.5]);
    }

    #[test]
    fn constant_column_is_rejected() {
        let mut data = rows(&[1.0, 2.0, 3.0]);
        for row in &mut data {
            row[Feature::Rsi14.index()] = 100.0;
        }
        let err = Scaler::fit(&data).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(ref m) if m.contains("RSI_14")));
    }

    #[test]
    fn single_row_is_rejected() {
        assert!(Scaler::fit(&rows(&[1.0])).is_err());
        assert!(Scaler::fit(&[]).is_err());
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let mut data = rows(&[1.0, 2.0, 3.0]);
        data[1][0] = f64::NAN;
        let scaler = Scaler::fit(&data).unwrap();
        assert_eq!(scaler.bounds(Feature::Close), Bounds { min: 1.0, max: 3.0 });
    }

    #[test]
    fn serde_roundtrip_keeps_bounds() {
        let scaler = Scaler::fit(&rows(&[1.0, 4.0])).unwrap();
        let json = serde_json::to_string(&scaler).unwrap();
        let back: Scaler = serde_json::from_str(&json).unwrap();
        assert_eq!(scaler, back);
    }
}
