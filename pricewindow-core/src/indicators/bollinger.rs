//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Two bands (separate Indicator instances):
//! - Upper: SMA(close, period) + mult * stddev(close, period)
//! - Lower: SMA(close, period) - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1).
//! Minimum periods: period.

use super::{Cell, Indicator};

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }

    fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        let name = match band {
            BollingerBand::Upper => "BB_upper",
            BollingerBand::Lower => "BB_lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: name.to_string(),
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<Cell> {
        let n = closes.len();
        let mut result = vec![None; n];
        if n < self.period {
            return result;
        }

        for (offset, window) in closes.windows(self.period).enumerate() {
            let mean = window.iter().sum::<f64>() / self.period as f64;
            let variance = window
                .iter()
                .map(|c| {
                    let diff = c - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (self.period - 1) as f64;
            let stddev = variance.sqrt();

            result[offset + self.period - 1] = Some(match self.band {
                BollingerBand::Upper => mean + self.multiplier * stddev,
                BollingerBand::Lower => mean - self.multiplier * stddev,
            });
        }

        result
    }
}
