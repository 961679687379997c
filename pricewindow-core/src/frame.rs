//! Indicator frame: the raw series extended with derived columns.
//!
//! All indicators are computed once per pipeline invocation from the close
//! series. The input `Series` is only borrowed.

use chrono::NaiveDate;

use crate::domain::{Bar, Series};
use crate::indicators::{Bollinger, Cell, Indicator, Macd, MacdLine, Returns, Rsi, Sma};

/// Longest minimum-periods requirement across the derived columns (SMA_30).
///
/// Feature extraction discards this many leading rows.
pub const FEATURE_WARMUP: usize = 30;

/// Every column of an [`IndicatorFrame`], raw and derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Open,
    High,
    Low,
    Close,
    Volume,
    Sma10,
    Sma30,
    Returns,
    Rsi14,
    Macd,
    MacdSignal,
    BbUpper,
    BbLower,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::Sma10,
        Column::Sma30,
        Column::Returns,
        Column::Rsi14,
        Column::Macd,
        Column::MacdSignal,
        Column::BbUpper,
        Column::BbLower,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Open => "Open",
            Column::High => "High",
            Column::Low => "Low",
            Column::Close => "Close",
            Column::Volume => "Volume",
            Column::Sma10 => "SMA_10",
            Column::Sma30 => "SMA_30",
            Column::Returns => "Returns",
            Column::Rsi14 => "RSI_14",
            Column::Macd => "MACD",
            Column::MacdSignal => "MACD_signal",
            Column::BbUpper => "BB_upper",
            Column::BbLower => "BB_lower",
        }
    }

    /// The indicator that produces this column, or `None` for raw OHLCV.
    pub fn indicator(self) -> Option<Box<dyn Indicator>> {
        let indicator: Box<dyn Indicator> = match self {
            Column::Open | Column::High | Column::Low | Column::Close | Column::Volume => {
                return None
            }
            Column::Sma10 => Box::new(Sma::new(10)),
            Column::Sma30 => Box::new(Sma::new(30)),
            Column::Returns => Box::new(Returns::new()),
            Column::Rsi14 => Box::new(Rsi::new(14)),
            Column::Macd => Box::new(Macd::standard(MacdLine::Macd)),
            Column::MacdSignal => Box::new(Macd::standard(MacdLine::Signal)),
            Column::BbUpper => Box::new(Bollinger::upper(20, 2.0)),
            Column::BbLower => Box::new(Bollinger::lower(20, 2.0)),
        };
        Some(indicator)
    }

    /// Minimum periods for the column; raw columns are defined from bar 0.
    pub fn min_periods(self) -> usize {
        self.indicator().map_or(1, |i| i.min_periods())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The series plus every derived column, one cell per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<Vec<Cell>>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column(&self, column: Column) -> &[Cell] {
        &self.columns[column.index()]
    }

    pub fn cell(&self, column: Column, row: usize) -> Cell {
        self.columns[column.index()].get(row).copied().flatten()
    }

    /// Number of leading rows in which at least one column is undefined
    /// for a clean series. Equal to [`FEATURE_WARMUP`] - 1.
    pub fn warmup(&self) -> usize {
        Column::ALL
            .iter()
            .map(|c| c.min_periods().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }
}

/// Compute every indicator column for a series.
pub fn compute_indicators(series: &Series) -> IndicatorFrame {
    let bars = series.bars();
    let closes = series.closes();

    let columns = Column::ALL
        .iter()
        .map(|&column| {
            let cells: Vec<Cell> = match column {
                Column::Open => raw_column(bars, |b| b.open),
                Column::High => raw_column(bars, |b| b.high),
                Column::Low => raw_column(bars, |b| b.low),
                Column::Close => raw_column(bars, |b| b.close),
                Column::Volume => raw_column(bars, |b| b.volume),
                derived => match derived.indicator() {
                    Some(indicator) => indicator.compute(&closes),
                    None => vec![None; bars.len()],
                },
            };
            debug_assert_eq!(
                cells.len(),
                bars.len(),
                "column '{}' produced {} values for {} bars",
                column.name(),
                cells.len(),
                bars.len()
            );
            cells
        })
        .collect();

    IndicatorFrame {
        dates: series.dates(),
        columns,
    }
}

fn raw_column(bars: &[Bar], field: fn(&Bar) -> f64) -> Vec<Cell> {
    bars.iter().map(|b| Some(field(b))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_bars;

    fn wavy_series(n: usize) -> Series {
        let closes: Vec<f64> = (0..n)
            .map(|i| 100.0 + 0.2 * i as f64 + (i as f64 * 0.7).sin() * 3.0)
            .collect();
        Series::new(test_bars(&closes)).unwrap()
    }

    #[test]
    fn feature_warmup_is_longest_min_periods() {
        let longest = Column::ALL.iter().map(|c| c.min_periods()).max().unwrap();
        assert_eq!(longest, FEATURE_WARMUP);
    }

    #[test]
    fn frame_has_every_column() {
        let series = wavy_series(40);
        let frame = compute_indicators(&series);
        assert_eq!(frame.len(), 40);
        for column in Column::ALL {
            assert_eq!(frame.column(column).len(), 40, "{}", column.name());
        }
        assert_eq!(frame.cell(Column::Close, 3), Some(series.bars()[3].close));
    }

    #[test]
    fn warmup_rows_are_undefined_not_zero() {
        let frame = compute_indicators(&wavy_series(40));
        assert_eq!(frame.warmup(), 29);
        assert!(frame.column(Column::Sma30)[..29].iter().all(|c| c.is_none()));
        assert!(frame.column(Column::Sma10)[..9].iter().all(|c| c.is_none()));
        assert!(frame.column(Column::BbUpper)[..19].iter().all(|c| c.is_none()));
        assert!(frame.column(Column::Rsi14)[..14].iter().all(|c| c.is_none()));
        assert!(frame.cell(Column::Returns, 0).is_none());
        assert!(frame.cell(Column::Macd, 0).is_some());
    }

    #[test]
    fn no_undefined_after_warmup() {
        let frame = compute_indicators(&wavy_series(80));
        for row in FEATURE_WARMUP..frame.len() {
            for column in Column::ALL {
                assert!(
                    frame.cell(column, row).is_some(),
                    "{} undefined at row {row}",
                    column.name()
                );
            }
        }
    }

    #[test]
    fn compute_does_not_mutate_input() {
        let series = wavy_series(50);
        let before = series.clone();
        let _ = compute_indicators(&series);
        assert_eq!(series, before);
    }

    #[test]
    fn out_of_range_cell_is_undefined() {
        let frame = compute_indicators(&wavy_series(35));
        assert_eq!(frame.cell(Column::Close, 35), None);
    }
}
