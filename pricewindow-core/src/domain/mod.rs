//! Domain types: bars and validated series.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::Series;

/// Create consecutive daily bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = max(min(open,close) - 1.0, 0.0),
/// volume = 1000 + 10 * i.
#[cfg(test)]
pub(crate) fn test_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.0),
                close,
                volume: 1000.0 + 10.0 * i as f64,
            }
        })
        .collect()
}
