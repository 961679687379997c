//! End-to-end preparation tests: bars in, windowed splits out.

use chrono::NaiveDate;
use pricewindow_core::{
    compute_indicators, evaluate, naive_baseline, prepare_data, Bar, Column, Feature,
    FeatureMatrix, PipelineConfig, PipelineError, Series, FEATURE_COUNT, FEATURE_WARMUP,
};

/// Weekday bars with a rising close and a short-period oscillation.
fn make_bars(n: usize) -> Vec<Bar> {
    let mut date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let mut bars = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f64;
        let close = 50.0 + 0.2 * x + 2.5 * (x * 0.45).sin() + 1.2 * (x * 1.3).cos();
        bars.push(Bar {
            date,
            open: close - 0.3,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 2_000_000.0 + 150_000.0 * (x * 0.2).sin(),
        });
        date = next_weekday(date);
    }
    bars
}

fn next_weekday(date: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    let mut d = date.succ_opt().unwrap();
    while d.weekday().number_from_monday() > 5 {
        d = d.succ_opt().unwrap();
    }
    d
}

#[test]
fn three_hundred_bars_default_config() {
    let series = Series::new(make_bars(300)).unwrap();
    let data = prepare_data(&series, &PipelineConfig::default()).unwrap();

    assert_eq!(data.x_train.shape()[1], 60);
    assert_eq!(data.x_train.shape()[2], FEATURE_COUNT);
    assert_eq!(data.x_val.shape()[2], FEATURE_COUNT);
    assert_eq!(data.x_test.shape()[2], FEATURE_COUNT);
    assert_eq!(data.window_count(), 300 - FEATURE_WARMUP - 60);

    // 270 feature rows: train_end = 189, val_end = 229.
    assert_eq!(data.boundaries.rows, 270);
    assert_eq!(data.boundaries.train_end, 189);
    assert_eq!(data.boundaries.val_end, 229);
    assert_eq!(data.y_train.len(), 129);
    assert_eq!(data.y_val.len(), 40);
    assert_eq!(data.y_test.len(), 41);
}

#[test]
fn targets_follow_their_windows_in_time() {
    let bars = make_bars(300);
    let series = Series::new(bars.clone()).unwrap();
    let data = prepare_data(&series, &PipelineConfig::default()).unwrap();

    // The first training target is bar 30 + 60.
    assert_eq!(data.target_dates.train[0], bars[FEATURE_WARMUP + 60].date);
    assert_eq!(data.target_dates.test.last(), Some(&bars[299].date));

    let all: Vec<_> = data
        .target_dates
        .train
        .iter()
        .chain(&data.target_dates.val)
        .chain(&data.target_dates.test)
        .collect();
    assert!(all.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn scaled_targets_map_back_to_closes() {
    let bars = make_bars(300);
    let data = prepare_data(&Series::new(bars.clone()).unwrap(), &PipelineConfig::default())
        .unwrap();

    let prices = data.scaler.inverse_close_all(&data.y_test.to_vec());
    let first_test_bar = FEATURE_WARMUP + data.boundaries.val_end;
    for (k, price) in prices.iter().enumerate() {
        let expected = bars[first_test_bar + k].close;
        assert!((price - expected).abs() < 1e-9, "k={k}: {price} vs {expected}");
    }
}

#[test]
fn naive_baseline_and_evaluate_on_prepared_targets() {
    let data = prepare_data(
        &Series::new(make_bars(300)).unwrap(),
        &PipelineConfig::default(),
    )
    .unwrap();
    let targets = data.y_test.to_vec();

    // Persistence forecast: predict each target with its predecessor.
    let persistence = &targets[..targets.len() - 1];
    let eval = evaluate(persistence, &targets[1..]).unwrap();
    let baseline = naive_baseline(&targets).unwrap();
    assert!((eval.mae - baseline).abs() < 1e-12);
}

fn with_closes(bars: Vec<Bar>, close: impl Fn(f64) -> f64) -> Vec<Bar> {
    bars.into_iter()
        .enumerate()
        .map(|(i, bar)| Bar {
            close: close(i as f64),
            ..bar
        })
        .collect()
}

#[test]
fn near_linear_close_fills_every_window() {
    // A strictly linear close has no losing day, so RSI_14 is pinned at 100
    // and its column cannot be scaled. A small wobble keeps the trend while
    // giving RSI a range.
    let bars = with_closes(make_bars(300), |x| 100.0 + x + 1.5 * (x * 1.3).sin());
    let data = prepare_data(&Series::new(bars).unwrap(), &PipelineConfig::default()).unwrap();

    assert_eq!(data.x_train.shape()[1], 60);
    assert_eq!(data.x_train.shape()[2], FEATURE_COUNT);
    assert_eq!(data.window_count(), 300 - 30 - 60);
    assert_eq!(
        data.y_train.len() + data.y_val.len() + data.y_test.len(),
        210
    );
}

#[test]
fn strictly_linear_close_is_a_degenerate_scale() {
    let series = Series::new(with_closes(make_bars(200), |x| 100.0 + x)).unwrap();

    let matrix = FeatureMatrix::from_frame(&compute_indicators(&series));
    assert!(matrix.column(Feature::Rsi14).iter().all(|&v| v == 100.0));

    let err = prepare_data(&series, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(ref m) if m.contains("RSI_14")));
}

#[test]
fn zero_close_row_is_dropped_not_infinite() {
    let mut bars = make_bars(300);
    bars[149].close = 0.0;
    let series = Series::new(bars).unwrap();

    let frame = compute_indicators(&series);
    assert_eq!(frame.cell(Column::Returns, 150), None);

    let matrix = FeatureMatrix::from_frame(&frame);
    assert_eq!(matrix.len(), 300 - FEATURE_WARMUP - 1);
    assert!(matrix.rows().iter().flatten().all(|v| v.is_finite()));

    let data = prepare_data(&series, &PipelineConfig::default()).unwrap();
    assert_eq!(data.window_count(), 300 - FEATURE_WARMUP - 1 - 60);
}

#[test]
fn boundary_sized_inputs() {
    let config = PipelineConfig::default();

    let exact = Series::new(make_bars(config.min_bars())).unwrap();
    // 61 feature rows: train_end = 42 is shorter than the lookback.
    let err = prepare_data(&exact, &config).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));

    let short = Series::new(make_bars(config.min_bars() - 1)).unwrap();
    assert_eq!(
        prepare_data(&short, &config).unwrap_err(),
        PipelineError::InsufficientData {
            required: 91,
            available: 90
        }
    );

    let empty = Series::new(Vec::new()).unwrap();
    assert!(matches!(
        prepare_data(&empty, &config),
        Err(PipelineError::InsufficientData { available: 0, .. })
    ));
}

#[test]
fn dropped_rows_can_leave_too_few_for_a_window() {
    let config = PipelineConfig {
        lookback: 30,
        ..PipelineConfig::default()
    };
    // Zero close at bar 50 leaves the next return undefined: 61 bars give
    // 31 feature rows, one of which is dropped.
    let mut bars = make_bars(61);
    bars[50].close = 0.0;
    let err = prepare_data(&Series::new(bars).unwrap(), &config).unwrap_err();
    assert_eq!(
        err,
        PipelineError::InsufficientRows {
            required: 31,
            available: 30
        }
    );
}

#[test]
fn small_lookback_on_minimal_series() {
    let config = PipelineConfig {
        lookback: 5,
        train_ratio: 0.6,
        val_ratio: 0.2,
    };
    let data = prepare_data(&Series::new(make_bars(60)).unwrap(), &config).unwrap();
    // 30 feature rows: train_end = 18, val_end = 24.
    assert_eq!(data.y_train.len(), 13);
    assert_eq!(data.y_val.len(), 6);
    assert_eq!(data.y_test.len(), 6);
}

#[test]
fn out_of_order_bars_are_rejected() {
    let mut bars = make_bars(120);
    bars.swap(40, 41);
    let err = Series::new(bars).unwrap_err();
    assert!(matches!(err, PipelineError::MalformedSeries { index: 41, .. }));
}
