//! Price-unit reporting and export: JSON, CSV, and Markdown artifacts.
//!
//! A model trained on prepared data predicts scaled closes. This module
//! maps predictions and targets back to price units with the ticker's own
//! fitted scaler and scores them against the naive persistence baseline.
//!
//! All persisted reports include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use pricewindow_core::{evaluate, naive_baseline, Evaluation, PipelineError, PreparedData};
use serde::{Deserialize, Serialize};

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// One test example in price units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// Test-split scores for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub ticker: String,
    /// Fingerprint of the prepared data the predictions were made on.
    pub data_fingerprint: String,
    /// Errors on the scaled close, as the model sees it.
    pub scaled: Evaluation,
    /// Errors after mapping both sides back to prices.
    pub price: Evaluation,
    /// MAE of predicting each test close with the previous one.
    pub naive_mae: f64,
    pub rows: Vec<PredictionRow>,
}

impl PriceReport {
    /// Model MAE strictly below the naive baseline.
    pub fn beats_naive(&self) -> bool {
        self.price.mae < self.naive_mae
    }

    /// Model MAE over naive MAE; below 1.0 is better than persistence.
    pub fn relative_mae(&self) -> Option<f64> {
        (self.naive_mae > 0.0).then(|| self.price.mae / self.naive_mae)
    }
}

/// Score scaled test-split predictions for one ticker.
///
/// `predictions[i]` is the model output for `x_test[i]`.
pub fn price_report(
    ticker: &str,
    data: &PreparedData,
    predictions: &[f64],
) -> Result<PriceReport, PipelineError> {
    let targets = data.y_test.to_vec();
    let scaled = evaluate(predictions, &targets)?;

    let actual = data.scaler.inverse_close_all(&targets);
    let predicted = data.scaler.inverse_close_all(predictions);
    let price = evaluate(&predicted, &actual)?;
    let naive_mae = naive_baseline(&actual)?;

    let rows = data
        .target_dates
        .test
        .iter()
        .zip(actual.iter().zip(&predicted))
        .map(|(&date, (&actual, &predicted))| PredictionRow {
            date,
            actual,
            predicted,
        })
        .collect();

    Ok(PriceReport {
        schema_version: SCHEMA_VERSION,
        ticker: ticker.to_string(),
        data_fingerprint: data.fingerprint(),
        scaled,
        price,
        naive_mae,
        rows,
    })
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `PriceReport` to pretty JSON.
pub fn export_json(report: &PriceReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize PriceReport to JSON")
}

/// Deserialize a `PriceReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<PriceReport> {
    let report: PriceReport =
        serde_json::from_str(json).context("failed to deserialize PriceReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the test predictions as CSV.
///
/// Columns: date, actual, predicted, error
pub fn export_predictions_csv(report: &PriceReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "actual", "predicted", "error"])?;
    for row in &report.rows {
        wtr.write_record([
            &row.date.to_string(),
            &format!("{:.6}", row.actual),
            &format!("{:.6}", row.predicted),
            &format!("{:.6}", row.predicted - row.actual),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

/// Human-readable summary of a report.
pub fn render_markdown(report: &PriceReport) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str(&format!("# Forecast Report: {}\n\n", report.ticker));
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Test examples | {} |\n", report.rows.len()));
    md.push_str(&format!("| Scaled MSE | {:.6} |\n", report.scaled.mse));
    md.push_str(&format!("| Scaled MAE | {:.6} |\n", report.scaled.mae));
    md.push_str(&format!("| Price MAE | {:.4} |\n", report.price.mae));
    md.push_str(&format!("| Price RMSE | {:.4} |\n", report.price.rmse()));
    md.push_str(&format!("| Naive MAE | {:.4} |\n", report.naive_mae));
    if let Some(rel) = report.relative_mae() {
        md.push_str(&format!("| MAE / naive | {rel:.3} |\n"));
    }
    md.push_str(&format!(
        "| Beats naive | {} |\n",
        if report.beats_naive() { "yes" } else { "no" }
    ));
    md.push_str(&format!("| Data fingerprint | {} |\n", report.data_fingerprint));
    md
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one ticker's report.
///
/// Creates a directory named `{ticker}_{timestamp}/` under `output_dir`
/// containing:
/// - `report.json`: the full `PriceReport`
/// - `predictions.csv`: per-date actual and predicted closes
/// - `report.md`: the Markdown summary
///
/// Returns the path to the created directory.
pub fn save_report(report: &PriceReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        report.ticker,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create report dir: {}", run_dir.display()))?;

    write_file(&run_dir.join("report.json"), &export_json(report)?)?;
    write_file(
        &run_dir.join("predictions.csv"),
        &export_predictions_csv(report)?,
    )?;
    write_file(&run_dir.join("report.md"), &render_markdown(report))?;

    Ok(run_dir)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a `PriceReport` from a report directory's report.json.
///
/// Rejects unknown schema versions.
pub fn load_report(dir: &Path) -> Result<PriceReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
