//! Tabular export of analysis results.
//!
//! Every sink consumes the same flat [`ResultRecord`] with a fixed column
//! order: `filename, summary, key_entities, action_items, keywords, error`.
//! Keywords are comma-joined and a missing error becomes an empty string, so
//! a spreadsheet or downstream loader never has to deal with nested data.
//!
//! Unlike the cache, export failures are fatal: the whole point of the run
//! is the exported report, so a sink that cannot be written aborts with
//! [`AnalyzerError::ExportFailed`].

use crate::document::AnalysisResult;
use crate::error::AnalyzerError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One flat row per analysed document.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub filename: String,
    pub summary: String,
    pub key_entities: String,
    pub action_items: String,
    /// Comma-joined keyword list.
    pub keywords: String,
    /// Last failure message, or empty when the analysis succeeded.
    pub error: String,
}

impl From<&AnalysisResult> for ResultRecord {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            filename: result.filename.clone(),
            summary: result.summary.clone(),
            key_entities: result.key_entities.clone(),
            action_items: result.action_items.clone(),
            keywords: result.keywords.join(", "),
            error: result.error.clone().unwrap_or_default(),
        }
    }
}

/// Supported export sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Single pretty-printed JSON array.
    Json,
    /// JSON Lines: one object per line.
    JsonLines,
}

impl ExportFormat {
    /// File extension for this sink.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::JsonLines => "jsonl",
        }
    }
}

/// Export `results` to every requested format inside `output_dir`.
///
/// Filenames are timestamped (`analysis_results_YYYYMMDD_HHMMSS.<ext>`) so
/// repeated runs never overwrite earlier reports. Returns the written paths
/// in request order; duplicate formats are written once.
pub fn export_results(
    results: &[AnalysisResult],
    output_dir: &Path,
    formats: &[ExportFormat],
) -> Result<Vec<(ExportFormat, PathBuf)>, AnalyzerError> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let mut written = Vec::new();

    for &format in formats {
        if written.iter().any(|(f, _)| *f == format) {
            warn!("Duplicate export format requested: {:?}", format);
            continue;
        }
        let filename = format!("analysis_results_{}.{}", stamp, format.extension());
        let path = match format {
            ExportFormat::Csv => export_to_csv(results, output_dir, &filename)?,
            ExportFormat::Json => export_to_json(results, output_dir, &filename, false)?,
            ExportFormat::JsonLines => export_to_json(results, output_dir, &filename, true)?,
        };
        written.push((format, path));
    }

    Ok(written)
}

/// Write results as CSV to `output_dir/filename`.
pub fn export_to_csv(
    results: &[AnalysisResult],
    output_dir: &Path,
    filename: &str,
) -> Result<PathBuf, AnalyzerError> {
    let path = prepare_output_path(output_dir, filename)?;

    let mut writer = csv::Writer::from_path(&path).map_err(|e| AnalyzerError::ExportFailed {
        path: path.clone(),
        detail: e.to_string(),
    })?;

    for result in results {
        writer
            .serialize(ResultRecord::from(result))
            .map_err(|e| AnalyzerError::ExportFailed {
                path: path.clone(),
                detail: e.to_string(),
            })?;
    }
    writer.flush().map_err(|e| AnalyzerError::ExportFailed {
        path: path.clone(),
        detail: e.to_string(),
    })?;

    info!("Exported {} results to CSV: {}", results.len(), path.display());
    Ok(path)
}

/// Write results as a JSON array or JSON Lines to `output_dir/filename`.
pub fn export_to_json(
    results: &[AnalysisResult],
    output_dir: &Path,
    filename: &str,
    lines: bool,
) -> Result<PathBuf, AnalyzerError> {
    let path = prepare_output_path(output_dir, filename)?;
    let records: Vec<ResultRecord> = results.iter().map(ResultRecord::from).collect();

    let body = if lines {
        let mut out = String::new();
        for record in &records {
            let line =
                serde_json::to_string(record).map_err(|e| AnalyzerError::ExportFailed {
                    path: path.clone(),
                    detail: e.to_string(),
                })?;
            out.push_str(&line);
            out.push('\n');
        }
        out
    } else {
        serde_json::to_string_pretty(&records).map_err(|e| AnalyzerError::ExportFailed {
            path: path.clone(),
            detail: e.to_string(),
        })?
    };

    std::fs::write(&path, body).map_err(|e| AnalyzerError::ExportFailed {
        path: path.clone(),
        detail: e.to_string(),
    })?;

    info!(
        "Exported {} results to {}: {}",
        results.len(),
        if lines { "JSONL" } else { "JSON" },
        path.display()
    );
    Ok(path)
}

fn prepare_output_path(output_dir: &Path, filename: &str) -> Result<PathBuf, AnalyzerError> {
    std::fs::create_dir_all(output_dir).map_err(|e| AnalyzerError::ExportFailed {
        path: output_dir.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(output_dir.join(filename))
}
