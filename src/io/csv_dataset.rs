//! Delimited-file reader for labeled feature tables.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::Array2;

use crate::data_handling::Dataset;

/// Configuration for reading a labeled CSV/TSV file.
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// Column name holding the class labels.
    pub label_column: String,
    /// Field delimiter.
    pub delimiter: u8,
    /// Optional list of feature columns to load (in order).
    /// When `None`, all non-label columns are treated as features.
    pub feature_columns: Option<Vec<String>>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "label".to_string(),
            delimiter: b',',
            feature_columns: None,
        }
    }
}

/// Read a labeled CSV file into a `Dataset` with string labels.
pub fn read_csv_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset<String>> {
    read_csv_dataset_with_config(path, &CsvReaderConfig::default())
}

/// Read a labeled delimited file using a custom configuration.
pub fn read_csv_dataset_with_config<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<Dataset<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open dataset file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read dataset header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", config.label_column))?;

    let feature_indices = resolve_feature_indices(&headers, config, label_idx)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in dataset header"));
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?
            .trim();
        labels.push(label.to_string());

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let parsed = value.trim().parse::<f32>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            features.push(parsed);
        }
    }

    let n_samples = labels.len();
    let n_features = feature_indices.len();
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;

    Ok(Dataset::new(x, labels)?)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &CsvReaderConfig,
    label_idx: usize,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| anyhow!("Missing feature column '{}'", name))?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    Ok((0..headers.len()).filter(|&idx| idx != label_idx).collect())
}
