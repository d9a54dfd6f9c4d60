// Reference population: historical feature vectors used for percentile lookups.
//
// The CSV carries one row per player with a header of feature names. Cells
// that fail to parse are skipped per column rather than dropping the row, so
// a sparse export still contributes to every column it does fill.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read-only source of per-feature quantiles.
pub trait ReferencePopulation {
    /// Quantile `q` in [0,1] of `feature` across the population, or `None`
    /// when the feature is absent or has no values.
    fn quantile(&self, feature: &str, q: f64) -> Option<f64>;
}

impl<T: ReferencePopulation + ?Sized> ReferencePopulation for &T {
    fn quantile(&self, feature: &str, q: f64) -> Option<f64> {
        (**self).quantile(feature, q)
    }
}

impl<T: ReferencePopulation + ?Sized> ReferencePopulation for std::sync::Arc<T> {
    fn quantile(&self, feature: &str, q: f64) -> Option<f64> {
        (**self).quantile(feature, q)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Column table
// ---------------------------------------------------------------------------

/// Column-oriented table with each column sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    columns: BTreeMap<String, Vec<f64>>,
    rows: usize,
    /// Non-numeric cells dropped from each kept column.
    skipped: BTreeMap<String, usize>,
}

impl ReferenceTable {
    /// Build from `(column, values)` pairs. Non-finite values are dropped.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut rows = 0;
        let columns = columns
            .into_iter()
            .map(|(name, mut values)| {
                rows = rows.max(values.len());
                values.retain(|v| v.is_finite());
                values.sort_by(f64::total_cmp);
                (name.into(), values)
            })
            .collect();
        Self {
            columns,
            rows,
            skipped: BTreeMap::new(),
        }
    }

    /// Number of data rows read.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Cells skipped in `column` because they were not finite numbers.
    pub fn skipped_cells(&self, column: &str) -> usize {
        self.skipped.get(column).copied().unwrap_or(0)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(rdr);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        let mut skipped: Vec<usize> = vec![0; headers.len()];
        let mut rows = 0;

        for (line, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("skipping malformed reference row {}: {}", line + 1, e);
                    continue;
                }
            };
            rows += 1;
            for (i, cell) in record.iter().enumerate().take(headers.len()) {
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(v) if v.is_finite() => columns[i].push(v),
                    _ => skipped[i] += 1,
                }
            }
        }

        // One warning per column. Columns with no numeric cell at all (names,
        // teams) are dropped quietly.
        let mut skipped_by_column = BTreeMap::new();
        for ((header, values), bad) in headers.iter().zip(&columns).zip(&skipped) {
            if *bad == 0 {
                continue;
            }
            if values.is_empty() {
                debug!("dropping non-numeric reference column {}", header);
            } else {
                warn!(
                    "skipped {} non-numeric cell(s) in reference column {}",
                    bad, header
                );
                skipped_by_column.insert(header.clone(), *bad);
            }
        }

        let mut table = Self::from_columns(
            headers
                .into_iter()
                .zip(columns)
                .filter(|(_, values)| !values.is_empty()),
        );
        table.rows = rows;
        table.skipped = skipped_by_column;
        Ok(table)
    }

    /// Load a reference population CSV from disk.
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let shown = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| ReferenceError::Io {
            path: shown.clone(),
            source: e,
        })?;
        let table = Self::from_reader(file).map_err(|e| ReferenceError::Csv {
            path: shown.clone(),
            source: e,
        })?;
        if table.is_empty() {
            return Err(ReferenceError::Validation(format!(
                "reference population {shown} has no rows"
            )));
        }
        info!(
            "Loaded reference population: {} rows, {} numeric columns from {}",
            table.len(),
            table.columns.len(),
            shown
        );
        Ok(table)
    }
}

/// Linear interpolation between closest ranks over an ascending slice.
///
/// `q` is clamped to [0,1]. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = if q.is_nan() { 0.5 } else { q.clamp(0.0, 1.0) };
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

impl ReferencePopulation for ReferenceTable {
    fn quantile(&self, feature: &str, q: f64) -> Option<f64> {
        self.columns
            .get(feature)
            .and_then(|values| quantile_sorted(values, q))
    }
}
