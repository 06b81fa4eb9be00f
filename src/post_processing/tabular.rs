//! Tabular aggregation: maximum of one numeric column

use crate::error::{PostProcessError, Result};
use std::path::Path;
use tracing::debug;

/// Maximum of the numeric values in column `field` of the CSV file at `path`
///
/// Empty and non-numeric cells count as missing and are skipped. A header
/// without `field` is [`PostProcessError::MissingField`]; ragged rows,
/// undecodable bytes, or a column with no numeric value at all are
/// [`PostProcessError::MalformedTable`].
pub fn column_max(path: &Path, field: &str) -> Result<f64> {
    let file = std::fs::File::open(path).map_err(|e| PostProcessError::from_io(path, &e))?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let malformed = |e: csv::Error| PostProcessError::MalformedTable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let column = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .position(|h| h.trim() == field)
        .ok_or_else(|| PostProcessError::MissingField {
            path: path.to_path_buf(),
            field: field.to_string(),
        })?;

    let mut max: Option<f64> = None;
    let mut missing = 0usize;

    for record in reader.records() {
        let record = record.map_err(malformed)?;
        match record
            .get(column)
            .and_then(|cell| cell.trim().parse::<f64>().ok())
            .filter(|v| !v.is_nan())
        {
            Some(value) => max = Some(max.map_or(value, |m| m.max(value))),
            None => missing += 1,
        }
    }

    debug!(?path, field, missing, "computed column maximum");

    max.ok_or_else(|| {
        PostProcessError::MalformedTable {
            path: path.to_path_buf(),
            reason: format!("column {:?} has no numeric values", field),
        }
        .into()
    })
}
