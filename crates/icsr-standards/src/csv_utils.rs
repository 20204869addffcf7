//! Small shared helpers for the CSV loaders.

use std::path::Path;

use crate::error::{Result, StandardsError};

/// Opens the file behind a reference table.
pub(crate) fn open_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| StandardsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Opens a headered CSV reader with the standard error mapping.
pub(crate) fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    Ok(csv::Reader::from_reader(open_file(path)?))
}

/// Finds a required column index by case-insensitive header name.
pub(crate) fn find_column(
    headers: &csv::StringRecord,
    name: &str,
    path: &Path,
) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| StandardsError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

/// Maps a csv iteration error onto the standard error type.
pub(crate) fn record_error(err: csv::Error, path: &Path) -> StandardsError {
    StandardsError::Csv {
        path: path.to_path_buf(),
        source: err,
    }
}
