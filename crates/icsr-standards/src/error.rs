use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing column {column} in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid row in {path}: {message}")]
    InvalidRow { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, StandardsError>;
