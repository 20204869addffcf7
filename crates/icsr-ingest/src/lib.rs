//! E2B(R3) safety-report ingestion.
//!
//! Parses one report XML file into an element tree and extracts the
//! raw case fields. Assessment (product matching, validity,
//! listedness, reportability) happens downstream in `icsr-assess`.

pub mod dom;
pub mod error;
pub mod extract;
pub mod text;

use std::path::Path;

pub use dom::{XmlNode, parse_document};
pub use error::{IngestError, Result};
pub use extract::{ExtractedCase, extract_case};
pub use text::{filter_unknown, filter_unknown_opt};

/// Reads and extracts one report file.
///
/// A file that cannot be read or is not well-formed XML is a
/// fatal-per-file error; the batch runner logs it and moves on.
pub fn extract_file(path: &Path) -> Result<ExtractedCase> {
    let xml = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root = parse_document(&xml)?;
    Ok(extract_case(&root))
}
