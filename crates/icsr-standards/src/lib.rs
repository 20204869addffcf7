//! Read-only reference tables for a triage batch.
//!
//! All five tables are loaded once before the first file and never
//! mutated afterwards; case evaluation borrows them.

pub mod competitors;
mod csv_utils;
pub mod error;
pub mod launch;
pub mod listedness;
pub mod normalize;
pub mod products;
pub mod terms;

pub use competitors::CompetitorList;
pub use error::{Result, StandardsError};
pub use launch::{LaunchInfo, LaunchRegistry};
pub use listedness::ListednessTable;
pub use normalize::normalize_name;
pub use products::{ProductEntry, ProductVocabulary};
pub use terms::{TermMap, TermRow};
