//! Derived case judgments: Validity, Reportability, Listedness.
//!
//! These are the three outputs of the assessment pipeline. Each is an
//! explicit enum rather than a free-text string so that the "exactly
//! one validity reason surfaces" contract is enforced by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single reason a case was judged Non-Valid.
///
/// Ordering matters: rules are evaluated top to bottom and the first
/// match wins, so a case can never carry two reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidityReason {
    NoPatientDetails,
    NonCompanyProduct,
    ProductNotLaunched,
    ExposurePriorToLaunch,
}

impl ValidityReason {
    /// All reasons, in evaluation priority order.
    pub const ALL: [Self; 4] = [
        Self::NoPatientDetails,
        Self::NonCompanyProduct,
        Self::ProductNotLaunched,
        Self::ExposurePriorToLaunch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPatientDetails => "No patient details",
            Self::NonCompanyProduct => "Non-company product",
            Self::ProductNotLaunched => "Product not Launched",
            Self::ExposurePriorToLaunch => "Drug exposure prior to Launch",
        }
    }
}

/// Case validity verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    /// Usable for safety evaluation.
    Valid,
    /// No hard rule fired, but anomaly comments exist; an operator
    /// should confirm before relying on the case.
    ValidNeedsReview,
    /// Not usable; carries the one triggering reason.
    NonValid(ValidityReason),
}

impl Validity {
    /// True for any Valid variant. Non-Valid cases omit listedness and
    /// force reportability to NA.
    pub fn allows_listedness(&self) -> bool {
        !matches!(self, Self::NonValid(_))
    }

    pub fn verdict(&self) -> String {
        match self {
            Self::Valid => "Valid".to_string(),
            Self::ValidNeedsReview => "Valid (Manual review advised)".to_string(),
            Self::NonValid(reason) => format!("Non-Valid ({})", reason.as_str()),
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verdict())
    }
}

/// Regulatory reportability verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reportability {
    /// At least one serious event and at least one category-2 suspect
    /// product.
    Reportable,
    NonReportable,
    /// The case is Non-Valid, so reportability cannot be assessed.
    NotApplicable,
}

impl Reportability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reportable => "Category 2, serious, reportable case",
            Self::NonReportable => "Non-Reportable",
            Self::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for Reportability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listedness status of one (product, event) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Listedness {
    Listed,
    Unlisted,
    /// No listedness reference table was supplied for the batch.
    ReferenceNotUploaded,
    /// The table exists but does not cover this case's products; it is
    /// stale, which is different from the event being unlisted.
    ReferenceNotUpdated,
}

impl Listedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listed => "Listed",
            Self::Unlisted => "Unlisted",
            Self::ReferenceNotUploaded => "Reference not uploaded",
            Self::ReferenceNotUpdated => "Reference not updated",
        }
    }
}

impl fmt::Display for Listedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listedness of one event against one matched suspect product.
///
/// With multiple matched suspects, one entry is produced per product
/// per event; results are never merged into a case-level value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListednessEntry {
    /// Canonical product key from the vocabulary.
    pub product: String,
    /// Sequence number of the event within the case.
    pub event_seq: usize,
    /// Resolved event term the lookup was performed with.
    pub event_term: String,
    pub status: Listedness,
}

impl fmt::Display for ListednessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / Event {} ({}): {}",
            self.product, self.event_seq, self.event_term, self.status
        )
    }
}
