//! Type-safe enumerations for E2B(R3) coded fields.
//!
//! These enums give compile-time shape to values that arrive as bare
//! code strings in the report XML. Every `from_code` constructor is
//! total: unrecognized codes map to an explicit fallback rather than
//! an error, because a malformed code must never abort a case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporter qualification per E2B(R3) C.2.r.4.
///
/// Codes 1-5 map to named roles; anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReporterQualification {
    Physician,
    Pharmacist,
    OtherHealthProfessional,
    Lawyer,
    Consumer,
    Unknown,
}

impl ReporterQualification {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => Self::Physician,
            "2" => Self::Pharmacist,
            "3" => Self::OtherHealthProfessional,
            "4" => Self::Lawyer,
            "5" => Self::Consumer,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physician => "Physician",
            Self::Pharmacist => "Pharmacist",
            Self::OtherHealthProfessional => "Other health professional",
            Self::Lawyer => "Lawyer",
            Self::Consumer => "Consumer or other non health professional",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ReporterQualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Patient sex per E2B(R3) D.5 (administrativeGenderCode).
///
/// Only codes 1 and 2 carry information; any other code is treated as
/// absent by the extractor, not as a displayable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Male),
            "2" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Patient age group per E2B(R3) D.2.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Neonate,
    Infant,
    Child,
    Adolescent,
    Adult,
    Elderly,
}

impl AgeGroup {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Neonate),
            "2" => Some(Self::Infant),
            "3" => Some(Self::Child),
            "4" => Some(Self::Adolescent),
            "5" => Some(Self::Adult),
            "6" => Some(Self::Elderly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neonate => "Neonate",
            Self::Infant => "Infant",
            Self::Child => "Child",
            Self::Adolescent => "Adolescent",
            Self::Adult => "Adult",
            Self::Elderly => "Elderly",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seriousness criterion attached to a reaction observation.
///
/// The `xml_display_name` values are the `displayName` attributes of
/// the nested seriousness sub-observations in the report tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriousnessCriterion {
    Death,
    LifeThreatening,
    Hospitalization,
    Disabling,
    CongenitalAnomaly,
    OtherMedicallyImportant,
}

impl SeriousnessCriterion {
    /// All criteria in the order they are scanned per reaction.
    pub const ALL: [Self; 6] = [
        Self::Death,
        Self::LifeThreatening,
        Self::Hospitalization,
        Self::Disabling,
        Self::CongenitalAnomaly,
        Self::OtherMedicallyImportant,
    ];

    /// The `displayName` attribute marking this criterion in the XML.
    pub fn xml_display_name(&self) -> &'static str {
        match self {
            Self::Death => "seriousnessDeath",
            Self::LifeThreatening => "seriousnessLifeThreatening",
            Self::Hospitalization => "seriousnessHospitalization",
            Self::Disabling => "seriousnessDisabling",
            Self::CongenitalAnomaly => "seriousnessCongenitalAnomali",
            Self::OtherMedicallyImportant => "seriousnessOther",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Death => "Death",
            Self::LifeThreatening => "Life-threatening",
            Self::Hospitalization => "Hospitalization",
            Self::Disabling => "Disabling",
            Self::CongenitalAnomaly => "Congenital anomaly",
            Self::OtherMedicallyImportant => "Other medically important condition",
        }
    }
}

impl fmt::Display for SeriousnessCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reaction outcome per E2B(R3) E.i.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventOutcome {
    Recovered,
    Recovering,
    NotRecovered,
    RecoveredWithSequelae,
    Fatal,
    Unknown,
}

impl EventOutcome {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Recovered),
            "2" => Some(Self::Recovering),
            "3" => Some(Self::NotRecovered),
            "4" => Some(Self::RecoveredWithSequelae),
            "5" => Some(Self::Fatal),
            "6" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recovered => "Recovered/Resolved",
            Self::Recovering => "Recovering/Resolving",
            Self::NotRecovered => "Not recovered/Not resolved",
            Self::RecoveredWithSequelae => "Recovered with sequelae",
            Self::Fatal => "Fatal",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_codes_map_to_roles() {
        assert_eq!(
            ReporterQualification::from_code("1"),
            ReporterQualification::Physician
        );
        assert_eq!(
            ReporterQualification::from_code("5"),
            ReporterQualification::Consumer
        );
        assert_eq!(
            ReporterQualification::from_code("9"),
            ReporterQualification::Unknown
        );
        assert_eq!(
            ReporterQualification::from_code(""),
            ReporterQualification::Unknown
        );
    }

    #[test]
    fn gender_only_recognizes_coded_values() {
        assert_eq!(Gender::from_code("1"), Some(Gender::Male));
        assert_eq!(Gender::from_code("2"), Some(Gender::Female));
        assert_eq!(Gender::from_code("0"), None);
    }

    #[test]
    fn outcome_display_strings() {
        assert_eq!(EventOutcome::from_code("5"), Some(EventOutcome::Fatal));
        assert_eq!(
            EventOutcome::from_code("3").map(|o| o.as_str()),
            Some("Not recovered/Not resolved")
        );
    }
}
