//! Controlled vocabularies for sample fields.
//!
//! Normalized samples keep these fields as uppercased strings so that
//! out-of-vocabulary input can be reported by the quality gate. These enums
//! are the vocabularies the gate checks against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Specimen type collected from the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpecimenType {
    Blood,
    Urine,
    Swab,
    Saliva,
    Plasma,
}

impl SpecimenType {
    pub const ALL: [SpecimenType; 5] = [
        SpecimenType::Blood,
        SpecimenType::Urine,
        SpecimenType::Swab,
        SpecimenType::Saliva,
        SpecimenType::Plasma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecimenType::Blood => "BLOOD",
            SpecimenType::Urine => "URINE",
            SpecimenType::Swab => "SWAB",
            SpecimenType::Saliva => "SALIVA",
            SpecimenType::Plasma => "PLASMA",
        }
    }
}

impl fmt::Display for SpecimenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpecimenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        SpecimenType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("Unknown specimen type: {s}"))
    }
}

/// Workflow status of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleStatus {
    Received,
    InProgress,
    /// A result has been reported; the sample must carry a finite value.
    Reported,
}

impl SampleStatus {
    pub const ALL: [SampleStatus; 3] = [
        SampleStatus::Received,
        SampleStatus::InProgress,
        SampleStatus::Reported,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleStatus::Received => "RECEIVED",
            SampleStatus::InProgress => "IN_PROGRESS",
            SampleStatus::Reported => "REPORTED",
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SampleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        SampleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown sample status: {s}"))
    }
}

/// Measurement unit of the reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "MG/DL")]
    MgPerDl,
    #[serde(rename = "MMOL/L")]
    MmolPerL,
    #[serde(rename = "IU/L")]
    IuPerL,
    #[serde(rename = "CELLS/µL")]
    CellsPerMicroliter,
}

impl Unit {
    pub const ALL: [Unit; 4] = [
        Unit::MgPerDl,
        Unit::MmolPerL,
        Unit::IuPerL,
        Unit::CellsPerMicroliter,
    ];

    /// Marker carried by cell-count units; such samples are hematology work.
    pub const HEMATOLOGY_MARKER: &'static str = "CELLS";

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::MgPerDl => "MG/DL",
            Unit::MmolPerL => "MMOL/L",
            Unit::IuPerL => "IU/L",
            Unit::CellsPerMicroliter => "CELLS/µL",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    /// Parse a unit, accepting any letter case.
    ///
    /// Uppercasing `µ` (MICRO SIGN) yields GREEK CAPITAL LETTER MU, so that
    /// character is folded back before comparison.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = fold_micro_sign(&s.trim().to_uppercase());
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == normalized)
            .ok_or_else(|| format!("Unknown unit: {s}"))
    }
}

/// Replace GREEK CAPITAL LETTER MU (U+039C) with MICRO SIGN (U+00B5).
pub fn fold_micro_sign(value: &str) -> String {
    value.replace('\u{039C}', "\u{00B5}")
}

/// Processing category assigned to a valid sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Hematology,
    Microbiology,
    Chemistry,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Hematology,
        Category::Microbiology,
        Category::Chemistry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hematology => "HEMATOLOGY",
            Category::Microbiology => "MICROBIOLOGY",
            Category::Chemistry => "CHEMISTRY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specimen_type_from_str() {
        assert_eq!("blood".parse::<SpecimenType>().unwrap(), SpecimenType::Blood);
        assert_eq!(" SWAB ".parse::<SpecimenType>().unwrap(), SpecimenType::Swab);
        assert!("TISSUE".parse::<SpecimenType>().is_err());
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in SampleStatus::ALL {
            assert_eq!(status.as_str().parse::<SampleStatus>().unwrap(), status);
        }
        assert!("in progress".parse::<SampleStatus>().is_err());
    }

    #[test]
    fn unit_accepts_lowercase_micro_sign() {
        assert_eq!(
            "cells/µL".parse::<Unit>().unwrap(),
            Unit::CellsPerMicroliter
        );
        assert_eq!("mg/dl".parse::<Unit>().unwrap(), Unit::MgPerDl);
        assert!("G/L".parse::<Unit>().is_err());
    }

    #[test]
    fn uppercased_micro_sign_is_folded() {
        let upper = "cells/µL".to_uppercase();
        assert_ne!(upper, "CELLS/µL");
        assert_eq!(fold_micro_sign(&upper), "CELLS/µL");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Unit::CellsPerMicroliter).unwrap();
        assert_eq!(json, "\"CELLS/µL\"");
        let json = serde_json::to_string(&SampleStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let json = serde_json::to_string(&Category::Microbiology).unwrap();
        assert_eq!(json, "\"MICROBIOLOGY\"");
    }

    #[test]
    fn hematology_marker_matches_cell_unit() {
        assert!(
            Unit::CellsPerMicroliter
                .as_str()
                .contains(Unit::HEMATOLOGY_MARKER)
        );
    }
}
