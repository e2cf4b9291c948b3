//! Normalized and processed sample records.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

use crate::checksum::{canonical_string, content_hash};
use crate::enums::Category;

/// Input shape a batch was decoded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Top-level JSON array of objects.
    #[default]
    List,
    /// XML document holding `<sample>` elements.
    Tree,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::List => "list",
            InputFormat::Tree => "tree",
        }
    }

    /// Guess the format from a file extension (`json` or `xml`).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim().to_lowercase().as_str() {
            "json" => Some(InputFormat::List),
            "xml" => Some(InputFormat::Tree),
            _ => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" | "json" => Ok(InputFormat::List),
            "tree" | "xml" => Ok(InputFormat::Tree),
            _ => Err(format!("Unknown input format: {s}")),
        }
    }
}

/// A sample after permissive coercion and before validation.
///
/// Enumerated fields stay strings here: the gate reports values outside the
/// vocabulary instead of the decoder rejecting them. An empty string means
/// the field was absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSample {
    pub id: String,
    pub patient_id: String,
    pub specimen_type: String,
    pub status: String,
    /// NaN when the input was missing or not numeric.
    pub value: f64,
    pub unit: String,
    pub collected_at: String,
    pub accession: String,
    pub source: InputFormat,
}

impl NormalizedSample {
    /// Key used for duplicate detection within a run.
    pub fn duplicate_key(&self) -> String {
        format!("{}::{}", self.id, self.accession)
    }

    pub fn canonical_value(&self) -> Value {
        json!({
            "id": self.id,
            "patientId": self.patient_id,
            "specimenType": self.specimen_type,
            "status": self.status,
            "value": self.value,
            "unit": self.unit,
            "collectedAt": self.collected_at,
            "accession": self.accession,
            "source": self.source.as_str(),
        })
    }

    /// Content hash over the canonical serialization of the record.
    pub fn checksum(&self) -> u32 {
        content_hash(&canonical_string(&self.canonical_value()))
    }
}

/// A valid sample after categorization and enrichment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSample {
    #[serde(flatten)]
    pub sample: NormalizedSample,
    /// RFC 3339 instant with millisecond precision.
    pub processed_at: String,
    pub normalized_value: f64,
    pub category: Category,
}

impl ProcessedSample {
    pub fn id(&self) -> &str {
        &self.sample.id
    }

    pub fn canonical_value(&self) -> Value {
        let mut value = self.sample.canonical_value();
        if let Value::Object(map) = &mut value {
            map.insert("processedAt".to_string(), json!(self.processed_at));
            map.insert("normalizedValue".to_string(), json!(self.normalized_value));
            map.insert("category".to_string(), json!(self.category.as_str()));
        }
        value
    }

    /// Content hash covering the sample and the enrichment fields.
    pub fn checksum(&self) -> u32 {
        content_hash(&canonical_string(&self.canonical_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedSample {
        NormalizedSample {
            id: "S-0001".to_string(),
            patient_id: "P-100".to_string(),
            specimen_type: "BLOOD".to_string(),
            status: "RECEIVED".to_string(),
            value: 4.2,
            unit: "MG/DL".to_string(),
            collected_at: "2026-01-05T08:00:00Z".to_string(),
            accession: "ACC-00001".to_string(),
            source: InputFormat::List,
        }
    }

    #[test]
    fn duplicate_key_joins_id_and_accession() {
        let mut record = sample();
        assert_eq!(record.duplicate_key(), "S-0001::ACC-00001");
        record.accession.clear();
        assert_eq!(record.duplicate_key(), "S-0001::");
    }

    #[test]
    fn canonical_value_is_key_sorted() {
        let text = canonical_string(&sample().canonical_value());
        assert!(text.starts_with(r#"{"accession":"ACC-00001","collectedAt":"#));
        assert!(text.ends_with(r#""unit":"MG/DL","value":4.2}"#));
    }

    #[test]
    fn checksum_tracks_content() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.checksum(), b.checksum());
        b.value = 4.3;
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn nan_value_serializes_as_null() {
        let mut record = sample();
        record.value = f64::NAN;
        assert_eq!(record.canonical_value()["value"], Value::Null);
    }

    #[test]
    fn processed_checksum_covers_enrichment() {
        let processed = ProcessedSample {
            sample: sample(),
            processed_at: "2026-02-01T00:00:00.000Z".to_string(),
            normalized_value: 4.2,
            category: Category::Chemistry,
        };
        let mut other = processed.clone();
        other.processed_at = "2026-02-01T00:00:00.001Z".to_string();
        assert_ne!(processed.checksum(), other.checksum());
        assert_ne!(processed.checksum(), processed.sample.checksum());
        assert_eq!(processed.canonical_value()["category"], "CHEMISTRY");
    }

    #[test]
    fn processed_sample_serializes_flat() {
        let processed = ProcessedSample {
            sample: sample(),
            processed_at: "2026-02-01T00:00:00.000Z".to_string(),
            normalized_value: 4.2,
            category: Category::Hematology,
        };
        let value = serde_json::to_value(&processed).unwrap();
        assert_eq!(value["patientId"], "P-100");
        assert_eq!(value["category"], "HEMATOLOGY");
        assert_eq!(value["source"], "list");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(InputFormat::from_extension("JSON"), Some(InputFormat::List));
        assert_eq!(InputFormat::from_extension("xml"), Some(InputFormat::Tree));
        assert_eq!(InputFormat::from_extension("csv"), None);
        assert_eq!("tree".parse::<InputFormat>().unwrap(), InputFormat::Tree);
    }
}
