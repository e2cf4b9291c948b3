//! Coercion of untyped records into [`NormalizedSample`].
//!
//! This is the only place raw input is reinterpreted. Strings are trimmed,
//! scalar non-strings are stringified, enumerated fields are uppercased and
//! the value is coerced to `f64` with NaN standing in for anything that is
//! not a number. Nothing is rejected here.

use lims_model::enums::fold_micro_sign;
use lims_model::{InputFormat, NormalizedSample, coerce_f64};
use serde_json::{Map, Value};

/// Untyped key/value record as decoded from either input format.
pub type RawRecord = Map<String, Value>;

/// Field names shared by both input formats.
pub mod fields {
    pub const ID: &str = "id";
    pub const PATIENT_ID: &str = "patientId";
    pub const SPECIMEN_TYPE: &str = "specimenType";
    pub const STATUS: &str = "status";
    pub const VALUE: &str = "value";
    pub const UNIT: &str = "unit";
    pub const COLLECTED_AT: &str = "collectedAt";
    pub const ACCESSION: &str = "accession";
}

/// Normalize one raw record.
pub fn normalize_record(raw: &RawRecord, source: InputFormat) -> NormalizedSample {
    NormalizedSample {
        id: text_field(raw, fields::ID),
        patient_id: text_field(raw, fields::PATIENT_ID),
        specimen_type: text_field(raw, fields::SPECIMEN_TYPE).to_uppercase(),
        status: text_field(raw, fields::STATUS).to_uppercase(),
        value: raw.get(fields::VALUE).map_or(f64::NAN, coerce_f64),
        unit: fold_micro_sign(&text_field(raw, fields::UNIT).to_uppercase()),
        collected_at: text_field(raw, fields::COLLECTED_AT),
        accession: text_field(raw, fields::ACCESSION).to_uppercase(),
        source,
    }
}

/// Normalize a whole batch, preserving order.
pub fn normalize_records(records: &[RawRecord], source: InputFormat) -> Vec<NormalizedSample> {
    records
        .iter()
        .map(|raw| normalize_record(raw, source))
        .collect()
}

fn text_field(raw: &RawRecord, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn trims_and_uppercases() {
        let record = normalize_record(
            &raw(json!({
                "id": "  S-0001 ",
                "patientId": " p-1 ",
                "specimenType": " blood",
                "status": "reported ",
                "value": " 12.5 ",
                "unit": "mg/dl",
                "collectedAt": " 2026-01-01T00:00Z ",
                "accession": "acc-0001x",
            })),
            InputFormat::List,
        );
        assert_eq!(record.id, "S-0001");
        assert_eq!(record.patient_id, "p-1");
        assert_eq!(record.specimen_type, "BLOOD");
        assert_eq!(record.status, "REPORTED");
        assert_eq!(record.value, 12.5);
        assert_eq!(record.unit, "MG/DL");
        assert_eq!(record.collected_at, "2026-01-01T00:00Z");
        assert_eq!(record.accession, "ACC-0001X");
        assert_eq!(record.source, InputFormat::List);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let record = normalize_record(&RawRecord::new(), InputFormat::Tree);
        assert_eq!(record.id, "");
        assert_eq!(record.accession, "");
        assert!(record.value.is_nan());
        assert_eq!(record.source, InputFormat::Tree);
    }

    #[test]
    fn non_numeric_value_becomes_nan() {
        let record = normalize_record(&raw(json!({"value": "n/a"})), InputFormat::List);
        assert!(record.value.is_nan());
        let record = normalize_record(&raw(json!({"value": null})), InputFormat::List);
        assert!(record.value.is_nan());
    }

    #[test]
    fn scalar_non_strings_are_stringified() {
        let record = normalize_record(
            &raw(json!({"id": 12345, "patientId": true, "unit": ["MG/DL"]})),
            InputFormat::List,
        );
        assert_eq!(record.id, "12345");
        assert_eq!(record.patient_id, "true");
        assert_eq!(record.unit, "");
    }

    #[test]
    fn micro_sign_survives_uppercasing() {
        let record = normalize_record(&raw(json!({"unit": "cells/µL"})), InputFormat::List);
        assert_eq!(record.unit, "CELLS/µL");
    }
}
