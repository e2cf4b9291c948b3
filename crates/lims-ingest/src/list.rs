//! List (JSON array) input decoding.

use serde_json::Value;

use crate::error::{IngestError, Result};
use crate::normalize::RawRecord;

/// Decode a top-level JSON array into raw records.
///
/// Elements that are not objects decode as records with every field
/// missing; the quality gate quarantines them.
pub fn parse_list(input: &str) -> Result<Vec<RawRecord>> {
    let value: Value =
        serde_json::from_str(input).map_err(|source| IngestError::ListSyntax { source })?;
    let Value::Array(items) = value else {
        return Err(IngestError::NotAList {
            found: json_kind(&value),
        });
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => map,
            _ => RawRecord::new(),
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestErrorKind;

    #[test]
    fn parses_array_of_objects() {
        let records = parse_list(r#"[{"id": "S-1"}, {"id": "S-2"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["id"], "S-2");
    }

    #[test]
    fn empty_array_is_an_empty_batch() {
        assert!(parse_list("[]").unwrap().is_empty());
    }

    #[test]
    fn object_at_top_level_is_rejected() {
        let err = parse_list(r#"{"id": "S-1"}"#).unwrap_err();
        assert!(matches!(err, IngestError::NotAList { found: "object" }));
        assert_eq!(err.kind(), IngestErrorKind::Structure);
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = parse_list("[{").unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::Syntax);
    }

    #[test]
    fn non_object_elements_become_empty_records() {
        let records = parse_list(r#"[1, "x", null, {"id": "S-1"}]"#).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records[0].is_empty());
        assert!(records[2].is_empty());
        assert_eq!(records[3]["id"], "S-1");
    }
}
