//! Audit trail exports.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use lims_model::{AuditEntry, sort_keys};

use crate::error::{ReportError, Result};

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 7] = [
    "time", "runId", "stage", "status", "recordId", "checksum", "notes",
];

/// Render the audit trail as CSV.
///
/// Every field is quoted and embedded quotes are doubled. Line breaks in
/// notes become single spaces so each entry stays on one line.
pub fn audit_to_csv(entries: &[AuditEntry]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for entry in entries {
        let checksum = entry.checksum.to_string();
        let notes = collapse_line_breaks(&entry.notes);
        writer.write_record([
            entry.time.as_str(),
            entry.run_id.as_str(),
            entry.stage.as_str(),
            entry.status.as_str(),
            entry.record_id.as_str(),
            checksum.as_str(),
            notes.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::CsvFlush(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render the audit trail as pretty JSON with keys sorted at every level.
pub fn audit_to_json(entries: &[AuditEntry]) -> Result<String> {
    let value = serde_json::to_value(entries)?;
    Ok(serde_json::to_string_pretty(&sort_keys(&value))?)
}

fn collapse_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lims_model::{AuditStage, AuditStatus, RUN_LEVEL_RECORD_ID};

    fn entries() -> Vec<AuditEntry> {
        vec![
            AuditEntry::stamped(
                "2026-04-01T09:30:00.000Z".to_string(),
                "run-1",
                AuditStage::Intake,
                AuditStatus::Ok,
                RUN_LEVEL_RECORD_ID,
                "parsed 2 records (format=list)".to_string(),
            ),
            AuditEntry::stamped(
                "2026-04-01T09:30:00.001Z".to_string(),
                "run-1",
                AuditStage::Validate,
                AuditStatus::Error,
                "S-0001",
                "note with \"quotes\" and\nnewline".to_string(),
            ),
        ]
    }

    #[test]
    fn csv_quotes_every_field() {
        let csv = audit_to_csv(&entries()).unwrap();
        insta::assert_snapshot!(csv, @r#"
        "time","runId","stage","status","recordId","checksum","notes"
        "2026-04-01T09:30:00.000Z","run-1","intake","ok","-","185168595","parsed 2 records (format=list)"
        "2026-04-01T09:30:00.001Z","run-1","validate","error","S-0001","2488401943","note with ""quotes"" and newline"
        "#);
    }

    #[test]
    fn csv_of_empty_log_is_header_only() {
        let csv = audit_to_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "\"time\",\"runId\",\"stage\",\"status\",\"recordId\",\"checksum\",\"notes\"\n"
        );
    }

    #[test]
    fn carriage_returns_collapse_to_one_space() {
        assert_eq!(collapse_line_breaks("a\r\nb\rc\nd"), "a b c d");
    }

    #[test]
    fn json_keys_are_sorted() {
        let json = audit_to_json(&entries()[..1]).unwrap();
        insta::assert_snapshot!(json, @r#"
        [
          {
            "checksum": 185168595,
            "notes": "parsed 2 records (format=list)",
            "recordId": "-",
            "runId": "run-1",
            "stage": "intake",
            "status": "ok",
            "time": "2026-04-01T09:30:00.000Z"
          }
        ]
        "#);
    }

    #[test]
    fn json_round_trips() {
        let json = audit_to_json(&entries()).unwrap();
        let parsed: Vec<AuditEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entries());
        assert!(parsed.iter().all(AuditEntry::is_intact));
    }
}
