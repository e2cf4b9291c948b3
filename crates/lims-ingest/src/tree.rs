//! Tree (XML) input decoding.
//!
//! Any element whose local name is `sample` (case-insensitive) is a record.
//! Its direct child elements become fields holding their text content,
//! including character and predefined entity references and CDATA. Deeper
//! markup inside a field contributes its text as well.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use serde_json::Value;

use crate::error::{IngestError, Result};
use crate::normalize::RawRecord;

const SAMPLE_ELEMENT: &str = "sample";

/// Decode an XML document into raw records, in document order.
pub fn parse_tree(input: &str) -> Result<Vec<RawRecord>> {
    let mut reader = Reader::from_str(input);
    let mut collector = SampleCollector::default();

    loop {
        let event = reader.read_event().map_err(|err| IngestError::TreeSyntax {
            position: reader.error_position(),
            message: err.to_string(),
        })?;
        let position = reader.buffer_position();
        let syntax = |message: String| IngestError::TreeSyntax { position, message };

        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                collector.open(&name).map_err(syntax)?;
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                collector.open(&name).map_err(syntax)?;
                collector.close();
            }
            Event::End(_) => collector.close(),
            Event::Text(text) => {
                let decoded = text.decode().map_err(|err| syntax(err.to_string()))?;
                collector.text(&decoded).map_err(syntax)?;
            }
            Event::CData(data) => {
                let decoded = data.decode().map_err(|err| syntax(err.to_string()))?;
                if collector.depth == 0 {
                    return Err(syntax("CDATA outside the root element".to_string()));
                }
                collector.push_text(&decoded);
            }
            Event::GeneralRef(reference) => {
                let resolved = resolve_reference(&reference).map_err(syntax)?;
                collector.text(&resolved).map_err(syntax)?;
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    let records = collector
        .finish()
        .map_err(|message| IngestError::TreeSyntax {
            position: reader.buffer_position(),
            message,
        })?;
    if records.is_empty() {
        return Err(IngestError::NoSampleElements);
    }
    Ok(records)
}

fn resolve_reference(reference: &BytesRef<'_>) -> std::result::Result<String, String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|err| err.to_string())?
    {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|err| err.to_string())?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| format!("unknown entity &{name};"))
}

/// Streaming state for [`parse_tree`].
#[derive(Default)]
struct SampleCollector {
    depth: usize,
    roots: usize,
    /// Depth of the open `<sample>` element and the fields gathered so far.
    sample: Option<(usize, RawRecord)>,
    /// Name and accumulated text of the open field element.
    field: Option<(String, String)>,
    records: Vec<RawRecord>,
}

impl SampleCollector {
    fn open(&mut self, name: &str) -> std::result::Result<(), String> {
        if self.depth == 0 {
            self.roots += 1;
            if self.roots > 1 {
                return Err(format!("second root element <{name}>"));
            }
        }
        self.depth += 1;
        match &self.sample {
            Some((sample_depth, _)) => {
                if self.depth == sample_depth + 1 {
                    self.field = Some((name.to_string(), String::new()));
                }
            }
            None => {
                if name.eq_ignore_ascii_case(SAMPLE_ELEMENT) {
                    self.sample = Some((self.depth, RawRecord::new()));
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Some(sample_depth) = self.sample.as_ref().map(|(depth, _)| *depth) {
            if self.depth == sample_depth + 1 {
                if let (Some((name, text)), Some((_, record))) =
                    (self.field.take(), self.sample.as_mut())
                {
                    record.insert(name, Value::String(text));
                }
            } else if self.depth == sample_depth
                && let Some((_, record)) = self.sample.take()
            {
                self.records.push(record);
            }
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) -> std::result::Result<(), String> {
        if self.depth == 0 {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err("text outside the root element".to_string());
        }
        self.push_text(text);
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, buffer)) = &mut self.field {
            buffer.push_str(text);
        }
    }

    fn finish(self) -> std::result::Result<Vec<RawRecord>, String> {
        if self.depth > 0 {
            return Err(format!(
                "unexpected end of document with {} unclosed element(s)",
                self.depth
            ));
        }
        if self.roots == 0 {
            return Err("document has no root element".to_string());
        }
        Ok(self.records)
    }
}
