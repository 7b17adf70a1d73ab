//! Canonical literal text of BSON values
//!
//! Output is JSON wherever JSON can express the value and shell constructor
//! syntax otherwise, so it can be spliced into criteria text and evaluated
//! again.

use bson::{Bson, DateTime, Decimal128, Document, Regex, oid::ObjectId};

use super::BsonStringConverter;
use super::display::DisplayConverter;
use crate::formatter::BsonJsonConverter;

/// Writer for compact, re-parseable literal text
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralWriter;

impl BsonStringConverter for LiteralWriter {
    fn format_string(&self, s: &str) -> String {
        quote(s)
    }

    fn format_double(&self, f: f64) -> String {
        if f.is_nan() {
            "NaN".to_string()
        } else if f.is_infinite() {
            if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
        } else {
            f.to_string()
        }
    }

    fn format_object_id(&self, oid: &ObjectId) -> String {
        format!("ObjectId(\"{}\")", oid.to_hex())
    }

    fn format_datetime(&self, dt: &DateTime) -> String {
        match dt.try_to_rfc3339_string() {
            Ok(text) => format!("ISODate(\"{text}\")"),
            Err(_) => format!("new Date({})", dt.timestamp_millis()),
        }
    }

    fn format_decimal128(&self, d: &Decimal128) -> String {
        format!("NumberDecimal(\"{d}\")")
    }

    fn format_regex(&self, regex: &Regex) -> String {
        format!("/{}/{}", escape_regex_source(&regex.pattern), regex.options)
    }

    fn format_array(&self, arr: &[Bson]) -> String {
        let items: Vec<String> = arr.iter().map(|v| self.convert_to_string(v)).collect();
        format!("[{}]", items.join(","))
    }

    fn format_document(&self, doc: &Document) -> String {
        let entries: Vec<String> = doc
            .iter()
            .map(|(k, v)| format!("{}:{}", quote(k), self.convert_to_string(v)))
            .collect();
        format!("{{{}}}", entries.join(","))
    }

    /// Types without literal syntax are written as their display string
    fn format_unknown(&self, value: &Bson) -> String {
        match DisplayConverter.convert_to_json(value) {
            serde_json::Value::String(s) => quote(&s),
            other => other.to_string(),
        }
    }
}

/// Canonical literal text of a value
pub fn to_literal(value: &Bson) -> String {
    LiteralWriter.convert_to_string(value)
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Escape bare slashes and line breaks so the pattern fits between `/`s
fn escape_regex_source(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                out.push(ch);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
