//! Presentation-side conversions of BSON values
//!
//! Two conversion strategies share one dispatch skeleton:
//! - [`DisplayConverter`]: display-safe JSON trees for result pages
//!   (HTML-escaped keys and strings, shell-style type wrappers)
//! - [`LiteralWriter`]: canonical literal text that the query evaluator
//!   parses back, used for distinct drill-down criteria

mod display;
mod literal;

pub use display::{DisplayConverter, document_key, sanitize_document};
pub use literal::{LiteralWriter, to_literal};

use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp, oid::ObjectId};
use serde_json::Value as JsonValue;

/// Strategy for converting BSON values into JSON trees
pub trait BsonJsonConverter {
    fn convert_string(&self, s: &str) -> JsonValue;
    fn convert_key(&self, key: &str) -> String;
    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue;
    fn convert_datetime(&self, dt: &DateTime) -> JsonValue;
    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue;
    fn convert_binary(&self, bin: &Binary) -> JsonValue;
    fn convert_regex(&self, regex: &Regex) -> JsonValue;
    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue;
    fn convert_non_finite(&self, f: f64) -> JsonValue;

    /// Convert a BSON value to JSON (provided implementation)
    fn convert_to_json(&self, value: &Bson) -> JsonValue {
        match value {
            Bson::String(s) => self.convert_string(s),
            Bson::Int32(n) => JsonValue::Number((*n).into()),
            Bson::Int64(n) => JsonValue::Number((*n).into()),
            Bson::Double(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or_else(|| self.convert_non_finite(*f)),
            Bson::Boolean(b) => JsonValue::Bool(*b),
            Bson::Null | Bson::Undefined => JsonValue::Null,
            Bson::ObjectId(oid) => self.convert_object_id(oid),
            Bson::DateTime(dt) => self.convert_datetime(dt),
            Bson::Decimal128(d) => self.convert_decimal128(d),
            Bson::Array(arr) => JsonValue::Array(arr.iter().map(|v| self.convert_to_json(v)).collect()),
            Bson::Document(doc) => self.convert_document(doc),
            Bson::Binary(bin) => self.convert_binary(bin),
            Bson::RegularExpression(regex) => self.convert_regex(regex),
            Bson::Timestamp(ts) => self.convert_timestamp(ts),
            Bson::MinKey => JsonValue::String("MinKey".to_string()),
            Bson::MaxKey => JsonValue::String("MaxKey".to_string()),
            other => self.convert_string(&format!("{other}")),
        }
    }

    /// Convert a document, keeping key order
    fn convert_document(&self, doc: &Document) -> JsonValue {
        let map = doc
            .iter()
            .map(|(k, v)| (self.convert_key(k), self.convert_to_json(v)))
            .collect();
        JsonValue::Object(map)
    }
}

/// Strategy for converting BSON values into text
pub trait BsonStringConverter {
    fn format_string(&self, s: &str) -> String;
    fn format_double(&self, f: f64) -> String;
    fn format_object_id(&self, oid: &ObjectId) -> String;
    fn format_datetime(&self, dt: &DateTime) -> String;
    fn format_decimal128(&self, d: &Decimal128) -> String;
    fn format_regex(&self, regex: &Regex) -> String;
    fn format_array(&self, arr: &[Bson]) -> String;
    fn format_document(&self, doc: &Document) -> String;
    fn format_unknown(&self, value: &Bson) -> String;

    /// Convert a BSON value to text (provided implementation)
    fn convert_to_string(&self, value: &Bson) -> String {
        match value {
            Bson::String(s) => self.format_string(s),
            Bson::Int32(n) => n.to_string(),
            Bson::Int64(n) => n.to_string(),
            Bson::Double(f) => self.format_double(*f),
            Bson::Boolean(b) => b.to_string(),
            Bson::Null | Bson::Undefined => "null".to_string(),
            Bson::ObjectId(oid) => self.format_object_id(oid),
            Bson::DateTime(dt) => self.format_datetime(dt),
            Bson::Decimal128(d) => self.format_decimal128(d),
            Bson::RegularExpression(regex) => self.format_regex(regex),
            Bson::Array(arr) => self.format_array(arr),
            Bson::Document(doc) => self.format_document(doc),
            other => self.format_unknown(other),
        }
    }
}
