//! Display-safe JSON for result pages
//!
//! Every key and string value is HTML-escaped so documents can be embedded
//! in a page without further treatment.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp, oid::ObjectId};
use serde_json::Value as JsonValue;

use super::BsonJsonConverter;
use super::literal::to_literal;

/// Shell-style, HTML-escaped converter
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayConverter;

impl BsonJsonConverter for DisplayConverter {
    fn convert_string(&self, s: &str) -> JsonValue {
        JsonValue::String(escape_html(s))
    }

    fn convert_key(&self, key: &str) -> String {
        escape_html(key)
    }

    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue {
        JsonValue::String(format!("ObjectId('{}')", oid.to_hex()))
    }

    fn convert_datetime(&self, dt: &DateTime) -> JsonValue {
        let text = dt
            .try_to_rfc3339_string()
            .unwrap_or_else(|_| dt.timestamp_millis().to_string());
        JsonValue::String(format!("ISODate('{text}')"))
    }

    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue {
        JsonValue::String(format!("NumberDecimal('{d}')"))
    }

    fn convert_binary(&self, bin: &Binary) -> JsonValue {
        let subtype: u8 = bin.subtype.into();
        JsonValue::String(format!(
            "BinData({}, '{}')",
            subtype,
            BASE64.encode(&bin.bytes)
        ))
    }

    fn convert_regex(&self, regex: &Regex) -> JsonValue {
        JsonValue::String(escape_html(&format!("/{}/{}", regex.pattern, regex.options)))
    }

    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue {
        JsonValue::String(format!("Timestamp({}, {})", ts.time, ts.increment))
    }

    fn convert_non_finite(&self, f: f64) -> JsonValue {
        let text = if f.is_nan() {
            "NaN"
        } else if f.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        JsonValue::String(text.to_string())
    }
}

/// Display-safe copy of a whole document
pub fn sanitize_document(doc: &Document) -> JsonValue {
    DisplayConverter.convert_document(doc)
}

/// Key under which a document is stored in a result set
pub fn document_key(doc: &Document) -> String {
    match doc.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        Some(other) => to_literal(other),
        None => String::new(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, spec::BinarySubtype};
    use serde_json::json;

    #[test]
    fn test_escapes_keys_and_strings() {
        let doc = doc! { "<b>": "<script>alert('x')</script>", "n": { "q": "a & \"b\"" } };
        assert_eq!(
            sanitize_document(&doc),
            json!({
                "&lt;b&gt;": "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;",
                "n": { "q": "a &amp; &quot;b&quot;" }
            })
        );
    }

    #[test]
    fn test_shell_style_wrappers() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let doc = doc! {
            "_id": oid,
            "at": DateTime::from_millis(0),
            "n": 5_i64,
            "ratio": 0.5,
            "bad": f64::NAN,
            "bin": Binary { subtype: BinarySubtype::Generic, bytes: vec![1, 2, 3] },
        };

        let json = sanitize_document(&doc);
        assert_eq!(json["_id"], "ObjectId('507f1f77bcf86cd799439011')");
        assert_eq!(json["at"], "ISODate('1970-01-01T00:00:00Z')");
        assert_eq!(json["n"], 5);
        assert_eq!(json["ratio"], 0.5);
        assert_eq!(json["bad"], "NaN");
        assert_eq!(json["bin"], "BinData(0, 'AQID')");
    }

    #[test]
    fn test_key_order_preserved() {
        let json = sanitize_document(&doc! { "z": 1, "a": 2 });
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_document_key() {
        let oid = ObjectId::new();
        assert_eq!(document_key(&doc! { "_id": oid }), oid.to_hex());
        assert_eq!(document_key(&doc! { "_id": "abc" }), "abc");
        assert_eq!(document_key(&doc! { "_id": 7 }), "7");
        assert_eq!(document_key(&doc! { "_id": { "a": 1 } }), r#"{"a":1}"#);
    }
}
