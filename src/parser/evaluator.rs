//! Query and update text evaluation
//!
//! Turns user-supplied text into a BSON document or a `ParseError`. Nothing
//! in the input is ever executed; see [`LiteralParser`] for the grammar.

use mongodb::bson::{Document, doc, oid::ObjectId};
use tracing::debug;

use super::ast::Literal;
use super::converter::LiteralConverter;
use super::literal_parser::LiteralParser;
use crate::error::ParseError;

/// Placeholder shown in the criteria box when no criteria was supplied
pub const DEFAULT_CRITERIA: &str = "{\n\t\n}";

/// Placeholder shown in the update box when no update was supplied
pub const DEFAULT_UPDATE: &str = "{\n\t'$set': {\n\t\t\n\t}\n}";

/// Evaluator for query, update and identifier text
pub struct LiteralEvaluator;

impl LiteralEvaluator {
    /// Evaluate text whose top-level value must be an object.
    /// Blank text evaluates to an empty document.
    pub fn evaluate(text: &str) -> Result<Document, ParseError> {
        let cleaned: String = text
            .chars()
            .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
            .collect();

        if cleaned.trim().is_empty() {
            return Ok(Document::new());
        }

        match LiteralParser::parse(&cleaned)? {
            Literal::Object(obj) => {
                let doc = LiteralConverter::object_to_document(&obj)?;
                debug!("Evaluated literal to document with {} keys", doc.len());
                Ok(doc)
            }
            _ => Err(ParseError::InvalidLiteral(
                "Expected an object literal".to_string(),
            )),
        }
    }

    /// Evaluate optional criteria text; absent criteria is the empty filter
    pub fn evaluate_query(criteria: Option<&str>) -> Result<Document, ParseError> {
        match criteria {
            Some(text) => Self::evaluate(text),
            None => Ok(Document::new()),
        }
    }

    /// Evaluate update text; errors carry the update-conditions prefix.
    /// An update without any operator is rejected.
    pub fn evaluate_update(update: &str) -> Result<Document, ParseError> {
        let doc = Self::evaluate(update).map_err(|e| ParseError::UpdateConditions(Box::new(e)))?;
        if doc.is_empty() {
            return Err(ParseError::UpdateConditions(Box::new(
                ParseError::InvalidLiteral("Expected update operators".to_string()),
            )));
        }
        Ok(doc)
    }

    /// Build the `{_id: ...}` filter for a findById request
    pub fn query_by_id(id: &str) -> Result<Document, ParseError> {
        let id = id.trim();
        ObjectId::parse_str(id)
            .map(|oid| doc! { "_id": oid })
            .map_err(|_| ParseError::InvalidIdentifier(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_blank_input_is_empty_filter() {
        assert_eq!(LiteralEvaluator::evaluate("").unwrap(), Document::new());
        assert_eq!(LiteralEvaluator::evaluate("  \n\t").unwrap(), Document::new());
        assert_eq!(
            LiteralEvaluator::evaluate(DEFAULT_CRITERIA).unwrap(),
            Document::new()
        );
        assert_eq!(LiteralEvaluator::evaluate_query(None).unwrap(), Document::new());
    }

    #[test]
    fn test_default_update_template_parses() {
        let doc = LiteralEvaluator::evaluate_update(DEFAULT_UPDATE).unwrap();
        assert_eq!(doc, doc! { "$set": {} });
    }

    #[test]
    fn test_multiline_criteria() {
        let doc = LiteralEvaluator::evaluate("{\n\tstatus: 'a',\r\n\tn: {$gt: 2}\n}").unwrap();
        assert_eq!(doc, doc! { "status": "a", "n": { "$gt": 2_i64 } });
    }

    #[test]
    fn test_top_level_must_be_object() {
        for input in ["[1, 2]", "'text'", "42", "null"] {
            assert!(matches!(
                LiteralEvaluator::evaluate(input),
                Err(ParseError::InvalidLiteral(_))
            ));
        }
    }

    #[test]
    fn test_code_is_rejected() {
        assert!(LiteralEvaluator::evaluate("{a: db.dropDatabase()}").is_err());
        assert!(LiteralEvaluator::evaluate("while(true){}").is_err());
    }

    #[test]
    fn test_update_error_prefix() {
        let err = LiteralEvaluator::evaluate_update("{$set: {a: }").unwrap_err();
        assert!(matches!(err, ParseError::UpdateConditions(_)));
        assert!(err.to_string().starts_with("Update conditions error: "));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        for input in ["", "  \n ", "{\n\t\n}"] {
            assert!(matches!(
                LiteralEvaluator::evaluate_update(input),
                Err(ParseError::UpdateConditions(_))
            ));
        }
    }

    #[test]
    fn test_query_by_id() {
        let filter = LiteralEvaluator::query_by_id("507f1f77bcf86cd799439011").unwrap();
        assert!(matches!(filter.get("_id"), Some(Bson::ObjectId(_))));

        assert!(matches!(
            LiteralEvaluator::query_by_id("abc"),
            Err(ParseError::InvalidIdentifier(_))
        ));
    }
}
