//! Literal AST to BSON converter

use mongodb::bson::{
    Bson, DateTime, Decimal128, Document, Regex, oid::ObjectId,
};

use super::ast::{Constructor, ConstructorCall, Literal, ObjectLiteral};
use crate::error::ParseError;

type ConvertResult<T> = std::result::Result<T, ParseError>;

/// Regex options understood by the server
const REGEX_OPTIONS: &str = "imsux";

/// Converter for parsed literals to BSON
pub struct LiteralConverter;

impl LiteralConverter {
    /// Convert a literal to a BSON value
    pub fn to_bson(literal: &Literal) -> ConvertResult<Bson> {
        match literal {
            Literal::Object(obj) => Self::object_to_document(obj).map(Bson::Document),
            Literal::Array(items) => items
                .iter()
                .map(Self::to_bson)
                .collect::<ConvertResult<Vec<_>>>()
                .map(Bson::Array),
            Literal::String(s) => Ok(Bson::String(s.clone())),
            Literal::Number(n) => Ok(number_to_bson(*n)),
            Literal::Boolean(b) => Ok(Bson::Boolean(*b)),
            Literal::Null => Ok(Bson::Null),
            Literal::Regex { pattern, flags } => Ok(regex_to_bson(pattern, flags)),
            Literal::Constructor(call) => Self::constructor_to_bson(call),
        }
    }

    /// Convert an object literal to a document, keeping property order.
    /// A repeated key keeps its first position and takes the last value.
    pub fn object_to_document(obj: &ObjectLiteral) -> ConvertResult<Document> {
        let mut doc = Document::new();
        for prop in &obj.properties {
            doc.insert(prop.key.clone(), Self::to_bson(&prop.value)?);
        }
        Ok(doc)
    }

    fn constructor_to_bson(call: &ConstructorCall) -> ConvertResult<Bson> {
        let first = call.arguments.first();

        match call.constructor {
            Constructor::ObjectId => match first {
                None => Ok(Bson::ObjectId(ObjectId::new())),
                Some(Literal::String(hex)) => ObjectId::parse_str(hex)
                    .map(Bson::ObjectId)
                    .map_err(|e| ParseError::InvalidLiteral(format!("Invalid ObjectId: {e}"))),
                Some(_) => Err(ParseError::InvalidLiteral(
                    "ObjectId argument must be string".to_string(),
                )),
            },
            Constructor::Date => match first {
                None => Ok(Bson::DateTime(DateTime::now())),
                Some(Literal::String(s)) => DateTime::parse_rfc3339_str(s)
                    .map(Bson::DateTime)
                    .map_err(|e| ParseError::InvalidLiteral(format!("Invalid date string: {e}"))),
                Some(Literal::Number(millis)) => {
                    Ok(Bson::DateTime(DateTime::from_millis(*millis as i64)))
                }
                Some(_) => Err(ParseError::InvalidLiteral(
                    "Date argument must be string or number".to_string(),
                )),
            },
            Constructor::NumberInt => match first {
                Some(Literal::Number(n)) => Ok(Bson::Int32(*n as i32)),
                Some(Literal::String(s)) => s
                    .trim()
                    .parse::<i32>()
                    .map(Bson::Int32)
                    .map_err(|e| ParseError::InvalidLiteral(format!("Invalid int: {e}"))),
                _ => Err(ParseError::InvalidLiteral(
                    "NumberInt requires a number or string argument".to_string(),
                )),
            },
            Constructor::NumberLong => match first {
                Some(Literal::Number(n)) => Ok(Bson::Int64(*n as i64)),
                Some(Literal::String(s)) => s
                    .trim()
                    .parse::<i64>()
                    .map(Bson::Int64)
                    .map_err(|e| ParseError::InvalidLiteral(format!("Invalid long: {e}"))),
                _ => Err(ParseError::InvalidLiteral(
                    "NumberLong requires a number or string argument".to_string(),
                )),
            },
            Constructor::NumberDecimal => {
                let text = match first {
                    Some(Literal::String(s)) => s.trim().to_string(),
                    Some(Literal::Number(n)) => n.to_string(),
                    _ => {
                        return Err(ParseError::InvalidLiteral(
                            "NumberDecimal requires a number or string argument".to_string(),
                        ));
                    }
                };
                text.parse::<Decimal128>()
                    .map(Bson::Decimal128)
                    .map_err(|e| ParseError::InvalidLiteral(format!("Invalid decimal: {e}")))
            }
            Constructor::RegExp => {
                let pattern = match first {
                    Some(Literal::String(s)) => s.as_str(),
                    Some(Literal::Regex { pattern, .. }) => pattern.as_str(),
                    _ => {
                        return Err(ParseError::InvalidLiteral(
                            "RegExp requires a pattern argument".to_string(),
                        ));
                    }
                };
                let flags = match (call.arguments.get(1), first) {
                    (Some(Literal::String(f)), _) => f.as_str(),
                    (None, Some(Literal::Regex { flags, .. })) => flags.as_str(),
                    (None, _) => "",
                    (Some(_), _) => {
                        return Err(ParseError::InvalidLiteral(
                            "RegExp flags must be a string".to_string(),
                        ));
                    }
                };
                Ok(regex_to_bson(pattern, flags))
            }
        }
    }
}

/// Whole numbers in the i64 range become Int64, everything else Double
fn number_to_bson(n: f64) -> Bson {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Bson::Int64(n as i64)
    } else {
        Bson::Double(n)
    }
}

fn regex_to_bson(pattern: &str, flags: &str) -> Bson {
    let mut options: Vec<char> = flags.chars().filter(|c| REGEX_OPTIONS.contains(*c)).collect();
    options.sort_unstable();
    options.dedup();

    Bson::RegularExpression(Regex {
        pattern: pattern.to_string(),
        options: options.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::literal_parser::LiteralParser;

    fn convert(input: &str) -> ConvertResult<Bson> {
        LiteralConverter::to_bson(&LiteralParser::parse(input)?)
    }

    fn convert_doc(input: &str) -> Document {
        match convert(input).unwrap() {
            Bson::Document(doc) => doc,
            other => panic!("Expected document, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_object() {
        let doc = convert_doc("{name: 'John', age: 30, score: 9.5, active: true, x: null}");
        assert_eq!(doc.get_str("name").unwrap(), "John");
        assert_eq!(doc.get_i64("age").unwrap(), 30);
        assert_eq!(doc.get_f64("score").unwrap(), 9.5);
        assert!(doc.get_bool("active").unwrap());
        assert_eq!(doc.get("x"), Some(&Bson::Null));
    }

    #[test]
    fn test_nested_operators() {
        let doc = convert_doc("{age: {$gt: 18, $lte: 65}, tags: {$in: ['a', 'b']}}");
        let age = doc.get_document("age").unwrap();
        assert_eq!(age.get_i64("$gt").unwrap(), 18);
        let tags = doc.get_document("tags").unwrap();
        assert_eq!(tags.get_array("$in").unwrap().len(), 2);
    }

    #[test]
    fn test_key_order_preserved() {
        let doc = convert_doc("{z: 1, a: 2, m: 3}");
        let keys: Vec<_> = doc.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_object_id() {
        let doc = convert_doc("{_id: ObjectId('507f1f77bcf86cd799439011')}");
        assert_eq!(
            doc.get_object_id("_id").unwrap().to_hex(),
            "507f1f77bcf86cd799439011"
        );
        assert!(matches!(
            convert("{_id: ObjectId('nope')}"),
            Err(ParseError::InvalidLiteral(_))
        ));
        assert!(matches!(
            convert_doc("{_id: ObjectId()}").get("_id"),
            Some(Bson::ObjectId(_))
        ));
    }

    #[test]
    fn test_dates() {
        let doc = convert_doc("{a: ISODate('2020-01-01T00:00:00Z'), b: new Date(1000)}");
        assert_eq!(
            doc.get_datetime("a").unwrap().timestamp_millis(),
            1_577_836_800_000
        );
        assert_eq!(doc.get_datetime("b").unwrap().timestamp_millis(), 1000);
        assert!(convert("{a: ISODate('yesterday')}").is_err());
    }

    #[test]
    fn test_numeric_constructors() {
        let doc = convert_doc("{a: NumberInt(5), b: NumberLong('9000000000'), c: -3}");
        assert_eq!(doc.get_i32("a").unwrap(), 5);
        assert_eq!(doc.get_i64("b").unwrap(), 9_000_000_000);
        assert_eq!(doc.get_i64("c").unwrap(), -3);
        assert!(matches!(
            convert_doc("{d: NumberDecimal('1.50')}").get("d"),
            Some(Bson::Decimal128(_))
        ));
    }

    #[test]
    fn test_regex() {
        let doc = convert_doc("{name: /^jo/gi, other: RegExp('x+', 'm')}");
        match doc.get("name") {
            Some(Bson::RegularExpression(re)) => {
                assert_eq!(re.pattern, "^jo");
                assert_eq!(re.options, "i");
            }
            other => panic!("Expected regex, got {other:?}"),
        }
        match doc.get("other") {
            Some(Bson::RegularExpression(re)) => assert_eq!(re.options, "m"),
            other => panic!("Expected regex, got {other:?}"),
        }
    }

    #[test]
    fn test_regex_options_sorted() {
        match convert("/x/mi").unwrap() {
            Bson::RegularExpression(re) => {
                assert_eq!(re.pattern, "x");
                assert_eq!(re.options, "im");
            }
            other => panic!("Expected regex, got {other:?}"),
        }

        match convert("RegExp('y', 'xmsim')").unwrap() {
            Bson::RegularExpression(re) => assert_eq!(re.options, "imsx"),
            other => panic!("Expected regex, got {other:?}"),
        }
    }

    #[test]
    fn test_special_numbers() {
        assert_eq!(convert("1e3").unwrap(), Bson::Int64(1000));
        assert!(matches!(convert("Infinity").unwrap(), Bson::Double(f) if f.is_infinite()));
        assert!(matches!(convert("NaN").unwrap(), Bson::Double(f) if f.is_nan()));
    }
}
