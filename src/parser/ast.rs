//! AST for the restricted literal language
//!
//! Only data literals and a closed set of type constructors exist here.
//! There are no member expressions, operators or arbitrary calls, so a
//! parsed tree can never describe executable behavior.

use std::ops::Range;

/// Span information for source locations
pub type Span = Range<usize>;

/// A literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Object literal: { key: value, ... }
    Object(ObjectLiteral),
    /// Array literal: [1, 2, 3]
    Array(Vec<Literal>),
    /// String literal: "hello" or 'world'
    String(String),
    /// Number literal, including a folded unary sign
    Number(f64),
    /// Boolean literal
    Boolean(bool),
    /// `null` or `undefined`
    Null,
    /// Regular expression literal: /pattern/flags
    Regex { pattern: String, flags: String },
    /// Type constructor: ObjectId('..'), new Date(..), NumberLong(..)
    Constructor(ConstructorCall),
}

/// Object literal with properties in source order
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub properties: Vec<Property>,
    pub span: Span,
}

impl ObjectLiteral {
    pub fn new(properties: Vec<Property>, span: Span) -> Self {
        Self { properties, span }
    }
}

/// Object property: key: value
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Literal,
}

impl Property {
    pub fn new(key: impl Into<String>, value: Literal) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Closed set of constructors accepted inside literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constructor {
    ObjectId,
    Date,
    NumberInt,
    NumberLong,
    NumberDecimal,
    RegExp,
}

impl Constructor {
    /// Resolve a constructor by name; anything not listed is rejected
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ObjectId" => Some(Constructor::ObjectId),
            "ISODate" | "Date" => Some(Constructor::Date),
            "NumberInt" => Some(Constructor::NumberInt),
            "NumberLong" | "Long" => Some(Constructor::NumberLong),
            "NumberDecimal" | "Decimal128" => Some(Constructor::NumberDecimal),
            "RegExp" => Some(Constructor::RegExp),
            _ => None,
        }
    }
}

/// Constructor invocation with literal arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorCall {
    pub constructor: Constructor,
    pub arguments: Vec<Literal>,
    pub span: Span,
}

impl ConstructorCall {
    pub fn new(constructor: Constructor, arguments: Vec<Literal>, span: Span) -> Self {
        Self {
            constructor,
            arguments,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_aliases() {
        assert_eq!(Constructor::from_name("ISODate"), Some(Constructor::Date));
        assert_eq!(Constructor::from_name("Long"), Some(Constructor::NumberLong));
        assert_eq!(
            Constructor::from_name("Decimal128"),
            Some(Constructor::NumberDecimal)
        );
        assert_eq!(Constructor::from_name("eval"), None);
        assert_eq!(Constructor::from_name("Function"), None);
    }
}
