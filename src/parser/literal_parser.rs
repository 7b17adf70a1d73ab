//! Recursive-descent parser for query and update literals
//!
//! Accepts a JSON superset: unquoted and `$`-prefixed keys, single-quoted
//! strings, trailing commas, signed numbers, regular expression literals and
//! the constructors listed in [`Constructor`]. Any other syntax is rejected.

use super::ast::{Constructor, ConstructorCall, Literal, ObjectLiteral, Property};
use super::lexer::{LiteralLexer, Token, TokenKind};
use crate::error::ParseError;

/// Nesting limit for objects, arrays and constructor arguments
const MAX_DEPTH: usize = 128;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Literal parser over a token stream
pub struct LiteralParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl LiteralParser {
    pub fn new(input: &str) -> Self {
        Self {
            tokens: LiteralLexer::tokenize(input),
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole input as exactly one literal
    pub fn parse(input: &str) -> ParseResult<Literal> {
        let mut parser = Self::new(input);
        let value = parser.parse_value()?;

        if !parser.check(&TokenKind::Eof) {
            return Err(ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: parser.describe_current(),
            });
        }

        Ok(value)
    }

    fn parse_value(&mut self) -> ParseResult<Literal> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::SyntaxError(format!(
                "Literal nested deeper than {MAX_DEPTH} levels"
            )));
        }

        let value = self.parse_value_inner();
        self.depth -= 1;
        value
    }

    fn parse_value_inner(&mut self) -> ParseResult<Literal> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::LBrace => self.parse_object(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::String(s) => {
                self.advance();
                Ok(Literal::String(s))
            }
            TokenKind::Number(n) => {
                self.advance();
                parse_number(&n).map(Literal::Number)
            }
            TokenKind::Minus | TokenKind::Plus => self.parse_signed_number(),
            TokenKind::Regex { pattern, flags } => {
                self.advance();
                Ok(Literal::Regex { pattern, flags })
            }
            TokenKind::Ident(name) => self.parse_identifier(name),
            TokenKind::Invalid(msg) => Err(ParseError::SyntaxError(msg)),
            _ => Err(ParseError::UnexpectedToken {
                expected: "a value".to_string(),
                found: self.describe_current(),
            }),
        }
    }

    /// Parse `-n` / `+n`; signs only apply to number literals
    fn parse_signed_number(&mut self) -> ParseResult<Literal> {
        let negative = self.check(&TokenKind::Minus);
        self.advance();

        let magnitude = match &self.current().kind {
            TokenKind::Number(n) => parse_number(n)?,
            TokenKind::Ident(name) if name == "Infinity" => f64::INFINITY,
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a number after sign".to_string(),
                    found: self.describe_current(),
                });
            }
        };
        self.advance();

        Ok(Literal::Number(if negative { -magnitude } else { magnitude }))
    }

    /// Parse keywords and constructor calls
    fn parse_identifier(&mut self, name: String) -> ParseResult<Literal> {
        let start = self.current().span.start;
        self.advance();

        match name.as_str() {
            "true" => return Ok(Literal::Boolean(true)),
            "false" => return Ok(Literal::Boolean(false)),
            "null" | "undefined" => return Ok(Literal::Null),
            "Infinity" => return Ok(Literal::Number(f64::INFINITY)),
            "NaN" => return Ok(Literal::Number(f64::NAN)),
            _ => {}
        }

        let ctor_name = if name == "new" {
            match &self.current().kind {
                TokenKind::Ident(ctor) => {
                    let ctor = ctor.clone();
                    self.advance();
                    ctor
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "constructor name after 'new'".to_string(),
                        found: self.describe_current(),
                    });
                }
            }
        } else {
            name
        };

        let constructor = Constructor::from_name(&ctor_name).ok_or_else(|| {
            ParseError::InvalidLiteral(format!("Unknown identifier: {ctor_name}"))
        })?;

        self.expect(&TokenKind::LParen, "'(' after constructor name")?;
        let arguments = self.parse_arguments()?;
        self.expect(&TokenKind::RParen, "')' after constructor arguments")?;

        let end = self.previous_end();
        Ok(Literal::Constructor(ConstructorCall::new(
            constructor,
            arguments,
            start..end,
        )))
    }

    /// Parse object literal: { key: value, ... }
    fn parse_object(&mut self) -> ParseResult<Literal> {
        let start = self.current().span.start;
        self.expect(&TokenKind::LBrace, "'{'")?;

        let mut properties = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            let key = self.parse_property_key()?;
            self.expect(&TokenKind::Colon, "':' after property key")?;
            let value = self.parse_value()?;
            properties.push(Property::new(key, value));

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBrace, "',' or '}' after property")?;
        let end = self.previous_end();

        Ok(Literal::Object(ObjectLiteral::new(properties, start..end)))
    }

    /// Parse property key (identifier, string, or number)
    fn parse_property_key(&mut self) -> ParseResult<String> {
        let key = match &self.current().kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::String(s) => s.clone(),
            TokenKind::Number(n) => n.clone(),
            TokenKind::Invalid(msg) => return Err(ParseError::SyntaxError(msg.clone())),
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "property key".to_string(),
                    found: self.describe_current(),
                });
            }
        };
        self.advance();
        Ok(key)
    }

    /// Parse array literal: [elem1, elem2, ...]
    fn parse_array(&mut self) -> ParseResult<Literal> {
        self.expect(&TokenKind::LBracket, "'['")?;

        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBracket) {
            elements.push(self.parse_value()?);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RBracket, "',' or ']' after array element")?;

        Ok(Literal::Array(elements))
    }

    /// Parse constructor arguments up to the closing parenthesis
    fn parse_arguments(&mut self) -> ParseResult<Vec<Literal>> {
        let mut arguments = Vec::new();

        while !self.check(&TokenKind::RParen) {
            arguments.push(self.parse_value()?);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(arguments)
    }

    // Token manipulation methods

    fn current(&self) -> &Token {
        // tokenize() always ends with Eof and advance() never moves past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> ParseResult<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else if let TokenKind::Invalid(msg) = &self.current().kind {
            Err(ParseError::SyntaxError(msg.clone()))
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.describe_current(),
            })
        }
    }

    fn previous_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn describe_current(&self) -> String {
        let token = self.current();
        let what = match &token.kind {
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Regex { .. } => "regular expression".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Eof => return "end of input".to_string(),
            TokenKind::Invalid(msg) => msg.clone(),
            TokenKind::Unknown(c) => format!("'{c}'"),
        };
        format!("{what} at position {}", token.span.start)
    }
}

fn parse_number(text: &str) -> ParseResult<f64> {
    text.parse::<f64>()
        .map_err(|_| ParseError::SyntaxError(format!("Invalid number: {text}")))
}
