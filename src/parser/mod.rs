//! Restricted literal parser for user-supplied query and update text
//!
//! Request parameters such as `criteria` and `update` arrive as loosely
//! structured JavaScript-like object literals. They are evaluated by a
//! literal-only grammar instead of a script engine, so text like
//! `{a: process.exit()}` is a parse error rather than a side effect.
//!
//! # Architecture
//!
//! - `lexer`: error-tolerant tokenizer
//! - `literal_parser`: recursive-descent parser producing an `ast::Literal`
//! - `converter`: AST to BSON conversion, including type constructors
//! - `evaluator`: entry points used by request dispatch
//!
//! # Examples
//!
//! ```
//! use mongo_console::parser::LiteralEvaluator;
//!
//! let filter = LiteralEvaluator::evaluate("{ age: { $gt: 18 }, name: /^jo/i }").unwrap();
//! assert!(filter.contains_key("age"));
//!
//! assert!(LiteralEvaluator::evaluate("{ a: require('fs') }").is_err());
//! ```

pub mod ast;
mod converter;
mod evaluator;
mod lexer;
mod literal_parser;

pub use converter::LiteralConverter;
pub use evaluator::{DEFAULT_CRITERIA, DEFAULT_UPDATE, LiteralEvaluator};
pub use lexer::{LiteralLexer, Token, TokenKind};
pub use literal_parser::LiteralParser;
