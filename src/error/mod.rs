//! Error handling for console request processing.
//!
//! This module provides:
//! - The crate-wide [`ConsoleError`] type and `Result` alias
//! - Literal evaluation errors ([`ParseError`]) surfaced as user-correctable input errors
//! - Client boundary errors ([`ClientError`]) such as per-operation timeouts
//! - Structured extraction of MongoDB driver errors
//!
//! # Example
//!
//! ```rust
//! use mongo_console::error::{ConsoleError, ParseError};
//!
//! let err: ConsoleError = ParseError::InvalidLiteral("Unknown identifier: foo".into()).into();
//! assert_eq!(err.status_code(), 400);
//! ```

pub mod kinds;
pub mod mongo;

pub use kinds::{ClientError, ConfigError, ConsoleError, ParseError, Result};
pub use mongo::ErrorInfo;
