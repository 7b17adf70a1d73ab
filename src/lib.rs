//! MongoDB admin console core
//!
//! Request processing for a web-based MongoDB administration console: each
//! request names a database, an optional collection, an action and an
//! optional op, and is turned into driver calls plus a view name with its
//! template locals.
//!
//! # Modules
//!
//! - `cli`: Single-request command-line harness
//! - `client`: Database client boundary and the MongoDB implementation
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `executor`: Request dispatch and view assembly
//! - `formatter`: BSON display and literal rendering
//! - `parser`: Safe evaluation of shell-style literal text
//! - `request`: Request context and parameters
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mongo_console::{Config, Dispatcher, MongoClient, RequestContext, RequestParams};
//! use mongo_console::request::UiMode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = MongoClient::connect(&config).await?;
//!     let dispatcher = Dispatcher::new(Arc::new(client), config);
//!
//!     let ctx = RequestContext::new(
//!         "shop".to_string(),
//!         Some("orders".to_string()),
//!         UiMode::Desktop,
//!         RequestParams::default(),
//!     );
//!     let response = dispatcher.process(&ctx).await?;
//!     println!("{}", response.to_json());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod parser;
pub mod request;

// Re-export commonly used types
pub use client::{DatabaseClient, MongoClient};
pub use config::Config;
pub use error::{ConsoleError, Result};
pub use executor::{Dispatcher, Response};
pub use request::{RequestContext, RequestParams};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
