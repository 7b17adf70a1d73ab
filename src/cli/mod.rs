//! Command-line harness for the console core
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and merging with arguments
//! - Building a single request from flags
//! - Printing the dispatch outcome as (colored) JSON

use clap::Parser;
use colored_json::prelude::*;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::executor::Response;
use crate::request::{RequestContext, RequestParams, UiMode};

/// Extract database name from MongoDB connection URI
///
/// Format: mongodb://[username:password@]host[:port][/database][?options]
fn extract_database_from_uri(uri: &str) -> Option<String> {
    let after_scheme = uri.split("://").nth(1)?;
    let path_part = after_scheme.split('/').nth(1)?;
    let db_name = path_part.split('?').next().unwrap_or("");

    if db_name.is_empty() {
        None
    } else {
        Some(db_name.to_string())
    }
}

/// Run one administration-console request against a MongoDB server
#[derive(Parser, Debug)]
#[command(
    name = "mongo-console",
    version,
    about = "Run one MongoDB admin-console request and print its result",
    long_about = "Builds a single console request from the given flags, dispatches it
against a live server and prints the view name and locals as JSON."
)]
pub struct CliArgs {
    /// MongoDB connection URI
    ///
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    #[arg(value_name = "URI")]
    pub uri: Option<String>,

    /// Database name (defaults to the URI path, then "test")
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Collection name; omit for database-scope requests
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Action (find, findById, update, remove, distinct, explain)
    #[arg(long, value_name = "ACTION")]
    pub action: Option<String>,

    /// Database or collection op (stats, processlist, indexes, ...)
    #[arg(long, value_name = "OP")]
    pub op: Option<String>,

    /// Query criteria literal, e.g. "{status: 'a'}"
    #[arg(long, value_name = "LITERAL")]
    pub criteria: Option<String>,

    /// Update operators literal, e.g. "{$set: {flag: true}}"
    #[arg(long, value_name = "LITERAL")]
    pub update: Option<String>,

    /// Projection fields, comma separated
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Sort entry as field:direction (repeatable)
    #[arg(long, value_name = "FIELD:DIR")]
    pub sort: Vec<String>,

    /// Page number
    #[arg(long, value_name = "N")]
    pub page: Option<String>,

    /// Field to summarize by distinct value
    #[arg(long, value_name = "FIELD")]
    pub distinct: Option<String>,

    /// Document id for findById
    #[arg(long, value_name = "ID")]
    pub byid: Option<String>,

    /// Use the mobile views
    #[arg(long)]
    pub mobile: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Connection timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// Parsed arguments plus the effective configuration
pub struct CliInterface {
    args: CliArgs,
    config: Config,
}

impl CliInterface {
    /// Parse process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load(args.config_file.as_deref())?;
        Self::apply_args_to_config(&mut config, args);
        config.validate()?;
        Ok(config)
    }

    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(uri) = &args.uri {
            config.connection.uri = uri.clone();
        }
        if let Some(timeout) = args.timeout {
            config.connection.connect_timeout = timeout;
        }
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.args.config_file.as_deref()
    }

    /// Database selected by `--database`, the URI path, or `test`
    pub fn database(&self) -> String {
        self.args
            .database
            .clone()
            .or_else(|| extract_database_from_uri(&self.config.connection.uri))
            .unwrap_or_else(|| "test".to_string())
    }

    /// Build the request described by the flags
    pub fn request_context(&self) -> Result<RequestContext> {
        let args = &self.args;

        let sort = args
            .sort
            .iter()
            .map(|entry| parse_sort_arg(entry))
            .collect::<Result<Vec<_>>>()?;

        let params = RequestParams {
            action: args.action.clone(),
            op: args.op.clone(),
            criteria: args.criteria.clone(),
            update: args.update.clone(),
            fields: args
                .fields
                .iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            sort,
            page: args.page.clone(),
            distinct: args.distinct.clone(),
            byid: args.byid.clone(),
            ..Default::default()
        };

        let ui_mode = if args.mobile {
            UiMode::Mobile
        } else {
            UiMode::Desktop
        };

        let database = self.database();
        let url = match &args.collection {
            Some(coll) => format!("/db/{database}/{coll}"),
            None => format!("/db/{database}"),
        };

        Ok(RequestContext::new(database, args.collection.clone(), ui_mode, params).with_url(url))
    }

    /// Pretty JSON for a dispatch outcome
    pub fn render(&self, response: &Response) -> String {
        self.colorize(&response.to_json())
    }

    /// Pretty JSON error object
    pub fn render_error(&self, err: &ConsoleError) -> String {
        let mut payload = err.to_payload();
        payload["status"] = serde_json::Value::from(err.status_code());
        self.colorize(&payload)
    }

    fn colorize(&self, value: &serde_json::Value) -> String {
        let json_str = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());

        if self.args.no_color {
            json_str
        } else {
            json_str.to_colored_json_auto().unwrap_or(json_str)
        }
    }
}

/// Split `field:direction`; a bare field sorts ascending
fn parse_sort_arg(entry: &str) -> Result<(String, String)> {
    let (field, direction) = match entry.rsplit_once(':') {
        Some((field, direction)) => (field.trim(), direction.trim()),
        None => (entry.trim(), "1"),
    };

    if field.is_empty() {
        return Err(ConsoleError::Precondition(format!(
            "Invalid sort argument: '{entry}'"
        )));
    }

    Ok((field.to_string(), direction.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Action;

    fn interface(argv: &[&str]) -> CliInterface {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);
        CliInterface { args, config }
    }

    #[test]
    fn test_extract_database_from_uri() {
        assert_eq!(
            extract_database_from_uri("mongodb://localhost:27017/shop?retryWrites=true"),
            Some("shop".to_string())
        );
        assert_eq!(extract_database_from_uri("mongodb://localhost:27017"), None);
        assert_eq!(extract_database_from_uri("mongodb://localhost:27017/"), None);
    }

    #[test]
    fn test_request_from_flags() {
        let cli = interface(&[
            "mongo-console",
            "mongodb://localhost:27017/shop",
            "--collection",
            "orders",
            "--action",
            "distinct",
            "--distinct",
            "status",
            "--fields",
            "a, b",
            "--sort",
            "n:-1",
            "--sort",
            "name",
        ]);

        let ctx = cli.request_context().unwrap();
        assert_eq!(ctx.database, "shop");
        assert_eq!(ctx.collection.as_deref(), Some("orders"));
        assert_eq!(ctx.action, Action::Distinct);
        assert_eq!(ctx.params.fields, vec!["a", "b"]);
        assert_eq!(
            ctx.params.sort,
            vec![
                ("n".to_string(), "-1".to_string()),
                ("name".to_string(), "1".to_string())
            ]
        );
        assert_eq!(ctx.url, "/db/shop/orders");
    }

    #[test]
    fn test_database_flag_wins() {
        let cli = interface(&["mongo-console", "mongodb://h/shop", "--database", "crm"]);
        assert_eq!(cli.database(), "crm");

        let cli = interface(&["mongo-console"]);
        assert_eq!(cli.database(), "test");
        assert_eq!(cli.request_context().unwrap().op.as_deref(), Some("stats"));
    }

    #[test]
    fn test_bad_sort_argument() {
        let cli = interface(&["mongo-console", "--sort", ":1"]);
        assert!(cli.request_context().is_err());
    }

    #[test]
    fn test_render_without_color() {
        let cli = interface(&["mongo-console", "--no-color"]);
        let err = ConsoleError::OpNotDefined("bogus".to_string());
        let out = cli.render_error(&err);
        assert!(out.contains("\"error\": \"op bogus not defined\""));
        assert!(out.contains("\"status\": 404"));
    }
}
