//! MongoDB admin console - single-request harness
//!
//! Builds one console request from command-line flags, dispatches it against
//! a live server and prints the chosen view and its locals as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Database stats
//! mongo-console mongodb://localhost:27017/shop
//!
//! # Second page of a collection, newest first
//! mongo-console mongodb://localhost:27017/shop --collection orders --page 2
//! ```

use std::sync::Arc;
use tracing::{Level, debug};

use mongo_console::cli::CliInterface;
use mongo_console::client::MongoClient;
use mongo_console::error::Result;
use mongo_console::executor::Dispatcher;

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Parse flags, connect, dispatch one request and print the outcome.
///
/// Dispatch failures are printed as an error object; only startup failures
/// (configuration, connection) bubble up to `main`.
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if let Some(path) = cli.config_path() {
        debug!("Using configuration file {}", path.display());
    }

    let ctx = cli.request_context()?;
    let client = MongoClient::connect(cli.config()).await?;
    let dispatcher = Dispatcher::new(Arc::new(client), cli.config().clone());

    match dispatcher.process(&ctx).await {
        Ok(response) => {
            println!("{}", cli.render(&response));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", cli.render_error(&e));
            std::process::exit(1);
        }
    }
}

/// Initialize logging system
///
/// Sets up tracing subscriber with appropriate log level based on CLI flags
/// and configuration.
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
