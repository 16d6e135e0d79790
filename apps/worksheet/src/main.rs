//! # Worksheet Binary
//!
//! JSON in on stdin, JSON out on stdout, logs on stderr.
//!
//! ```text
//! $ echo '{"plate":"AB-12 34"}' | worksheet lookup
//! {"status":"found","vehicleId":"...","licensePlate":"AB1234",...}
//!
//! $ worksheet create < submission.json
//! {"status":"created","transactionId":"...","totalPrice":"27.00",...}
//! ```
//!
//! ## Exit Codes
//! - 0: success (including a `vehicle_not_found` preview or lookup)
//! - 1: storage or internal failure, or startup failure
//! - 2: the request was rejected

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use powertrack_worksheet::config::DEFAULT_CONFIG_FILE;
use powertrack_worksheet::{dispatch, error_reply, init_tracing, AppConfig, AppState, Command};

#[derive(Parser, Debug)]
#[command(name = "worksheet", author, version, about = "PowerTrack wash worksheet")]
struct Args {
    /// Path to configuration file
    #[arg(short = 'c', long, env = "POWERTRACK_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = AppConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    init_tracing(&config.log_level);
    info!(command = ?args.command, "Starting worksheet");

    let state = AppState::open(config).await.context("Failed to open database")?;

    let mut body = String::new();
    tokio::io::stdin()
        .read_to_string(&mut body)
        .await
        .context("Failed to read request from stdin")?;

    let (reply, code) = match dispatch(&state, args.command, &body).await {
        Ok(reply) => (reply, ExitCode::SUCCESS),
        Err(err) if err.is_client_error() => {
            warn!(code = ?err.code, message = %err.message, "Request rejected");
            (error_reply(&err), ExitCode::from(2))
        }
        Err(err) => {
            error!(code = ?err.code, message = %err.message, "Request failed");
            (error_reply(&err), ExitCode::FAILURE)
        }
    };

    println!("{}", reply);

    state.engine.database().close().await;
    Ok(code)
}
