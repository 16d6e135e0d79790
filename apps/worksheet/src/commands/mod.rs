//! # Worksheet Commands
//!
//! One function per operation the worksheet can ask for. Each takes the
//! shared [`AppState`] and a typed request, and returns a serialisable
//! response or an [`ApiError`].
//!
//! | Command   | Request                     | Response                      |
//! |-----------|-----------------------------|-------------------------------|
//! | `create`  | `CreateTransactionRequest`  | `CreateTransactionResponse`   |
//! | `preview` | `PreviewTransactionRequest` | `PreviewOutcome`              |
//! | `lookup`  | `LookupVehicleRequest`      | `LookupVehicleResponse`       |

pub mod transaction;
pub mod vehicle;

use clap::Subcommand;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

pub use transaction::*;
pub use vehicle::*;

/// Operations exposed by the `worksheet` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Price and record a worksheet
    Create,
    /// Price a worksheet without recording it
    Preview,
    /// Look a vehicle up by plate
    Lookup,
}

/// Parses `body` for `command`, runs it, and returns the JSON reply.
pub async fn dispatch(state: &AppState, command: Command, body: &str) -> Result<Value, ApiError> {
    match command {
        Command::Create => to_value(create_transaction(state, parse(body)?).await?),
        Command::Preview => to_value(preview_transaction(state, parse(body)?).await?),
        Command::Lookup => to_value(lookup_vehicle(state, parse(body)?).await?),
    }
}

/// The JSON printed for a failed command.
pub fn error_reply(err: &ApiError) -> Value {
    serde_json::json!({
        "status": "error",
        "code": err.code,
        "message": err.message,
    })
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

fn to_value<T: Serialize>(response: T) -> Result<Value, ApiError> {
    serde_json::to_value(response).map_err(|e| ApiError::internal(e.to_string()))
}
