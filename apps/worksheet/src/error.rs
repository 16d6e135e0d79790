//! # API Error Type
//!
//! The one error shape the worksheet ever sees.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in PowerTrack                             │
//! │                                                                         │
//! │  Worksheet UI                Rust Backend                               │
//! │  ────────────                ────────────                               │
//! │                                                                         │
//! │  worksheet create < submission.json                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Malformed JSON? ──── serde_json::Error ────────────┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Rejected? ───── EngineError::Rejected(CoreError) ── ApiError ──►│  │
//! │  │         │                                           ▲           │  │
//! │  │         ▼                                           │           │  │
//! │  │  Store failed? ─ EngineError::Persistence(DbError) ─┘ (logged)  │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "status": "error", "code": "NOT_FOUND",                             │
//! │    "message": "Vehicle not found: AB1234" }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are logged in full and reported with a generic message.
//! A storage error never reaches the UI text.

use serde::Serialize;
use tracing::error;
use ts_rs::TS;

use powertrack_core::CoreError;
use powertrack_db::DbError;
use powertrack_engine::EngineError;

/// Error returned from worksheet commands.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "At least one service must be selected"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Vehicle or service not found
    NotFound,

    /// The submission is malformed or breaks a business rule
    ValidationError,

    /// The store failed; nothing was written
    DatabaseError,

    /// The configured actor is not an active staff member
    Unauthorized,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// True when the submission itself was at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::NotFound | ErrorCode::ValidationError | ErrorCode::Unauthorized
        )
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                // An employee or creator id that is not a staff member.
                error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                error!("Check constraint violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors. Messages are shown as-is.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::VehicleNotFound(plate) => ApiError::not_found("Vehicle", &plate),
            CoreError::ServiceNotFound(id) => ApiError::not_found("Service", &id),
            other @ (CoreError::EmptySelection { .. }
            | CoreError::InvalidPaymentMethod(_)
            | CoreError::Validation(_)) => ApiError::validation(other.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Rejected(e) => e.into(),
            EngineError::Persistence(e) => e.into(),
        }
    }
}

/// A request body that does not parse.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::validation(format!("Malformed request: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
