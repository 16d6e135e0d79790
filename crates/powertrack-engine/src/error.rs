//! # Engine Errors
//!
//! Two causes, kept apart so the boundary can tell them apart:
//!
//! ```text
//! EngineError
//! ├── Rejected(CoreError)    the worksheet is wrong; nothing was written
//! │   ├── VehicleNotFound
//! │   ├── ServiceNotFound
//! │   ├── EmptySelection
//! │   ├── InvalidPaymentMethod
//! │   └── Validation
//! └── Persistence(DbError)   the store failed; the unit of work rolled back
//! ```

use thiserror::Error;

use powertrack_core::{CoreError, ValidationError};
use powertrack_db::DbError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),
}

impl EngineError {
    /// True when the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::Rejected(_))
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Rejected(CoreError::Validation(err))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_client_error() {
        let err: EngineError = CoreError::VehicleNotFound("AB1234".to_string()).into();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Vehicle not found: AB1234");
    }

    #[test]
    fn test_persistence_is_not_client_error() {
        let err: EngineError = DbError::PoolExhausted.into();
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_validation_error_is_rejection() {
        let err: EngineError = ValidationError::Required {
            field: "license plate".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::Rejected(CoreError::Validation(_))));
    }
}
