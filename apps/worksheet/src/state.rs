//! # Application State
//!
//! What every command receives: the engine and the startup configuration.
//! Both are read-only after [`AppState::open`].

use tracing::info;

use powertrack_db::{Database, DbError};
use powertrack_engine::WashEngine;

use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: WashEngine,
    pub config: AppConfig,
}

impl AppState {
    /// Connects to the configured database (running migrations if enabled).
    pub async fn open(config: AppConfig) -> Result<Self, DbError> {
        let db = Database::new(config.db_config()).await?;
        info!(path = %config.database_path.display(), "Database ready");

        Ok(AppState::with_engine(WashEngine::new(db), config))
    }

    pub fn with_engine(engine: WashEngine, config: AppConfig) -> Self {
        AppState { engine, config }
    }

    /// The verified creator of new transactions.
    ///
    /// The configured actor must exist and be an active staff member.
    pub async fn actor(&self) -> Result<String, ApiError> {
        let Some(actor_id) = self.config.actor_id.as_deref() else {
            return Err(ApiError::unauthorized("No actor configured"));
        };

        match self.engine.database().staff().get_by_id(actor_id).await? {
            Some(member) if member.is_active => Ok(member.id),
            Some(_) => Err(ApiError::unauthorized(format!("Staff member {} is inactive", actor_id))),
            None => Err(ApiError::unauthorized(format!("Unknown staff member: {}", actor_id))),
        }
    }
}
