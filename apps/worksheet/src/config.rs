//! # Worksheet Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Sources (Priority Order)
//! 1. Environment variables (`POWERTRACK__DATABASE_PATH`, `POWERTRACK__ACTOR_ID`, ...)
//! 2. Config file (`powertrack.toml`, or the path given by `POWERTRACK_CONFIG`)
//! 3. Defaults (this file)
//!
//! ```toml
//! database_path = "/var/lib/powertrack/powertrack.db"
//! max_connections = 5
//! log_level = "info"
//! actor_id = "0b6f3c9e-..."
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};

use powertrack_db::DbConfig;

/// Environment prefix; nested keys use `__`.
pub const ENV_PREFIX: &str = "POWERTRACK";

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "powertrack.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file. `:memory:` opens a private in-memory store.
    pub database_path: PathBuf,

    /// Upper bound of the connection pool.
    pub max_connections: u32,

    /// Apply pending migrations on startup.
    pub run_migrations: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Verified staff identity recorded as the creator of new transactions.
    /// Required by `create`; `preview` and `lookup` work without it.
    pub actor_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("powertrack.db"),
            max_connections: 5,
            run_migrations: true,
            log_level: "info".to_string(),
            actor_id: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path` (optional) and the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(environment(None))
            .build()?;

        Self::from_config(config)
    }

    /// Same layering as [`AppConfig::load`] with explicit inputs.
    pub fn from_parts(toml: Option<&str>, env: Map<String, String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(toml) = toml {
            builder = builder.add_source(File::from_str(toml, FileFormat::Toml));
        }
        let config = builder.add_source(environment(Some(env))).build()?;

        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let app: AppConfig = config.try_deserialize()?;
        app.validate()
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue("database_path".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::InvalidValue("log_level".to_string()));
        }

        self.actor_id = self
            .actor_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(self)
    }

    /// Pool settings for [`powertrack_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == Path::new(":memory:") {
            return DbConfig::in_memory().run_migrations(self.run_migrations);
        }

        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .run_migrations(self.run_migrations)
    }
}

fn environment(source: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .source(source)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_parts(None, Map::new()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.actor_id.is_none());
    }

    #[test]
    fn test_file_values() {
        let toml = r#"
            database_path = "/tmp/wash.db"
            max_connections = 3
            log_level = "debug"
            actor_id = "staff-1"
        "#;

        let config = AppConfig::from_parts(Some(toml), Map::new()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/wash.db"));
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.actor_id.as_deref(), Some("staff-1"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let toml = r#"
            max_connections = 3
            actor_id = "staff-1"
        "#;
        let vars = env(&[
            ("POWERTRACK__MAX_CONNECTIONS", "8"),
            ("POWERTRACK__ACTOR_ID", "staff-2"),
            ("UNRELATED", "x"),
        ]);

        let config = AppConfig::from_parts(Some(toml), vars).unwrap();
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.actor_id.as_deref(), Some("staff-2"));
    }

    #[test]
    fn test_blank_actor_is_none() {
        let config = AppConfig::from_parts(Some("actor_id = \"  \""), Map::new()).unwrap();
        assert!(config.actor_id.is_none());
    }

    #[test]
    fn test_zero_connections_rejected() {
        let err = AppConfig::from_parts(Some("max_connections = 0"), Map::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref field) if field == "max_connections"));
    }

    #[test]
    fn test_memory_path_maps_to_in_memory_pool() {
        let config = AppConfig::from_parts(Some("database_path = \":memory:\""), Map::new()).unwrap();
        let db = config.db_config();
        assert_eq!(db.max_connections, 1);
        assert!(db.run_migrations);
    }
}
