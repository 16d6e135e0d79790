//! # PowerTrack Worksheet
//!
//! Boundary between the daily worksheet UI and the wash engine. It owns
//! nothing the engine decides: it parses, checks presence, names the
//! creator, and turns results into JSON.
//!
//! ## Module Organization
//! ```text
//! powertrack_worksheet/
//! ├── lib.rs          ◄─── You are here (logging setup)
//! ├── config.rs       ◄─── AppConfig: TOML file + POWERTRACK__* environment
//! ├── state.rs        ◄─── AppState: engine + config, actor verification
//! ├── error.rs        ◄─── ApiError { code, message }
//! └── commands/
//!     ├── mod.rs      ◄─── Command enum, dispatch, error reply
//!     ├── transaction.rs ◄─ create / preview
//!     └── vehicle.rs  ◄─── lookup
//! ```
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  worksheet create < body.json                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppConfig::load ──► init_tracing ──► AppState::open (migrations)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dispatch ──► parse body ──► presence checks ──► actor ──► engine      │
//! │       │                                                                 │
//! │       ├── Ok  ──► { "status": "created", "transactionId", ... }        │
//! │       └── Err ──► { "status": "error", "code", "message" }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use commands::{dispatch, error_reply, Command};
pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Logs go to stderr; stdout carries only the JSON reply.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A one-vehicle shop with a configured cashier.

    use powertrack_core::Money;
    use powertrack_db::{Database, DbConfig};
    use powertrack_engine::WashEngine;

    use crate::config::AppConfig;
    use crate::state::AppState;

    pub struct Desk {
        pub state: AppState,
        pub sedan_id: String,
        pub exterior_id: String,
        pub interior_id: String,
        pub cashier_id: String,
        pub washer_id: String,
    }

    impl Desk {
        pub async fn transaction_count(&self) -> i64 {
            self.state.engine.database().transactions().count().await.unwrap()
        }
    }

    /// Sedan "AB1234"; Exterior 10.00 and Interior 15.00 for sedans. The
    /// cashier is the configured actor.
    pub async fn desk() -> Desk {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        let sedan = catalog.insert_category("Sedan").await.unwrap();
        let exterior = catalog.insert_service("Exterior", None).await.unwrap();
        let interior = catalog.insert_service("Interior", None).await.unwrap();
        catalog.set_price(&exterior.id, &sedan.id, Money::from_cents(1000)).await.unwrap();
        catalog.set_price(&interior.id, &sedan.id, Money::from_cents(1500)).await.unwrap();

        db.vehicles().insert("AB1234", &sedan.id, Some("Toyota Corolla")).await.unwrap();

        let cashier = db.staff().insert("Casey Till", "casey", "manager").await.unwrap();
        let washer = db.staff().insert("Dana Reyes", "dana", "employee").await.unwrap();

        let config = AppConfig {
            database_path: ":memory:".into(),
            actor_id: Some(cashier.id.clone()),
            ..AppConfig::default()
        };

        Desk {
            state: AppState::with_engine(WashEngine::new(db), config),
            sedan_id: sedan.id,
            exterior_id: exterior.id,
            interior_id: interior.id,
            cashier_id: cashier.id,
            washer_id: washer.id,
        }
    }
}
