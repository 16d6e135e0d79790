//! # powertrack-db: Database Layer for the Wash POS
//!
//! Storage for the wash POS. SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PowerTrack Data Flow                               │
//! │                                                                         │
//! │  powertrack-engine (recorder, preview, lookup)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  powertrack-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ VehicleRepo    │   │              │   │   │
//! │  │   │ SqlitePool    │◄───│ CatalogRepo    │   │ 001_initial_ │   │   │
//! │  │   │ Connection    │    │ PlanRepo       │   │   schema.sql │   │   │
//! │  │   │ Management    │    │ StaffRepo      │   │              │   │   │
//! │  │   │               │    │ WashTxnRepo    │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./powertrack.db                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use powertrack_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./powertrack.db")).await?;
//!
//! let vehicle = db.vehicles().get_by_plate("AB1234").await?;
//! let price = db.catalog().get_price(&service_id, &category_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::plan::{NewClientPlan, PlanRepository};
pub use repository::staff::StaffRepository;
pub use repository::transaction::WashTransactionRepository;
pub use repository::vehicle::VehicleRepository;
