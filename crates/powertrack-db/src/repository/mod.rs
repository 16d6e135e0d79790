//! # Repository Module
//!
//! Database repository implementations for the wash POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  powertrack-engine                                                     │
//! │       │                                                                 │
//! │       │  db.vehicles().get_by_plate("AB1234")                          │
//! │       │  db.plans().links_for_vehicle(&vehicle.id)                     │
//! │       │  db.catalog().get_price(&service_id, &category_id)             │
//! │       │  db.transactions().record(&draft)                              │
//! │       ▼                                                                 │
//! │  Repositories (one per aggregate, each holds a pool clone)             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`VehicleRepository`](vehicle::VehicleRepository) - Vehicle registry by normalized plate
//! - [`CatalogRepository`](catalog::CatalogRepository) - Categories, services, pricing matrix
//! - [`PlanRepository`](plan::PlanRepository) - Client plans and plan-vehicle links
//! - [`StaffRepository`](staff::StaffRepository) - Staff identities
//! - [`WashTransactionRepository`](transaction::WashTransactionRepository) - The atomic sale write and its read-back

pub mod catalog;
pub mod plan;
pub mod staff;
pub mod transaction;
pub mod vehicle;
