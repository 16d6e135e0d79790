//! # powertrack-engine: Wash Transaction Engine
//!
//! Turns a submitted worksheet into a priced, auditable, atomically
//! committed transaction, and computes the same pricing as a preview.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submission                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_plate ──► find_vehicle ──────────────┐ not found?            │
//! │       │                                        ├── create: Rejected    │
//! │       ▼                                        └── preview: payload    │
//! │  detect_vehicle_membership ──► resolve_payment_method                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_services (per id, by vehicle category; missing price = 0.00)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_worksheet (discount, fee, clamp at zero)                        │
//! │       │                                                                 │
//! │       ├── preview ──► TransactionPreview (nothing written)             │
//! │       └── create  ──► TransactionDraft ──► record() (one unit of work) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths go through [`resolver`] and the pure functions of
//! `powertrack-core`; neither has its own pricing code.
//!
//! ## Usage
//! ```rust,ignore
//! use powertrack_engine::{CreateTransaction, WashEngine};
//!
//! let engine = WashEngine::new(db);
//! let recorded = engine.create_transaction(&request).await?;
//! println!("{} {}", recorded.header.id, recorded.total().to_decimal_string());
//! ```

pub mod error;
pub mod lookup;
pub mod preview;
pub mod recorder;
pub mod resolver;

pub use error::{EngineError, EngineResult};
pub use lookup::VehicleLookup;
pub use preview::{PreviewOutcome, PreviewRequest, TransactionPreview};
pub use recorder::{CreateTransaction, RecordedTransaction};

use powertrack_db::Database;

/// Request-scoped entry point. Holds nothing but the store handle.
#[derive(Debug, Clone)]
pub struct WashEngine {
    db: Database,
}

impl WashEngine {
    pub fn new(db: Database) -> Self {
        WashEngine { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A sedan/SUV catalog shared by the engine tests.

    use powertrack_core::{BillingCycle, Money};
    use powertrack_db::NewClientPlan;
    use powertrack_db::{Database, DbConfig};

    use crate::WashEngine;

    pub struct Shop {
        pub engine: WashEngine,
        pub sedan_id: String,
        pub exterior_id: String,
        pub interior_id: String,
        /// Active, but never priced for any category.
        pub unpriced_id: String,
        pub cashier_id: String,
        pub washer_id: String,
    }

    impl Shop {
        pub fn db(&self) -> &Database {
            self.engine.database()
        }

        /// Opens an active plan and links the plate to it.
        pub async fn enroll(&self, plate: &str) -> String {
            let plan = self
                .db()
                .plans()
                .insert_plan(NewClientPlan {
                    client_name: "Acme Fleet".to_string(),
                    billing_cycle_type: BillingCycle::Monthly,
                    contact_email: None,
                    contact_phone: None,
                    client_signature: vec![1, 2, 3],
                })
                .await
                .unwrap();
            self.db()
                .plans()
                .link_vehicle(&plan.id, plate, &self.sedan_id, None)
                .await
                .unwrap();
            plan.id
        }

        pub async fn row_count(&self, table: &str) -> i64 {
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(self.db().pool())
                .await
                .unwrap()
        }
    }

    /// Sedan "AB1234" registered; Exterior 10.00 and Interior 15.00 for
    /// sedans; SUV prices differ so category mix-ups show.
    pub async fn shop() -> Shop {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        let sedan = catalog.insert_category("Sedan").await.unwrap();
        let suv = catalog.insert_category("SUV").await.unwrap();

        let exterior = catalog.insert_service("Exterior", None).await.unwrap();
        let interior = catalog.insert_service("Interior", None).await.unwrap();
        let unpriced = catalog.insert_service("Engine Bay", None).await.unwrap();

        catalog.set_price(&exterior.id, &sedan.id, Money::from_cents(1000)).await.unwrap();
        catalog.set_price(&interior.id, &sedan.id, Money::from_cents(1500)).await.unwrap();
        catalog.set_price(&exterior.id, &suv.id, Money::from_cents(1400)).await.unwrap();
        catalog.set_price(&interior.id, &suv.id, Money::from_cents(2100)).await.unwrap();

        db.vehicles().insert("AB1234", &sedan.id, Some("Toyota Corolla")).await.unwrap();

        let cashier = db.staff().insert("Casey Till", "casey", "manager").await.unwrap();
        let washer = db.staff().insert("Dana Reyes", "dana", "employee").await.unwrap();

        Shop {
            engine: WashEngine::new(db),
            sedan_id: sedan.id,
            exterior_id: exterior.id,
            interior_id: interior.id,
            unpriced_id: unpriced.id,
            cashier_id: cashier.id,
            washer_id: washer.id,
        }
    }
}
