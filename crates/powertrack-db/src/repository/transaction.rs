//! # Wash Transaction Repository
//!
//! The atomic write of a priced worksheet, and its read-back.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(&draft)                                                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT wash_transactions            (total_price_cents = 0)      │
//! │   ├── INSERT wash_transaction_services    × lines      (snapshots)     │
//! │   ├── INSERT wash_transaction_adjustments × 0..2                       │
//! │   ├── INSERT wash_transaction_employees   × employees                  │
//! │   ├── UPDATE wash_transactions SET total_price_cents = final           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error before COMMIT drops the sqlx::Transaction, which rolls      │
//! │  everything back: no header, no snapshot, no adjustment, no employee.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Service name and resolved price are copied into each line. Later catalog
//! renames or repricing never touch a committed transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use powertrack_core::worksheet::TransactionDraft;
use powertrack_core::{
    new_id, WashTransaction, WashTransactionAdjustment, WashTransactionEmployee,
    WashTransactionService,
};

/// Repository for wash transactions.
#[derive(Debug, Clone)]
pub struct WashTransactionRepository {
    pool: SqlitePool,
}

impl WashTransactionRepository {
    /// Creates a new WashTransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WashTransactionRepository { pool }
    }

    /// Writes a draft as one committed transaction.
    ///
    /// ## Returns
    /// The committed header. On error nothing has been written.
    pub async fn record(&self, draft: &TransactionDraft) -> DbResult<WashTransaction> {
        let header = WashTransaction {
            id: new_id(),
            vehicle_id: draft.vehicle_id.clone(),
            client_plan_id: draft.client_plan_id.clone(),
            total_price_cents: 0,
            payment_method: draft.payment_method,
            created_by_user_id: draft.created_by.clone(),
            logged_at: Utc::now(),
            notes: draft.notes.clone(),
        };

        debug!(
            id = %header.id,
            vehicle_id = %header.vehicle_id,
            lines = draft.quote.lines.len(),
            employees = draft.employee_ids.len(),
            "Recording wash transaction"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // Header first, with a provisional zero total.
        sqlx::query(
            r#"
            INSERT INTO wash_transactions (
                id, vehicle_id, client_plan_id, total_price_cents,
                payment_method, created_by_user_id, logged_at, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&header.id)
        .bind(&header.vehicle_id)
        .bind(&header.client_plan_id)
        .bind(header.total_price_cents)
        .bind(header.payment_method)
        .bind(&header.created_by_user_id)
        .bind(header.logged_at)
        .bind(&header.notes)
        .execute(&mut *tx)
        .await?;

        for (position, line) in draft.quote.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO wash_transaction_services (
                    id, wash_transaction_id, position, service_id,
                    service_name_snapshot, service_price_snapshot_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(new_id())
            .bind(&header.id)
            .bind(position as i64)
            .bind(&line.service_id)
            .bind(&line.service_name)
            .bind(line.price.cents())
            .execute(&mut *tx)
            .await?;
        }

        for adjustment in &draft.quote.adjustments {
            sqlx::query(
                r#"
                INSERT INTO wash_transaction_adjustments (
                    id, wash_transaction_id, adjustment_type,
                    adjustment_amount_cents, adjustment_reason
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(new_id())
            .bind(&header.id)
            .bind(adjustment.kind)
            .bind(adjustment.amount.cents())
            .bind(&adjustment.reason)
            .execute(&mut *tx)
            .await?;
        }

        for user_id in &draft.employee_ids {
            sqlx::query(
                r#"
                INSERT INTO wash_transaction_employees (id, wash_transaction_id, user_id)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(new_id())
            .bind(&header.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let total_cents = draft.total().cents();
        let updated = sqlx::query("UPDATE wash_transactions SET total_price_cents = ?2 WHERE id = ?1")
            .bind(&header.id)
            .bind(total_cents)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() != 1 {
            warn!(id = %header.id, "Header vanished before total was set");
            return Err(DbError::not_found("WashTransaction", header.id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %header.id,
            total = %draft.total(),
            payment_method = %header.payment_method,
            "Wash transaction committed"
        );

        Ok(WashTransaction {
            total_price_cents: total_cents,
            ..header
        })
    }

    /// Gets a transaction header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<WashTransaction>> {
        let header = sqlx::query_as::<_, WashTransaction>(
            r#"
            SELECT id, vehicle_id, client_plan_id, total_price_cents,
                   payment_method, created_by_user_id, logged_at, notes
            FROM wash_transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(header)
    }

    /// Snapshot lines in worksheet order.
    pub async fn get_services(&self, transaction_id: &str) -> DbResult<Vec<WashTransactionService>> {
        let lines = sqlx::query_as::<_, WashTransactionService>(
            r#"
            SELECT id, wash_transaction_id, position, service_id,
                   service_name_snapshot, service_price_snapshot_cents
            FROM wash_transaction_services
            WHERE wash_transaction_id = ?1
            ORDER BY position
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn get_employees(&self, transaction_id: &str) -> DbResult<Vec<WashTransactionEmployee>> {
        let employees = sqlx::query_as::<_, WashTransactionEmployee>(
            r#"
            SELECT id, wash_transaction_id, user_id
            FROM wash_transaction_employees
            WHERE wash_transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Adjustment rows, discount before fee.
    pub async fn get_adjustments(
        &self,
        transaction_id: &str,
    ) -> DbResult<Vec<WashTransactionAdjustment>> {
        let adjustments = sqlx::query_as::<_, WashTransactionAdjustment>(
            r#"
            SELECT id, wash_transaction_id, adjustment_type,
                   adjustment_amount_cents, adjustment_reason
            FROM wash_transaction_adjustments
            WHERE wash_transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(adjustments)
    }

    /// Number of committed transaction headers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wash_transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::test_db;
    use crate::{Database, DbError};
    use powertrack_core::adjustment::AdjustmentInput;
    use powertrack_core::pricing::PricedLine;
    use powertrack_core::worksheet::{price_worksheet, TransactionDraft};
    use powertrack_core::{AdjustmentKind, Money, PaymentMethod};

    struct Fixture {
        vehicle_id: String,
        staff_id: String,
        exterior_id: String,
        interior_id: String,
    }

    async fn fixture(db: &Database) -> Fixture {
        let sedan = db.catalog().insert_category("Sedan").await.unwrap();
        let vehicle = db.vehicles().insert("AB1234", &sedan.id, None).await.unwrap();
        let staff = db.staff().insert("Dana Reyes", "dana", "employee").await.unwrap();
        let exterior = db.catalog().insert_service("Exterior", None).await.unwrap();
        let interior = db.catalog().insert_service("Interior", None).await.unwrap();

        Fixture {
            vehicle_id: vehicle.id,
            staff_id: staff.id,
            exterior_id: exterior.id,
            interior_id: interior.id,
        }
    }

    fn draft(f: &Fixture, employees: Vec<String>) -> TransactionDraft {
        let lines = vec![
            PricedLine::new(&f.exterior_id, "Exterior", Money::from_cents(1000)),
            PricedLine::new(&f.interior_id, "Interior", Money::from_cents(1500)),
            PricedLine::new(&f.exterior_id, "Exterior", Money::from_cents(1000)),
        ];
        let discount = AdjustmentInput::new(Money::from_cents(500), Some("Promo".to_string()));
        let fee = AdjustmentInput::new(Money::from_cents(200), None);

        TransactionDraft {
            vehicle_id: f.vehicle_id.clone(),
            client_plan_id: None,
            payment_method: PaymentMethod::Card,
            created_by: f.staff_id.clone(),
            employee_ids: employees,
            notes: Some("Roof rack".to_string()),
            quote: price_worksheet(lines, Some(&discount), Some(&fee)).unwrap(),
        }
    }

    async fn row_count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let db = test_db().await;
        let f = fixture(&db).await;
        let employees = vec![f.staff_id.clone(), f.staff_id.clone()];

        let header = db.transactions().record(&draft(&f, employees)).await.unwrap();
        assert_eq!(header.total_price_cents, 3200);

        let stored = db.transactions().get_by_id(&header.id).await.unwrap().unwrap();
        assert_eq!(stored.total_price(), Money::from_cents(3200));
        assert_eq!(stored.payment_method, PaymentMethod::Card);
        assert_eq!(stored.notes.as_deref(), Some("Roof rack"));
        assert_eq!(stored.client_plan_id, None);

        let lines = db.transactions().get_services(&header.id).await.unwrap();
        let positions: Vec<i64> = lines.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(lines[2].service_id, f.exterior_id);

        let employees = db.transactions().get_employees(&header.id).await.unwrap();
        assert_eq!(employees.len(), 2);

        let adjustments = db.transactions().get_adjustments(&header.id).await.unwrap();
        assert_eq!(adjustments.len(), 2);
        assert_eq!(adjustments[0].adjustment_type, AdjustmentKind::Discount);
        assert_eq!(adjustments[0].adjustment_reason.as_deref(), Some("Promo"));
        assert_eq!(adjustments[1].adjustment_type, AdjustmentKind::Fee);
        assert_eq!(adjustments[1].adjustment_reason, None);

        assert_eq!(db.transactions().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_employee_rolls_back_everything() {
        let db = test_db().await;
        let f = fixture(&db).await;

        let err = db
            .transactions()
            .record(&draft(&f, vec![f.staff_id.clone(), "ghost".to_string()]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        for table in [
            "wash_transactions",
            "wash_transaction_services",
            "wash_transaction_adjustments",
            "wash_transaction_employees",
        ] {
            assert_eq!(row_count(&db, table).await, 0, "{table} should be empty");
        }
    }

    #[tokio::test]
    async fn test_missing_transaction_reads_none() {
        let db = test_db().await;
        assert!(db.transactions().get_by_id("missing").await.unwrap().is_none());
        assert!(db.transactions().get_services("missing").await.unwrap().is_empty());
    }
}
