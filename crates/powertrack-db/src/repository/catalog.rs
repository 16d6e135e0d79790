//! # Catalog Repository
//!
//! Vehicle categories, services and the pricing matrix.
//!
//! ## Pricing Matrix
//! ```text
//!                     Sedan     SUV      Truck
//!  Exterior Wash      10.00    12.00    15.00
//!  Interior Clean     15.00    18.00      -      ◄── no row: charged 0.00
//!  Wax                20.00    25.00    30.00
//! ```
//!
//! At most one row per (service, category). A missing cell is not an error
//! here: [`CatalogRepository::get_price`] answers `None` and the pricing
//! resolver turns that into zero.
//!
//! Services are soft-disabled through `is_active` and never deleted, so
//! historical snapshot rows always reference an existing service.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use powertrack_core::{new_id, Money, Service, ServicePricing, VehicleCategory};

/// Repository for catalog and pricing operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Vehicle Categories
    // =========================================================================

    pub async fn insert_category(&self, category_name: &str) -> DbResult<VehicleCategory> {
        let category = VehicleCategory {
            id: new_id(),
            category_name: category_name.trim().to_string(),
        };

        sqlx::query("INSERT INTO vehicle_categories (id, category_name) VALUES (?1, ?2)")
            .bind(&category.id)
            .bind(&category.category_name)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    /// Lists categories ordered by name.
    pub async fn list_categories(&self) -> DbResult<Vec<VehicleCategory>> {
        let categories = sqlx::query_as::<_, VehicleCategory>(
            "SELECT id, category_name FROM vehicle_categories ORDER BY category_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_category(&self, id: &str) -> DbResult<Option<VehicleCategory>> {
        let category = sqlx::query_as::<_, VehicleCategory>(
            "SELECT id, category_name FROM vehicle_categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Adds an active service to the catalog.
    pub async fn insert_service(
        &self,
        service_name: &str,
        service_description: Option<&str>,
    ) -> DbResult<Service> {
        let service = Service {
            id: new_id(),
            service_name: service_name.trim().to_string(),
            service_description: service_description.map(str::to_string),
            is_active: true,
        };

        debug!(id = %service.id, name = %service.service_name, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (id, service_name, service_description, is_active)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&service.id)
        .bind(&service.service_name)
        .bind(&service.service_description)
        .bind(service.is_active)
        .execute(&self.pool)
        .await?;

        Ok(service)
    }

    /// Gets a service by ID, active or not.
    pub async fn get_service(&self, id: &str) -> DbResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, service_name, service_description, is_active
            FROM services
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Renames a service. Existing snapshot rows keep the old name.
    pub async fn rename_service(&self, id: &str, service_name: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE services SET service_name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(service_name.trim())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }

    /// Soft-enables or soft-disables a service.
    pub async fn set_service_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE services SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        info!(id = %id, is_active, "Service status changed");
        Ok(())
    }

    /// Lists every service ordered by name.
    pub async fn list_services(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, service_name, service_description, is_active
            FROM services
            ORDER BY service_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Lists the services offered on the worksheet.
    pub async fn list_active_services(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, service_name, service_description, is_active
            FROM services
            WHERE is_active = 1
            ORDER BY service_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Sets the price of a service for a category, replacing any previous
    /// price for that pair.
    ///
    /// Existing snapshot rows are unaffected.
    pub async fn set_price(
        &self,
        service_id: &str,
        vehicle_category_id: &str,
        base_price: Money,
    ) -> DbResult<ServicePricing> {
        let now = Utc::now();

        debug!(
            service_id = %service_id,
            vehicle_category_id = %vehicle_category_id,
            price = %base_price,
            "Setting service price"
        );

        let pricing = sqlx::query_as::<_, ServicePricing>(
            r#"
            INSERT INTO service_pricing (id, service_id, vehicle_category_id, base_price_cents, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (service_id, vehicle_category_id) DO UPDATE SET
                base_price_cents = excluded.base_price_cents,
                updated_at = excluded.updated_at
            RETURNING id, service_id, vehicle_category_id, base_price_cents, updated_at
            "#,
        )
        .bind(new_id())
        .bind(service_id)
        .bind(vehicle_category_id)
        .bind(base_price.cents())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(pricing)
    }

    /// Configured base price for a (service, category) pair, if any.
    pub async fn get_price(
        &self,
        service_id: &str,
        vehicle_category_id: &str,
    ) -> DbResult<Option<Money>> {
        let cents: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT base_price_cents
            FROM service_pricing
            WHERE service_id = ?1 AND vehicle_category_id = ?2
            "#,
        )
        .bind(service_id)
        .bind(vehicle_category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cents.map(Money::from_cents))
    }

    /// Every price row configured for one category.
    pub async fn list_prices_for_category(
        &self,
        vehicle_category_id: &str,
    ) -> DbResult<Vec<ServicePricing>> {
        let prices = sqlx::query_as::<_, ServicePricing>(
            r#"
            SELECT id, service_id, vehicle_category_id, base_price_cents, updated_at
            FROM service_pricing
            WHERE vehicle_category_id = ?1
            "#,
        )
        .bind(vehicle_category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::test_db;
    use crate::DbError;
    use powertrack_core::Money;

    #[tokio::test]
    async fn test_categories_are_listed_by_name() {
        let db = test_db().await;
        db.catalog().insert_category("Truck").await.unwrap();
        db.catalog().insert_category("Sedan").await.unwrap();
        db.catalog().insert_category("SUV").await.unwrap();

        let names: Vec<String> = db
            .catalog()
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.category_name)
            .collect();
        assert_eq!(names, vec!["SUV", "Sedan", "Truck"]);
    }

    #[tokio::test]
    async fn test_set_price_upserts() {
        let db = test_db().await;
        let sedan = db.catalog().insert_category("Sedan").await.unwrap();
        let wash = db.catalog().insert_service("Exterior Wash", None).await.unwrap();

        assert_eq!(db.catalog().get_price(&wash.id, &sedan.id).await.unwrap(), None);

        let first = db
            .catalog()
            .set_price(&wash.id, &sedan.id, Money::from_cents(1000))
            .await
            .unwrap();
        let second = db
            .catalog()
            .set_price(&wash.id, &sedan.id, Money::from_cents(1250))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(
            db.catalog().get_price(&wash.id, &sedan.id).await.unwrap(),
            Some(Money::from_cents(1250))
        );
        assert_eq!(db.catalog().list_prices_for_category(&sedan.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_negative_price_rejected_by_schema() {
        let db = test_db().await;
        let sedan = db.catalog().insert_category("Sedan").await.unwrap();
        let wash = db.catalog().insert_service("Exterior Wash", None).await.unwrap();

        let err = db
            .catalog()
            .set_price(&wash.id, &sedan.id, Money::from_cents(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_soft_disable_and_rename() {
        let db = test_db().await;
        let wash = db.catalog().insert_service("Exterior Wash", Some("Foam and rinse")).await.unwrap();
        let wax = db.catalog().insert_service("Wax", None).await.unwrap();

        db.catalog().set_service_active(&wax.id, false).await.unwrap();
        db.catalog().rename_service(&wash.id, "Exterior Deluxe").await.unwrap();

        let active = db.catalog().list_active_services().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].service_name, "Exterior Deluxe");

        assert_eq!(db.catalog().list_services().await.unwrap().len(), 2);
        assert!(!db.catalog().get_service(&wax.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_updates_on_missing_service() {
        let db = test_db().await;
        assert!(matches!(
            db.catalog().rename_service("missing", "x").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.catalog().set_service_active("missing", true).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
