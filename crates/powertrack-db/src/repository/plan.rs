//! # Plan Repository
//!
//! Client plans and the plan ↔ vehicle links that make a vehicle a member.
//!
//! ## Link Lifecycle
//! ```text
//! link_vehicle(plan, plate)
//!      │
//!      ├── vehicle missing? ──► register it (normalized plate)
//!      │
//!      ├── close every open link of the vehicle (removed_at = now)
//!      │
//!      └── insert new link (assigned_at = now, removed_at = NULL)
//!
//! remove_vehicle(plan, vehicle) ──► removed_at = now on the open link
//! ```
//!
//! Links are never deleted: a closed link is history.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use powertrack_core::membership::PlanLink;
use powertrack_core::plate::normalize_plate;
use powertrack_core::{new_id, BillingCycle, ClientPlan, ClientPlanVehicle, Vehicle};

/// Fields needed to open a plan.
#[derive(Debug, Clone)]
pub struct NewClientPlan {
    pub client_name: String,
    pub billing_cycle_type: BillingCycle,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub client_signature: Vec<u8>,
}

/// Repository for client plan operations.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: SqlitePool,
}

impl PlanRepository {
    /// Creates a new PlanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PlanRepository { pool }
    }

    // =========================================================================
    // Plans
    // =========================================================================

    /// Opens an active plan.
    pub async fn insert_plan(&self, plan: NewClientPlan) -> DbResult<ClientPlan> {
        let plan = ClientPlan {
            id: new_id(),
            client_name: plan.client_name,
            billing_cycle_type: plan.billing_cycle_type,
            contact_email: plan.contact_email,
            contact_phone: plan.contact_phone,
            client_signature: plan.client_signature,
            is_active: true,
            created_at: Utc::now(),
        };

        debug!(id = %plan.id, client = %plan.client_name, "Creating client plan");

        sqlx::query(
            r#"
            INSERT INTO client_plans (
                id, client_name, billing_cycle_type, contact_email, contact_phone,
                client_signature, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.client_name)
        .bind(plan.billing_cycle_type)
        .bind(&plan.contact_email)
        .bind(&plan.contact_phone)
        .bind(&plan.client_signature)
        .bind(plan.is_active)
        .bind(plan.created_at)
        .execute(&self.pool)
        .await?;

        Ok(plan)
    }

    pub async fn get_plan(&self, id: &str) -> DbResult<Option<ClientPlan>> {
        let plan = sqlx::query_as::<_, ClientPlan>(
            r#"
            SELECT id, client_name, billing_cycle_type, contact_email, contact_phone,
                   client_signature, is_active, created_at
            FROM client_plans
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE client_plans SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ClientPlan", id));
        }

        info!(id = %id, is_active, "Client plan status changed");
        Ok(())
    }

    /// Flips the active flag and returns the new value.
    pub async fn toggle_status(&self, id: &str) -> DbResult<bool> {
        let is_active: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE client_plans SET is_active = NOT is_active
            WHERE id = ?1
            RETURNING is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let is_active = is_active.ok_or_else(|| DbError::not_found("ClientPlan", id))?;
        info!(id = %id, is_active, "Client plan status toggled");
        Ok(is_active)
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Every link ever recorded for a vehicle, with its plan's active flag.
    ///
    /// Input for [`powertrack_core::membership::detect_membership`].
    pub async fn links_for_vehicle(&self, vehicle_id: &str) -> DbResult<Vec<PlanLink>> {
        let links = sqlx::query_as::<_, PlanLink>(
            r#"
            SELECT l.client_plan_id,
                   p.is_active AS plan_active,
                   l.assigned_at,
                   l.removed_at
            FROM client_plan_vehicles l
            INNER JOIN client_plans p ON p.id = l.client_plan_id
            WHERE l.vehicle_id = ?1
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    /// Links a vehicle to a plan, registering the vehicle first when its
    /// plate is unknown.
    ///
    /// Any open link of the vehicle is closed in the same unit of work, so a
    /// vehicle never has more than one open link through this path.
    pub async fn link_vehicle(
        &self,
        client_plan_id: &str,
        license_plate: &str,
        vehicle_category_id: &str,
        make_model: Option<&str>,
    ) -> DbResult<ClientPlanVehicle> {
        let plate = normalize_plate(license_plate);
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let existing = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, license_plate, vehicle_category_id, make_model, created_at
            FROM vehicles
            WHERE license_plate = ?1
            "#,
        )
        .bind(&plate)
        .fetch_optional(&mut *tx)
        .await?;

        let vehicle_id = match existing {
            Some(vehicle) => vehicle.id,
            None => {
                let id = new_id();
                debug!(id = %id, plate = %plate, "Registering vehicle for plan");
                sqlx::query(
                    r#"
                    INSERT INTO vehicles (id, license_plate, vehicle_category_id, make_model, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(&id)
                .bind(&plate)
                .bind(vehicle_category_id)
                .bind(make_model)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                id
            }
        };

        let closed = sqlx::query(
            r#"
            UPDATE client_plan_vehicles SET removed_at = ?2
            WHERE vehicle_id = ?1 AND removed_at IS NULL
            "#,
        )
        .bind(&vehicle_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let link = ClientPlanVehicle {
            id: new_id(),
            client_plan_id: client_plan_id.to_string(),
            vehicle_id,
            assigned_at: now,
            removed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO client_plan_vehicles (id, client_plan_id, vehicle_id, assigned_at, removed_at)
            VALUES (?1, ?2, ?3, ?4, NULL)
            "#,
        )
        .bind(&link.id)
        .bind(&link.client_plan_id)
        .bind(&link.vehicle_id)
        .bind(link.assigned_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            plan_id = %link.client_plan_id,
            vehicle_id = %link.vehicle_id,
            plate = %plate,
            closed_links = closed,
            "Vehicle linked to plan"
        );

        Ok(link)
    }

    /// Closes the open link between a plan and a vehicle.
    pub async fn remove_vehicle(&self, client_plan_id: &str, vehicle_id: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE client_plan_vehicles SET removed_at = ?3
            WHERE client_plan_id = ?1 AND vehicle_id = ?2 AND removed_at IS NULL
            "#,
        )
        .bind(client_plan_id)
        .bind(vehicle_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ClientPlanVehicle", vehicle_id));
        }

        info!(plan_id = %client_plan_id, vehicle_id = %vehicle_id, "Vehicle removed from plan");
        Ok(())
    }

    /// Vehicles currently linked to a plan.
    pub async fn list_vehicles(&self, client_plan_id: &str) -> DbResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.id, v.license_plate, v.vehicle_category_id, v.make_model, v.created_at
            FROM client_plan_vehicles l
            INNER JOIN vehicles v ON v.id = l.vehicle_id
            WHERE l.client_plan_id = ?1 AND l.removed_at IS NULL
            ORDER BY v.license_plate
            "#,
        )
        .bind(client_plan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;
    use crate::Database;
    use powertrack_core::membership::detect_membership;

    fn new_plan(name: &str) -> NewClientPlan {
        NewClientPlan {
            client_name: name.to_string(),
            billing_cycle_type: BillingCycle::Monthly,
            contact_email: Some("fleet@example.com".to_string()),
            contact_phone: None,
            client_signature: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    async fn sedan(db: &Database) -> String {
        db.catalog().insert_category("Sedan").await.unwrap().id
    }

    #[tokio::test]
    async fn test_insert_and_get_plan() {
        let db = test_db().await;
        let plan = db.plans().insert_plan(new_plan("Acme Fleet")).await.unwrap();

        let stored = db.plans().get_plan(&plan.id).await.unwrap().unwrap();
        assert_eq!(stored.client_name, "Acme Fleet");
        assert_eq!(stored.billing_cycle_type, BillingCycle::Monthly);
        assert_eq!(stored.client_signature, vec![0x89, 0x50, 0x4e, 0x47]);
        assert!(stored.is_active);
    }

    #[tokio::test]
    async fn test_toggle_status() {
        let db = test_db().await;
        let plan = db.plans().insert_plan(new_plan("Acme Fleet")).await.unwrap();

        assert!(!db.plans().toggle_status(&plan.id).await.unwrap());
        assert!(db.plans().toggle_status(&plan.id).await.unwrap());

        db.plans().set_active(&plan.id, false).await.unwrap();
        assert!(!db.plans().get_plan(&plan.id).await.unwrap().unwrap().is_active);

        assert!(matches!(
            db.plans().toggle_status("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_link_registers_unknown_vehicle() {
        let db = test_db().await;
        let category = sedan(&db).await;
        let plan = db.plans().insert_plan(new_plan("Acme Fleet")).await.unwrap();

        let link = db
            .plans()
            .link_vehicle(&plan.id, "ab-12 34", &category, Some("Ford Focus"))
            .await
            .unwrap();

        let vehicle = db.vehicles().get_by_plate("AB1234").await.unwrap().unwrap();
        assert_eq!(link.vehicle_id, vehicle.id);
        assert!(link.is_current());

        let listed = db.plans().list_vehicles(&plan.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].license_plate, "AB1234");
    }

    #[tokio::test]
    async fn test_relinking_closes_previous_link() {
        let db = test_db().await;
        let category = sedan(&db).await;
        let old_plan = db.plans().insert_plan(new_plan("Old Co")).await.unwrap();
        let new_plan_row = db.plans().insert_plan(new_plan("New Co")).await.unwrap();

        db.plans().link_vehicle(&old_plan.id, "AB1234", &category, None).await.unwrap();
        let link = db
            .plans()
            .link_vehicle(&new_plan_row.id, "AB-1234", &category, None)
            .await
            .unwrap();

        let links = db.plans().links_for_vehicle(&link.vehicle_id).await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links.iter().filter(|l| l.removed_at.is_none()).count(), 1);

        let membership = detect_membership(&links);
        assert_eq!(membership.plan_id(), Some(new_plan_row.id.as_str()));
        assert!(db.plans().list_vehicles(&old_plan.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_vehicle_ends_membership() {
        let db = test_db().await;
        let category = sedan(&db).await;
        let plan = db.plans().insert_plan(new_plan("Acme Fleet")).await.unwrap();
        let link = db.plans().link_vehicle(&plan.id, "AB1234", &category, None).await.unwrap();

        db.plans().remove_vehicle(&plan.id, &link.vehicle_id).await.unwrap();

        let links = db.plans().links_for_vehicle(&link.vehicle_id).await.unwrap();
        assert!(!detect_membership(&links).is_member());

        assert!(matches!(
            db.plans().remove_vehicle(&plan.id, &link.vehicle_id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_inactive_plan_is_reported_on_links() {
        let db = test_db().await;
        let category = sedan(&db).await;
        let plan = db.plans().insert_plan(new_plan("Acme Fleet")).await.unwrap();
        let link = db.plans().link_vehicle(&plan.id, "AB1234", &category, None).await.unwrap();

        db.plans().set_active(&plan.id, false).await.unwrap();

        let links = db.plans().links_for_vehicle(&link.vehicle_id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert!(!links[0].plan_active);
        assert!(!detect_membership(&links).is_member());
    }
}
