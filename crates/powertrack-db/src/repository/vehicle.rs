//! # Vehicle Repository
//!
//! The vehicle registry, keyed by normalized license plate.
//!
//! Plates are normalized on the way in and on the way out, so `"ab-12 34"`
//! and `"AB1234"` always hit the same row.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use powertrack_core::plate::normalize_plate;
use powertrack_core::{new_id, Vehicle};

/// Repository for vehicle database operations.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
    /// Creates a new VehicleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VehicleRepository { pool }
    }

    /// Registers a vehicle. The plate is stored normalized.
    ///
    /// ## Errors
    /// `UniqueViolation` when the normalized plate is already registered.
    pub async fn insert(
        &self,
        license_plate: &str,
        vehicle_category_id: &str,
        make_model: Option<&str>,
    ) -> DbResult<Vehicle> {
        let vehicle = Vehicle {
            id: new_id(),
            license_plate: normalize_plate(license_plate),
            vehicle_category_id: vehicle_category_id.to_string(),
            make_model: make_model.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %vehicle.id, plate = %vehicle.license_plate, "Registering vehicle");

        sqlx::query(
            r#"
            INSERT INTO vehicles (id, license_plate, vehicle_category_id, make_model, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.vehicle_category_id)
        .bind(&vehicle.make_model)
        .bind(vehicle.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                DbError::duplicate("license_plate", vehicle.license_plate.clone())
            }
            other => other,
        })?;

        Ok(vehicle)
    }

    /// Looks a vehicle up by plate (normalized before the query).
    pub async fn get_by_plate(&self, license_plate: &str) -> DbResult<Option<Vehicle>> {
        let plate = normalize_plate(license_plate);

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, license_plate, vehicle_category_id, make_model, created_at
            FROM vehicles
            WHERE license_plate = ?1
            "#,
        )
        .bind(&plate)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Gets a vehicle by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, license_plate, vehicle_category_id, make_model, created_at
            FROM vehicles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }
}
