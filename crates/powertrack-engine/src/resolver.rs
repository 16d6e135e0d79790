//! # Resolvers
//!
//! The reads shared by every engine operation: vehicle by plate, plan
//! membership, and per-service prices. Each wraps one pure decision from
//! `powertrack-core` around the repository call that feeds it.
//!
//! All reads are point-in-time. They run before the unit of work opens and
//! take no locks.

use tracing::{debug, warn};

use powertrack_core::membership::{detect_membership, Membership};
use powertrack_core::pricing::{resolve_base_price, PricedLine};
use powertrack_core::plate::normalize_plate;
use powertrack_core::validation::validate_plate;
use powertrack_core::{CoreError, ValidationError, Vehicle};
use powertrack_db::Database;

use crate::error::EngineResult;

/// What to do with a service id the catalog does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownService {
    /// Fail the whole operation (committing path).
    Reject,
    /// Leave the line out (preview).
    Skip,
}

/// Validates and normalizes the plate, then looks the vehicle up.
///
/// Returns the normalized plate alongside the result so callers can report
/// exactly what was searched for. A plate longer than any registered one is
/// simply not found; only a blank plate is an error.
pub async fn find_vehicle(db: &Database, raw_plate: &str) -> EngineResult<(String, Option<Vehicle>)> {
    let plate = match validate_plate(raw_plate) {
        Ok(plate) => plate,
        Err(ValidationError::TooLong { .. }) => {
            let plate = normalize_plate(raw_plate.trim());
            debug!(plate = %plate, "Plate longer than any registered plate");
            return Ok((plate, None));
        }
        Err(err) => return Err(err.into()),
    };
    let vehicle = db.vehicles().get_by_plate(&plate).await?;

    debug!(plate = %plate, found = vehicle.is_some(), "Vehicle lookup");
    Ok((plate, vehicle))
}

/// Plan membership of a vehicle right now.
pub async fn detect_vehicle_membership(db: &Database, vehicle_id: &str) -> EngineResult<Membership> {
    let links = db.plans().links_for_vehicle(vehicle_id).await?;
    let membership = detect_membership(&links);

    debug!(
        vehicle_id = %vehicle_id,
        links = links.len(),
        plan_id = ?membership.plan_id(),
        "Membership detected"
    );
    Ok(membership)
}

/// Prices each selected service for a vehicle category, in order.
///
/// Duplicated ids produce duplicated lines. A service without a price row for
/// the category is charged 0.00 and logged; that is a catalog gap, not an
/// error.
pub async fn price_services(
    db: &Database,
    vehicle_category_id: &str,
    service_ids: &[String],
    unknown: UnknownService,
) -> EngineResult<Vec<PricedLine>> {
    let catalog = db.catalog();
    let mut lines = Vec::with_capacity(service_ids.len());

    for service_id in service_ids {
        let Some(service) = catalog.get_service(service_id).await? else {
            match unknown {
                UnknownService::Reject => {
                    return Err(CoreError::ServiceNotFound(service_id.clone()).into());
                }
                UnknownService::Skip => {
                    warn!(service_id = %service_id, "Skipping unknown service");
                    continue;
                }
            }
        };

        let configured = catalog.get_price(&service.id, vehicle_category_id).await?;
        if configured.is_none() {
            warn!(
                service_id = %service.id,
                service = %service.service_name,
                vehicle_category_id = %vehicle_category_id,
                "No price configured, charging 0.00"
            );
        }

        lines.push(PricedLine::new(
            service.id,
            service.service_name,
            resolve_base_price(configured),
        ));
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::test_support::shop;
    use powertrack_core::Money;

    #[tokio::test]
    async fn test_find_vehicle_normalizes() {
        let shop = shop().await;
        let (plate, vehicle) = find_vehicle(shop.db(), "ab-12 34").await.unwrap();
        assert_eq!(plate, "AB1234");
        assert!(vehicle.is_some());

        let (plate, vehicle) = find_vehicle(shop.db(), "zz 99").await.unwrap();
        assert_eq!(plate, "ZZ99");
        assert!(vehicle.is_none());
    }

    #[tokio::test]
    async fn test_overlong_plate_is_not_found() {
        let shop = shop().await;
        let (plate, vehicle) = find_vehicle(shop.db(), "ab-1234567890 1234567890").await.unwrap();
        assert_eq!(plate, "AB12345678901234567890");
        assert!(vehicle.is_none());
    }

    #[tokio::test]
    async fn test_blank_plate_is_rejected() {
        let shop = shop().await;
        let err = find_vehicle(shop.db(), " - ").await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_price_services_keeps_order_and_duplicates() {
        let shop = shop().await;
        let ids = vec![
            shop.interior_id.clone(),
            shop.exterior_id.clone(),
            shop.interior_id.clone(),
            shop.unpriced_id.clone(),
        ];

        let lines = price_services(shop.db(), &shop.sedan_id, &ids, UnknownService::Reject)
            .await
            .unwrap();

        let cents: Vec<i64> = lines.iter().map(|l| l.price.cents()).collect();
        assert_eq!(cents, vec![1500, 1000, 1500, 0]);
        assert_eq!(lines[3].service_name, "Engine Bay");
        assert_eq!(lines[3].price, Money::zero());
    }

    #[tokio::test]
    async fn test_unknown_service_policy() {
        let shop = shop().await;
        let ids = vec![shop.exterior_id.clone(), "ghost".to_string()];

        let err = price_services(shop.db(), &shop.sedan_id, &ids, UnknownService::Reject)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rejected(CoreError::ServiceNotFound(ref id)) if id == "ghost"
        ));

        let lines = price_services(shop.db(), &shop.sedan_id, &ids, UnknownService::Skip)
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
    }
}
