//! Vehicle lookup for the worksheet: plate in, vehicle and plan status out.

use serde::Serialize;

use crate::error::EngineResult;
use crate::resolver::{detect_vehicle_membership, find_vehicle};
use crate::WashEngine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLookup {
    pub vehicle_id: String,
    pub license_plate: String,
    pub make_model: Option<String>,
    pub vehicle_category_id: String,
    pub vehicle_category_name: Option<String>,
    pub is_member: bool,
    pub client_plan_id: Option<String>,
}

impl WashEngine {
    /// `Ok(None)` when no vehicle is registered under the normalized plate.
    pub async fn lookup_vehicle(&self, raw_plate: &str) -> EngineResult<Option<VehicleLookup>> {
        let db = self.database();

        let (_, vehicle) = find_vehicle(db, raw_plate).await?;
        let Some(vehicle) = vehicle else {
            return Ok(None);
        };

        let membership = detect_vehicle_membership(db, &vehicle.id).await?;
        let category = db.catalog().get_category(&vehicle.vehicle_category_id).await?;

        Ok(Some(VehicleLookup {
            vehicle_id: vehicle.id,
            license_plate: vehicle.license_plate,
            make_model: vehicle.make_model,
            vehicle_category_id: vehicle.vehicle_category_id,
            vehicle_category_name: category.map(|c| c.category_name),
            is_member: membership.is_member(),
            client_plan_id: membership.into_plan_id(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::shop;

    #[tokio::test]
    async fn test_lookup_registered_vehicle() {
        let shop = shop().await;

        let found = shop.engine.lookup_vehicle("ab-1234").await.unwrap().unwrap();
        assert_eq!(found.license_plate, "AB1234");
        assert_eq!(found.make_model.as_deref(), Some("Toyota Corolla"));
        assert_eq!(found.vehicle_category_id, shop.sedan_id);
        assert!(!found.is_member);
    }

    #[tokio::test]
    async fn test_lookup_member_vehicle() {
        let shop = shop().await;
        let plan_id = shop.enroll("AB1234").await;

        let found = shop.engine.lookup_vehicle("AB 1234").await.unwrap().unwrap();
        assert!(found.is_member);
        assert_eq!(found.client_plan_id, Some(plan_id));
    }

    #[tokio::test]
    async fn test_lookup_unknown_plate() {
        let shop = shop().await;
        assert!(shop.engine.lookup_vehicle("QQ1").await.unwrap().is_none());
    }
}
