//! # Preview Calculator
//!
//! `preview_transaction`: what the worksheet would cost, without writing.
//!
//! Follows the recorder through plate, vehicle, membership, prices and
//! adjustments, with three differences:
//! - an unregistered plate is a result ([`PreviewOutcome::VehicleNotFound`]),
//!   not an error
//! - unknown service ids are left out instead of failing the call
//! - no employees, no persistence

use serde::Serialize;
use tracing::debug;

use powertrack_core::adjustment::AdjustmentInput;
use powertrack_core::worksheet::{price_worksheet, Quote};

use crate::error::EngineResult;
use crate::resolver::{detect_vehicle_membership, find_vehicle, price_services, UnknownService};
use crate::WashEngine;

#[derive(Debug, Clone, Default)]
pub struct PreviewRequest {
    pub plate: String,
    /// May be empty; duplicates priced twice.
    pub service_ids: Vec<String>,
    pub discount: Option<AdjustmentInput>,
    pub fee: Option<AdjustmentInput>,
}

/// A priced but uncommitted worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPreview {
    pub vehicle_id: String,
    pub license_plate: String,
    pub vehicle_category_id: String,
    pub vehicle_category_name: Option<String>,
    pub is_member: bool,
    pub client_plan_id: Option<String>,
    pub quote: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreviewOutcome {
    VehicleNotFound { plate: String },
    Priced(TransactionPreview),
}

impl WashEngine {
    /// Prices a worksheet the way `create_transaction` would, writing nothing.
    pub async fn preview_transaction(&self, request: &PreviewRequest) -> EngineResult<PreviewOutcome> {
        let db = self.database();

        let (plate, vehicle) = find_vehicle(db, &request.plate).await?;
        let Some(vehicle) = vehicle else {
            debug!(plate = %plate, "Preview for unregistered plate");
            return Ok(PreviewOutcome::VehicleNotFound { plate });
        };

        let membership = detect_vehicle_membership(db, &vehicle.id).await?;

        let lines = price_services(
            db,
            &vehicle.vehicle_category_id,
            &request.service_ids,
            UnknownService::Skip,
        )
        .await?;
        let quote = price_worksheet(lines, request.discount.as_ref(), request.fee.as_ref())?;

        let category = db.catalog().get_category(&vehicle.vehicle_category_id).await?;

        debug!(plate = %plate, total = %quote.total, "Preview priced");

        Ok(PreviewOutcome::Priced(TransactionPreview {
            vehicle_id: vehicle.id,
            license_plate: vehicle.license_plate,
            vehicle_category_id: vehicle.vehicle_category_id,
            vehicle_category_name: category.map(|c| c.category_name),
            is_member: membership.is_member(),
            client_plan_id: membership.into_plan_id(),
            quote,
        }))
    }
}
