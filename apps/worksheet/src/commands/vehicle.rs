//! # Vehicle Commands

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use powertrack_core::plate::normalize_plate;
use powertrack_engine::VehicleLookup;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LookupVehicleRequest {
    pub plate: String,
}

/// Filled into the worksheet when a plate is typed. A member vehicle lets
/// the UI pre-select `plan` as the payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupVehicleResponse {
    Found(VehicleLookup),
    VehicleNotFound { plate: String },
}

pub async fn lookup_vehicle(
    state: &AppState,
    request: LookupVehicleRequest,
) -> Result<LookupVehicleResponse, ApiError> {
    debug!(plate = %request.plate, "lookup_vehicle command");

    match state.engine.lookup_vehicle(&request.plate).await? {
        Some(vehicle) => Ok(LookupVehicleResponse::Found(vehicle)),
        None => Ok(LookupVehicleResponse::VehicleNotFound {
            plate: normalize_plate(&request.plate),
        }),
    }
}
