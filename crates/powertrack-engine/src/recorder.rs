//! # Transaction Recorder
//!
//! `create_transaction`: the committing path.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  0. re-check preconditions (services, employees, creator, notes)       │
//! │  1. normalize plate, resolve vehicle ─────────── absent? VehicleNotFound│
//! │  2. detect membership, override payment method to plan for members     │
//! │  3. price every selected service by the vehicle's category             │
//! │  4. apply discount / fee, clamp at zero                                │
//! │  5. record(draft): header, snapshots, adjustments, employees, total    │
//! │     in ONE unit of work ─────────── any failure? Persistence, 0 rows   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 0-4 only read. A rejection there leaves the store untouched.

use serde::Serialize;
use tracing::{info, warn};

use powertrack_core::adjustment::AdjustmentInput;
use powertrack_core::membership::resolve_payment_method;
use powertrack_core::validation::{validate_notes, validate_selection};
use powertrack_core::worksheet::{price_worksheet, Quote, TransactionDraft};
use powertrack_core::{CoreError, Money, PaymentMethod, ValidationError, WashTransaction};

use crate::error::EngineResult;
use crate::resolver::{detect_vehicle_membership, find_vehicle, price_services, UnknownService};
use crate::WashEngine;

/// A worksheet submission, as handed over by the boundary.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    /// As typed; normalized by the engine.
    pub plate: String,
    /// As requested; members are switched to `Plan`.
    pub payment_method: PaymentMethod,
    /// Non-empty. Duplicates allowed.
    pub service_ids: Vec<String>,
    /// Non-empty. Duplicates allowed.
    pub employee_ids: Vec<String>,
    pub discount: Option<AdjustmentInput>,
    pub fee: Option<AdjustmentInput>,
    pub notes: Option<String>,
    /// Verified staff identity supplied by the boundary.
    pub created_by: String,
}

/// A committed transaction together with the quote it was built from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedTransaction {
    pub header: WashTransaction,
    pub quote: Quote,
}

impl RecordedTransaction {
    #[inline]
    pub fn total(&self) -> Money {
        self.header.total_price()
    }
}

impl WashEngine {
    /// Prices and atomically records a worksheet.
    ///
    /// ## Errors
    /// - `Rejected(VehicleNotFound)` for an unregistered plate
    /// - `Rejected(EmptySelection)` for no services or no employees
    /// - `Rejected(ServiceNotFound)` for an id missing from the catalog
    /// - `Rejected(Validation)` for blank ids, negative amounts, long text
    /// - `Persistence` when the write failed; nothing was kept
    pub async fn create_transaction(&self, request: &CreateTransaction) -> EngineResult<RecordedTransaction> {
        validate_selection("service", &request.service_ids)?;
        validate_selection("employee", &request.employee_ids)?;
        if request.created_by.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "created by".to_string(),
            }
            .into());
        }
        let notes = validate_notes(request.notes.as_deref())?;

        let db = self.database();

        let (plate, vehicle) = find_vehicle(db, &request.plate).await?;
        let Some(vehicle) = vehicle else {
            warn!(plate = %plate, "Transaction rejected: vehicle not registered");
            return Err(CoreError::VehicleNotFound(plate).into());
        };

        let membership = detect_vehicle_membership(db, &vehicle.id).await?;
        let payment_method = resolve_payment_method(request.payment_method, &membership);
        if payment_method != request.payment_method {
            info!(
                plate = %plate,
                requested = %request.payment_method,
                plan_id = ?membership.plan_id(),
                "Payment method overridden by active plan"
            );
        }

        let lines = price_services(
            db,
            &vehicle.vehicle_category_id,
            &request.service_ids,
            UnknownService::Reject,
        )
        .await?;
        let quote = price_worksheet(lines, request.discount.as_ref(), request.fee.as_ref())?;

        let draft = TransactionDraft {
            vehicle_id: vehicle.id,
            client_plan_id: membership.into_plan_id(),
            payment_method,
            created_by: request.created_by.clone(),
            employee_ids: request.employee_ids.clone(),
            notes,
            quote,
        };

        let header = db.transactions().record(&draft).await.map_err(|e| {
            warn!(plate = %plate, error = %e, "Transaction rolled back");
            e
        })?;

        Ok(RecordedTransaction {
            header,
            quote: draft.quote,
        })
    }
}
