//! # Transaction Commands
//!
//! `create` and `preview`: the worksheet submission, parsed and checked for
//! presence here, then handed to the engine (which checks again).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use powertrack_core::adjustment::AdjustmentInput;
use powertrack_core::validation::{parse_amount, validate_plate, validate_selection};
use powertrack_core::{Money, PaymentMethod};
use powertrack_engine::{CreateTransaction, PreviewOutcome, PreviewRequest};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request DTOs
// =============================================================================

/// An amount as the worksheet sends it: `"2.50"` or `2.5`.
///
/// Numbers are read through their decimal text, so `2.5` is exactly 250
/// cents. Values with more than two significant decimals are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Text(String),
    Number(serde_json::Number),
}

impl AmountValue {
    fn parse(&self, field: &str) -> Result<Money, ApiError> {
        let money = match self {
            AmountValue::Text(text) => parse_amount(field, text),
            AmountValue::Number(number) => parse_amount(field, &number.to_string()),
        };
        money.map_err(|e| ApiError::validation(e.to_string()))
    }
}

/// `amount` plus its optional reason; a zero or missing amount means no
/// adjustment.
fn adjustment(
    field: &str,
    amount: Option<&AmountValue>,
    reason: Option<&String>,
) -> Result<Option<AdjustmentInput>, ApiError> {
    let Some(amount) = amount else {
        return Ok(None);
    };

    Ok(Some(AdjustmentInput::new(amount.parse(field)?, reason.cloned())))
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub plate: String,
    pub payment_method: String,
    pub service_ids: Vec<String>,
    pub employee_ids: Vec<String>,
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub discount: Option<AmountValue>,
    #[serde(default)]
    pub discount_reason: Option<String>,
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub fee: Option<AmountValue>,
    #[serde(default)]
    pub fee_reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTransactionRequest {
    pub plate: String,
    #[serde(default)]
    pub service_ids: Vec<String>,
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub discount: Option<AmountValue>,
    #[serde(default)]
    pub discount_reason: Option<String>,
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub fee: Option<AmountValue>,
    #[serde(default)]
    pub fee_reason: Option<String>,
}

// =============================================================================
// Response DTOs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionResponse {
    /// Always `"created"`.
    pub status: String,
    pub transaction_id: String,
    /// Exact decimal text, e.g. `"27.00"`.
    pub total_price: String,
    /// As recorded; `plan` for members regardless of what was requested.
    pub payment_method: PaymentMethod,
    pub client_plan_id: Option<String>,
}

// =============================================================================
// Commands
// =============================================================================

/// Records a worksheet. The creator is the configured actor, never a field
/// of the submission.
pub async fn create_transaction(
    state: &AppState,
    request: CreateTransactionRequest,
) -> Result<CreateTransactionResponse, ApiError> {
    debug!(plate = %request.plate, services = request.service_ids.len(), "create_transaction command");

    validate_plate(&request.plate).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_selection("service", &request.service_ids)?;
    validate_selection("employee", &request.employee_ids)?;
    let payment_method: PaymentMethod = request.payment_method.parse()?;

    let discount = adjustment("discount", request.discount.as_ref(), request.discount_reason.as_ref())?;
    let fee = adjustment("fee", request.fee.as_ref(), request.fee_reason.as_ref())?;

    let created_by = state.actor().await?;

    let recorded = state
        .engine
        .create_transaction(&CreateTransaction {
            plate: request.plate,
            payment_method,
            service_ids: request.service_ids,
            employee_ids: request.employee_ids,
            discount,
            fee,
            notes: request.notes,
            created_by,
        })
        .await?;

    info!(
        transaction_id = %recorded.header.id,
        total = %recorded.total(),
        "Worksheet recorded"
    );

    Ok(CreateTransactionResponse {
        status: "created".to_string(),
        total_price: recorded.total().to_decimal_string(),
        payment_method: recorded.header.payment_method,
        client_plan_id: recorded.header.client_plan_id,
        transaction_id: recorded.header.id,
    })
}

/// Prices a worksheet without writing. An unregistered plate is a
/// `vehicle_not_found` payload, not an error.
pub async fn preview_transaction(
    state: &AppState,
    request: PreviewTransactionRequest,
) -> Result<PreviewOutcome, ApiError> {
    debug!(plate = %request.plate, services = request.service_ids.len(), "preview_transaction command");

    let discount = adjustment("discount", request.discount.as_ref(), request.discount_reason.as_ref())?;
    let fee = adjustment("fee", request.fee.as_ref(), request.fee_reason.as_ref())?;

    let outcome = state
        .engine
        .preview_transaction(&PreviewRequest {
            plate: request.plate,
            service_ids: request.service_ids,
            discount,
            fee,
        })
        .await?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{desk, Desk};

    fn submission(desk: &Desk) -> CreateTransactionRequest {
        serde_json::from_value(serde_json::json!({
            "plate": "ab 12-34",
            "paymentMethod": "Cash",
            "serviceIds": [desk.exterior_id, desk.interior_id],
            "employeeIds": [desk.washer_id],
            "fee": "2.00",
            "feeReason": "Mud"
        }))
        .unwrap()
    }

    #[test]
    fn test_amount_value_accepts_text_and_numbers() {
        let text: AmountValue = serde_json::from_str("\"3.50\"").unwrap();
        let number: AmountValue = serde_json::from_str("3.5").unwrap();
        let integer: AmountValue = serde_json::from_str("3").unwrap();

        assert_eq!(text.parse("fee").unwrap().cents(), 350);
        assert_eq!(number.parse("fee").unwrap().cents(), 350);
        assert_eq!(integer.parse("fee").unwrap().cents(), 300);
    }

    #[test]
    fn test_amount_value_rejects_negative_and_garbage() {
        let negative: AmountValue = serde_json::from_str("-1").unwrap();
        assert_eq!(negative.parse("discount").unwrap_err().code, ErrorCode::ValidationError);

        let garbage: AmountValue = serde_json::from_str("\"ten\"").unwrap();
        assert_eq!(garbage.parse("discount").unwrap_err().code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_create_reports_decimal_total() {
        let desk = desk().await;

        let response = create_transaction(&desk.state, submission(&desk)).await.unwrap();
        assert_eq!(response.status, "created");
        assert_eq!(response.total_price, "27.00");
        assert_eq!(response.payment_method, PaymentMethod::Cash);

        let header = desk
            .state
            .engine
            .database()
            .transactions()
            .get_by_id(&response.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(header.created_by_user_id, desk.cashier_id);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_payment_method() {
        let desk = desk().await;
        let mut request = submission(&desk);
        request.payment_method = "cheque".to_string();

        let err = create_transaction(&desk.state, request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("cheque"));
    }

    #[tokio::test]
    async fn test_create_requires_employees() {
        let desk = desk().await;
        let mut request = submission(&desk);
        request.employee_ids.clear();

        let err = create_transaction(&desk.state, request).await.unwrap_err();
        assert_eq!(err.message, "At least one employee must be selected");
        assert_eq!(desk.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_unknown_plate_is_not_found() {
        let desk = desk().await;
        let mut request = submission(&desk);
        request.plate = "ZZ 999".to_string();

        let err = create_transaction(&desk.state, request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Vehicle not found: ZZ999");
    }

    #[tokio::test]
    async fn test_create_without_actor_is_unauthorized() {
        let mut desk = desk().await;
        desk.state.config.actor_id = None;

        let err = create_transaction(&desk.state, submission(&desk)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(desk.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_with_inactive_actor_is_unauthorized() {
        let desk = desk().await;
        desk.state
            .engine
            .database()
            .staff()
            .set_active(&desk.cashier_id, false)
            .await
            .unwrap();

        let err = create_transaction(&desk.state, submission(&desk)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_create_unknown_employee_is_invalid_reference() {
        let desk = desk().await;
        let mut request = submission(&desk);
        request.employee_ids.push("nobody".to_string());

        let err = create_transaction(&desk.state, request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Invalid reference");
        assert_eq!(desk.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_preview_applies_discount_from_number() {
        let desk = desk().await;
        let request: PreviewTransactionRequest = serde_json::from_value(serde_json::json!({
            "plate": "AB1234",
            "serviceIds": [desk.exterior_id, desk.interior_id],
            "discount": 5,
            "discountReason": "  "
        }))
        .unwrap();

        let outcome = preview_transaction(&desk.state, request).await.unwrap();
        let PreviewOutcome::Priced(preview) = outcome else {
            panic!("expected a priced preview");
        };
        assert_eq!(preview.quote.total.to_decimal_string(), "20.00");
        assert_eq!(preview.quote.adjustments[0].reason, None);
        assert_eq!(desk.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_fee_beyond_ceiling() {
        let desk = desk().await;
        let request: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
            "plate": "AB1234",
            "paymentMethod": "cash",
            "serviceIds": [desk.exterior_id],
            "employeeIds": [desk.washer_id],
            "fee": "92233720368547758.07",
            "feeReason": "Typo"
        }))
        .unwrap();

        let err = create_transaction(&desk.state, request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("fee must be at most 1000000.00"));
        assert_eq!(desk.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_preview_unknown_plate() {
        let desk = desk().await;
        let request = PreviewTransactionRequest {
            plate: "zz-1".to_string(),
            ..Default::default()
        };

        let outcome = preview_transaction(&desk.state, request).await.unwrap();
        assert_eq!(
            outcome,
            PreviewOutcome::VehicleNotFound {
                plate: "ZZ1".to_string()
            }
        );
    }
}
