use axum::extract::{Path, State};
use axum::Json;

use crate::clients::backend::SuccessRecord;
use crate::domain::payment::{payment_split, PaymentMethod};
use crate::error::AppResult;
use crate::AppState;

/// Post-payment confirmation data, keyed by the payment provider's
/// session id. When the backend omits the paid/remaining amounts they
/// are reconstructed from the same split used at checkout.
pub async fn booking_success(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<SuccessRecord>> {
    let mut record = state.backend.booking_success(&session_id).await?;
    if record.amount_paid.is_none() || record.amount_remaining.is_none() {
        if let Some(method) = PaymentMethod::parse(&record.payment_method) {
            let split = payment_split(record.price, method);
            record.amount_paid.get_or_insert(split.due);
            record.amount_remaining.get_or_insert(split.remaining);
        }
    }
    Ok(Json(record))
}
