use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::clients::backend::ContactMessage;
use crate::domain::payment::email_is_valid;
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Contact form passthrough. Validates locally, then forwards to the
/// booking backend which owns delivery.
pub async fn send_message(
    State(state): State<AppState>,
    Json(message): Json<ContactMessage>,
) -> AppResult<Json<serde_json::Value>> {
    if message.name.is_empty() || message.email.is_empty() || message.message.is_empty() {
        return Err(AppError::BadRequest(
            "Please fill in all required fields".to_string(),
        ));
    }
    if !email_is_valid(&message.email) {
        return Err(AppError::BadRequest(
            "Please enter a valid email address".to_string(),
        ));
    }
    state.backend.send_contact(&message).await?;
    Ok(Json(json!({ "sent": true })))
}
