use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Gate for the admin API. Everything behind it requires a signed-in
/// guard; login, session restore and logout live outside the gate.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let authenticated = state.admin.read().await.guard.is_authenticated();
    if !authenticated {
        return Err(AppError::Unauthorized("Admin login required".to_string()));
    }
    Ok(next.run(request).await)
}
