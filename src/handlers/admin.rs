use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::admin::calendar::{day_entries, month_grid, shift_month, CalendarDay, DayEntry};
use crate::admin::dashboard::{
    compute_stats, filter_and_sort, BookingFilter, DashboardStats, SortField, SortOrder,
};
use crate::admin::AdminState;
use crate::clients::backend::BackendClient;
use crate::domain::booking::{BookingRecord, BookingStatus};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> AppResult<Json<serde_json::Value>> {
    let mut admin = state.admin.write().await;
    admin.guard.login(&state.backend, &body.username, &body.password).await?;
    // Fresh session, fresh collection.
    admin.bookings.clear();
    admin.loaded = false;
    tracing::info!("Admin signed in");
    Ok(Json(json!({ "authenticated": true })))
}

/// Session restore on dashboard load. A refused or unverifiable stored
/// token signs out cleanly; no bookings are fetched in that case.
pub async fn restore(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut admin = state.admin.write().await;
    let authenticated = admin.guard.restore(&state.backend).await;
    if !authenticated {
        admin.reset();
    }
    Json(json!({ "authenticated": authenticated }))
}

pub async fn logout(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut admin = state.admin.write().await;
    admin.guard.logout();
    admin.reset();
    tracing::info!("Admin signed out");
    Json(json!({ "authenticated": false }))
}

fn session_token(admin: &AdminState) -> AppResult<String> {
    admin
        .guard
        .token()
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("Admin login required".to_string()))
}

/// Refetches the collection; an upstream 401 means the token died
/// server-side, so the local session is torn down as well.
async fn refetch(admin: &mut AdminState, backend: &BackendClient) -> AppResult<()> {
    let token = session_token(admin)?;
    match admin.refetch(backend, &token).await {
        Err(AppError::Unauthorized(message)) => {
            admin.guard.logout();
            admin.reset();
            Err(AppError::Unauthorized(message))
        }
        other => other,
    }
}

async fn ensure_loaded(admin: &mut AdminState, backend: &BackendClient) -> AppResult<()> {
    if !admin.loaded {
        refetch(admin, backend).await?;
    }
    Ok(())
}

/// The table view: filtered and sorted rows over the full collection.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub bookings: Vec<BookingRecord>,
    pub total: usize,
    pub sort: SortOrder,
}

fn table_view(admin: &AdminState, today: NaiveDate) -> DashboardView {
    let bookings = filter_and_sort(&admin.bookings, &admin.filter, admin.sort, today);
    DashboardView {
        total: bookings.len(),
        bookings,
        sort: admin.sort,
    }
}

pub async fn list_bookings(State(state): State<AppState>) -> AppResult<Json<DashboardView>> {
    let mut admin = state.admin.write().await;
    ensure_loaded(&mut admin, &state.backend).await?;
    Ok(Json(table_view(&admin, Utc::now().date_naive())))
}

pub async fn refresh_bookings(State(state): State<AppState>) -> AppResult<Json<DashboardView>> {
    let mut admin = state.admin.write().await;
    refetch(&mut admin, &state.backend).await?;
    Ok(Json(table_view(&admin, Utc::now().date_naive())))
}

/// Replaces the whole filter; the next render applies the intersection
/// of all four predicates.
pub async fn set_filter(
    State(state): State<AppState>,
    Json(filter): Json<BookingFilter>,
) -> AppResult<Json<DashboardView>> {
    let mut admin = state.admin.write().await;
    ensure_loaded(&mut admin, &state.backend).await?;
    admin.filter = filter;
    Ok(Json(table_view(&admin, Utc::now().date_naive())))
}

#[derive(Debug, Deserialize)]
pub struct SortBody {
    pub field: SortField,
}

pub async fn toggle_sort(
    State(state): State<AppState>,
    Json(body): Json<SortBody>,
) -> AppResult<Json<DashboardView>> {
    let mut admin = state.admin.write().await;
    ensure_loaded(&mut admin, &state.backend).await?;
    admin.sort.toggle(body.field);
    Ok(Json(table_view(&admin, Utc::now().date_naive())))
}

/// Header cards, always over the unfiltered collection.
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let mut admin = state.admin.write().await;
    ensure_loaded(&mut admin, &state.backend).await?;
    Ok(Json(compute_stats(&admin.bookings, Utc::now().date_naive())))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: BookingStatus,
}

/// Status change: one upstream PUT, then a full refetch. The upstream
/// response body is never merged into the local collection.
pub async fn update_status(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(body): Json<StatusBody>,
) -> AppResult<Json<DashboardView>> {
    let mut admin = state.admin.write().await;
    let token = session_token(&admin)?;
    state
        .backend
        .update_booking_status(&token, &booking_id, body.status)
        .await?;
    refetch(&mut admin, &state.backend).await?;
    Ok(Json(table_view(&admin, Utc::now().date_naive())))
}

#[derive(Debug, Serialize)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub previous: (i32, u32),
    pub next: (i32, u32),
    pub days: Vec<CalendarDay>,
}

pub async fn calendar_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<CalendarView>> {
    let mut admin = state.admin.write().await;
    ensure_loaded(&mut admin, &state.backend).await?;
    let days = month_grid(year, month, &admin.bookings)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month: {}-{}", year, month)))?;
    Ok(Json(CalendarView {
        year,
        month,
        previous: shift_month(year, month, false),
        next: shift_month(year, month, true),
        days,
    }))
}

pub async fn calendar_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<Vec<DayEntry>>> {
    let mut admin = state.admin.write().await;
    ensure_loaded(&mut admin, &state.backend).await?;
    Ok(Json(day_entries(date, &admin.bookings)))
}

/// CSV export, streamed through from the backend with a dated filename.
pub async fn export_csv(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let admin = state.admin.read().await;
    let token = session_token(&admin)?;
    drop(admin);

    let csv = state.backend.export_csv(&token).await?;
    let filename = format!("reservations_{}.csv", Utc::now().date_naive());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}
