use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::handlers::{admin, booking, contact, pages, success};
use crate::middleware::auth::require_admin;
use crate::middleware::rate_limit::{create_public_governor, log_booking_rejections};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for the public booking/contact API
    let public_governor = create_public_governor();

    // Server-rendered pages
    let page_routes = Router::new()
        .route("/", get(pages::home))
        .route("/book", get(pages::book))
        .route("/transfers", get(pages::transfers))
        .route("/transfers/airports", get(pages::airport_transfers))
        .route("/transfers/train-stations", get(pages::train_station_transfers))
        .route("/transfers/disneyland", get(pages::disneyland_transfers))
        .route("/faq", get(pages::faq))
        .route("/contact", get(pages::contact))
        .route("/success", get(pages::success));

    // Public booking wizard API (rate limited per IP)
    let booking_routes = Router::new()
        .route("/booking", post(booking::create_session))
        .route("/booking/{id}", get(booking::get_session))
        .route("/booking/{id}/draft", patch(booking::patch_draft))
        .route("/booking/{id}/estimate", get(booking::estimate_state))
        .route("/booking/{id}/next", post(booking::next_step))
        .route("/booking/{id}/back", post(booking::back_step))
        .route("/booking/{id}/luggage", patch(booking::patch_luggage))
        .route("/booking/{id}/contact", patch(booking::patch_contact))
        .route("/booking/{id}/submit", post(booking::submit))
        .route(
            "/booking/{id}/lookup/{side}",
            post(booking::address_lookup).get(booking::lookup_state),
        )
        .route(
            "/booking/{id}/lookup/{side}/dismiss",
            post(booking::dismiss_lookup),
        )
        .route("/booking-success/{session_id}", get(success::booking_success))
        .route("/contact", post(contact::send_message))
        .layer(public_governor)
        .layer(middleware::from_fn(log_booking_rejections));

    // Admin session endpoints live outside the auth gate
    let admin_session_routes = Router::new()
        .route("/login", post(admin::login))
        .route("/session", get(admin::restore))
        .route("/logout", post(admin::logout));

    // Dashboard, calendar and export (requires a signed-in session)
    let admin_routes = Router::new()
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/refresh", post(admin::refresh_bookings))
        .route("/bookings/{id}/status", put(admin::update_status))
        .route("/view", put(admin::set_filter))
        .route("/sort", post(admin::toggle_sort))
        .route("/stats", get(admin::stats))
        .route("/calendar/{year}/{month}", get(admin::calendar_month))
        .route("/calendar/day/{date}", get(admin::calendar_day))
        .route("/export", get(admin::export_csv))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Combine all routes
    Router::new()
        .merge(page_routes)
        .nest("/api", booking_routes)
        .nest("/api/admin", admin_session_routes.merge(admin_routes))
        .with_state(state)
}
