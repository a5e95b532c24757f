use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

/// Type alias for the public governor layer (IP-based rate limiting)
pub type PublicGovernorLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

/// Create a GovernorLayer for the public booking/contact routes
/// - 100 requests per 60 seconds per IP
pub fn create_public_governor() -> PublicGovernorLayer {
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(60)
            .burst_size(100)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(config)
}

/// Logs the public booking/contact surface. Happy-path traffic is the
/// TraceLayer's job; this only surfaces the outcomes worth paging
/// through logs for: governor rejections and backend failures bubbling
/// up to a visitor mid-booking, with the caller's IP and the wizard
/// session they were in.
pub async fn log_booking_rejections(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    // Wizard routes carry the session id as the first segment after
    // /booking (the /api prefix is already stripped by the nesting);
    // anything else (contact, success) has none.
    let session = uri
        .path()
        .strip_prefix("/booking/")
        .and_then(|rest| rest.split('/').next())
        .map(str::to_string);

    let response = next.run(request).await;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            "Booking API rate limit hit"
        );
    } else if status == StatusCode::BAD_GATEWAY {
        tracing::warn!(
            client_ip = %addr.ip(),
            session = session.as_deref().unwrap_or("-"),
            method = %method,
            uri = %uri,
            "Backend failure surfaced to a visitor"
        );
    }

    response
}
