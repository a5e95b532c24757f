use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::booking::{BookingRecord, BookingStatus};
use crate::domain::draft::{BookingPayload, EstimateRequest};
use crate::error::{AppError, AppResult};

/// Reply to `POST /booking-and-pay`. A rejection carries the server's
/// error message; an acceptance may carry a payment-provider URL.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitReply {
    Accepted { url: Option<String> },
    Rejected { message: String },
}

#[derive(Debug, Default, Deserialize)]
struct SubmitBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceBody {
    price: f64,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

/// Booking record returned by `GET /booking-success/{session_id}`.
/// `amount_paid`/`amount_remaining` may be absent; callers fill them
/// from the shared payment split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessRecord {
    pub price: f64,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub amount_remaining: Option<f64>,
    pub payment_method: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
}

/// Client for the external booking REST API. Pricing, persistence,
/// payment sessions and token issuance all live behind it.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn upstream_error(response: reqwest::Response, fallback: &str) -> AppError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| fallback.to_string());
        tracing::warn!(status = %status, "Backend returned an error: {}", message);
        AppError::Upstream(message)
    }

    pub async fn estimate(&self, request: &EstimateRequest) -> AppResult<f64> {
        let response = self
            .http
            .post(self.url("/estimate"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "Failed to fetch price estimate").await);
        }
        let body: PriceBody = response.json().await?;
        Ok(body.price)
    }

    /// Posted exactly once per user action; no retry, no dedup. The
    /// backend is the idempotency authority for double submissions.
    pub async fn submit_booking(&self, payload: &BookingPayload) -> AppResult<SubmitReply> {
        let response = self
            .http
            .post(self.url("/booking-and-pay"))
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("Booking submission failed: {}", err);
                AppError::Upstream("Booking error, please try again".to_string())
            })?;

        if response.status().is_success() {
            let body: SubmitBody = response.json().await.unwrap_or_default();
            Ok(SubmitReply::Accepted { url: body.url })
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Booking error".to_string());
            Ok(SubmitReply::Rejected { message })
        }
    }

    pub async fn booking_success(&self, session_id: &str) -> AppResult<SuccessRecord> {
        let response = self
            .http
            .get(self.url(&format!("/booking-success/{}", session_id)))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Booking not found".to_string()));
        }
        if !response.status().is_success() {
            return Err(
                Self::upstream_error(response, "Error retrieving booking details").await,
            );
        }
        Ok(response.json().await?)
    }

    pub async fn send_contact(&self, message: &ContactMessage) -> AppResult<()> {
        let response = self
            .http
            .post(self.url("/contact"))
            .json(message)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "Failed to send message").await);
        }
        Ok(())
    }

    // ============ Admin ============

    pub async fn admin_login(&self, username: &str, password: &str) -> AppResult<String> {
        let response = self
            .http
            .post(self.url("/admin/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        if !response.status().is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Invalid credentials".to_string());
            return Err(AppError::Unauthorized(message));
        }
        let body: TokenBody = response.json().await?;
        Ok(body.token)
    }

    /// One verification call; `Ok(false)` means the token was refused.
    pub async fn admin_verify(&self, token: &str) -> AppResult<bool> {
        let response = self
            .http
            .get(self.url("/admin/verify"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    pub async fn admin_bookings(&self, token: &str) -> AppResult<Vec<BookingRecord>> {
        let response = self
            .http
            .get(self.url("/admin/bookings"))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized("Admin session expired".to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "Failed to load bookings").await);
        }
        Ok(response.json().await?)
    }

    /// The response body is ignored on purpose; the dashboard refetches
    /// the whole collection instead of trusting it.
    pub async fn update_booking_status(
        &self,
        token: &str,
        booking_id: &str,
        status: BookingStatus,
    ) -> AppResult<()> {
        let response = self
            .http
            .put(self.url(&format!("/admin/bookings/{}/status", booking_id)))
            .bearer_auth(token)
            .json(&json!({ "status": status }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "Failed to update status").await);
        }
        Ok(())
    }

    pub async fn export_csv(&self, token: &str) -> AppResult<Vec<u8>> {
        let response = self
            .http
            .get(self.url("/admin/bookings/export"))
            .bearer_auth(token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "Export failed").await);
        }
        Ok(response.bytes().await?.to_vec())
    }
}
