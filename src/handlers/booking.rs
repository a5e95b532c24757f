use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::clients::backend::BackendClient;
use crate::clients::geocode::LookupState;
use crate::domain::draft::{BookingDraft, DraftPatch, VehicleType};
use crate::domain::luggage::{LuggageDetails, LuggagePatch};
use crate::domain::payment::{payment_split, ContactDetails, PaymentMethod, PaymentSplit};
use crate::error::{AppError, AppResult};
use crate::wizard::estimate::EstimateState;
use crate::wizard::{Step, SubmitOutcome, WizardSession};
use crate::AppState;

/// Everything the booking form needs to render the current step.
#[derive(Debug, Serialize)]
pub struct WizardView {
    pub session_id: Uuid,
    pub step: Step,
    pub draft: BookingDraft,
    pub luggage: LuggageDetails,
    pub contact: ContactDetails,
    pub estimate: EstimateState,
    pub available_vehicles: Vec<VehicleType>,
    /// Five or more passengers: only a van can take the group.
    pub van_required: bool,
    /// More than eight passengers: several vans will be dispatched.
    pub multiple_vans_hint: bool,
    /// Upfront/remaining amounts, once a method and a price exist.
    pub payment: Option<PaymentSplit>,
}

fn view(session: &WizardSession) -> WizardView {
    let count = session.draft.passenger_count();
    let estimate = session.estimator.state();
    let payment = match (&estimate, session.contact.payment_method) {
        (EstimateState::Ready { price }, Some(method)) => Some(payment_split(*price, method)),
        _ => None,
    };
    WizardView {
        session_id: session.id,
        step: session.step,
        draft: session.draft.clone(),
        luggage: session.luggage,
        contact: session.contact.clone(),
        estimate,
        available_vehicles: session.draft.available_vehicles(),
        van_required: count.is_some_and(|n| n >= 5),
        multiple_vans_hint: count.is_some_and(|n| n > 8),
        payment,
    }
}

async fn session_for(state: &AppState, id: Uuid) -> AppResult<Arc<Mutex<WizardSession>>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Booking session not found".to_string()))
}

/// Schedules a debounced estimate refresh against the booking backend.
/// A `None` request (incomplete route) clears the estimate instead.
fn refresh_estimate(session: &mut WizardSession, backend: BackendClient) {
    let request = session.draft.estimate_request();
    session.estimator.refresh(request, move |request| async move {
        backend.estimate(&request).await.map_err(|err| {
            tracing::warn!("Price estimate failed: {}", err);
            "Unable to calculate price. Please try again.".to_string()
        })
    });
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<WizardView>) {
    let (id, session) = state
        .sessions
        .create(
            Duration::from_millis(state.config.estimate_debounce_ms),
            Duration::from_millis(state.config.lookup_debounce_ms),
        )
        .await;
    tracing::debug!(session_id = %id, "Created booking session");
    let session = session.lock().await;
    (StatusCode::CREATED, Json(view(&session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let session = session_for(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(view(&session)))
}

/// Applies a form edit. The estimate refresh only fires when the edit
/// actually changed the request key, so typing an address or a flight
/// number never re-triggers pricing.
pub async fn patch_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DraftPatch>,
) -> AppResult<Json<WizardView>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    let key_before = session.draft.estimate_request();
    session.draft.apply(patch)?;
    if session.draft.estimate_request() != key_before {
        refresh_estimate(&mut session, state.backend.clone());
    }
    Ok(Json(view(&session)))
}

pub async fn estimate_state(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EstimateState>> {
    let session = session_for(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(session.estimator.state()))
}

pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    session.advance()?;
    Ok(Json(view(&session)))
}

pub async fn back_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    session.back()?;
    Ok(Json(view(&session)))
}

pub async fn patch_luggage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<LuggagePatch>,
) -> AppResult<Json<WizardView>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    session.luggage.apply(patch)?;
    Ok(Json(view(&session)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    /// `""` clears the selection, `"cash"`/`"card"` select a method.
    pub payment_method: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

pub async fn patch_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContactPatch>,
) -> AppResult<Json<WizardView>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    if let Some(method) = patch.payment_method {
        session.contact.payment_method = if method.is_empty() {
            None
        } else {
            Some(PaymentMethod::parse(&method).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown payment method: {}", method))
            })?)
        };
    }
    if let Some(name) = patch.name {
        session.contact.name = name;
    }
    if let Some(email) = patch.email {
        session.contact.email = email;
    }
    if let Some(phone) = patch.phone {
        session.contact.phone = phone;
    }
    if let Some(notes) = patch.notes {
        session.contact.notes = notes;
    }
    Ok(Json(view(&session)))
}

/// Final submission. Gates locally, posts once, and maps the reply: a
/// rejection or missing payment URL keeps the payment step, a redirect
/// abandons the session (the payment provider owns it from here), and
/// only a direct confirmation flips the wizard to its terminal step.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmitOutcome>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    let price = session.check_submittable()?;
    let payload = session
        .draft
        .submission_payload(&session.luggage, &session.contact, price)?;

    let outcome = match state.backend.submit_booking(&payload).await {
        Ok(reply) => session.resolve_submission(reply),
        Err(err) => SubmitOutcome::Error {
            message: err.to_string(),
        },
    };
    drop(session);

    if matches!(outcome, SubmitOutcome::Redirect { .. }) {
        state.sessions.remove(id).await;
    }
    Ok(Json(outcome))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSide {
    Pickup,
    Dropoff,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub query: String,
}

fn lookup_side(session: &mut WizardSession, side: RouteSide) -> &mut crate::clients::geocode::AddressLookup {
    match side {
        RouteSide::Pickup => &mut session.pickup_lookup,
        RouteSide::Dropoff => &mut session.dropoff_lookup,
    }
}

/// Keystroke in an address field: schedules a debounced suggestion
/// lookup for that side, cancelling any in-flight one.
pub async fn address_lookup(
    State(state): State<AppState>,
    Path((id, side)): Path<(Uuid, RouteSide)>,
    Json(body): Json<LookupQuery>,
) -> AppResult<Json<LookupState>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    let geocoder = state.geocoder.clone();
    let lookup = lookup_side(&mut session, side);
    lookup.on_input(&body.query, move |query| async move {
        geocoder.search(&query).await
    });
    Ok(Json(lookup.state()))
}

pub async fn lookup_state(
    State(state): State<AppState>,
    Path((id, side)): Path<(Uuid, RouteSide)>,
) -> AppResult<Json<LookupState>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    Ok(Json(lookup_side(&mut session, side).state()))
}

pub async fn dismiss_lookup(
    State(state): State<AppState>,
    Path((id, side)): Path<(Uuid, RouteSide)>,
) -> AppResult<Json<LookupState>> {
    let session = session_for(&state, id).await?;
    let mut session = session.lock().await;
    let lookup = lookup_side(&mut session, side);
    lookup.dismiss();
    Ok(Json(lookup.state()))
}
