use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use vtc_transfer_web::{routes, AppState, Config};

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

/// Stand-in for the booking backend: fixed prices per vehicle, a
/// payment URL for every submission, and one known success record.
fn stub_backend() -> Router {
    Router::new()
        .route(
            "/estimate",
            post(|Json(body): Json<Value>| async move {
                let price = if body["vehicleType"] == "van" { 110.0 } else { 75.0 };
                Json(json!({ "price": price }))
            }),
        )
        .route(
            "/booking-and-pay",
            post(|Json(_): Json<Value>| async {
                Json(json!({ "url": "https://pay.example/session/abc" }))
            }),
        )
        .route(
            "/booking-success/{id}",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "booking_reference": format!("REF-{}", id),
                    "price": 90.0,
                    "payment_method": "cash"
                }))
            }),
        )
}

fn stub_geocoder() -> Router {
    Router::new().route(
        "/search/",
        get(|| async {
            Json(json!({
                "features": [
                    { "properties": { "label": "10 Rue de Rivoli 75001 Paris", "context": "75, Paris" } },
                    { "properties": { "label": "12 Rue de Rivoli 75004 Paris", "context": "75, Paris" } }
                ]
            }))
        }),
    )
}

async fn spawn_app() -> String {
    let backend = serve(stub_backend()).await;
    let geocoder = serve(stub_geocoder()).await;
    let config = Config {
        backend_base_url: format!("http://{}", backend),
        geocoding_base_url: format!("http://{}", geocoder),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        admin_token_file: std::env::temp_dir()
            .join(format!("vtc-booking-test-{}.txt", Uuid::new_v4())),
        estimate_debounce_ms: 1,
        lookup_debounce_ms: 1,
    };
    let addr = serve(routes::create_router(AppState::new(config))).await;
    format!("http://{}", addr)
}

async fn create_session(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{}/api/booking", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let view: Value = response.json().await.unwrap();
    view["session_id"].as_str().unwrap().to_string()
}

async fn patch_draft(client: &reqwest::Client, base: &str, id: &str, patch: Value) -> Value {
    let response = client
        .patch(format!("{}/api/booking/{}/draft", base, id))
        .json(&patch)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success(), "draft patch rejected");
    response.json().await.unwrap()
}

async fn wait_for_estimate(client: &reqwest::Client, base: &str, id: &str) -> Value {
    for _ in 0..50 {
        let estimate: Value = client
            .get(format!("{}/api/booking/{}/estimate", base, id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if estimate["status"] != "pending" {
            return estimate;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("estimate never settled");
}

#[tokio::test]
async fn full_wizard_flow_ends_in_a_payment_redirect() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_session(&client, &base).await;

    patch_draft(
        &client,
        &base,
        &id,
        json!({
            "pickupLocation": "paris",
            "pickupAddress": "10 Rue de Rivoli",
            "dropoffLocation": "charles_de_gaulle",
            "passengers": "2",
            "vehicleType": "berline",
            "date": "2026-09-01",
            "time": "10:00"
        }),
    )
    .await;

    let estimate = wait_for_estimate(&client, &base, &id).await;
    assert_eq!(estimate["status"], "ready");
    assert_eq!(estimate["price"], 75.0);

    for _ in 0..2 {
        let response = client
            .post(format!("{}/api/booking/{}/next", base, id))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let view = client
        .patch(format!("{}/api/booking/{}/contact", base, id))
        .json(&json!({
            "paymentMethod": "card",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "+33 6 00 00 00 00"
        }))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(view["payment"]["due"], 75.0);

    let outcome: Value = client
        .post(format!("{}/api/booking/{}/submit", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["outcome"], "redirect");
    assert_eq!(outcome["url"], "https://pay.example/session/abc");

    // A redirect abandons the draft; the provider owns it from here.
    let response = client
        .get(format!("{}/api/booking/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_route_has_no_estimate_and_blocks_the_gate() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_session(&client, &base).await;

    let view = patch_draft(&client, &base, &id, json!({ "pickupLocation": "orly" })).await;
    assert_eq!(view["estimate"]["status"], "none");

    let response = client
        .post(format!("{}/api/booking/{}/next", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn five_passengers_force_the_van_and_reprice() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_session(&client, &base).await;

    patch_draft(
        &client,
        &base,
        &id,
        json!({
            "pickupLocation": "paris",
            "pickupAddress": "10 Rue de Rivoli",
            "dropoffLocation": "orly",
            "passengers": "2",
            "vehicleType": "berline"
        }),
    )
    .await;
    wait_for_estimate(&client, &base, &id).await;

    let view = patch_draft(&client, &base, &id, json!({ "passengers": "6" })).await;
    assert_eq!(view["van_required"], true);
    assert_eq!(view["multiple_vans_hint"], false);
    assert_eq!(view["draft"]["vehicle_type"], "van");
    assert_eq!(view["available_vehicles"], json!(["van"]));

    let estimate = wait_for_estimate(&client, &base, &id).await;
    assert_eq!(estimate["price"], 110.0);

    let view = patch_draft(&client, &base, &id, json!({ "passengers": "9" })).await;
    assert_eq!(view["multiple_vans_hint"], true);
}

#[tokio::test]
async fn address_lookup_returns_suggestions_in_provider_order() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_session(&client, &base).await;

    // Below three characters: no request, list stays closed.
    let state: Value = client
        .post(format!("{}/api/booking/{}/lookup/pickup", base, id))
        .json(&json!({ "query": "ru" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["status"], "idle");

    client
        .post(format!("{}/api/booking/{}/lookup/pickup", base, id))
        .json(&json!({ "query": "rue de rivoli" }))
        .send()
        .await
        .unwrap();

    let mut state = Value::Null;
    for _ in 0..50 {
        state = client
            .get(format!("{}/api/booking/{}/lookup/pickup", base, id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if state["status"] == "results" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(state["status"], "results");
    assert_eq!(
        state["suggestions"][0]["label"],
        "10 Rue de Rivoli 75001 Paris"
    );
    assert_eq!(
        state["suggestions"][1]["label"],
        "12 Rue de Rivoli 75004 Paris"
    );

    let state: Value = client
        .post(format!("{}/api/booking/{}/lookup/pickup/dismiss", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["status"], "idle");
}

#[tokio::test]
async fn success_page_reconstructs_missing_cash_amounts() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let record: Value = client
        .get(format!("{}/api/booking-success/cs_test_123", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["price"], 90.0);
    assert_eq!(record["amount_paid"], 18.0);
    assert_eq!(record["amount_remaining"], 72.0);
}
