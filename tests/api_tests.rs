//! Tests de la superficie HTTP
//!
//! Estos tests construyen un router con handlers stub que replican la forma
//! de la API (rutas, métodos, envelope JSON) y lo ejercitan con `oneshot`,
//! sin necesidad de una base de datos.

use axum::{
    body::Body,
    extract::{Path, Query},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use http_body_util::BodyExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;

fn stub_app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/parcels", post(register_parcel))
        .route("/api/parcels/:tracking/status", put(update_status))
        .route("/api/parcels/:tracking/history", get(history))
        .route("/api/track/:tracking", get(track))
        .route("/api/reports/:kind", post(report))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "courier_tracking",
    }))
}

#[derive(Deserialize)]
struct StubCreate {
    sender_name: String,
    weight: f64,
}

async fn register_parcel(Json(body): Json<StubCreate>) -> impl IntoResponse {
    if body.sender_name.trim().is_empty() || body.weight <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Invalid parcel data",
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Parcel registered successfully",
            "data": {
                "tracking_number": "DXLZX9K2M4ABCD",
                "current_status": "Item Accepted by Courier",
            }
        })),
    )
}

async fn update_status(
    Path(tracking): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if tracking != "DXKNOWN0001" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Parcel with tracking number '{}' not found", tracking),
            })),
        );
    }
    let status = body["status"].as_str().unwrap_or_default();
    if status == "Teleported" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_status",
                "message": format!("Unknown parcel status '{}'", status),
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Status updated successfully",
            "data": { "current_status": status },
        })),
    )
}

async fn history(Path(_tracking): Path<String>) -> Json<Value> {
    Json(json!([
        { "status": "Shipped", "location": "Hub Norte" },
        { "status": "Item Accepted by Courier", "location": "Initial Location" },
    ]))
}

async fn track(Path(tracking): Path<String>) -> Json<Value> {
    Json(json!({
        "tracking_number": tracking,
        "current_status": "In-Transit",
        "history": [],
    }))
}

#[derive(Deserialize)]
struct StubReportQuery {}

async fn report(
    Path(kind): Path<String>,
    Query(_q): Query<StubReportQuery>,
) -> impl IntoResponse {
    match kind.as_str() {
        "parcels" | "staff" | "branches" => (
            StatusCode::OK,
            Json(json!({ "rows": [], "summary": { "total_parcels": 0 } })),
        ),
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "bad_request",
                "message": format!("Unknown report type '{}'", other),
            })),
        ),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "courier_tracking");
}

#[tokio::test]
async fn test_register_parcel_success_envelope() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/parcels")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "sender_name": "Ana", "weight": 2.5 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["tracking_number"]
        .as_str()
        .unwrap()
        .starts_with("DX"));
    assert_eq!(body["data"]["current_status"], "Item Accepted by Courier");
}

#[tokio::test]
async fn test_register_parcel_validation_error() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/parcels")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "sender_name": "", "weight": -1.0 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_update_status_unknown_tracking() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/parcels/DXMISSING999/status")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "status": "Shipped" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_update_status_rejects_unknown_status() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/parcels/DXKNOWN0001/status")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "status": "Teleported" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_status");
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/parcels/DXKNOWN0001/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries[0]["status"], "Shipped");
    assert_eq!(entries.last().unwrap()["status"], "Item Accepted by Courier");
}

#[tokio::test]
async fn test_report_unknown_kind() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reports/vehicles")
                .header("content-type", "application/json")
                .body(Body::from(json!({}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Unknown report type"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = stub_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
