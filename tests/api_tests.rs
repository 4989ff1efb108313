use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fleet_registry::config::environment::EnvironmentConfig;
use fleet_registry::create_app;
use fleet_registry::repositories::memory_store::MemoryDatabase;
use fleet_registry::state::AppState;

fn create_test_app() -> (Router, MemoryDatabase) {
    let (state, db) = AppState::in_memory(EnvironmentConfig::default());
    (create_app(state), db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_vehicle(app: &Router, plate: &str, mileage: f64) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/vehicles",
        Some(json!({
            "make": "Ford",
            "model": "Transit",
            "year": 2021,
            "license_plate": plate,
            "color": "White",
            "fuel_type": "Diesel",
            "current_mileage": mileage
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _db) = create_test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_vehicle_crud() {
    let (app, _db) = create_test_app();
    let created = create_vehicle(&app, "ABC-1234", 1500.0).await;
    assert_eq!(created["status"], "idle");
    assert_eq!(created["fuel_level"], 100.0);

    let id = created["id"].as_str().unwrap().to_string();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["license_plate"], "ABC-1234");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/vehicles/{}", id),
        Some(json!({ "status": "active", "fuel_level": 42.5, "changed_by": "dispatcher" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "active");

    let (status, history) = send(&app, Method::GET, &format!("/api/vehicles/{}/status-history", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["changed_by"], "dispatcher");

    let (status, list) = send(&app, Method::GET, "/api/vehicles?status=active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_vehicle_is_rejected() {
    let (app, _db) = create_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles",
        Some(json!({
            "make": "Ford",
            "model": "Transit",
            "year": 2021,
            "license_plate": "ABC-1234",
            "fuel_type": "Diesel",
            "current_mileage": -5.0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_statistics_and_low_fuel() {
    let (app, _db) = create_test_app();
    let a = create_vehicle(&app, "AAA-1111", 1000.0).await;
    create_vehicle(&app, "BBB-2222", 3000.0).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/vehicles/batch/update-fuel",
        Some(json!({ "vehicle_ids": [a["id"]], "new_fuel_level": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app, Method::GET, "/api/vehicles/statistics", None).await;
    assert_eq!(stats["total_vehicles"], 2);
    assert_eq!(stats["idle_vehicles"], 2);
    assert_eq!(stats["average_fuel_level"], 55.0);
    assert_eq!(stats["average_mileage"], 2000.0);
    assert_eq!(stats["low_fuel_count"], 1);

    let (_, low) = send(&app, Method::GET, "/api/vehicles/low-fuel", None).await;
    assert_eq!(low.as_array().unwrap().len(), 1);
    assert_eq!(low[0]["id"], a["id"]);

    let (_, none) = send(&app, Method::GET, "/api/vehicles/low-fuel?threshold=10", None).await;
    assert!(none.as_array().unwrap().is_empty());

    let (_, fuel) = send(&app, Method::GET, "/api/vehicles/fuel?status=Idle", None).await;
    assert_eq!(fuel.as_array().unwrap().len(), 2);
    assert_eq!(fuel[0]["vehicle_identifier"], "Ford Transit (AAA-1111)");
}

#[tokio::test]
async fn test_batch_status_update_reports_missing_ids() {
    let (app, db) = create_test_app();
    let a = create_vehicle(&app, "AAA-1111", 1000.0).await;
    let c = create_vehicle(&app, "CCC-3333", 1000.0).await;
    let missing = "5d9b6a51-1c0e-4d7a-9a57-0c3f1c3b2b11";

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles/batch/update-status",
        Some(json!({
            "vehicle_ids": [a["id"], missing, c["id"]],
            "new_status": "maintenance"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Updated 2 vehicles");
    assert_eq!(body["success_count"], 2);
    assert_eq!(body["failed_count"], 1);
    assert_eq!(body["failed_ids"], json!([missing]));
    assert_eq!(body["updated_vehicles"][0]["id"], a["id"]);
    assert_eq!(body["updated_vehicles"][1]["id"], c["id"]);
    assert_eq!(db.history_len().await, 2);
}

#[tokio::test]
async fn test_batch_with_empty_ids_is_bad_request() {
    let (app, _db) = create_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles/batch/delete",
        Some(json!({ "vehicle_ids": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["message"], "Vehicle IDs are required");
}

#[tokio::test]
async fn test_batch_schedule_maintenance_and_delete() {
    let (app, _db) = create_test_app();
    let a = create_vehicle(&app, "AAA-1111", 1000.0).await;
    let b = create_vehicle(&app, "BBB-2222", 1000.0).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles/batch/schedule-maintenance",
        Some(json!({
            "vehicle_ids": [a["id"]],
            "maintenance_date": "2030-01-15T08:00:00Z",
            "set_to_maintenance_status": true,
            "scheduled_by": "workshop"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Scheduled maintenance for 1 vehicles");
    assert_eq!(body["updated_vehicles"][0]["status"], "maintenance");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles/batch/delete",
        Some(json!({ "vehicle_ids": [a["id"], "not-a-uuid", b["id"]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted 2 vehicles");
    assert_eq!(body["deleted_ids"], json!([a["id"], b["id"]]));
    assert_eq!(body["failed_ids"], json!(["not-a-uuid"]));

    let (_, list) = send(&app, Method::GET, "/api/vehicles", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reports_on_empty_fleet() {
    let (app, _db) = create_test_app();

    let (status, summary) = send(&app, Method::GET, "/api/reports/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["period"], "month");
    assert_eq!(summary["fleet_overview"]["total_vehicles"], 0);
    assert_eq!(summary["fuel_status"]["average_fuel_level"], 0.0);
    assert_eq!(summary["mileage_stats"]["highest_mileage"], 0.0);

    let (status, perf) = send(&app, Method::GET, "/api/reports/fleet-performance?period=week", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(perf["period"], "week");
    assert_eq!(perf["summary"]["utilization_rate"], 0.0);
}

#[tokio::test]
async fn test_generate_list_and_download_report() {
    let (app, _db) = create_test_app();
    create_vehicle(&app, "AAA-1111", 1000.0).await;

    let (status, generated) = send(
        &app,
        Method::POST,
        "/api/reports/generate",
        Some(json!({ "report_type": "maintenance-summary", "period": "quarter" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(generated["report_type"], "maintenance-summary");
    assert_eq!(generated["format"], "JSON");
    assert_eq!(generated["report"]["summary"]["total_vehicles"], 1);
    let id = generated["id"].as_str().unwrap().to_string();

    let (_, recent) = send(&app, Method::GET, "/api/reports/recent?limit=5", None).await;
    assert_eq!(recent.as_array().unwrap().len(), 1);
    assert_eq!(recent[0]["id"], generated["id"]);
    assert!(recent[0].get("data").is_none());

    let (status, stored) = send(&app, Method::GET, &format!("/api/reports/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["report_name"], generated["report_name"]);

    let request = Request::builder()
        .uri(format!("/api/reports/{}/download", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"maintenance-summary-"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.as_ref(), stored["data"].as_str().unwrap().as_bytes());
}

#[tokio::test]
async fn test_unknown_report_type_is_bad_request() {
    let (app, _db) = create_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/reports/generate",
        Some(json!({ "report_type": "weekly-digest" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}
