//! Fleet Registry
//!
//! Registro HTTP de vehículos de flota: CRUD, historial de estados,
//! reportes agregados y mutaciones batch.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_from_config;
use crate::state::{AppState, StorageBackend};

/// Construir la aplicación completa con su estado
pub fn create_app(state: AppState) -> Router {
    let cors = cors_from_config(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .merge(routes::create_api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let storage = match state.storage {
        StorageBackend::Postgres(_) => "postgres",
        StorageBackend::Memory(_) => "memory",
    };

    Json(json!({
        "status": "ok",
        "service": "fleet_registry",
        "storage": storage,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
