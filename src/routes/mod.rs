//! Routers de la API
//!
//! Cada router se monta bajo su prefijo en `create_api_router`.

pub mod batch_routes;
pub mod report_routes;
pub mod vehicle_routes;

use axum::Router;

use crate::state::AppState;

/// Router con todas las rutas bajo `/api`
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/reports", report_routes::create_report_router())
}
