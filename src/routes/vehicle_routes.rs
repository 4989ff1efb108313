use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, DeleteVehicleResponse, FuelData, FuelDataQuery, LowFuelQuery, StatusHistoryResponse,
    UpdateVehicleRequest, VehicleFilters, VehicleStatistics,
};
use crate::models::vehicle::VehicleResponse;
use crate::routes::batch_routes::create_batch_router;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/statistics", get(get_statistics))
        .route("/fuel", get(get_fuel_data))
        .route("/low-fuel", get(get_low_fuel))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/status-history", get(get_status_history))
        .nest("/batch", create_batch_router())
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.vehicle_store());
    let response = controller.list(filters.status).await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleResponse>>), AppError> {
    let mut controller = VehicleController::new(state.vehicle_store());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.vehicle_store());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<VehicleResponse>, AppError> {
    let mut controller = VehicleController::new(state.vehicle_store());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteVehicleResponse>, AppError> {
    let mut controller = VehicleController::new(state.vehicle_store());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn get_statistics(State(state): State<AppState>) -> Result<Json<VehicleStatistics>, AppError> {
    let controller = VehicleController::new(state.vehicle_store());
    let response = controller.statistics().await?;
    Ok(Json(response))
}

async fn get_fuel_data(
    State(state): State<AppState>,
    Query(query): Query<FuelDataQuery>,
) -> Result<Json<Vec<FuelData>>, AppError> {
    let controller = VehicleController::new(state.vehicle_store());
    let response = controller.fuel_data(query.status.as_deref()).await?;
    Ok(Json(response))
}

async fn get_low_fuel(
    State(state): State<AppState>,
    Query(query): Query<LowFuelQuery>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.vehicle_store());
    let response = controller.low_fuel(query.threshold).await?;
    Ok(Json(response))
}

async fn get_status_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusHistoryResponse>>, AppError> {
    let controller = VehicleController::new(state.vehicle_store());
    let response = controller.status_history(id).await?;
    Ok(Json(response))
}
