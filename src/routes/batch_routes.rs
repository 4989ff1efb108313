use axum::{extract::State, routing::post, Json, Router};

use crate::dto::batch_dto::{
    BatchDeleteOutcome, BatchDeleteRequest, BatchOutcome, BatchScheduleMaintenanceRequest,
    BatchUpdateFuelRequest, BatchUpdateStatusRequest,
};
use crate::services::batch_processor::BatchMutationProcessor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_batch_router() -> Router<AppState> {
    Router::new()
        .route("/update-status", post(batch_update_status))
        .route("/update-fuel", post(batch_update_fuel))
        .route("/schedule-maintenance", post(batch_schedule_maintenance))
        .route("/delete", post(batch_delete))
}

async fn batch_update_status(
    State(state): State<AppState>,
    Json(request): Json<BatchUpdateStatusRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let mut processor = BatchMutationProcessor::new(state.vehicle_store());
    let outcome = processor
        .update_status(
            &request.vehicle_ids,
            request.new_status,
            request.reason.as_deref(),
            request.changed_by.as_deref(),
        )
        .await?;
    Ok(Json(outcome))
}

async fn batch_update_fuel(
    State(state): State<AppState>,
    Json(request): Json<BatchUpdateFuelRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let mut processor = BatchMutationProcessor::new(state.vehicle_store());
    let outcome = processor
        .update_fuel(&request.vehicle_ids, request.new_fuel_level)
        .await?;
    Ok(Json(outcome))
}

async fn batch_schedule_maintenance(
    State(state): State<AppState>,
    Json(request): Json<BatchScheduleMaintenanceRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let mut processor = BatchMutationProcessor::new(state.vehicle_store());
    let outcome = processor
        .schedule_maintenance(
            &request.vehicle_ids,
            request.maintenance_date,
            request.set_to_maintenance_status,
            request.scheduled_by.as_deref(),
        )
        .await?;
    Ok(Json(outcome))
}

async fn batch_delete(
    State(state): State<AppState>,
    Json(request): Json<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteOutcome>, AppError> {
    let mut processor = BatchMutationProcessor::new(state.vehicle_store());
    let outcome = processor.delete(&request.vehicle_ids).await?;
    Ok(Json(outcome))
}
