use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{GenerateReportRequest, GeneratedReportResponse, PeriodQuery, RecentReportsQuery};
use crate::models::report::{FleetReport, GeneratedReport, GeneratedReportSummary, ReportKind};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/fleet-performance", get(fleet_performance))
        .route("/fuel-consumption", get(fuel_consumption))
        .route("/maintenance-summary", get(maintenance_summary))
        .route("/summary", get(summary))
        .route("/generate", post(generate_report))
        .route("/recent", get(recent_reports))
        .route("/:id", get(get_report))
        .route("/:id/download", get(download_report))
}

async fn compute(state: &AppState, kind: ReportKind, query: &PeriodQuery) -> Result<Json<FleetReport>, AppError> {
    let controller = ReportController::new(state.vehicle_store());
    let report = controller.compute(kind, query.period()).await?;
    Ok(Json(report))
}

async fn fleet_performance(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<FleetReport>, AppError> {
    compute(&state, ReportKind::FleetPerformance, &query).await
}

async fn fuel_consumption(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<FleetReport>, AppError> {
    compute(&state, ReportKind::FuelConsumption, &query).await
}

async fn maintenance_summary(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<FleetReport>, AppError> {
    compute(&state, ReportKind::MaintenanceSummary, &query).await
}

async fn summary(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<FleetReport>, AppError> {
    compute(&state, ReportKind::Summary, &query).await
}

async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<GeneratedReportResponse>, AppError> {
    let controller = ReportController::new(state.vehicle_store());
    let response = controller.generate(request).await?;
    Ok(Json(response))
}

async fn recent_reports(
    State(state): State<AppState>,
    Query(query): Query<RecentReportsQuery>,
) -> Result<Json<Vec<GeneratedReportSummary>>, AppError> {
    let controller = ReportController::new(state.vehicle_store());
    let response = controller.recent(query.limit()).await?;
    Ok(Json(response))
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GeneratedReport>, AppError> {
    let controller = ReportController::new(state.vehicle_store());
    let response = controller.get(id).await?;
    Ok(Json(response))
}

async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let controller = ReportController::new(state.vehicle_store());
    let download = controller.download(id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.file_name),
        ),
    ];
    Ok((headers, download.content))
}
