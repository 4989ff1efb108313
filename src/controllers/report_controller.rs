use chrono::Utc;
use uuid::Uuid;

use crate::dto::report_dto::{GenerateReportRequest, GeneratedReportResponse, DEFAULT_PERIOD};
use crate::models::report::{FleetReport, GeneratedReport, GeneratedReportSummary, ReportKind};
use crate::repositories::vehicle_store::VehicleStore;
use crate::services::aggregation_engine;
use crate::utils::errors::{not_found_error, AppResult};

/// Archivo descargable de un reporte guardado
pub struct ReportDownload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl From<GeneratedReport> for ReportDownload {
    fn from(report: GeneratedReport) -> Self {
        Self {
            file_name: format!(
                "{}-{}.json",
                report.report_type,
                report.generated_date.format("%Y%m%d-%H%M%S")
            ),
            content: report.data.into_bytes(),
        }
    }
}

pub struct ReportController {
    store: Box<dyn VehicleStore>,
}

impl ReportController {
    pub fn new(store: Box<dyn VehicleStore>) -> Self {
        Self { store }
    }

    /// Calcular un reporte sobre un snapshot completo de la flota, sin guardarlo
    pub async fn compute(&self, kind: ReportKind, period: &str) -> AppResult<FleetReport> {
        let vehicles = self.store.fetch_all().await?;
        Ok(aggregation_engine::build_report(kind, &vehicles, Some(period), Utc::now()))
    }

    /// Calcular y guardar un reporte
    pub async fn generate(&self, request: GenerateReportRequest) -> AppResult<GeneratedReportResponse> {
        let kind = aggregation_engine::parse_report_kind(&request.report_type)?;
        let period = request.period.as_deref().unwrap_or(DEFAULT_PERIOD);

        let report = self.compute(kind, period).await?;
        let stored = aggregation_engine::store_report(&*self.store, &report).await?;

        Ok(GeneratedReportResponse {
            metadata: GeneratedReportSummary::from(&stored),
            report: serde_json::to_value(&report)?,
        })
    }

    pub async fn recent(&self, limit: i64) -> AppResult<Vec<GeneratedReportSummary>> {
        self.store.list_recent_reports(limit).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<GeneratedReport> {
        self.store
            .get_report_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Report", &id.to_string()))
    }

    pub async fn download(&self, id: Uuid) -> AppResult<ReportDownload> {
        Ok(ReportDownload::from(self.get(id).await?))
    }
}
