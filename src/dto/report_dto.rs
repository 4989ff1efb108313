use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::report::GeneratedReportSummary;

/// Periodo por defecto de los reportes
pub const DEFAULT_PERIOD: &str = "month";
/// Cantidad por defecto del listado de reportes recientes
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

// Query `?period=` de los endpoints de reportes
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    pub fn period(&self) -> &str {
        self.period.as_deref().unwrap_or(DEFAULT_PERIOD)
    }
}

// Request para generar y guardar un reporte
#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub report_type: String,
    pub period: Option<String>,
}

// Query `?limit=` del listado de reportes recientes
#[derive(Debug, Default, Deserialize)]
pub struct RecentReportsQuery {
    pub limit: Option<i64>,
}

impl RecentReportsQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_RECENT_LIMIT).max(0)
    }
}

// Response de generación: metadatos guardados + reporte calculado
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedReportResponse {
    #[serde(flatten)]
    pub metadata: GeneratedReportSummary,
    pub report: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(PeriodQuery::default().period(), "month");
        assert_eq!(RecentReportsQuery::default().limit(), 10);
        assert_eq!(RecentReportsQuery { limit: Some(-3) }.limit(), 0);
    }
}
