//! Modelos de reportes
//!
//! Formas de los cuatro reportes de flota y el artefacto `GeneratedReport`
//! que guarda una copia serializada de cada reporte generado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Formato de serialización de los reportes persistidos
pub const REPORT_FORMAT_JSON: &str = "JSON";

/// Tipo de reporte solicitado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    FleetPerformance,
    FuelConsumption,
    MaintenanceSummary,
    Summary,
}

impl ReportKind {
    /// Etiqueta corta persistida en `report_type`
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::FleetPerformance => "fleet-performance",
            ReportKind::FuelConsumption => "fuel-consumption",
            ReportKind::MaintenanceSummary => "maintenance-summary",
            ReportKind::Summary => "summary",
        }
    }

    /// Título legible del reporte
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::FleetPerformance => "Fleet Performance Report",
            ReportKind::FuelConsumption => "Fuel Consumption Analysis",
            ReportKind::MaintenanceSummary => "Maintenance Summary Report",
            ReportKind::Summary => "Fleet Summary Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fleet-performance" => Ok(ReportKind::FleetPerformance),
            "fuel-consumption" => Ok(ReportKind::FuelConsumption),
            "maintenance-summary" => Ok(ReportKind::MaintenanceSummary),
            "summary" | "fleet-summary" => Ok(ReportKind::Summary),
            other => Err(format!("Unknown report type '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Fleet performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetPerformanceReport {
    pub report_type: String,
    pub period: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: FleetPerformanceSummary,
    pub vehicles: Vec<VehiclePerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetPerformanceSummary {
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub utilization_rate: f64,
    pub average_mileage: f64,
    pub total_mileage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePerformance {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub status: String,
    pub mileage: f64,
    pub fuel_level: f64,
    pub last_maintenance: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Fuel consumption
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelConsumptionReport {
    pub report_type: String,
    pub period: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: FuelConsumptionSummary,
    pub vehicles: Vec<VehicleFuel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelConsumptionSummary {
    pub average_fuel_level: f64,
    pub low_fuel_vehicles: usize,
    pub critical_fuel_vehicles: usize,
    pub fuel_type_distribution: Vec<FuelTypeCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTypeCount {
    pub fuel_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleFuel {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub fuel_level: f64,
    pub fuel_type: String,
    pub current_driver: Option<String>,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Maintenance summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenancePriority {
    Overdue,
    DueSoon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSummaryReport {
    pub report_type: String,
    pub period: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: MaintenanceOverview,
    pub upcoming_maintenance: Vec<UpcomingMaintenance>,
    pub vehicles_in_service: Vec<VehicleInService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceOverview {
    pub total_vehicles: usize,
    pub in_maintenance: usize,
    pub maintenance_due_soon: usize,
    pub overdue_count: usize,
    pub next_week_scheduled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingMaintenance {
    pub vehicle_id: Uuid,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub due_date: Option<DateTime<Utc>>,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub current_mileage: f64,
    pub priority: MaintenancePriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInService {
    pub vehicle_id: Uuid,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub current_mileage: f64,
}

// ---------------------------------------------------------------------------
// Fleet summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSummaryReport {
    pub report_type: String,
    pub period: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub fleet_overview: FleetOverview,
    pub fuel_status: FuelStatus,
    pub maintenance: MaintenanceStatus,
    pub mileage_stats: MileageStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetOverview {
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub idle_vehicles: usize,
    pub maintenance_vehicles: usize,
    pub decommissioned_vehicles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStatus {
    pub average_fuel_level: f64,
    pub low_fuel_count: usize,
    pub critical_fuel_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub in_service: usize,
    pub due_soon: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageStats {
    pub total_mileage: f64,
    pub average_mileage: f64,
    pub highest_mileage: f64,
    pub lowest_mileage: f64,
}

/// Cualquiera de los cuatro reportes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FleetReport {
    FleetPerformance(FleetPerformanceReport),
    FuelConsumption(FuelConsumptionReport),
    MaintenanceSummary(MaintenanceSummaryReport),
    Summary(FleetSummaryReport),
}

impl FleetReport {
    pub fn kind(&self) -> ReportKind {
        match self {
            FleetReport::FleetPerformance(_) => ReportKind::FleetPerformance,
            FleetReport::FuelConsumption(_) => ReportKind::FuelConsumption,
            FleetReport::MaintenanceSummary(_) => ReportKind::MaintenanceSummary,
            FleetReport::Summary(_) => ReportKind::Summary,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        match self {
            FleetReport::FleetPerformance(r) => r.generated_at,
            FleetReport::FuelConsumption(r) => r.generated_at,
            FleetReport::MaintenanceSummary(r) => r.generated_at,
            FleetReport::Summary(r) => r.generated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Reportes persistidos
// ---------------------------------------------------------------------------

/// Copia persistida de un reporte generado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub id: Uuid,
    pub report_name: String,
    pub report_type: String,
    pub generated_date: DateTime<Utc>,
    pub file_size: String,
    pub format: String,
    pub data: String,
}

/// Metadatos de un reporte persistido, sin el contenido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReportSummary {
    pub id: Uuid,
    pub report_name: String,
    pub report_type: String,
    pub generated_date: DateTime<Utc>,
    pub file_size: String,
    pub format: String,
}

impl From<&GeneratedReport> for GeneratedReportSummary {
    fn from(report: &GeneratedReport) -> Self {
        Self {
            id: report.id,
            report_name: report.report_name.clone(),
            report_type: report.report_type.clone(),
            generated_date: report.generated_date,
            file_size: report.file_size.clone(),
            format: report.format.clone(),
        }
    }
}
