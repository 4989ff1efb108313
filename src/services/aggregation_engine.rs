//! Motor de agregación de flota
//!
//! Transforma un snapshot de vehículos en uno de los cuatro reportes de
//! flota. Todas las funciones son puras: el snapshot vacío produce
//! agregados en 0, nunca un error. `store_report` serializa un reporte ya
//! calculado y lo guarda como `GeneratedReport`.
//!
//! El periodo es sólo metadato: se copia al reporte y nunca filtra.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleStatistics;
use crate::models::report::{
    FleetOverview, FleetPerformanceReport, FleetPerformanceSummary, FleetReport, FleetSummaryReport,
    FuelConsumptionReport, FuelConsumptionSummary, FuelStatus, FuelTypeCount, GeneratedReport,
    MaintenanceOverview, MaintenancePriority, MaintenanceStatus, MaintenanceSummaryReport, MileageStats,
    ReportKind, UpcomingMaintenance, VehicleFuel, VehicleInService, VehiclePerformance, REPORT_FORMAT_JSON,
};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::vehicle_store::VehicleStore;
use crate::utils::errors::{AppError, AppResult};

/// Por debajo de este nivel un vehículo cuenta como "low fuel"
pub const LOW_FUEL_THRESHOLD: f64 = 25.0;
/// Por debajo de este nivel un vehículo cuenta como "critical fuel"
pub const CRITICAL_FUEL_THRESHOLD: f64 = 15.0;
/// Ventana hacia adelante para el mantenimiento "due soon"
pub const MAINTENANCE_WINDOW_DAYS: i64 = 7;

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Promedio que vale 0 sobre un conjunto vacío
fn average<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn count_status(vehicles: &[Vehicle], status: VehicleStatus) -> usize {
    vehicles.iter().filter(|v| v.status == status).count()
}

fn count_fuel_below(vehicles: &[Vehicle], threshold: f64) -> usize {
    vehicles.iter().filter(|v| v.fuel_level < threshold).count()
}

fn maintenance_window_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(MAINTENANCE_WINDOW_DAYS)
}

/// Convertir un selector (`fleet-performance`, `summary`, ...) en `ReportKind`
pub fn parse_report_kind(selector: &str) -> AppResult<ReportKind> {
    selector.parse::<ReportKind>().map_err(AppError::BadRequest)
}

/// Reporte de rendimiento de flota
pub fn fleet_performance(vehicles: &[Vehicle], period: Option<&str>) -> FleetPerformanceReport {
    fleet_performance_at(vehicles, period, Utc::now())
}

pub fn fleet_performance_at(
    vehicles: &[Vehicle],
    period: Option<&str>,
    now: DateTime<Utc>,
) -> FleetPerformanceReport {
    let total = vehicles.len();
    let active = count_status(vehicles, VehicleStatus::Active);
    let utilization_rate = if total > 0 {
        active as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    FleetPerformanceReport {
        report_type: ReportKind::FleetPerformance.title().to_string(),
        period: period.map(str::to_string),
        generated_at: now,
        summary: FleetPerformanceSummary {
            total_vehicles: total,
            active_vehicles: active,
            utilization_rate,
            average_mileage: average(vehicles.iter().map(|v| v.current_mileage)),
            total_mileage: vehicles.iter().map(|v| v.current_mileage).sum(),
        },
        vehicles: vehicles
            .iter()
            .map(|v| VehiclePerformance {
                id: v.id,
                make: v.make.clone(),
                model: v.model.clone(),
                license_plate: v.license_plate.clone(),
                status: v.status.label().to_string(),
                mileage: v.current_mileage,
                fuel_level: v.fuel_level,
                last_maintenance: v.last_maintenance_date,
            })
            .collect(),
    }
}

/// Reporte de consumo de combustible
pub fn fuel_consumption(vehicles: &[Vehicle], period: Option<&str>) -> FuelConsumptionReport {
    fuel_consumption_at(vehicles, period, Utc::now())
}

pub fn fuel_consumption_at(
    vehicles: &[Vehicle],
    period: Option<&str>,
    now: DateTime<Utc>,
) -> FuelConsumptionReport {
    // Grupos en orden de primera aparición
    let mut distribution: Vec<FuelTypeCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for vehicle in vehicles {
        match index.get(vehicle.fuel_type.as_str()) {
            Some(&i) => distribution[i].count += 1,
            None => {
                index.insert(vehicle.fuel_type.as_str(), distribution.len());
                distribution.push(FuelTypeCount {
                    fuel_type: vehicle.fuel_type.clone(),
                    count: 1,
                });
            }
        }
    }

    FuelConsumptionReport {
        report_type: ReportKind::FuelConsumption.title().to_string(),
        period: period.map(str::to_string),
        generated_at: now,
        summary: FuelConsumptionSummary {
            average_fuel_level: average(vehicles.iter().map(|v| v.fuel_level)),
            low_fuel_vehicles: count_fuel_below(vehicles, LOW_FUEL_THRESHOLD),
            critical_fuel_vehicles: count_fuel_below(vehicles, CRITICAL_FUEL_THRESHOLD),
            fuel_type_distribution: distribution,
        },
        vehicles: vehicles
            .iter()
            .map(|v| VehicleFuel {
                id: v.id,
                make: v.make.clone(),
                model: v.model.clone(),
                license_plate: v.license_plate.clone(),
                fuel_level: v.fuel_level,
                fuel_type: v.fuel_type.clone(),
                current_driver: v.current_driver.clone(),
                status: v.status.label().to_string(),
            })
            .collect(),
    }
}

/// Reporte de mantenimiento
///
/// `upcoming_maintenance` incluye todo vehículo con próxima fecha
/// `<= now + 7 días`, por lo que los vencidos también aparecen (con
/// prioridad `overdue`). Un vehículo con fecha exactamente igual a `now` es
/// `due-soon`.
pub fn maintenance_summary(vehicles: &[Vehicle], period: Option<&str>) -> MaintenanceSummaryReport {
    maintenance_summary_at(vehicles, period, Utc::now())
}

pub fn maintenance_summary_at(
    vehicles: &[Vehicle],
    period: Option<&str>,
    now: DateTime<Utc>,
) -> MaintenanceSummaryReport {
    let window_end = maintenance_window_end(now);

    let due: Vec<&Vehicle> = vehicles
        .iter()
        .filter(|v| v.next_maintenance_date.is_some_and(|d| d <= window_end))
        .collect();
    let overdue_count = vehicles
        .iter()
        .filter(|v| v.next_maintenance_date.is_some_and(|d| d < now))
        .count();
    let in_service: Vec<&Vehicle> = vehicles
        .iter()
        .filter(|v| v.status == VehicleStatus::Maintenance)
        .collect();

    MaintenanceSummaryReport {
        report_type: ReportKind::MaintenanceSummary.title().to_string(),
        period: period.map(str::to_string),
        generated_at: now,
        summary: MaintenanceOverview {
            total_vehicles: vehicles.len(),
            in_maintenance: in_service.len(),
            maintenance_due_soon: due.len(),
            overdue_count,
            next_week_scheduled: due.len(),
        },
        upcoming_maintenance: due
            .iter()
            .map(|v| UpcomingMaintenance {
                vehicle_id: v.id,
                make: v.make.clone(),
                model: v.model.clone(),
                license_plate: v.license_plate.clone(),
                due_date: v.next_maintenance_date,
                last_maintenance: v.last_maintenance_date,
                current_mileage: v.current_mileage,
                priority: if v.next_maintenance_date.is_some_and(|d| d < now) {
                    MaintenancePriority::Overdue
                } else {
                    MaintenancePriority::DueSoon
                },
            })
            .collect(),
        vehicles_in_service: in_service
            .iter()
            .map(|v| VehicleInService {
                vehicle_id: v.id,
                make: v.make.clone(),
                model: v.model.clone(),
                license_plate: v.license_plate.clone(),
                current_mileage: v.current_mileage,
            })
            .collect(),
    }
}

/// Resumen general de flota
///
/// A diferencia de `maintenance_summary`, aquí `due_soon` sólo cuenta
/// fechas dentro de `[now, now + 7 días]`: los vencidos quedan fuera.
pub fn fleet_summary(vehicles: &[Vehicle], period: Option<&str>) -> FleetSummaryReport {
    fleet_summary_at(vehicles, period, Utc::now())
}

pub fn fleet_summary_at(
    vehicles: &[Vehicle],
    period: Option<&str>,
    now: DateTime<Utc>,
) -> FleetSummaryReport {
    let window_end = maintenance_window_end(now);
    let maintenance_vehicles = count_status(vehicles, VehicleStatus::Maintenance);
    let mileages = || vehicles.iter().map(|v| v.current_mileage);

    FleetSummaryReport {
        report_type: ReportKind::Summary.title().to_string(),
        period: period.map(str::to_string),
        generated_at: now,
        fleet_overview: FleetOverview {
            total_vehicles: vehicles.len(),
            active_vehicles: count_status(vehicles, VehicleStatus::Active),
            idle_vehicles: count_status(vehicles, VehicleStatus::Idle),
            maintenance_vehicles,
            decommissioned_vehicles: count_status(vehicles, VehicleStatus::Decommissioned),
        },
        fuel_status: FuelStatus {
            average_fuel_level: average(vehicles.iter().map(|v| v.fuel_level)),
            low_fuel_count: count_fuel_below(vehicles, LOW_FUEL_THRESHOLD),
            critical_fuel_count: count_fuel_below(vehicles, CRITICAL_FUEL_THRESHOLD),
        },
        maintenance: MaintenanceStatus {
            in_service: maintenance_vehicles,
            due_soon: vehicles
                .iter()
                .filter(|v| {
                    v.next_maintenance_date
                        .is_some_and(|d| d >= now && d <= window_end)
                })
                .count(),
        },
        mileage_stats: MileageStats {
            total_mileage: mileages().sum(),
            average_mileage: average(mileages()),
            highest_mileage: mileages().reduce(f64::max).unwrap_or(0.0),
            lowest_mileage: mileages().reduce(f64::min).unwrap_or(0.0),
        },
    }
}

/// Estadísticas rápidas de la flota (endpoint `/api/vehicles/statistics`)
pub fn fleet_statistics_at(vehicles: &[Vehicle], now: DateTime<Utc>) -> VehicleStatistics {
    let window_end = maintenance_window_end(now);

    VehicleStatistics {
        total_vehicles: vehicles.len(),
        active_vehicles: count_status(vehicles, VehicleStatus::Active),
        idle_vehicles: count_status(vehicles, VehicleStatus::Idle),
        maintenance_vehicles: count_status(vehicles, VehicleStatus::Maintenance),
        decommissioned_vehicles: count_status(vehicles, VehicleStatus::Decommissioned),
        average_fuel_level: average(vehicles.iter().map(|v| v.fuel_level)),
        average_mileage: average(vehicles.iter().map(|v| v.current_mileage)),
        low_fuel_count: count_fuel_below(vehicles, LOW_FUEL_THRESHOLD),
        maintenance_due_count: vehicles
            .iter()
            .filter(|v| v.next_maintenance_date.is_some_and(|d| d <= window_end))
            .count(),
    }
}

/// Calcular cualquiera de los cuatro reportes
pub fn build_report(
    kind: ReportKind,
    vehicles: &[Vehicle],
    period: Option<&str>,
    now: DateTime<Utc>,
) -> FleetReport {
    match kind {
        ReportKind::FleetPerformance => FleetReport::FleetPerformance(fleet_performance_at(vehicles, period, now)),
        ReportKind::FuelConsumption => FleetReport::FuelConsumption(fuel_consumption_at(vehicles, period, now)),
        ReportKind::MaintenanceSummary => {
            FleetReport::MaintenanceSummary(maintenance_summary_at(vehicles, period, now))
        }
        ReportKind::Summary => FleetReport::Summary(fleet_summary_at(vehicles, period, now)),
    }
}

/// Etiqueta legible de tamaño en base 1024: "900 B", "2 KB", "1.5 MB"
pub fn format_file_size(bytes: u64) -> String {
    let mut order = 0;
    let mut truncated = bytes;
    while truncated >= 1024 && order < SIZE_UNITS.len() - 1 {
        order += 1;
        truncated /= 1024;
    }

    let value = bytes as f64 / 1024_f64.powi(order as i32);
    let mut text = format!("{:.2}", value);
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{} {}", text, SIZE_UNITS[order])
}

/// Serializar un reporte calculado y guardarlo como `GeneratedReport`
pub async fn store_report(store: &dyn VehicleStore, report: &FleetReport) -> AppResult<GeneratedReport> {
    let kind = report.kind();
    let generated_at = report.generated_at();
    let data = serde_json::to_string_pretty(report)?;

    let generated = GeneratedReport {
        id: Uuid::new_v4(),
        report_name: format!("{} - {}", kind.title(), generated_at.format("%Y-%m-%d %H:%M UTC")),
        report_type: kind.as_str().to_string(),
        generated_date: generated_at,
        file_size: format_file_size(data.len() as u64),
        format: REPORT_FORMAT_JSON.to_string(),
        data,
    };

    store.add_generated_report(&generated).await?;
    info!(
        "📊 Reporte '{}' guardado ({}, id {})",
        generated.report_name, generated.file_size, generated.id
    );

    Ok(generated)
}
