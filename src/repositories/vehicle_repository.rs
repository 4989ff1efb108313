use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::report::{GeneratedReport, GeneratedReportSummary};
use crate::models::status_history::StatusHistoryEntry;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::vehicle_store::{PendingChange, PendingChanges, VehicleStore};
use crate::utils::errors::{AppError, AppResult};

const VEHICLE_COLUMNS: &str = "id, make, model, year, license_plate, color, fuel_type, current_mileage, \
     fuel_level, current_location, current_driver, status, last_maintenance_date, \
     next_maintenance_date, created_at, updated_at";

// Fila tal como vive en la tabla vehicles
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    make: String,
    model: String,
    year: i32,
    license_plate: String,
    color: String,
    fuel_type: String,
    current_mileage: Decimal,
    fuel_level: f64,
    current_location: Option<String>,
    current_driver: Option<String>,
    status: i16,
    last_maintenance_date: Option<DateTime<Utc>>,
    next_maintenance_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = AppError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let status = VehicleStatus::from_code(row.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown status code {} for vehicle {}", row.status, row.id))
        })?;
        let current_mileage = row.current_mileage.to_f64().ok_or_else(|| {
            AppError::Internal(format!("Mileage out of range for vehicle {}", row.id))
        })?;

        Ok(Vehicle {
            id: row.id,
            make: row.make,
            model: row.model,
            year: row.year,
            license_plate: row.license_plate,
            color: row.color,
            fuel_type: row.fuel_type,
            current_mileage,
            fuel_level: row.fuel_level,
            current_location: row.current_location,
            current_driver: row.current_driver,
            status,
            last_maintenance_date: row.last_maintenance_date,
            next_maintenance_date: row.next_maintenance_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusHistoryRow {
    id: Uuid,
    vehicle_id: Uuid,
    status: i16,
    changed_by: String,
    description: String,
    changed_at: DateTime<Utc>,
}

impl TryFrom<StatusHistoryRow> for StatusHistoryEntry {
    type Error = AppError;

    fn try_from(row: StatusHistoryRow) -> Result<Self, Self::Error> {
        let status = VehicleStatus::from_code(row.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown status code {} in history entry {}", row.status, row.id))
        })?;

        Ok(StatusHistoryEntry {
            id: row.id,
            vehicle_id: row.vehicle_id,
            status,
            changed_by: row.changed_by,
            description: row.description,
            changed_at: row.changed_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GeneratedReportRow {
    id: Uuid,
    report_name: String,
    report_type: String,
    generated_date: DateTime<Utc>,
    file_size: String,
    format: String,
    data: String,
}

impl From<GeneratedReportRow> for GeneratedReport {
    fn from(row: GeneratedReportRow) -> Self {
        Self {
            id: row.id,
            report_name: row.report_name,
            report_type: row.report_type,
            generated_date: row.generated_date,
            file_size: row.file_size,
            format: row.format,
            data: row.data,
        }
    }
}

fn mileage_to_decimal(vehicle: &Vehicle) -> AppResult<Decimal> {
    Decimal::from_f64_retain(vehicle.current_mileage)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid mileage value for vehicle {}", vehicle.id)))
}

fn rows_to_vehicles(rows: Vec<VehicleRow>) -> AppResult<Vec<Vehicle>> {
    rows.into_iter().map(Vehicle::try_from).collect()
}

/// Store de vehículos sobre PostgreSQL
pub struct PgVehicleStore {
    pool: PgPool,
    pending: PendingChanges,
}

impl PgVehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            pending: PendingChanges::default(),
        }
    }

    async fn apply(tx: &mut Transaction<'_, Postgres>, change: PendingChange) -> AppResult<()> {
        match change {
            PendingChange::Insert(vehicle) => {
                let mileage = mileage_to_decimal(&vehicle)?;
                sqlx::query(
                    r#"
                    INSERT INTO vehicles (id, make, model, year, license_plate, color, fuel_type,
                        current_mileage, fuel_level, current_location, current_driver, status,
                        last_maintenance_date, next_maintenance_date, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                    "#,
                )
                .bind(vehicle.id)
                .bind(&vehicle.make)
                .bind(&vehicle.model)
                .bind(vehicle.year)
                .bind(&vehicle.license_plate)
                .bind(&vehicle.color)
                .bind(&vehicle.fuel_type)
                .bind(mileage)
                .bind(vehicle.fuel_level)
                .bind(&vehicle.current_location)
                .bind(&vehicle.current_driver)
                .bind(vehicle.status.code())
                .bind(vehicle.last_maintenance_date)
                .bind(vehicle.next_maintenance_date)
                .bind(vehicle.created_at)
                .bind(vehicle.updated_at)
                .execute(&mut **tx)
                .await?;
            }
            PendingChange::Update(vehicle) => {
                let mileage = mileage_to_decimal(&vehicle)?;
                let result = sqlx::query(
                    r#"
                    UPDATE vehicles
                    SET make = $2, model = $3, year = $4, license_plate = $5, color = $6,
                        fuel_type = $7, current_mileage = $8, fuel_level = $9,
                        current_location = $10, current_driver = $11, status = $12,
                        last_maintenance_date = $13, next_maintenance_date = $14,
                        updated_at = GREATEST(updated_at, $15)
                    WHERE id = $1
                    "#,
                )
                .bind(vehicle.id)
                .bind(&vehicle.make)
                .bind(&vehicle.model)
                .bind(vehicle.year)
                .bind(&vehicle.license_plate)
                .bind(&vehicle.color)
                .bind(&vehicle.fuel_type)
                .bind(mileage)
                .bind(vehicle.fuel_level)
                .bind(&vehicle.current_location)
                .bind(&vehicle.current_driver)
                .bind(vehicle.status.code())
                .bind(vehicle.last_maintenance_date)
                .bind(vehicle.next_maintenance_date)
                .bind(vehicle.updated_at)
                .execute(&mut **tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::Database(sqlx::Error::RowNotFound));
                }
            }
            PendingChange::Delete(id) => {
                sqlx::query("DELETE FROM vehicles WHERE id = $1")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
            }
            PendingChange::History(entry) => {
                sqlx::query(
                    r#"
                    INSERT INTO vehicle_status_history (id, vehicle_id, status, changed_by, description, changed_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(entry.id)
                .bind(entry.vehicle_id)
                .bind(entry.status.code())
                .bind(&entry.changed_by)
                .bind(&entry.description)
                .bind(entry.changed_at)
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn fetch_all(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {} FROM vehicles ORDER BY created_at ASC, id ASC",
            VEHICLE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows_to_vehicles(rows)
    }

    async fn fetch_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {} FROM vehicles WHERE id = $1",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn fetch_by_status(&self, status: VehicleStatus) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {} FROM vehicles WHERE status = $1 ORDER BY created_at ASC, id ASC",
            VEHICLE_COLUMNS
        ))
        .bind(status.code())
        .fetch_all(&self.pool)
        .await?;

        rows_to_vehicles(rows)
    }

    async fn fetch_low_fuel(&self, threshold: f64) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {} FROM vehicles WHERE fuel_level < $1 ORDER BY fuel_level ASC, id ASC",
            VEHICLE_COLUMNS
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        rows_to_vehicles(rows)
    }

    async fn fetch_status_history(&self, vehicle_id: Uuid) -> AppResult<Vec<StatusHistoryEntry>> {
        let rows = sqlx::query_as::<_, StatusHistoryRow>(
            r#"
            SELECT id, vehicle_id, status, changed_by, description, changed_at
            FROM vehicle_status_history
            WHERE vehicle_id = $1
            ORDER BY changed_at DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StatusHistoryEntry::try_from).collect()
    }

    fn add(&mut self, vehicle: Vehicle) {
        self.pending.push(PendingChange::Insert(vehicle));
    }

    fn update(&mut self, vehicle: Vehicle) {
        self.pending.push(PendingChange::Update(vehicle));
    }

    fn remove(&mut self, vehicle: Vehicle) {
        self.pending.push(PendingChange::Delete(vehicle.id));
    }

    fn add_history_entry(&mut self, entry: StatusHistoryEntry) {
        self.pending.push(PendingChange::History(entry));
    }

    fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    async fn commit(&mut self) -> AppResult<()> {
        if self.pending.is_empty() {
            debug!("Commit sin cambios pendientes");
            return Ok(());
        }

        let changes = self.pending.take();
        let total = changes.len();
        let mut tx = self.pool.begin().await?;

        for change in changes {
            Self::apply(&mut tx, change).await?;
        }

        tx.commit().await?;
        info!("💾 Commit aplicado: {} cambios", total);
        Ok(())
    }

    async fn add_generated_report(&self, report: &GeneratedReport) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO generated_reports (id, report_name, report_type, generated_date, file_size, format, data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(report.id)
        .bind(&report.report_name)
        .bind(&report.report_type)
        .bind(report.generated_date)
        .bind(&report.file_size)
        .bind(&report.format)
        .bind(&report.data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_recent_reports(&self, limit: i64) -> AppResult<Vec<GeneratedReportSummary>> {
        let rows = sqlx::query_as::<_, GeneratedReportRow>(
            r#"
            SELECT id, report_name, report_type, generated_date, file_size, format, data
            FROM generated_reports
            ORDER BY generated_date DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(GeneratedReport::from)
            .map(|report| GeneratedReportSummary::from(&report))
            .collect())
    }

    async fn get_report_by_id(&self, id: Uuid) -> AppResult<Option<GeneratedReport>> {
        let row = sqlx::query_as::<_, GeneratedReportRow>(
            r#"
            SELECT id, report_name, report_type, generated_date, file_size, format, data
            FROM generated_reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GeneratedReport::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: i16) -> VehicleRow {
        let now = Utc::now();
        VehicleRow {
            id: Uuid::new_v4(),
            make: "Ford".to_string(),
            model: "Transit".to_string(),
            year: 2021,
            license_plate: "ABC-1234".to_string(),
            color: "White".to_string(),
            fuel_type: "Diesel".to_string(),
            current_mileage: Decimal::new(4520050, 2),
            fuel_level: 85.5,
            current_location: Some("Depot A".to_string()),
            current_driver: None,
            status,
            last_maintenance_date: None,
            next_maintenance_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_translates_status_code_and_mileage() {
        let vehicle = Vehicle::try_from(row(1)).unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Active);
        assert_eq!(vehicle.current_mileage, 45200.5);
    }

    #[test]
    fn test_row_with_unknown_status_code_is_rejected() {
        let err = Vehicle::try_from(row(9)).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_mileage_is_rounded_to_two_decimals() {
        let mut vehicle = Vehicle::try_from(row(0)).unwrap();
        vehicle.current_mileage = 1234.5678;
        assert_eq!(mileage_to_decimal(&vehicle).unwrap(), Decimal::new(123457, 2));
    }
}
