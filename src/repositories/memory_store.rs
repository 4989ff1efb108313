//! Store en memoria
//!
//! Implementación de `VehicleStore` sobre tablas compartidas detrás de un
//! `RwLock`. Se usa en los tests y con `STORAGE_BACKEND=memory` para
//! desarrollo local. El commit es atómico: o se aplican todos los cambios
//! pendientes o ninguno.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::report::{GeneratedReport, GeneratedReportSummary};
use crate::models::status_history::StatusHistoryEntry;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::vehicle_store::{PendingChange, PendingChanges, VehicleStore};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Default, Clone)]
struct MemoryTables {
    vehicles: Vec<Vehicle>,
    history: Vec<StatusHistoryEntry>,
    reports: Vec<GeneratedReport>,
}

impl MemoryTables {
    fn apply(&mut self, change: PendingChange) -> AppResult<()> {
        match change {
            PendingChange::Insert(vehicle) => {
                if self.vehicles.iter().any(|v| v.id == vehicle.id) {
                    return Err(AppError::Internal(format!("Duplicate vehicle id {}", vehicle.id)));
                }
                self.vehicles.push(vehicle);
            }
            PendingChange::Update(vehicle) => {
                let existing = self
                    .vehicles
                    .iter_mut()
                    .find(|v| v.id == vehicle.id)
                    .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
                let previous_update = existing.updated_at;
                *existing = vehicle;
                if existing.updated_at < previous_update {
                    existing.updated_at = previous_update;
                }
            }
            PendingChange::Delete(id) => {
                self.vehicles.retain(|v| v.id != id);
                // ON DELETE CASCADE
                self.history.retain(|h| h.vehicle_id != id);
            }
            PendingChange::History(entry) => {
                self.history.push(entry);
            }
        }
        Ok(())
    }
}

/// Base de datos en memoria compartida entre handles
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<MemoryTables>>,
    fail_commits: Arc<AtomicBool>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crear un handle nuevo, sin cambios pendientes
    pub fn store(&self) -> InMemoryVehicleStore {
        InMemoryVehicleStore {
            db: self.clone(),
            pending: PendingChanges::default(),
        }
    }

    /// Hacer que los commits fallen (simula una caída de la base de datos)
    pub fn set_commit_failure(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Total de entradas de historial guardadas
    pub async fn history_len(&self) -> usize {
        self.tables.read().await.history.len()
    }
}

/// Handle por petición sobre una `MemoryDatabase`
pub struct InMemoryVehicleStore {
    db: MemoryDatabase,
    pending: PendingChanges,
}

#[async_trait]
impl VehicleStore for InMemoryVehicleStore {
    async fn fetch_all(&self) -> AppResult<Vec<Vehicle>> {
        Ok(self.db.tables.read().await.vehicles.clone())
    }

    async fn fetch_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let tables = self.db.tables.read().await;
        Ok(tables.vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn fetch_by_status(&self, status: VehicleStatus) -> AppResult<Vec<Vehicle>> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .vehicles
            .iter()
            .filter(|v| v.status == status)
            .cloned()
            .collect())
    }

    async fn fetch_low_fuel(&self, threshold: f64) -> AppResult<Vec<Vehicle>> {
        let tables = self.db.tables.read().await;
        let mut vehicles: Vec<Vehicle> = tables
            .vehicles
            .iter()
            .filter(|v| v.fuel_level < threshold)
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| a.fuel_level.total_cmp(&b.fuel_level));
        Ok(vehicles)
    }

    async fn fetch_status_history(&self, vehicle_id: Uuid) -> AppResult<Vec<StatusHistoryEntry>> {
        let tables = self.db.tables.read().await;
        let mut entries: Vec<StatusHistoryEntry> = tables
            .history
            .iter()
            .filter(|h| h.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        // Orden estable: a igual timestamp, la última insertada va primero
        entries.reverse();
        entries.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        Ok(entries)
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
        let changes = self.pending.take();

        if self.db.fail_commits.load(Ordering::SeqCst) {
            warn!("⚠️ Commit rechazado: {} cambios descartados", changes.len());
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        if changes.is_empty() {
            return Ok(());
        }

        let total = changes.len();
        let mut tables = self.db.tables.write().await;
        let mut staged = tables.clone();
        for change in changes {
            staged.apply(change)?;
        }
        *tables = staged;

        debug!("💾 Commit en memoria: {} cambios", total);
        Ok(())
    }

    async fn add_generated_report(&self, report: &GeneratedReport) -> AppResult<()> {
        self.db.tables.write().await.reports.push(report.clone());
        Ok(())
    }

    async fn list_recent_reports(&self, limit: i64) -> AppResult<Vec<GeneratedReportSummary>> {
        let tables = self.db.tables.read().await;
        let mut reports: Vec<&GeneratedReport> = tables.reports.iter().collect();
        reports.reverse();
        reports.sort_by(|a, b| b.generated_date.cmp(&a.generated_date));

        let limit = usize::try_from(limit.max(0)).unwrap_or(0);
        Ok(reports
            .into_iter()
            .take(limit)
            .map(GeneratedReportSummary::from)
            .collect())
    }

    async fn get_report_by_id(&self, id: Uuid) -> AppResult<Option<GeneratedReport>> {
        let tables = self.db.tables.read().await;
        Ok(tables.reports.iter().find(|r| r.id == id).cloned())
    }
}
