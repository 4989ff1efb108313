//! Contrato de persistencia de vehículos
//!
//! `VehicleStore` es el colaborador que usan los servicios para leer el
//! snapshot de la flota y escribir cambios. Las escrituras de vehículos y de
//! historial se acumulan en el handle y sólo se aplican con `commit()`; los
//! reportes generados se guardan de inmediato.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::report::{GeneratedReport, GeneratedReportSummary};
use crate::models::status_history::StatusHistoryEntry;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

/// Cambio pendiente de aplicar en el próximo `commit()`
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    Insert(Vehicle),
    Update(Vehicle),
    Delete(Uuid),
    History(StatusHistoryEntry),
}

/// Cola ordenada de cambios pendientes de un handle
#[derive(Debug, Default)]
pub struct PendingChanges {
    changes: Vec<PendingChange>,
}

impl PendingChanges {
    pub fn push(&mut self, change: PendingChange) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Vaciar la cola devolviendo los cambios en orden de llegada
    pub fn take(&mut self) -> Vec<PendingChange> {
        std::mem::take(&mut self.changes)
    }
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn fetch_all(&self) -> AppResult<Vec<Vehicle>>;

    async fn fetch_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn fetch_by_status(&self, status: VehicleStatus) -> AppResult<Vec<Vehicle>>;

    /// Vehículos con `fuel_level` estrictamente menor que `threshold`
    async fn fetch_low_fuel(&self, threshold: f64) -> AppResult<Vec<Vehicle>>;

    /// Historial de un vehículo, más reciente primero
    async fn fetch_status_history(&self, vehicle_id: Uuid) -> AppResult<Vec<StatusHistoryEntry>>;

    fn add(&mut self, vehicle: Vehicle);

    fn update(&mut self, vehicle: Vehicle);

    fn remove(&mut self, vehicle: Vehicle);

    fn add_history_entry(&mut self, entry: StatusHistoryEntry);

    /// Número de cambios acumulados desde el último commit
    fn pending_changes(&self) -> usize;

    /// Aplicar todos los cambios pendientes como una sola unidad
    async fn commit(&mut self) -> AppResult<()>;

    async fn add_generated_report(&self, report: &GeneratedReport) -> AppResult<()>;

    /// Reportes generados, más reciente primero
    async fn list_recent_reports(&self, limit: i64) -> AppResult<Vec<GeneratedReportSummary>>;

    async fn get_report_by_id(&self, id: Uuid) -> AppResult<Option<GeneratedReport>>;
}
