//! Procesador de mutaciones batch
//!
//! Aplica una misma mutación a una lista de vehículos. Los ids que no se
//! pueden resolver se acumulan en `failed_ids` sin abortar el batch; el
//! resto de cambios se confirma con un único `commit()` al final. Un fallo
//! de persistencia (fetch o commit) hace fallar la petición completa.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::batch_dto::{BatchDeleteOutcome, BatchOutcome};
use crate::models::status_history::StatusHistoryEntry;
use crate::models::vehicle::{Vehicle, VehicleResponse, VehicleStatus};
use crate::repositories::vehicle_store::VehicleStore;
use crate::utils::errors::{bad_request_error, AppResult};

/// Motivo registrado cuando la petición no trae uno
pub const DEFAULT_STATUS_REASON: &str = "Batch status update";
/// Motivo registrado al forzar el estado Maintenance
pub const SCHEDULED_MAINTENANCE_REASON: &str = "Scheduled for maintenance";

/// Acumulador de éxitos y fallos, en el orden de la petición
#[derive(Debug)]
pub struct BatchAccumulator<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<String>,
}

impl<T> Default for BatchAccumulator<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchAccumulator<T> {
    fn succeed(&mut self, item: T) {
        self.succeeded.push(item);
    }

    fn fail(&mut self, raw_id: &str) {
        self.failed.push(raw_id.to_string());
    }
}

impl BatchAccumulator<VehicleResponse> {
    fn into_outcome(self, message: impl FnOnce(usize) -> String) -> BatchOutcome {
        BatchOutcome {
            message: message(self.succeeded.len()),
            success_count: self.succeeded.len(),
            failed_count: self.failed.len(),
            updated_vehicles: self.succeeded,
            failed_ids: self.failed,
        }
    }
}

fn ensure_not_empty(vehicle_ids: &[String]) -> AppResult<()> {
    if vehicle_ids.is_empty() {
        return Err(bad_request_error("Vehicle IDs are required"));
    }
    Ok(())
}

pub struct BatchMutationProcessor {
    store: Box<dyn VehicleStore>,
}

impl BatchMutationProcessor {
    pub fn new(store: Box<dyn VehicleStore>) -> Self {
        Self { store }
    }

    /// Resolver un id de la petición. `None` si no es un UUID o no existe.
    async fn resolve(&self, raw_id: &str, staged: &HashMap<Uuid, Vehicle>) -> AppResult<Option<Vehicle>> {
        let id = match Uuid::parse_str(raw_id.trim()) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };
        if let Some(vehicle) = staged.get(&id) {
            return Ok(Some(vehicle.clone()));
        }
        self.store.fetch_by_id(id).await
    }

    /// Bucle común de las operaciones de actualización.
    ///
    /// `mutate` modifica el vehículo y devuelve la entrada de historial a
    /// registrar, si la hay. Un id repetido reutiliza la copia ya modificada
    /// en este batch.
    async fn apply_to_each<F>(
        &mut self,
        operation: &str,
        vehicle_ids: &[String],
        now: DateTime<Utc>,
        mut mutate: F,
    ) -> AppResult<BatchAccumulator<VehicleResponse>>
    where
        F: FnMut(&mut Vehicle) -> Option<StatusHistoryEntry> + Send,
    {
        ensure_not_empty(vehicle_ids)?;
        info!("🔄 Batch {}: {} vehículos", operation, vehicle_ids.len());

        let mut acc = BatchAccumulator::default();
        let mut staged: HashMap<Uuid, Vehicle> = HashMap::new();

        for raw_id in vehicle_ids {
            let Some(mut vehicle) = self.resolve(raw_id, &staged).await? else {
                warn!("⚠️ Batch {}: vehículo '{}' no encontrado", operation, raw_id);
                acc.fail(raw_id);
                continue;
            };

            let history = mutate(&mut vehicle);
            vehicle.touch(now);

            self.store.update(vehicle.clone());
            if let Some(entry) = history {
                self.store.add_history_entry(entry);
            }
            acc.succeed(VehicleResponse::from(&vehicle));
            staged.insert(vehicle.id, vehicle);
        }

        self.store.commit().await?;
        info!(
            "✅ Batch {}: {} actualizados, {} fallidos",
            operation,
            acc.succeeded.len(),
            acc.failed.len()
        );
        Ok(acc)
    }

    /// Cambiar el estado. Sólo se registra historial si el estado cambia.
    pub async fn update_status(
        &mut self,
        vehicle_ids: &[String],
        new_status: VehicleStatus,
        reason: Option<&str>,
        changed_by: Option<&str>,
    ) -> AppResult<BatchOutcome> {
        let now = Utc::now();
        let reason = reason.unwrap_or(DEFAULT_STATUS_REASON);

        let acc = self
            .apply_to_each("update-status", vehicle_ids, now, |vehicle| {
                let previous = vehicle.status;
                vehicle.status = new_status;
                (previous != new_status)
                    .then(|| StatusHistoryEntry::record(vehicle.id, new_status, changed_by, reason, now))
            })
            .await?;

        Ok(acc.into_outcome(|n| format!("Updated {} vehicles", n)))
    }

    /// Fijar el nivel de combustible. El rango 0-100 es responsabilidad del llamador.
    pub async fn update_fuel(&mut self, vehicle_ids: &[String], new_fuel_level: f64) -> AppResult<BatchOutcome> {
        let now = Utc::now();

        let acc = self
            .apply_to_each("update-fuel", vehicle_ids, now, |vehicle| {
                vehicle.fuel_level = new_fuel_level;
                None
            })
            .await?;

        Ok(acc.into_outcome(|n| format!("Updated fuel level for {} vehicles", n)))
    }

    /// Programar mantenimiento. Con `set_to_maintenance` el estado pasa a
    /// Maintenance y siempre se registra historial, aunque ya lo estuviera.
    pub async fn schedule_maintenance(
        &mut self,
        vehicle_ids: &[String],
        maintenance_date: DateTime<Utc>,
        set_to_maintenance: bool,
        scheduled_by: Option<&str>,
    ) -> AppResult<BatchOutcome> {
        let now = Utc::now();

        let acc = self
            .apply_to_each("schedule-maintenance", vehicle_ids, now, |vehicle| {
                vehicle.next_maintenance_date = Some(maintenance_date);
                if !set_to_maintenance {
                    return None;
                }
                vehicle.status = VehicleStatus::Maintenance;
                Some(StatusHistoryEntry::record(
                    vehicle.id,
                    VehicleStatus::Maintenance,
                    scheduled_by,
                    SCHEDULED_MAINTENANCE_REASON,
                    now,
                ))
            })
            .await?;

        Ok(acc.into_outcome(|n| format!("Scheduled maintenance for {} vehicles", n)))
    }

    /// Eliminar vehículos. No genera historial.
    pub async fn delete(&mut self, vehicle_ids: &[String]) -> AppResult<BatchDeleteOutcome> {
        ensure_not_empty(vehicle_ids)?;
        info!("🗑️ Batch delete: {} vehículos", vehicle_ids.len());

        let mut acc: BatchAccumulator<Uuid> = BatchAccumulator::default();
        let mut removed: HashSet<Uuid> = HashSet::new();
        let no_staged = HashMap::new();

        for raw_id in vehicle_ids {
            let vehicle = match self.resolve(raw_id, &no_staged).await? {
                Some(vehicle) if !removed.contains(&vehicle.id) => vehicle,
                _ => {
                    warn!("⚠️ Batch delete: vehículo '{}' no encontrado", raw_id);
                    acc.fail(raw_id);
                    continue;
                }
            };

            removed.insert(vehicle.id);
            acc.succeed(vehicle.id);
            self.store.remove(vehicle);
        }

        self.store.commit().await?;
        info!(
            "✅ Batch delete: {} eliminados, {} fallidos",
            acc.succeeded.len(),
            acc.failed.len()
        );

        Ok(BatchDeleteOutcome {
            message: format!("Deleted {} vehicles", acc.succeeded.len()),
            success_count: acc.succeeded.len(),
            failed_count: acc.failed.len(),
            deleted_ids: acc.succeeded,
            failed_ids: acc.failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::NewVehicle;
    use crate::repositories::memory_store::MemoryDatabase;
    use crate::utils::errors::AppError;
    use chrono::Duration;

    fn vehicle(plate: &str, status: VehicleStatus) -> Vehicle {
        let mut v = Vehicle::register(
            NewVehicle {
                make: "Ford".to_string(),
                model: "Transit".to_string(),
                year: 2021,
                license_plate: plate.to_string(),
                color: "White".to_string(),
                fuel_type: "Diesel".to_string(),
                current_mileage: 1000.0,
            },
            Utc::now() - Duration::days(1),
        );
        v.status = status;
        v
    }

    async fn seed(db: &MemoryDatabase, vehicles: &[Vehicle]) {
        let mut store = db.store();
        for v in vehicles {
            store.add(v.clone());
        }
        store.commit().await.unwrap();
    }

    fn processor(db: &MemoryDatabase) -> BatchMutationProcessor {
        BatchMutationProcessor::new(Box::new(db.store()))
    }

    #[tokio::test]
    async fn test_status_update_skips_missing_ids() {
        let db = MemoryDatabase::new();
        let a = vehicle("AAA-1111", VehicleStatus::Idle);
        let c = vehicle("CCC-3333", VehicleStatus::Active);
        seed(&db, &[a.clone(), c.clone()]).await;

        let missing = Uuid::new_v4().to_string();
        let ids = vec![a.id.to_string(), missing.clone(), c.id.to_string()];
        let before = Utc::now();

        let outcome = processor(&db)
            .update_status(&ids, VehicleStatus::Active, None, None)
            .await
            .unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.failed_ids, vec![missing]);
        assert_eq!(outcome.message, "Updated 2 vehicles");
        let ids: Vec<Uuid> = outcome.updated_vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        for updated in &outcome.updated_vehicles {
            assert_eq!(updated.status, VehicleStatus::Active);
            assert!(updated.updated_at >= before);
        }

        // Sólo A cambió de estado
        let store = db.store();
        let history_a = store.fetch_status_history(a.id).await.unwrap();
        assert_eq!(history_a.len(), 1);
        assert_eq!(history_a[0].description, DEFAULT_STATUS_REASON);
        assert_eq!(history_a[0].changed_by, "System");
        assert!(store.fetch_status_history(c.id).await.unwrap().is_empty());

        let reloaded = store.fetch_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, VehicleStatus::Active);
    }

    #[tokio::test]
    async fn test_status_update_is_idempotent() {
        let db = MemoryDatabase::new();
        let a = vehicle("AAA-1111", VehicleStatus::Idle);
        seed(&db, &[a.clone()]).await;
        let ids = vec![a.id.to_string()];

        let first = processor(&db)
            .update_status(&ids, VehicleStatus::Decommissioned, Some("Sold"), Some("fleet-admin"))
            .await
            .unwrap();
        let second = processor(&db)
            .update_status(&ids, VehicleStatus::Decommissioned, Some("Sold"), Some("fleet-admin"))
            .await
            .unwrap();

        assert_eq!(second.success_count, 1);
        assert!(second.failed_ids.is_empty());
        assert!(second.updated_vehicles[0].updated_at >= first.updated_vehicles[0].updated_at);

        let history = db.store().fetch_status_history(a.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].description, "Sold");
        assert_eq!(history[0].changed_by, "fleet-admin");
    }

    #[tokio::test]
    async fn test_unparseable_id_is_reported_verbatim() {
        let db = MemoryDatabase::new();
        let a = vehicle("AAA-1111", VehicleStatus::Idle);
        seed(&db, &[a.clone()]).await;

        let ids = vec!["not-a-uuid".to_string(), a.id.to_string()];
        let outcome = processor(&db).update_fuel(&ids, 42.0).await.unwrap();

        assert_eq!(outcome.failed_ids, vec!["not-a-uuid".to_string()]);
        assert_eq!(outcome.updated_vehicles[0].fuel_level, 42.0);
        assert_eq!(outcome.message, "Updated fuel level for 1 vehicles");
    }

    #[tokio::test]
    async fn test_fuel_update_does_not_validate_range() {
        let db = MemoryDatabase::new();
        let a = vehicle("AAA-1111", VehicleStatus::Active);
        seed(&db, &[a.clone()]).await;

        let outcome = processor(&db)
            .update_fuel(&[a.id.to_string()], 150.0)
            .await
            .unwrap();

        assert_eq!(outcome.success_count, 1);
        let reloaded = db.store().fetch_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(reloaded.fuel_level, 150.0);
        assert_eq!(db.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_forced_maintenance_always_logs() {
        let db = MemoryDatabase::new();
        let already = vehicle("AAA-1111", VehicleStatus::Maintenance);
        let active = vehicle("BBB-2222", VehicleStatus::Active);
        seed(&db, &[already.clone(), active.clone()]).await;

        let date = Utc::now() + Duration::days(3);
        let ids = vec![already.id.to_string(), active.id.to_string()];
        let outcome = processor(&db)
            .schedule_maintenance(&ids, date, true, Some("workshop"))
            .await
            .unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.message, "Scheduled maintenance for 2 vehicles");
        for updated in &outcome.updated_vehicles {
            assert_eq!(updated.status, VehicleStatus::Maintenance);
            assert_eq!(updated.next_maintenance_date, Some(date));
        }

        let store = db.store();
        for id in [already.id, active.id] {
            let history = store.fetch_status_history(id).await.unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].description, SCHEDULED_MAINTENANCE_REASON);
            assert_eq!(history[0].changed_by, "workshop");
        }
    }

    #[tokio::test]
    async fn test_maintenance_without_flag_keeps_status() {
        let db = MemoryDatabase::new();
        let active = vehicle("BBB-2222", VehicleStatus::Active);
        seed(&db, &[active.clone()]).await;

        let date = Utc::now() + Duration::days(10);
        let outcome = processor(&db)
            .schedule_maintenance(&[active.id.to_string()], date, false, None)
            .await
            .unwrap();

        assert_eq!(outcome.updated_vehicles[0].status, VehicleStatus::Active);
        assert_eq!(outcome.updated_vehicles[0].next_maintenance_date, Some(date));
        assert_eq!(db.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_ids_reuse_staged_copy() {
        let db = MemoryDatabase::new();
        let a = vehicle("AAA-1111", VehicleStatus::Idle);
        seed(&db, &[a.clone()]).await;

        let ids = vec![a.id.to_string(), a.id.to_string()];
        let outcome = processor(&db)
            .update_status(&ids, VehicleStatus::Active, None, None)
            .await
            .unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(db.history_len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected_before_any_work() {
        let db = MemoryDatabase::new();
        // Si se llegara a hacer commit, el error sería de base de datos
        db.set_commit_failure(true);

        let err = processor(&db).delete(&[]).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = processor(&db)
            .update_status(&[], VehicleStatus::Active, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_delete_collects_deleted_and_failed_ids() {
        let db = MemoryDatabase::new();
        let a = vehicle("AAA-1111", VehicleStatus::Idle);
        let b = vehicle("BBB-2222", VehicleStatus::Active);
        seed(&db, &[a.clone(), b.clone()]).await;

        let missing = Uuid::new_v4().to_string();
        let ids = vec![a.id.to_string(), missing.clone(), a.id.to_string()];
        let outcome = processor(&db).delete(&ids).await.unwrap();

        assert_eq!(outcome.deleted_ids, vec![a.id]);
        assert_eq!(outcome.failed_ids, vec![missing, a.id.to_string()]);
        assert_eq!(outcome.message, "Deleted 1 vehicles");

        let remaining = db.store().fetch_all().await.unwrap();
        assert_eq!(remaining, vec![b]);
        assert_eq!(db.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_commit_failure_fails_whole_batch() {
        let db = MemoryDatabase::new();
        let a = vehicle("AAA-1111", VehicleStatus::Idle);
        seed(&db, &[a.clone()]).await;
        db.set_commit_failure(true);

        let result = processor(&db)
            .update_status(&[a.id.to_string()], VehicleStatus::Active, None, None)
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));

        db.set_commit_failure(false);
        let reloaded = db.store().fetch_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, VehicleStatus::Idle);
        assert_eq!(db.history_len().await, 0);
    }
}
