use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, DeleteVehicleResponse, FuelData, StatusHistoryResponse, UpdateVehicleRequest,
    VehicleStatistics,
};
use crate::models::status_history::StatusHistoryEntry;
use crate::models::vehicle::{Vehicle, VehicleResponse, VehicleStatus};
use crate::repositories::vehicle_store::VehicleStore;
use crate::services::aggregation_engine::{self, LOW_FUEL_THRESHOLD};
use crate::utils::errors::{not_found_error, AppResult};

/// Motivo registrado cuando un update individual cambia el estado sin indicar uno
pub const MANUAL_STATUS_REASON: &str = "Manual status update";

pub struct VehicleController {
    store: Box<dyn VehicleStore>,
}

impl VehicleController {
    pub fn new(store: Box<dyn VehicleStore>) -> Self {
        Self { store }
    }

    async fn find(&self, id: Uuid) -> AppResult<Vehicle> {
        self.store
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list(&self, status: Option<VehicleStatus>) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = match status {
            Some(status) => self.store.fetch_by_status(status).await?,
            None => self.store.fetch_all().await?,
        };
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleResponse> {
        Ok(VehicleResponse::from(self.find(id).await?))
    }

    pub async fn create(&mut self, request: CreateVehicleRequest) -> AppResult<ApiResponse<VehicleResponse>> {
        request.validate()?;

        let vehicle = Vehicle::register(request.into(), Utc::now());
        self.store.add(vehicle.clone());
        self.store.commit().await?;

        info!("🚚 Vehículo registrado: {} ({})", vehicle.display_name(), vehicle.id);
        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle created successfully",
        ))
    }

    /// Update parcial. Si el estado cambia se registra en el historial.
    pub async fn update(&mut self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<VehicleResponse> {
        request.validate()?;

        let mut vehicle = self.find(id).await?;
        let reason = request
            .status_change_reason
            .clone()
            .unwrap_or_else(|| MANUAL_STATUS_REASON.to_string());
        let changed_by = request.changed_by.clone();

        let now = Utc::now();
        let previous_status = request.apply_to(&mut vehicle);
        vehicle.touch(now);

        self.store.update(vehicle.clone());
        if let Some(previous) = previous_status {
            info!("🔁 Vehículo {}: {} -> {}", vehicle.id, previous, vehicle.status);
            self.store.add_history_entry(StatusHistoryEntry::record(
                vehicle.id,
                vehicle.status,
                changed_by.as_deref(),
                &reason,
                now,
            ));
        }
        self.store.commit().await?;

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn delete(&mut self, id: Uuid) -> AppResult<DeleteVehicleResponse> {
        let vehicle = self.find(id).await?;
        self.store.remove(vehicle);
        self.store.commit().await?;

        info!("🗑️ Vehículo eliminado: {}", id);
        Ok(DeleteVehicleResponse {
            message: "Vehicle deleted successfully".to_string(),
            id,
        })
    }

    pub async fn statistics(&self) -> AppResult<VehicleStatistics> {
        let vehicles = self.store.fetch_all().await?;
        Ok(aggregation_engine::fleet_statistics_at(&vehicles, Utc::now()))
    }

    /// Proyección de combustible, opcionalmente filtrada por etiqueta de estado
    pub async fn fuel_data(&self, status: Option<&str>) -> AppResult<Vec<FuelData>> {
        let vehicles = self.store.fetch_all().await?;
        let wanted = status.filter(|s| !s.trim().is_empty());

        Ok(vehicles
            .iter()
            .filter(|v| match wanted {
                Some(label) => label.parse::<VehicleStatus>().is_ok_and(|s| s == v.status),
                None => true,
            })
            .map(FuelData::from)
            .collect())
    }

    pub async fn low_fuel(&self, threshold: Option<f64>) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self
            .store
            .fetch_low_fuel(threshold.unwrap_or(LOW_FUEL_THRESHOLD))
            .await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn status_history(&self, id: Uuid) -> AppResult<Vec<StatusHistoryResponse>> {
        self.find(id).await?;
        let entries = self.store.fetch_status_history(id).await?;
        Ok(entries.into_iter().map(StatusHistoryResponse::from).collect())
    }
}
