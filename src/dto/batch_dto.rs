use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vehicle::{VehicleResponse, VehicleStatus};

// Los ids llegan como texto: uno que no sea un UUID válido se reporta tal
// cual en `failed_ids`, igual que uno inexistente.

// Request para cambiar el estado de varios vehículos
#[derive(Debug, Deserialize)]
pub struct BatchUpdateStatusRequest {
    #[serde(default)]
    pub vehicle_ids: Vec<String>,
    pub new_status: VehicleStatus,
    pub reason: Option<String>,
    pub changed_by: Option<String>,
}

// Request para fijar el nivel de combustible de varios vehículos
#[derive(Debug, Deserialize)]
pub struct BatchUpdateFuelRequest {
    #[serde(default)]
    pub vehicle_ids: Vec<String>,
    pub new_fuel_level: f64,
}

// Request para programar mantenimiento
#[derive(Debug, Deserialize)]
pub struct BatchScheduleMaintenanceRequest {
    #[serde(default)]
    pub vehicle_ids: Vec<String>,
    pub maintenance_date: DateTime<Utc>,
    #[serde(default)]
    pub set_to_maintenance_status: bool,
    pub scheduled_by: Option<String>,
}

// Request para eliminar varios vehículos
#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    pub vehicle_ids: Vec<String>,
}

// Resultado de una operación batch de actualización
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub message: String,
    pub success_count: usize,
    pub failed_count: usize,
    pub updated_vehicles: Vec<VehicleResponse>,
    pub failed_ids: Vec<String>,
}

// Resultado de un borrado batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDeleteOutcome {
    pub message: String,
    pub success_count: usize,
    pub failed_count: usize,
    pub deleted_ids: Vec<Uuid>,
    pub failed_ids: Vec<String>,
}
