use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::status_history::StatusHistoryEntry;
use crate::models::vehicle::{NewVehicle, Vehicle, VehicleStatus};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 100), custom = "crate::utils::validation::validate_not_empty")]
    pub make: String,
    #[validate(length(min = 1, max = 100), custom = "crate::utils::validation::validate_not_empty")]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub color: String,
    #[validate(length(min = 1, max = 50))]
    pub fuel_type: String,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub current_mileage: f64,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(request: CreateVehicleRequest) -> Self {
        Self {
            make: request.make.trim().to_string(),
            model: request.model.trim().to_string(),
            year: request.year,
            license_plate: request.license_plate.trim().to_string(),
            color: request.color,
            fuel_type: request.fuel_type,
            current_mileage: request.current_mileage,
        }
    }
}

// Request para actualizar un vehículo (sólo los campos presentes)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(max = 100))]
    pub make: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    #[validate(length(max = 50))]
    pub fuel_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub current_mileage: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub fuel_level: Option<f64>,
    pub current_location: Option<String>,
    pub current_driver: Option<String>,
    pub status: Option<VehicleStatus>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub status_change_reason: Option<String>,
    pub changed_by: Option<String>,
}

/// Asignar `value` sólo si viene informado y no está en blanco
fn assign_text(target: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *target = value;
    }
}

impl UpdateVehicleRequest {
    /// Aplicar los campos presentes. Devuelve el estado anterior si cambió.
    pub fn apply_to(self, vehicle: &mut Vehicle) -> Option<VehicleStatus> {
        assign_text(&mut vehicle.make, self.make);
        assign_text(&mut vehicle.model, self.model);
        assign_text(&mut vehicle.license_plate, self.license_plate);
        assign_text(&mut vehicle.color, self.color);
        assign_text(&mut vehicle.fuel_type, self.fuel_type);

        if let Some(year) = self.year {
            vehicle.year = year;
        }
        if let Some(mileage) = self.current_mileage {
            vehicle.current_mileage = mileage;
        }
        if let Some(fuel_level) = self.fuel_level {
            vehicle.fuel_level = fuel_level;
        }
        if self.current_location.is_some() {
            vehicle.current_location = self.current_location;
        }
        if self.current_driver.is_some() {
            vehicle.current_driver = self.current_driver;
        }
        if self.last_maintenance_date.is_some() {
            vehicle.last_maintenance_date = self.last_maintenance_date;
        }
        if self.next_maintenance_date.is_some() {
            vehicle.next_maintenance_date = self.next_maintenance_date;
        }

        match self.status {
            Some(status) if status != vehicle.status => {
                let previous = vehicle.status;
                vehicle.status = status;
                Some(previous)
            }
            _ => None,
        }
    }
}

// Filtros del listado
#[derive(Debug, Default, Deserialize)]
pub struct VehicleFilters {
    pub status: Option<VehicleStatus>,
}

// Filtro de la proyección de combustible (etiqueta, sin distinguir mayúsculas)
#[derive(Debug, Default, Deserialize)]
pub struct FuelDataQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LowFuelQuery {
    pub threshold: Option<f64>,
}

// Proyección de combustible para paneles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelData {
    pub vehicle_id: Uuid,
    pub vehicle_identifier: String,
    pub make: String,
    pub model: String,
    pub fuel_level: f64,
    pub fuel_type: String,
    pub current_driver: Option<String>,
    pub status: String,
}

impl From<&Vehicle> for FuelData {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.id,
            vehicle_identifier: vehicle.display_name(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            fuel_level: vehicle.fuel_level,
            fuel_type: vehicle.fuel_type.clone(),
            current_driver: vehicle.current_driver.clone(),
            status: vehicle.status.label().to_string(),
        }
    }
}

// Estadísticas rápidas de la flota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleStatistics {
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub idle_vehicles: usize,
    pub maintenance_vehicles: usize,
    pub decommissioned_vehicles: usize,
    pub average_fuel_level: f64,
    pub average_mileage: f64,
    pub low_fuel_count: usize,
    pub maintenance_due_count: usize,
}

// Entrada de historial tal como la devuelve la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub status: String,
    pub changed_by: String,
    pub description: String,
    pub changed_at: DateTime<Utc>,
}

impl From<StatusHistoryEntry> for StatusHistoryResponse {
    fn from(entry: StatusHistoryEntry) -> Self {
        Self {
            id: entry.id,
            vehicle_id: entry.vehicle_id,
            status: entry.status.label().to_string(),
            changed_by: entry.changed_by,
            description: entry.description,
            changed_at: entry.changed_at,
        }
    }
}

// Confirmación de borrado individual
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteVehicleResponse {
    pub message: String,
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateVehicleRequest {
        CreateVehicleRequest {
            make: "Ford".to_string(),
            model: "Transit".to_string(),
            year: 2021,
            license_plate: "ABC-1234".to_string(),
            color: "White".to_string(),
            fuel_type: "Diesel".to_string(),
            current_mileage: 1200.0,
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request().validate().is_ok());

        let mut negative = create_request();
        negative.current_mileage = -1.0;
        assert!(negative.validate().is_err());

        let mut bad_plate = create_request();
        bad_plate.license_plate = "#".to_string();
        assert!(bad_plate.validate().is_err());

        let mut blank_make = create_request();
        blank_make.make = "   ".to_string();
        assert!(blank_make.validate().is_err());
    }

    #[test]
    fn test_update_request_rejects_out_of_range_fuel() {
        let request = UpdateVehicleRequest {
            fuel_level: Some(120.0),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let mut vehicle = Vehicle::register(create_request().into(), Utc::now());
        let request = UpdateVehicleRequest {
            model: Some("Custom".to_string()),
            color: Some("  ".to_string()),
            fuel_level: Some(40.0),
            status: Some(VehicleStatus::Active),
            ..Default::default()
        };

        let previous = request.apply_to(&mut vehicle);

        assert_eq!(previous, Some(VehicleStatus::Idle));
        assert_eq!(vehicle.model, "Custom");
        assert_eq!(vehicle.color, "White");
        assert_eq!(vehicle.fuel_level, 40.0);
        assert_eq!(vehicle.status, VehicleStatus::Active);
    }

    #[test]
    fn test_update_with_same_status_reports_no_change() {
        let mut vehicle = Vehicle::register(create_request().into(), Utc::now());
        let request = UpdateVehicleRequest {
            status: Some(VehicleStatus::Idle),
            ..Default::default()
        };
        assert_eq!(request.apply_to(&mut vehicle), None);
    }

    #[test]
    fn test_fuel_data_identifier() {
        let vehicle = Vehicle::register(create_request().into(), Utc::now());
        let data = FuelData::from(&vehicle);
        assert_eq!(data.vehicle_identifier, "Ford Transit (ABC-1234)");
        assert_eq!(data.status, "idle");
    }
}
