//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, su estado y la proyección que
//! devuelve la API. Los códigos enteros de estado sólo existen en el borde
//! de persistencia (ver `VehicleStatus::code` / `VehicleStatus::from_code`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Nivel de combustible asignado a un vehículo recién registrado (tanque lleno)
pub const FULL_TANK_FUEL_LEVEL: f64 = 100.0;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Idle,
    Active,
    Maintenance,
    #[serde(alias = "offline")]
    Decommissioned,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Idle,
        VehicleStatus::Active,
        VehicleStatus::Maintenance,
        VehicleStatus::Decommissioned,
    ];

    /// Código entero persistido en la columna `status`
    pub fn code(self) -> i16 {
        match self {
            VehicleStatus::Idle => 0,
            VehicleStatus::Active => 1,
            VehicleStatus::Maintenance => 2,
            VehicleStatus::Decommissioned => 3,
        }
    }

    /// Traducir un código persistido; `None` si el código no es conocido
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(VehicleStatus::Idle),
            1 => Some(VehicleStatus::Active),
            2 => Some(VehicleStatus::Maintenance),
            3 => Some(VehicleStatus::Decommissioned),
            _ => None,
        }
    }

    /// Etiqueta legible usada en reportes y filtros
    pub fn label(self) -> &'static str {
        match self {
            VehicleStatus::Idle => "idle",
            VehicleStatus::Active => "active",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Decommissioned => "decommissioned",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(VehicleStatus::Idle),
            "active" => Ok(VehicleStatus::Active),
            "maintenance" => Ok(VehicleStatus::Maintenance),
            "decommissioned" | "offline" => Ok(VehicleStatus::Decommissioned),
            other => Err(format!("Unknown vehicle status '{}'", other)),
        }
    }
}

/// Vehicle principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: String,
    pub fuel_type: String,
    pub current_mileage: f64,
    pub fuel_level: f64,
    pub current_location: Option<String>,
    pub current_driver: Option<String>,
    pub status: VehicleStatus,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos mínimos para registrar un vehículo nuevo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: String,
    pub fuel_type: String,
    pub current_mileage: f64,
}

impl Vehicle {
    /// Registrar un vehículo: estado Idle y tanque lleno por defecto
    pub fn register(data: NewVehicle, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            make: data.make,
            model: data.model,
            year: data.year,
            license_plate: data.license_plate,
            color: data.color,
            fuel_type: data.fuel_type,
            current_mileage: data.current_mileage,
            fuel_level: FULL_TANK_FUEL_LEVEL,
            current_location: None,
            current_driver: None,
            status: VehicleStatus::Idle,
            last_maintenance_date: None,
            next_maintenance_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marcar el registro como modificado. `updated_at` nunca retrocede.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Identificador de pantalla: "Make Model (PLATE)"
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.make, self.model, self.license_plate)
    }
}

/// Response de vehículo para la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: String,
    pub fuel_type: String,
    pub current_mileage: f64,
    pub fuel_level: f64,
    pub current_location: Option<String>,
    pub current_driver: Option<String>,
    pub status: VehicleStatus,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Vehicle> for VehicleResponse {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            license_plate: vehicle.license_plate.clone(),
            color: vehicle.color.clone(),
            fuel_type: vehicle.fuel_type.clone(),
            current_mileage: vehicle.current_mileage,
            fuel_level: vehicle.fuel_level,
            current_location: vehicle.current_location.clone(),
            current_driver: vehicle.current_driver.clone(),
            status: vehicle.status,
            last_maintenance_date: vehicle.last_maintenance_date,
            next_maintenance_date: vehicle.next_maintenance_date,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        VehicleResponse::from(&vehicle)
    }
}
