//! Datos de ejemplo para desarrollo
//!
//! Idempotente: si ya hay vehículos no hace nada.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::models::status_history::StatusHistoryEntry;
use crate::models::vehicle::{NewVehicle, Vehicle, VehicleStatus};
use crate::repositories::vehicle_store::VehicleStore;
use crate::utils::errors::AppResult;

struct SampleVehicle {
    make: &'static str,
    model: &'static str,
    year: i32,
    license_plate: &'static str,
    color: &'static str,
    fuel_type: &'static str,
    mileage: f64,
    fuel_level: f64,
    location: &'static str,
    status: VehicleStatus,
    changed_by: &'static str,
    description: &'static str,
    last_maintenance_days_ago: i64,
    next_maintenance_in_days: i64,
}

const SAMPLE_FLEET: [SampleVehicle; 3] = [
    SampleVehicle {
        make: "Ford",
        model: "Transit Van",
        year: 2021,
        license_plate: "ABC-1234",
        color: "White",
        fuel_type: "Diesel",
        mileage: 45200.0,
        fuel_level: 85.5,
        location: "Depot A",
        status: VehicleStatus::Active,
        changed_by: "System",
        description: "Vehicle registered and active",
        last_maintenance_days_ago: 120,
        next_maintenance_in_days: 30,
    },
    SampleVehicle {
        make: "Tesla",
        model: "Model S",
        year: 2023,
        license_plate: "XYZ-5678",
        color: "Black",
        fuel_type: "Electric",
        mileage: 13200.0,
        fuel_level: 98.2,
        location: "Depot B",
        status: VehicleStatus::Active,
        changed_by: "System",
        description: "Vehicle registered and active",
        last_maintenance_days_ago: 60,
        next_maintenance_in_days: 5,
    },
    SampleVehicle {
        make: "Toyota",
        model: "Hilux",
        year: 2020,
        license_plate: "JKL-9101",
        color: "Silver",
        fuel_type: "Diesel",
        mileage: 88800.0,
        fuel_level: 62.7,
        location: "Warehouse 2",
        status: VehicleStatus::Maintenance,
        changed_by: "Admin",
        description: "Vehicle under maintenance",
        last_maintenance_days_ago: 200,
        next_maintenance_in_days: -3,
    },
];

impl SampleVehicle {
    fn build(&self, now: DateTime<Utc>) -> (Vehicle, StatusHistoryEntry) {
        let mut vehicle = Vehicle::register(
            NewVehicle {
                make: self.make.to_string(),
                model: self.model.to_string(),
                year: self.year,
                license_plate: self.license_plate.to_string(),
                color: self.color.to_string(),
                fuel_type: self.fuel_type.to_string(),
                current_mileage: self.mileage,
            },
            now,
        );
        vehicle.fuel_level = self.fuel_level;
        vehicle.current_location = Some(self.location.to_string());
        vehicle.status = self.status;
        vehicle.last_maintenance_date = Some(now - Duration::days(self.last_maintenance_days_ago));
        vehicle.next_maintenance_date = Some(now + Duration::days(self.next_maintenance_in_days));

        let entry = StatusHistoryEntry::record(vehicle.id, self.status, Some(self.changed_by), self.description, now);
        (vehicle, entry)
    }
}

/// Insertar la flota de ejemplo si la tabla está vacía. Devuelve cuántos vehículos se insertaron.
pub async fn seed_if_empty(store: &mut dyn VehicleStore) -> AppResult<usize> {
    if !store.fetch_all().await?.is_empty() {
        info!("ℹ️ La base de datos ya contiene vehículos, se omite el seed");
        return Ok(0);
    }

    info!("🌱 Insertando flota de ejemplo...");
    let now = Utc::now();
    for sample in &SAMPLE_FLEET {
        let (vehicle, entry) = sample.build(now);
        store.add(vehicle);
        store.add_history_entry(entry);
    }
    store.commit().await?;

    info!("✅ {} vehículos de ejemplo insertados", SAMPLE_FLEET.len());
    Ok(SAMPLE_FLEET.len())
}
