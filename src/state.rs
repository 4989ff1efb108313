//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Cada petición obtiene su propio handle de
//! store, con su propia lista de cambios pendientes.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::memory_store::MemoryDatabase;
use crate::repositories::vehicle_repository::PgVehicleStore;
use crate::repositories::vehicle_store::VehicleStore;

/// Backend de persistencia compartido
#[derive(Clone)]
pub enum StorageBackend {
    Postgres(PgPool),
    Memory(MemoryDatabase),
}

#[derive(Clone)]
pub struct AppState {
    pub storage: StorageBackend,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(storage: StorageBackend, config: EnvironmentConfig) -> Self {
        Self { storage, config }
    }

    /// Estado sobre una base en memoria (tests y desarrollo local)
    pub fn in_memory(config: EnvironmentConfig) -> (Self, MemoryDatabase) {
        let db = MemoryDatabase::new();
        (Self::new(StorageBackend::Memory(db.clone()), config), db)
    }

    /// Crear un handle de store para una petición
    pub fn vehicle_store(&self) -> Box<dyn VehicleStore> {
        match &self.storage {
            StorageBackend::Postgres(pool) => Box::new(PgVehicleStore::new(pool.clone())),
            StorageBackend::Memory(db) => Box::new(db.store()),
        }
    }
}
