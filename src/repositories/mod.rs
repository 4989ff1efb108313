//! Persistencia
//!
//! `VehicleStore` define el contrato; hay una implementación sobre
//! PostgreSQL y otra en memoria.

pub mod memory_store;
pub mod vehicle_repository;
pub mod vehicle_store;
