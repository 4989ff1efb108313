//! Controllers
//!
//! Orquestan el store de cada petición y devuelven los DTOs de la API.

pub mod report_controller;
pub mod vehicle_controller;
