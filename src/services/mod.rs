//! Services module
//!
//! Este módulo contiene la lógica de negocio: agregación de reportes y
//! mutaciones batch sobre la flota.

pub mod aggregation_engine;
pub mod batch_processor;
