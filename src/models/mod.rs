//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio: vehículos, historial de
//! estados y reportes de flota.

pub mod report;
pub mod status_history;
pub mod vehicle;
