//! Utilidades del sistema
//!
//! Manejo de errores y validadores custom.

pub mod errors;
pub mod validation;
