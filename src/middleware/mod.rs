//! Middleware del sistema
//!
//! CORS configurable por entorno.

pub mod cors;

pub use cors::*;
