//! Módulo de base de datos
//!
//! Conexión a PostgreSQL, migraciones y datos de ejemplo.

pub mod connection;
pub mod seeder;
