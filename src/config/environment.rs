//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto; un valor mal formado es un error de arranque.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

/// Backend de persistencia elegido con `STORAGE_BACKEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => Err(anyhow!("Unknown STORAGE_BACKEND '{}' (expected postgres or memory)", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub storage: StorageKind,
    pub seed_database: bool,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["*".to_string()],
            storage: StorageKind::Postgres,
            seed_database: false,
            log_level: "info".to_string(),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?,
            None => defaults.port,
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.storage,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: lookup("HOST").unwrap_or(defaults.host),
            cors_origins,
            storage,
            seed_database: lookup("SEED_DATABASE").map(|v| parse_bool(&v)).unwrap_or(false),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// CORS abierto a cualquier origen
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<EnvironmentConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.storage, StorageKind::Postgres);
        assert!(config.is_development());
        assert!(config.allows_any_origin());
        assert!(!config.seed_database);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("STORAGE_BACKEND", "Memory"),
            ("SEED_DATABASE", "true"),
            ("CORS_ORIGINS", "http://localhost:5173, https://fleet.example.com"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap();

        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageKind::Memory);
        assert!(config.seed_database);
        assert!(!config.allows_any_origin());
        assert_eq!(config.cors_origins.len(), 2);
        assert!(!config.is_development());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("STORAGE_BACKEND", "redis")]).is_err());
    }
}
