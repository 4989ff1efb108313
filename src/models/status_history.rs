//! Historial de cambios de estado
//!
//! Registros de auditoría append-only. Nunca se modifican ni se eliminan
//! desde el servicio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vehicle::VehicleStatus;

/// Actor por defecto cuando la petición no indica quién hizo el cambio
pub const DEFAULT_ACTOR: &str = "System";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub status: VehicleStatus,
    pub changed_by: String,
    pub description: String,
    pub changed_at: DateTime<Utc>,
}

impl StatusHistoryEntry {
    pub fn record(
        vehicle_id: Uuid,
        status: VehicleStatus,
        changed_by: Option<&str>,
        description: &str,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            status,
            changed_by: changed_by.unwrap_or(DEFAULT_ACTOR).to_string(),
            description: description.to_string(),
            changed_at,
        }
    }
}
